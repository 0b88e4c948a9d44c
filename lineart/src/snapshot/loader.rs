use super::view::*;
use super::vertex::*;
use super::triangle::*;
use super::clip::*;
use super::light_snapshot::*;
use super::prepared_mesh::*;
use super::scene_snapshot::*;
use crate::error::*;
use crate::scene::*;
use crate::settings::*;

use glam::{DMat4, DVec3};
use log::*;
use smallvec::*;

use std::collections::{HashMap, HashSet};
use std::sync::*;

/// Collection instances nested deeper than this are ignored (guards against collections that instance themselves)
const MAX_INSTANCE_DEPTH: usize = 16;

/// Only the first few degenerate triangles are logged individually
const MAX_LOGGED_DEGENERATE: usize = 4;

///
/// Loads the objects of a scene into a snapshot
///
struct SceneLoader<'a> {
    scene:          &'a SceneDescription,
    settings:       &'a LineartSettings,
    view:           ViewProjection,
    snapshot:       SceneSnapshot,

    /// Meshes that have already been triangulated, by the address of their `SourceMesh`
    prepared:       HashMap<usize, Arc<PreparedMesh>>,

    /// Objects that have been loaded directly from a collection (objects can be in more than one collection)
    loaded_objects: HashSet<ObjectId>,
}

///
/// Resolves an object's usage against the usage of the collection it was found in
///
#[inline]
fn resolve_usage(own: LineartUsage, inherited: LineartUsage) -> LineartUsage {
    match (own, inherited) {
        (LineartUsage::Inherit, LineartUsage::Inherit)  => LineartUsage::Include,
        (LineartUsage::Inherit, inherited)              => inherited,
        (own, _)                                        => own,
    }
}

///
/// True if three positions make a triangle with some area
///
#[inline]
fn is_valid_triangle(positions: &[DVec3; 3]) -> bool {
    if !positions.iter().all(|pos| pos.is_finite()) {
        return false;
    }

    let edge_a  = positions[1] - positions[0];
    let edge_b  = positions[2] - positions[0];
    let area    = edge_a.cross(edge_b).length();

    area > 1e-12 * edge_a.length() * edge_b.length() && area > 0.0
}

impl<'a> SceneLoader<'a> {
    ///
    /// Loads every visible object in a collection and its children
    ///
    fn load_collection(&mut self, collection_id: CollectionId, parent_transform: DMat4, inherited_usage: LineartUsage, inherited_mask: u8, instanced: bool, depth: usize) -> Result<(), LineartError> {
        if depth > MAX_INSTANCE_DEPTH {
            debug!("Line art: collection {:?} is nested too deeply to load", collection_id);
            return Ok(());
        }

        let scene       = self.scene;
        let collection  = if let Some(collection) = scene.collection(collection_id) { collection } else { return Ok(()); };

        if !collection.visible {
            return Ok(());
        }

        let usage       = resolve_usage(collection.usage, inherited_usage);
        let mask        = inherited_mask | collection.intersection_mask;

        for object_id in collection.objects.iter() {
            self.load_object(*object_id, parent_transform, usage, mask, instanced, depth)?;
        }

        for child_id in collection.children.iter() {
            self.load_collection(*child_id, parent_transform, usage, mask, instanced, depth + 1)?;
        }

        Ok(())
    }

    ///
    /// Loads a single object found in a collection
    ///
    fn load_object(&mut self, object_id: ObjectId, parent_transform: DMat4, inherited_usage: LineartUsage, inherited_mask: u8, instanced: bool, depth: usize) -> Result<(), LineartError> {
        let scene   = self.scene;
        let object  = if let Some(object) = scene.object(object_id) { object } else { return Ok(()); };

        if !object.visible {
            return Ok(());
        }

        let usage = resolve_usage(object.usage, inherited_usage);
        if usage == LineartUsage::Exclude {
            return Ok(());
        }

        if !instanced && !self.loaded_objects.insert(object_id) {
            return Ok(());
        }

        let transform   = parent_transform * object.transform;
        let mask        = inherited_mask | object.intersection_mask;

        match &object.data {
            ObjectData::Mesh(mesh) => {
                self.load_mesh(object_id, mesh, transform, usage, mask)?;
            }

            ObjectData::CollectionInstance(collection_id) => {
                if self.settings.use_object_instances {
                    self.load_collection(*collection_id, transform, usage, mask, true, depth + 1)?;
                }
            }

            ObjectData::Camera(_) | ObjectData::Light(_) | ObjectData::Empty => { }
        }

        Ok(())
    }

    ///
    /// Retrieves the triangulation of a mesh, preparing it if this is the first instance of the mesh
    ///
    fn prepared_mesh(&mut self, mesh: &Arc<SourceMesh>) -> Arc<PreparedMesh> {
        let key = Arc::as_ptr(mesh) as usize;

        if let Some(prepared) = self.prepared.get(&key) {
            return Arc::clone(prepared);
        }

        let prepared = Arc::new(PreparedMesh::prepare(mesh));
        self.snapshot.diagnostics.meshes_prepared += 1;
        self.prepared.insert(key, Arc::clone(&prepared));

        prepared
    }

    ///
    /// Loads an instance of a mesh
    ///
    fn load_mesh(&mut self, object_id: ObjectId, mesh: &Arc<SourceMesh>, transform: DMat4, usage: LineartUsage, intersection_mask: u8) -> Result<(), LineartError> {
        let prepared        = self.prepared_mesh(mesh);
        let view            = self.view;
        let object_idx      = self.snapshot.objects.len() as u32;
        let first_vertex    = self.snapshot.vertices.len() as u32;

        self.snapshot.objects.push(SnapshotObject {
            id:                 object_id,
            usage:              usage,
            intersection_mask:  intersection_mask,
            transform:          transform,
            mesh:               Arc::clone(mesh),
        });
        self.snapshot.diagnostics.instances_loaded += 1;

        // Transform the vertices of this instance
        try_reserve(&mut self.snapshot.vertices, mesh.vertices.len(), "vertices")?;
        self.snapshot.vertices.extend(mesh.vertices.iter().enumerate()
            .map(|(idx, pos)| {
                let world = transform.transform_point3(*pos);

                SnapshotVertex {
                    world:  world,
                    view:   view.to_view(world),
                    source: smallvec![(idx as u32, 1.0)],
                }
            }));

        let usage_flags = match usage {
            LineartUsage::OcclusionOnly     => TriangleFlags::OCCLUSION_ONLY,
            LineartUsage::IntersectionOnly  => TriangleFlags::INTERSECTION_ONLY,
            LineartUsage::NoIntersection    => TriangleFlags::NO_INTERSECTION,
            _                               => TriangleFlags::empty(),
        };

        let mut clipper = PolygonClipper::new(view.clip_start, view.clip_end);
        try_reserve(&mut self.snapshot.triangles, prepared.triangles.len(), "triangles")?;

        for triangle in prepared.triangles.iter() {
            let vertices    = triangle.vertices.map(|idx| VertexIdx(first_vertex + idx));
            let positions   = vertices.map(|idx| self.snapshot.vertices[idx.idx()].world);

            if !is_valid_triangle(&positions) {
                if self.snapshot.diagnostics.degenerate_triangles < MAX_LOGGED_DEGENERATE {
                    debug!("Line art: skipping degenerate triangle {:?} in face {} of object {:?}", triangle.vertices, triangle.face, object_id);
                }

                self.snapshot.diagnostics.degenerate_triangles += 1;
                continue;
            }

            let normal      = (positions[1] - positions[0]).cross(positions[2] - positions[0]).normalize();
            let face        = &mesh.faces[triangle.face as usize];
            let material    = mesh.material(face.material);

            let mut flags   = usage_flags;
            if face.smooth      { flags |= TriangleFlags::SMOOTH; }
            if face.face_mark   { flags |= TriangleFlags::FACE_MARK; }

            // Clip against the near and far planes
            let polygon: ClipPolygon = (0..3).map(|idx| (vertices[idx], TriangleEdgeFlags::from(triangle.edge_flags[idx]))).collect();
            let polygon = clipper.clip_polygon(&mut self.snapshot.vertices, polygon)?;

            if polygon.len() < 3 {
                self.snapshot.diagnostics.clipped_triangles += 1;
                continue;
            } else if polygon.len() != 3 || polygon.iter().zip(vertices.iter()).any(|((a, _), b)| a != b) {
                self.snapshot.diagnostics.clipped_triangles += 1;
            }

            // Fan-triangulate the clipped polygon (edges inside the polygon have no flags)
            let last = polygon.len() - 1;
            for idx in 1..last {
                let corners     = [polygon[0].0, polygon[idx].0, polygon[idx+1].0];
                let edge_flags  = [
                    if idx == 1 { polygon[0].1 } else { TriangleEdgeFlags::empty() },
                    polygon[idx].1,
                    if idx+1 == last { polygon[last].1 } else { TriangleEdgeFlags::empty() },
                ];

                let centroid    = corners.iter().map(|idx| self.snapshot.vertices[idx.idx()].world).sum::<DVec3>() / 3.0;
                let front       = normal.dot(view.view_vector(centroid)) > 0.0;

                let mut flags   = flags;
                if self.settings.use_back_face_culling && !front {
                    flags |= TriangleFlags::CULLED;
                }

                self.snapshot.triangles.push(Triangle {
                    vertices:       corners,
                    edge_flags:     edge_flags,
                    normal:         normal,
                    object:         object_idx,
                    material:       face.material,
                    material_mask:  material.mask_bits,
                    occlusion:      material.occlusion,
                    flags:          flags,
                });
            }
        }

        // Loose edges
        for edge in prepared.wire_edges.iter() {
            let vertices = edge.map(|idx| VertexIdx(first_vertex + idx));

            if !vertices.iter().all(|idx| self.snapshot.vertices[idx.idx()].world.is_finite()) {
                continue;
            }

            if let Some(vertices) = clipper.clip_segment(&mut self.snapshot.vertices, vertices)? {
                self.snapshot.wire_edges.push(WireEdge { vertices, object: object_idx });
            }
        }

        Ok(())
    }
}

///
/// Finds the camera for a computation
///
fn resolve_camera(scene: &SceneDescription, settings: &LineartSettings) -> Option<(CameraData, DMat4)> {
    let camera_id   = settings.camera_override().or(scene.active_camera())?;
    let camera      = scene.object(camera_id)?;

    match &camera.data {
        ObjectData::Camera(data)    => Some((*data, camera.transform)),
        _                           => None,
    }
}

///
/// Finds the light for a computation
///
fn resolve_light(scene: &SceneDescription, settings: &LineartSettings) -> Option<LightSnapshot> {
    let light_id    = settings.light_object?;
    let light       = scene.object(light_id)?;
    let data        = if let ObjectData::Light(data) = &light.data { *data } else { return None; };

    let position    = light.transform.transform_point3(DVec3::ZERO);
    let direction   = light.transform.transform_vector3(DVec3::NEG_Z).normalize_or_zero();

    let shadow_view = if settings.needs_shadow_view() {
        let camera = match data.kind {
            LightKind::Sun      => CameraData::orthographic(settings.shadow_camera_size, 1.0),
            LightKind::Point    => CameraData::perspective(2.0 * (settings.shadow_camera_size / (2.0 * settings.shadow_camera_far)).atan(), 1.0),
        };
        let camera = camera.with_clipping(settings.shadow_camera_near, settings.shadow_camera_far);

        Some(ViewProjection::new(&camera, light.transform, 0.0))
    } else {
        None
    };

    Some(LightSnapshot {
        object:         light_id,
        kind:           data.kind,
        position:       position,
        direction:      direction,
        shadow_view:    shadow_view,
    })
}

///
/// Loads a scene into a snapshot for computing feature lines
///
/// The snapshot is empty if there's no camera. The scene itself is never modified.
///
pub fn load_scene(scene: &SceneDescription, settings: &LineartSettings) -> Result<SceneSnapshot, LineartError> {
    let (camera, camera_transform) = match resolve_camera(scene, settings) {
        Some(camera)    => camera,
        None            => {
            debug!("Line art: no camera is available, nothing will be computed");
            return Ok(SceneSnapshot::empty());
        }
    };

    let valid_clipping = match camera.projection {
        Projection::Perspective { .. }  => camera.clip_start > 0.0 && camera.clip_end > camera.clip_start,
        Projection::Orthographic { .. } => camera.clip_end > camera.clip_start,
    };
    if !valid_clipping {
        return Err(LineartError::InvalidSettings(format!("camera clipping range {}..{} cannot be used", camera.clip_start, camera.clip_end)));
    }

    let view        = ViewProjection::new(&camera, camera_transform, settings.overscan);
    let mut loader  = SceneLoader {
        scene:          scene,
        settings:       settings,
        view:           view,
        snapshot:       SceneSnapshot { view: Some(view), ..SceneSnapshot::empty() },
        prepared:       HashMap::new(),
        loaded_objects: HashSet::new(),
    };

    loader.load_collection(scene.master_collection(), DMat4::IDENTITY, LineartUsage::Inherit, 0, false, 0)?;

    let mut snapshot    = loader.snapshot;
    snapshot.light      = resolve_light(scene, settings);

    Ok(snapshot)
}
