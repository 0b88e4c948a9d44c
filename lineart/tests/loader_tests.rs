use flo_lineart::*;
use flo_lineart::classify::*;
use flo_lineart::scene::*;
use flo_lineart::settings::*;
use flo_lineart::snapshot::*;

use glam::{DMat4, DVec3};

use std::sync::*;

fn scene_with_camera(eye: DVec3) -> SceneDescription {
    let mut scene   = SceneDescription::new();
    let camera      = scene.add_object(SceneObject::camera("Camera", CameraData::perspective(0.8, 1.0), look_at_transform(eye, DVec3::ZERO, DVec3::Y)));
    scene.set_active_camera(Some(camera));

    scene
}

fn cube() -> Arc<SourceMesh> {
    Arc::new(SourceMesh::cuboid(DVec3::ZERO, DVec3::ONE))
}

fn usage_of(snapshot: &SceneSnapshot, object: ObjectId) -> Option<LineartUsage> {
    snapshot.objects.iter().find(|loaded| loaded.id == object).map(|loaded| loaded.usage)
}

#[test]
pub fn no_camera_gives_empty_snapshot() {
    let mut scene = SceneDescription::new();
    scene.add_object(SceneObject::mesh("Cube", cube(), DMat4::IDENTITY));

    let snapshot = load_scene(&scene, &LineartSettings::default()).unwrap();

    assert!(snapshot.is_empty());
    assert!(snapshot.view.is_none());
    assert!(snapshot.triangles.is_empty());
}

#[test]
pub fn cube_loads_twelve_triangles() {
    let mut scene = scene_with_camera(DVec3::new(3.0, 4.0, 5.0));
    scene.add_object(SceneObject::mesh("Cube", cube(), DMat4::IDENTITY));

    let snapshot = load_scene(&scene, &LineartSettings::default()).unwrap();

    assert!(snapshot.triangles.len() == 12, "{}", snapshot.triangles.len());
    assert!(snapshot.vertices.len() == 8, "{}", snapshot.vertices.len());
    assert!(snapshot.diagnostics.instances_loaded == 1);
    assert!(snapshot.diagnostics.clipped_triangles == 0);
}

#[test]
pub fn invalid_clipping_is_an_error() {
    let mut scene   = SceneDescription::new();
    let camera      = CameraData::perspective(0.8, 1.0).with_clipping(0.0, 100.0);
    let camera      = scene.add_object(SceneObject::camera("Camera", camera, look_at_transform(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, DVec3::Y)));
    scene.set_active_camera(Some(camera));

    let result = load_scene(&scene, &LineartSettings::default());
    assert!(matches!(result, Err(LineartError::InvalidSettings(_))));
}

#[test]
pub fn custom_camera_overrides_active_camera() {
    let mut scene   = scene_with_camera(DVec3::new(0.0, 0.0, 5.0));
    let custom      = scene.add_object(SceneObject::camera("Custom", CameraData::orthographic(4.0, 1.0), look_at_transform(DVec3::new(5.0, 0.0, 0.0), DVec3::ZERO, DVec3::Y)));
    scene.add_object(SceneObject::mesh("Cube", cube(), DMat4::IDENTITY));

    let settings = LineartSettings { use_custom_camera: true, source_camera: Some(custom), ..LineartSettings::default() };
    let snapshot = load_scene(&scene, &settings).unwrap();
    let view     = snapshot.view.unwrap();

    assert!(view.position().distance(DVec3::new(5.0, 0.0, 0.0)) < 1e-9, "{:?}", view.position());
    assert!(!view.is_perspective());
}

#[test]
pub fn degenerate_triangles_are_counted() {
    let vertices    = vec![DVec3::new(0.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0), DVec3::new(2.0, 0.0, 0.0), DVec3::new(0.0, 1.0, 0.0)];
    let mesh        = SourceMesh::new(vertices, vec![SourceFace::new(&[0, 1, 2]), SourceFace::new(&[0, 1, 3])]);

    let mut scene   = scene_with_camera(DVec3::new(0.0, 0.0, 5.0));
    scene.add_object(SceneObject::mesh("Mesh", Arc::new(mesh), DMat4::IDENTITY));

    let snapshot = load_scene(&scene, &LineartSettings::default()).unwrap();

    assert!(snapshot.diagnostics.degenerate_triangles == 1, "{:?}", snapshot.diagnostics);
    assert!(snapshot.triangles.len() == 1);
}

#[test]
pub fn instances_share_prepared_meshes() {
    let mut scene       = scene_with_camera(DVec3::new(0.0, 3.0, 10.0));
    let source          = scene.add_collection(None, Collection::new("Source"));
    scene.add_object_to(source, SceneObject::mesh("Cube", cube(), DMat4::IDENTITY));

    scene.add_object(SceneObject::instance("Left", source, DMat4::from_translation(DVec3::new(-2.0, 0.0, 0.0))));
    scene.add_object(SceneObject::instance("Right", source, DMat4::from_translation(DVec3::new(2.0, 0.0, 0.0))));

    let snapshot = load_scene(&scene, &LineartSettings::default()).unwrap();

    assert!(snapshot.diagnostics.instances_loaded == 2, "{:?}", snapshot.diagnostics);
    assert!(snapshot.diagnostics.meshes_prepared == 1, "{:?}", snapshot.diagnostics);
    assert!(snapshot.triangles.len() == 24);

    let min_x = snapshot.vertices.iter().map(|vertex| vertex.world.x).fold(f64::MAX, f64::min);
    let max_x = snapshot.vertices.iter().map(|vertex| vertex.world.x).fold(f64::MIN, f64::max);
    assert!((min_x + 2.5).abs() < 1e-9 && (max_x - 2.5).abs() < 1e-9, "{} {}", min_x, max_x);

    // Instances can be switched off
    let settings = LineartSettings { use_object_instances: false, ..LineartSettings::default() };
    let snapshot = load_scene(&scene, &settings).unwrap();
    assert!(snapshot.triangles.is_empty());
}

#[test]
pub fn objects_in_several_collections_load_once() {
    let mut scene   = scene_with_camera(DVec3::new(3.0, 4.0, 5.0));
    let master      = scene.master_collection();
    let child       = scene.add_collection(Some(master), Collection::new("Child"));
    let cube_id     = scene.add_object(SceneObject::mesh("Cube", cube(), DMat4::IDENTITY));
    scene.collection_mut(child).unwrap().objects.push(cube_id);

    let snapshot = load_scene(&scene, &LineartSettings::default()).unwrap();

    assert!(snapshot.diagnostics.instances_loaded == 1, "{:?}", snapshot.diagnostics);
}

#[test]
pub fn hidden_objects_and_collections_are_skipped() {
    let mut scene   = scene_with_camera(DVec3::new(3.0, 4.0, 5.0));
    let master      = scene.master_collection();

    let mut hidden_collection       = Collection::new("Hidden");
    hidden_collection.visible       = false;
    let hidden_collection           = scene.add_collection(Some(master), hidden_collection);
    scene.add_object_to(hidden_collection, SceneObject::mesh("InHidden", cube(), DMat4::IDENTITY));

    let mut hidden_object           = SceneObject::mesh("Hidden", cube(), DMat4::IDENTITY);
    hidden_object.visible           = false;
    scene.add_object(hidden_object);

    let visible = scene.add_object(SceneObject::mesh("Visible", cube(), DMat4::IDENTITY));

    let snapshot = load_scene(&scene, &LineartSettings::default()).unwrap();

    assert!(snapshot.objects.len() == 1);
    assert!(snapshot.objects[0].id == visible);
}

#[test]
pub fn usage_is_inherited_from_collections() {
    let mut scene   = scene_with_camera(DVec3::new(3.0, 4.0, 5.0));
    let master      = scene.master_collection();

    let mut occluders   = Collection::new("Occluders");
    occluders.usage     = LineartUsage::OcclusionOnly;
    let occluders       = scene.add_collection(Some(master), occluders);

    let inherits    = scene.add_object_to(occluders, SceneObject::mesh("Inherits", cube(), DMat4::IDENTITY));
    let overrides   = scene.add_object_to(occluders, SceneObject::mesh("Overrides", cube(), DMat4::IDENTITY).with_usage(LineartUsage::Include));
    let excluded    = scene.add_object(SceneObject::mesh("Excluded", cube(), DMat4::IDENTITY).with_usage(LineartUsage::Exclude));
    let default     = scene.add_object(SceneObject::mesh("Default", cube(), DMat4::IDENTITY));

    let snapshot = load_scene(&scene, &LineartSettings::default()).unwrap();

    assert!(usage_of(&snapshot, inherits) == Some(LineartUsage::OcclusionOnly));
    assert!(usage_of(&snapshot, overrides) == Some(LineartUsage::Include));
    assert!(usage_of(&snapshot, excluded).is_none());
    assert!(usage_of(&snapshot, default) == Some(LineartUsage::Include));

    // Occlusion-only triangles are marked
    let occlusion_only = snapshot.triangles.iter().filter(|triangle| triangle.flags.contains(TriangleFlags::OCCLUSION_ONLY)).count();
    assert!(occlusion_only == 12, "{}", occlusion_only);
}

#[test]
pub fn back_faces_are_culled_when_requested() {
    let mut scene = scene_with_camera(DVec3::new(0.0, 0.0, 5.0));
    scene.add_object(SceneObject::mesh("Cube", cube(), DMat4::IDENTITY));

    let settings    = LineartSettings { use_back_face_culling: true, ..LineartSettings::default() };
    let snapshot    = load_scene(&scene, &settings).unwrap();

    // Only the two triangles of the front face are facing the camera
    let culled = snapshot.triangles.iter().filter(|triangle| triangle.flags.contains(TriangleFlags::CULLED)).count();
    assert!(culled == 10, "{}", culled);
}

#[test]
pub fn near_plane_clips_triangles() {
    let camera      = CameraData::perspective(0.8, 1.0).with_clipping(4.5, 100.0);
    let mut scene   = SceneDescription::new();
    let camera      = scene.add_object(SceneObject::camera("Camera", camera, look_at_transform(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, DVec3::Y)));
    scene.set_active_camera(Some(camera));

    // A floor that runs through the near plane
    let floor = SourceMesh::quad([DVec3::new(-1.0, -0.5, 1.0), DVec3::new(1.0, -0.5, 1.0), DVec3::new(1.0, -0.5, -1.0), DVec3::new(-1.0, -0.5, -1.0)]);
    scene.add_object(SceneObject::mesh("Floor", Arc::new(floor), DMat4::IDENTITY));

    let settings = LineartSettings { edge_types: EdgeTypes::LOOSE | EdgeTypes::CONTOUR, ..LineartSettings::default() };
    let snapshot = load_scene(&scene, &settings).unwrap();

    assert!(snapshot.diagnostics.clipped_triangles == 2, "{:?}", snapshot.diagnostics);

    for triangle in snapshot.triangles.iter() {
        for vertex in triangle.vertices.iter() {
            let depth = ViewProjection::depth(snapshot.vertex(*vertex).view);
            assert!(depth >= 4.5 - 1e-9, "{}", depth);
        }
    }

    // The cut vertices are shared, so the diagonal of the quad is still a shared edge and the cut is not a loose edge
    let mut diagnostics = Diagnostics::default();
    let edges           = classify_edges(&snapshot, &settings, &mut diagnostics);
    assert!(edges.len() == 3, "{:?}", edges);
    assert!(edges.iter().all(|edge| edge.types == EdgeTypes::LOOSE), "{:?}", edges);

    // The cut can be drawn as a contour
    let settings        = LineartSettings { use_clip_plane_boundaries: true, ..settings };
    let edges           = classify_edges(&snapshot, &settings, &mut diagnostics);
    let contours        = edges.iter().filter(|edge| edge.types == EdgeTypes::CONTOUR).count();
    assert!(contours == 2, "{:?}", edges);
}
