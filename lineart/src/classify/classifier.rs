use super::feature_edge::*;
use crate::scene::*;
use crate::settings::*;
use crate::snapshot::*;

use smallvec::*;

use std::ops::{Range};

///
/// One side of a triangle, used to find the triangles that share each edge
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct EdgeUse {
    key:        (VertexIdx, VertexIdx),
    triangle:   TriangleIdx,
    edge:       u8,
}

///
/// Everything needed to classify a single edge
///
struct ClassifyContext<'a> {
    snapshot:   &'a SceneSnapshot,
    view:       &'a ViewProjection,
    settings:   &'a LineartSettings,
}

///
/// True if the faces of an object with this usage create lines other than intersections
///
#[inline]
fn generates_edges(usage: LineartUsage) -> bool {
    !matches!(usage, LineartUsage::OcclusionOnly | LineartUsage::IntersectionOnly | LineartUsage::Exclude)
}

///
/// Finds the runs of edge uses that share the same pair of vertices
///
fn edge_groups(uses: &[EdgeUse]) -> Vec<Range<usize>> {
    let mut groups  = vec![];
    let mut start   = 0;

    for idx in 1..=uses.len() {
        if idx == uses.len() || uses[idx].key != uses[start].key {
            groups.push(start..idx);
            start = idx;
        }
    }

    groups
}

impl<'a> ClassifyContext<'a> {
    ///
    /// Applies the face mark filter to the types of an edge
    ///
    fn filter_face_marks(&self, types: EdgeTypes, marks: (bool, bool)) -> EdgeTypes {
        let filter = &self.settings.face_mark;
        if !filter.enabled {
            return types;
        }

        let (first_mark, second_mark) = marks;

        let mut keep = if filter.boundaries != filter.invert {
            first_mark && second_mark
        } else {
            first_mark || second_mark
        };

        if filter.invert {
            keep = !keep;
        }

        if keep {
            types
        } else if filter.keep_contour {
            types & EdgeTypes::CONTOUR
        } else {
            EdgeTypes::empty()
        }
    }

    ///
    /// Classifies an edge used by a single triangle
    ///
    fn boundary_types(&self, flags: TriangleEdgeFlags) -> EdgeTypes {
        let mut types = EdgeTypes::empty();

        if flags.contains(TriangleEdgeFlags::CLIP_BOUNDARY) {
            if self.settings.use_clip_plane_boundaries {
                types |= EdgeTypes::CONTOUR;
            }
        } else {
            types |= EdgeTypes::LOOSE;

            if self.settings.use_loose_as_contour {
                types |= EdgeTypes::CONTOUR;
            }
        }

        if flags.contains(TriangleEdgeFlags::MARK) {
            types |= EdgeTypes::EDGE_MARK;
        }

        types
    }

    ///
    /// Classifies an edge shared by two triangles
    ///
    fn shared_types(&self, first: &EdgeUse, second: &EdgeUse, flags: TriangleEdgeFlags) -> EdgeTypes {
        let snapshot    = self.snapshot;
        let tri_a       = snapshot.triangle(first.triangle);
        let tri_b       = snapshot.triangle(second.triangle);
        let start       = snapshot.vertex(first.key.0).world;
        let end         = snapshot.vertex(first.key.1).world;
        let middle      = (start + end) * 0.5;

        let mut types   = EdgeTypes::empty();

        // Facing changes relative to the camera
        let view_vector = self.view.view_vector(middle);
        let front_a     = tri_a.normal.dot(view_vector) > 0.0;
        let front_b     = tri_b.normal.dot(view_vector) > 0.0;

        if front_a != front_b {
            types |= EdgeTypes::SILHOUETTE;

            // Contour if the back-facing triangle folds away behind the front-facing one
            let (front, back, back_use) = if front_a { (tri_a, tri_b, second) } else { (tri_b, tri_a, first) };
            let back_vertex             = snapshot.vertex(back.opposite_vertex(back_use.edge as usize)).world;

            if front.normal.dot(back_vertex - start) < 0.0 {
                types |= EdgeTypes::CONTOUR;
            }
        }

        // Creases
        let both_smooth     = tri_a.flags.contains(TriangleFlags::SMOOTH) && tri_b.flags.contains(TriangleFlags::SMOOTH);
        let can_crease      = !both_smooth
            || self.settings.use_crease_on_smooth
            || (self.settings.use_crease_on_sharp && flags.contains(TriangleEdgeFlags::SHARP));

        if can_crease {
            let angle = tri_a.normal.dot(tri_b.normal).clamp(-1.0, 1.0).acos().to_degrees();

            if angle > self.settings.crease_threshold {
                types |= EdgeTypes::CREASE;
            }
        }

        // Material borders and marks
        if tri_a.object == tri_b.object && tri_a.material != tri_b.material {
            types |= EdgeTypes::MATERIAL;
        }

        if flags.contains(TriangleEdgeFlags::MARK) {
            types |= EdgeTypes::EDGE_MARK;
        }

        // Facing changes relative to the light
        if let Some(light) = &snapshot.light {
            if light.faces_light(tri_a.normal, middle) != light.faces_light(tri_b.normal, middle) {
                types |= EdgeTypes::LIGHT_CONTOUR;
            }
        }

        self.filter_face_marks(types, (tri_a.flags.contains(TriangleFlags::FACE_MARK), tri_b.flags.contains(TriangleFlags::FACE_MARK)))
    }

    ///
    /// Classifies the edge shared by a group of triangle sides
    ///
    fn classify_group(&self, group: &[EdgeUse]) -> Option<FeatureEdge> {
        let snapshot    = self.snapshot;
        let first       = &group[0];
        let tri_a       = snapshot.triangle(first.triangle);
        let object      = &snapshot.objects[tri_a.object as usize];

        if !generates_edges(object.usage) {
            return None;
        }

        // Non-manifold edges use the two lowest-index triangles
        let used        = &group[0..group.len().min(2)];
        let flags       = used.iter()
            .fold(TriangleEdgeFlags::empty(), |flags, edge_use| flags | snapshot.triangle(edge_use.triangle).edge_flags[edge_use.edge as usize]);

        let types = if used.len() == 1 {
            let mark = tri_a.flags.contains(TriangleFlags::FACE_MARK);
            self.filter_face_marks(self.boundary_types(flags), (mark, mark))
        } else {
            self.shared_types(&used[0], &used[1], flags)
        };

        let types = types & self.settings.classified_types();
        if types.is_empty() {
            return None;
        }

        // Use the direction of the edge in the first triangle
        let (start, end)    = tri_a.edge(first.edge as usize);
        let material_mask   = used.iter().fold(0, |mask, edge_use| mask | snapshot.triangle(edge_use.triangle).material_mask);

        Some(FeatureEdge {
            endpoints:          [
                EdgePoint { world: snapshot.vertex(start).world, vertex: Some(start) },
                EdgePoint { world: snapshot.vertex(end).world, vertex: Some(end) },
            ],
            types:              types,
            triangles:          used.iter().map(|edge_use| edge_use.triangle).collect(),
            object:             tri_a.object,
            material_mask:      material_mask,
            intersection_mask:  0,
            backdrop:           Backdrop::Unknown,
        })
    }

    ///
    /// Classifies an edge that is not part of any triangle
    ///
    fn classify_wire(&self, wire: &WireEdge) -> Option<FeatureEdge> {
        let snapshot    = self.snapshot;
        let object      = &snapshot.objects[wire.object as usize];

        if !generates_edges(object.usage) {
            return None;
        }

        let mut types = EdgeTypes::LOOSE;
        if self.settings.use_loose_as_contour {
            types |= EdgeTypes::CONTOUR;
        }

        let types = types & self.settings.classified_types();
        if types.is_empty() {
            return None;
        }

        Some(FeatureEdge {
            endpoints:          wire.vertices.map(|vertex| EdgePoint { world: snapshot.vertex(vertex).world, vertex: Some(vertex) }),
            types:              types,
            triangles:          smallvec![],
            object:             wire.object,
            material_mask:      0,
            intersection_mask:  0,
            backdrop:           Backdrop::Unknown,
        })
    }
}

#[cfg(feature="multithreading")]
fn classify_all_groups(context: &ClassifyContext, uses: &[EdgeUse], groups: &[Range<usize>]) -> Vec<Option<FeatureEdge>> {
    use rayon::prelude::*;

    groups.par_iter()
        .map(|group| context.classify_group(&uses[group.clone()]))
        .collect()
}

#[cfg(not(feature="multithreading"))]
fn classify_all_groups(context: &ClassifyContext, uses: &[EdgeUse], groups: &[Range<usize>]) -> Vec<Option<FeatureEdge>> {
    groups.iter()
        .map(|group| context.classify_group(&uses[group.clone()]))
        .collect()
}

///
/// Finds the feature edges formed by the triangle edges and loose edges of a snapshot
///
/// Intersection edges are found separately by `find_intersection_edges()`. The result only depends on the snapshot and
/// the settings: edges are ordered by their vertices, then loose edges follow in the order they were loaded.
///
pub fn classify_edges(snapshot: &SceneSnapshot, settings: &LineartSettings, diagnostics: &mut Diagnostics) -> Vec<FeatureEdge> {
    let view = if let Some(view) = &snapshot.view { view } else { return vec![]; };

    // Gather every side of every triangle, keyed by its vertices
    let mut uses = snapshot.triangles.iter()
        .enumerate()
        .flat_map(|(triangle_idx, triangle)| {
            (0..3).map(move |edge_idx| {
                let (start, end) = triangle.edge(edge_idx);

                EdgeUse {
                    key:        if start < end { (start, end) } else { (end, start) },
                    triangle:   TriangleIdx(triangle_idx as u32),
                    edge:       edge_idx as u8,
                }
            })
        })
        .collect::<Vec<_>>();
    uses.sort_unstable();

    let groups = edge_groups(&uses);
    diagnostics.non_manifold_edges += groups.iter().filter(|group| group.len() > 2).count();

    let context = ClassifyContext { snapshot, view, settings };
    let mut edges = classify_all_groups(&context, &uses, &groups)
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    edges.extend(snapshot.wire_edges.iter().filter_map(|wire| context.classify_wire(wire)));

    edges
}

///
/// Removes the types that were not requested from a set of edges, and then the edges that have no types left
///
/// The classifier finds light contours whenever shadows are cast: they're removed with this once the shadows have been found.
///
pub fn retain_edge_types(edges: &mut Vec<FeatureEdge>, types: EdgeTypes) {
    edges.retain_mut(|edge| {
        edge.types &= types;
        !edge.types.is_empty()
    });
}
