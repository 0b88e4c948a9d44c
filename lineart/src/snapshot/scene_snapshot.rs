use super::view::*;
use super::vertex::*;
use super::triangle::*;
use super::diagnostics::*;
use super::light_snapshot::*;
use crate::scene::*;

use glam::{DMat4, DVec3};

use std::sync::*;

///
/// A mesh object that was loaded into a snapshot
///
#[derive(Clone, Debug)]
pub struct SnapshotObject {
    pub id:                 ObjectId,

    /// How the object takes part in the computation (never `Inherit`)
    pub usage:              LineartUsage,

    /// Intersection mask bits from the object and the collections it was loaded through
    pub intersection_mask:  u8,

    /// Transformation from object space to world space (including any instancing transforms)
    pub transform:          DMat4,

    pub mesh:               Arc<SourceMesh>,
}

///
/// An edge that is not part of any face
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WireEdge {
    pub vertices:   [VertexIdx; 2],
    pub object:     u32,
}

///
/// The scene as seen by a camera at the start of a computation
///
/// Triangles and vertices are stored in arenas and refer to each other using `VertexIdx` and `TriangleIdx` handles.
/// A snapshot with no view is empty: there was no camera to compute lines for.
///
#[derive(Clone, Debug, Default)]
pub struct SceneSnapshot {
    pub view:           Option<ViewProjection>,
    pub objects:        Vec<SnapshotObject>,
    pub vertices:       Vec<SnapshotVertex>,
    pub triangles:      Vec<Triangle>,
    pub wire_edges:     Vec<WireEdge>,
    pub light:          Option<LightSnapshot>,
    pub diagnostics:    Diagnostics,
}

impl SceneSnapshot {
    ///
    /// Creates a snapshot containing nothing
    ///
    pub fn empty() -> SceneSnapshot {
        SceneSnapshot::default()
    }

    ///
    /// True if there's nothing to compute lines for
    ///
    pub fn is_empty(&self) -> bool {
        self.view.is_none() || (self.triangles.is_empty() && self.wire_edges.is_empty())
    }

    #[inline] pub fn vertex(&self, idx: VertexIdx) -> &SnapshotVertex  { &self.vertices[idx.idx()] }
    #[inline] pub fn triangle(&self, idx: TriangleIdx) -> &Triangle    { &self.triangles[idx.idx()] }

    ///
    /// The world space positions of the corners of a triangle
    ///
    #[inline]
    pub fn triangle_positions(&self, triangle: &Triangle) -> [DVec3; 3] {
        [
            self.vertices[triangle.vertices[0].idx()].world,
            self.vertices[triangle.vertices[1].idx()].world,
            self.vertices[triangle.vertices[2].idx()].world,
        ]
    }
}
