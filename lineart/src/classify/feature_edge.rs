use crate::scene::*;
use crate::settings::*;
use crate::snapshot::*;

use glam::{DVec3};
use smallvec::*;

///
/// Handle of a feature edge: the index of the edge in the list produced by the classifier
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureEdgeId(pub u32);

///
/// One end of a feature edge
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePoint {
    pub world:  DVec3,

    /// The snapshot vertex at this point (`None` for points made by intersecting triangles or casting shadows)
    pub vertex: Option<VertexIdx>,
}

///
/// What the camera sees just outside of a contour edge
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backdrop {
    /// Not known (the edge is not a contour, or the computation didn't look for backdrops)
    Unknown,

    /// There's nothing behind the contour
    Empty,

    /// The contour is in front of an object
    Object(ObjectId),
}

///
/// An edge that can produce a feature line
///
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureEdge {
    pub endpoints:          [EdgePoint; 2],
    pub types:              EdgeTypes,

    /// The triangles that the edge lies on (these never hide the edge)
    pub triangles:          SmallVec<[TriangleIdx; 2]>,

    /// Index of the object in the snapshot
    pub object:             u32,

    /// The material masks of the triangles next to the edge, combined
    pub material_mask:      u8,

    /// The intersection masks of the objects that created the edge (intersection edges only)
    pub intersection_mask:  u8,

    /// What is behind the edge, for contours
    pub backdrop:           Backdrop,
}

impl FeatureEdgeId {
    #[inline]
    pub fn idx(self) -> usize { self.0 as usize }
}

impl FeatureEdge {
    ///
    /// The world position at a parameter along the edge (0 is the start and 1 is the end)
    ///
    #[inline]
    pub fn point_at(&self, t: f64) -> DVec3 {
        if t <= 0.0 {
            self.endpoints[0].world
        } else if t >= 1.0 {
            self.endpoints[1].world
        } else {
            self.endpoints[0].world.lerp(self.endpoints[1].world, t)
        }
    }

    ///
    /// True if this edge lies on the specified triangle
    ///
    #[inline]
    pub fn is_on_triangle(&self, triangle: TriangleIdx) -> bool {
        self.triangles.contains(&triangle)
    }
}
