use super::vertex::*;
use crate::scene::*;

use bitflags::bitflags;
use glam::{DVec3};

bitflags! {
    ///
    /// Properties of a triangle in a snapshot
    ///
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TriangleFlags: u8 {
        /// Back-facing triangle when back-face culling is on: it's classified but never hides anything
        const CULLED            = 1 << 0;

        /// The face is smooth-shaded
        const SMOOTH            = 1 << 1;

        /// The face has a face mark
        const FACE_MARK         = 1 << 2;

        /// The triangle never creates intersection lines
        const NO_INTERSECTION   = 1 << 3;

        /// The triangle only creates intersection lines and never hides anything
        const INTERSECTION_ONLY = 1 << 4;

        /// The triangle hides lines but generates none
        const OCCLUSION_ONLY    = 1 << 5;
    }
}

bitflags! {
    ///
    /// Properties of one of the edges of a triangle
    ///
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TriangleEdgeFlags: u8 {
        /// The source edge is marked for Line Art
        const MARK              = 1 << 0;

        /// The source edge is marked sharp
        const SHARP             = 1 << 1;

        /// The edge lies on the near or far clipping plane
        const CLIP_BOUNDARY     = 1 << 2;
    }
}

///
/// Handle of a triangle in a `SceneSnapshot`
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriangleIdx(pub u32);

///
/// A triangle in a scene snapshot
///
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub vertices:       [VertexIdx; 3],

    /// Flags for the edge from `vertices[n]` to `vertices[(n+1)%3]`
    pub edge_flags:     [TriangleEdgeFlags; 3],

    /// Unit normal in world space
    pub normal:         DVec3,

    /// Index of the object in the snapshot
    pub object:         u32,

    /// Material slot in the object's mesh
    pub material:       u16,

    pub material_mask:  u8,

    /// Number of occlusion levels this triangle adds to lines behind it
    pub occlusion:      u8,

    pub flags:          TriangleFlags,
}

impl TriangleIdx {
    #[inline]
    pub fn idx(self) -> usize { self.0 as usize }
}

impl From<SourceEdgeFlags> for TriangleEdgeFlags {
    fn from(flags: SourceEdgeFlags) -> TriangleEdgeFlags {
        let mut result = TriangleEdgeFlags::empty();

        if flags.contains(SourceEdgeFlags::MARK)    { result |= TriangleEdgeFlags::MARK; }
        if flags.contains(SourceEdgeFlags::SHARP)   { result |= TriangleEdgeFlags::SHARP; }

        result
    }
}

impl Triangle {
    ///
    /// The vertices at either end of one of the edges of this triangle
    ///
    #[inline]
    pub fn edge(&self, edge_idx: usize) -> (VertexIdx, VertexIdx) {
        (self.vertices[edge_idx], self.vertices[(edge_idx + 1) % 3])
    }

    ///
    /// The vertex that is not part of an edge
    ///
    #[inline]
    pub fn opposite_vertex(&self, edge_idx: usize) -> VertexIdx {
        self.vertices[(edge_idx + 2) % 3]
    }

    ///
    /// True if this triangle can hide the lines behind it
    ///
    #[inline]
    pub fn can_occlude(&self) -> bool {
        self.occlusion > 0 && !self.flags.intersects(TriangleFlags::CULLED | TriangleFlags::INTERSECTION_ONLY)
    }

    ///
    /// True if this triangle can create intersection lines
    ///
    #[inline]
    pub fn can_intersect(&self) -> bool {
        !self.flags.intersects(TriangleFlags::NO_INTERSECTION | TriangleFlags::OCCLUSION_ONLY)
    }

    ///
    /// True if this triangle shares a vertex with another triangle
    ///
    #[inline]
    pub fn shares_vertex(&self, other: &Triangle) -> bool {
        self.vertices.iter().any(|vertex| other.vertices.contains(vertex))
    }
}
