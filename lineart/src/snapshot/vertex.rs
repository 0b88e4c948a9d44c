use glam::{DVec3};
use smallvec::*;

///
/// Handle of a vertex in a `SceneSnapshot`
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexIdx(pub u32);

///
/// The vertices of the source mesh that a snapshot vertex was made from, with their weights
///
/// Vertices created by clipping are a blend of the two vertices at the ends of the clipped edge.
///
pub type SourceBlend = SmallVec<[(u32, f64); 4]>;

///
/// A vertex in a scene snapshot
///
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotVertex {
    pub world:  DVec3,
    pub view:   DVec3,
    pub source: SourceBlend,
}

impl VertexIdx {
    #[inline]
    pub fn idx(self) -> usize { self.0 as usize }
}

///
/// Blends two vertex sources, weighting the second by `t`
///
pub fn blend_sources(a: &SourceBlend, b: &SourceBlend, t: f64) -> SourceBlend {
    let mut result: SourceBlend = smallvec![];

    for (source, weight) in a.iter().map(|(idx, weight)| (*idx, weight * (1.0 - t))).chain(b.iter().map(|(idx, weight)| (*idx, weight * t))) {
        if let Some(existing) = result.iter_mut().find(|(idx, _)| *idx == source) {
            existing.1 += weight;
        } else {
            result.push((source, weight));
        }
    }

    result
}
