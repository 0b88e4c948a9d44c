use super::view::*;
use crate::scene::*;

use glam::{DVec3};

///
/// The light used by a computation
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSnapshot {
    pub object:         ObjectId,
    pub kind:           LightKind,

    /// Position of the light in world space
    pub position:       DVec3,

    /// Direction the light travels in (for sun lights)
    pub direction:      DVec3,

    /// The camera used to work out which lines the light can see, when the light pass is needed
    pub shadow_view:    Option<ViewProjection>,
}

impl LightSnapshot {
    ///
    /// True if a surface with the specified normal at the specified point faces towards the light
    ///
    #[inline]
    pub fn faces_light(&self, normal: DVec3, point: DVec3) -> bool {
        match self.kind {
            LightKind::Sun      => normal.dot(-self.direction) > 0.0,
            LightKind::Point    => normal.dot(self.position - point) > 0.0,
        }
    }
}
