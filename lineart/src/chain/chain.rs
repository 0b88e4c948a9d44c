use crate::classify::*;
use crate::occlusion::*;
use crate::scene::*;
use crate::settings::*;

use glam::{DVec2, DVec3};

///
/// Handle of a chain: its index in the chains of a cache entry
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u32);

///
/// Where a chain point lies on the feature edges (used to look up vertex weights)
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointSource {
    pub edge:   FeatureEdgeId,

    /// Parameter along the edge in world space
    pub t:      f64,
}

///
/// A point in a chain
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChainPoint {
    /// Position on the screen
    pub screen: DVec2,

    /// Position in world space
    pub world:  DVec3,

    /// Distance in front of the camera
    pub depth:  f64,

    pub source: PointSource,
}

///
/// The properties that two segments or chains must share to be linked exactly
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChainKey {
    pub types:              EdgeTypes,
    pub level:              u32,
    pub object:             ObjectId,
    pub material_mask:      u8,
    pub intersection_mask:  u8,
    pub illumination:       Illumination,
    pub backdrop:           Backdrop,
}

///
/// A polyline made of linked feature edge segments
///
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
    pub points:             Vec<ChainPoint>,
    pub types:              EdgeTypes,
    pub level:              u32,
    pub object:             ObjectId,
    pub material_mask:      u8,
    pub intersection_mask:  u8,
    pub illumination:       Illumination,

    /// What the camera sees just outside the chain, for contours
    pub backdrop:           Backdrop,

    /// The last point connects back to the first
    pub closed:             bool,

    /// Set once the chain has been considered during chain connection, so it is never connected twice
    pub picked:             bool,
}

impl ChainPoint {
    ///
    /// Interpolates between two points, at a parameter along the line between them on the screen
    ///
    /// `to_world_param` converts the screen parameter into a parameter along the line in world space
    ///
    pub fn interpolate(a: &ChainPoint, b: &ChainPoint, screen_t: f64, to_world_param: impl Fn(f64, f64, f64) -> f64) -> ChainPoint {
        let world_t = to_world_param(screen_t, a.depth, b.depth);
        let source  = if a.source.edge == b.source.edge {
            PointSource { edge: a.source.edge, t: a.source.t + (b.source.t - a.source.t) * world_t }
        } else {
            a.source
        };

        ChainPoint {
            screen: a.screen.lerp(b.screen, screen_t),
            world:  a.world.lerp(b.world, world_t),
            depth:  a.depth + (b.depth - a.depth) * world_t,
            source: source,
        }
    }
}

impl Chain {
    ///
    /// Creates an open chain from a list of points and the properties of its segments
    ///
    pub fn new(points: Vec<ChainPoint>, key: ChainKey) -> Chain {
        Chain {
            points:             points,
            types:              key.types,
            level:              key.level,
            object:             key.object,
            material_mask:      key.material_mask,
            intersection_mask:  key.intersection_mask,
            illumination:       key.illumination,
            backdrop:           key.backdrop,
            closed:             false,
            picked:             false,
        }
    }

    ///
    /// The properties of this chain used for matching
    ///
    pub fn key(&self) -> ChainKey {
        ChainKey {
            types:              self.types,
            level:              self.level,
            object:             self.object,
            material_mask:      self.material_mask,
            intersection_mask:  self.intersection_mask,
            illumination:       self.illumination,
            backdrop:           self.backdrop,
        }
    }

    ///
    /// Creates a chain with the same properties as this one but different points
    ///
    pub fn with_points(&self, points: Vec<ChainPoint>, closed: bool) -> Chain {
        let mut chain   = Chain::new(points, self.key());
        chain.closed    = closed;
        chain.picked    = self.picked;

        chain
    }
}
