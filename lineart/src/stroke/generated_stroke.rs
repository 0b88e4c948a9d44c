use crate::chain::*;
use crate::settings::*;

use glam::{DVec2, DVec3};

///
/// A point in a generated stroke
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    /// World position (moved towards the camera by the depth offset)
    pub position:       DVec3,

    /// Position in the camera frame
    pub screen:         DVec2,

    /// Multiplies the thickness of the stroke at this point
    pub pressure:       f64,

    /// Opacity at this point
    pub strength:       f64,

    pub vertex_color:   [f32; 4],

    /// Weight in the output vertex group of the stroke (0 if there isn't one)
    pub weight:         f64,
}

///
/// A stroke generated from a chain by a Line Art modifier
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedStroke {
    pub points:             Vec<StrokePoint>,
    pub thickness:          f64,
    pub material_index:     usize,

    /// The last point joins back up with the first
    pub cyclic:             bool,

    /// The chain in the cache entry that the stroke was generated from
    pub chain:              ChainId,

    /// Occlusion level of the chain the stroke was generated from
    pub level:              u32,

    /// Edge types of the chain the stroke was generated from
    pub types:              EdgeTypes,

    /// Name of the modifier that generated this stroke
    pub source_modifier:    String,

    /// Vertex group that receives the point weights
    pub vertex_group:       Option<String>,

    /// Baked strokes are kept when the modifier generates new strokes
    pub baked:              bool,
}
