use super::lineart_settings::*;
use super::mask_filter::*;
use crate::scene::*;

///
/// Where a modifier takes its lines from
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineartSource {
    /// Every object in the scene
    Scene,

    /// Only the lines that belong to a single object
    Object(ObjectId),

    /// Only the lines that belong to the objects in a collection (including its child collections)
    Collection(CollectionId),
}

///
/// The configuration of a single Line Art modifier
///
/// The `settings` affect the computation itself: when a modifier shares the cache of its stack, the computation is
/// made by the first modifier in the stack and the other modifiers only use their settings to filter the result.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineartModifier {
    /// Name of this modifier (generated strokes are tagged with it)
    pub name:                               String,

    /// Disabled modifiers generate nothing
    pub enabled:                            bool,

    /// Settings for the feature line computation
    pub settings:                           LineartSettings,

    /// Where the lines are taken from
    pub source:                             LineartSource,

    /// With a collection source, take the lines of the objects that are not in the collection instead
    pub use_invert_collection:              bool,

    /// The layer that strokes are generated into
    pub target_layer:                       Option<String>,

    /// The material index of the generated strokes
    pub target_material:                    Option<usize>,

    /// Selects lines by the material masks of the faces they are on
    pub material_mask:                      MaskFilter,

    /// Selects intersection lines by the intersection masks of the objects that created them
    pub intersection_mask:                  MaskFilter,

    /// Thickness of the generated strokes
    pub thickness:                          f64,

    /// Strength of the points of the generated strokes
    pub opacity:                            f64,

    /// Multiplies the thickness once for each occlusion level of a line (1.0 draws every level at the same thickness)
    pub level_thickness_factor:             f64,

    /// Multiplies the opacity once for each occlusion level of a line
    pub level_opacity_factor:               f64,

    /// Vertex colour of the generated points
    pub color:                              [f32; 4],

    /// Distance to move the stroke points towards the camera
    pub stroke_depth_offset:                f64,

    /// Move the stroke points towards the custom camera instead of the scene camera
    pub use_offset_towards_custom_camera:   bool,

    /// Vertex groups whose names start with this are used to weight the generated points
    pub source_vertex_group:                String,

    /// Use the vertex groups that do not match `source_vertex_group` instead
    pub invert_source_vertex_group:         bool,

    /// Vertex group of the generated strokes that receives the weights
    pub vertex_group:                       Option<String>,

    /// Name the output vertex group after the source vertex group that supplied the weights
    pub use_output_vertex_group_match_by_name: bool,

    /// Share the computation with the other modifiers in the stack
    pub use_cache:                          bool,

    /// The strokes of this modifier have been baked and it no longer generates anything
    pub is_baked:                           bool,
}

impl Default for LineartModifier {
    fn default() -> Self {
        LineartModifier {
            name:                               "Line Art".to_string(),
            enabled:                            true,
            settings:                           LineartSettings::default(),
            source:                             LineartSource::Scene,
            use_invert_collection:              false,
            target_layer:                       None,
            target_material:                    None,
            material_mask:                      MaskFilter::default(),
            intersection_mask:                  MaskFilter::default(),
            thickness:                          25.0,
            opacity:                            1.0,
            level_thickness_factor:             1.0,
            level_opacity_factor:               1.0,
            color:                              [0.0, 0.0, 0.0, 1.0],
            stroke_depth_offset:                0.0,
            use_offset_towards_custom_camera:   false,
            source_vertex_group:                String::new(),
            invert_source_vertex_group:         false,
            vertex_group:                       None,
            use_output_vertex_group_match_by_name: false,
            use_cache:                          true,
            is_baked:                           false,
        }
    }
}

impl LineartModifier {
    ///
    /// Creates a modifier that draws the lines of the whole scene into a layer
    ///
    pub fn new(name: &str, target_layer: &str, target_material: usize) -> LineartModifier {
        LineartModifier {
            name:               name.to_string(),
            target_layer:       Some(target_layer.to_string()),
            target_material:    Some(target_material),
            ..LineartModifier::default()
        }
    }
}
