use super::edge_types::*;
use crate::error::*;
use crate::scene::*;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::{RangeInclusive};

///
/// Which lines to keep according to the light pass
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShadowSelection {
    /// No light pass: lines are kept regardless of how they are lit
    None,

    /// Only lines that the light can see
    Illuminated,

    /// Only lines that are in the shadow of another surface
    Shaded,
}

///
/// Selects contour lines by what is behind them
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SilhouetteFilter {
    /// Contours are kept regardless of what is behind them
    None,

    /// Only contours against something outside of the modifier's source (or against nothing at all)
    Group,

    /// Only contours against a different object (or against nothing at all)
    Individual,
}

///
/// Filters edges by the face marks of the faces on either side of them
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct FaceMarkFilter {
    /// Only edges next to marked faces are kept
    pub enabled:        bool,

    /// Keep the edges that would otherwise be removed instead
    pub invert:         bool,

    /// Edges are only kept when both of their faces are marked
    pub boundaries:     bool,

    /// Contour edges are kept regardless of the face marks
    pub keep_contour:   bool,
}

///
/// Settings for the chaining stage
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainingSettings {
    /// Chain ends closer together than this are connected (screen units, where the frame is 2 units across)
    pub image_threshold:            f64,

    /// Measure the chaining threshold in world units instead of screen units
    pub geometry_space:             bool,

    /// Intersection lines can be connected to lines of any other type
    pub fuzzy_intersections:        bool,

    /// Lines of any type can be connected to each other
    pub fuzzy_all:                  bool,

    /// Loose edges are connected into chains with each other
    pub loose_edge_chain:           bool,

    /// Edges keep every type they were classified as (otherwise only the highest priority type is kept)
    pub overlapping_edge_types:     bool,

    /// Keep small zig-zags in the chains
    pub detail_preserve:            bool,

    /// Cut chains at the edge of the camera frame
    pub image_boundary_trimming:    bool,

    /// Chains are split at corners sharper than this angle in degrees (0 to never split)
    pub split_angle:                f64,

    /// Points closer than this to a straight line between their neighbours are removed (0 to keep every point)
    pub smooth_tolerance:           f64,
}

///
/// The settings that affect the result of a feature line computation
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineartSettings {
    /// The types of edge to look for
    pub edge_types:                 EdgeTypes,

    /// Edges where the angle between the face normals exceeds this many degrees are creases
    pub crease_threshold:           f64,

    /// Edges between two smooth-shaded faces can be creases
    pub use_crease_on_smooth:       bool,

    /// Edges marked sharp can be creases even when both faces are smooth-shaded
    pub use_crease_on_sharp:        bool,

    /// Loose edges are also marked as contours
    pub use_loose_as_contour:       bool,

    /// Edges created by clipping against the near and far planes are contours
    pub use_clip_plane_boundaries:  bool,

    /// Faces pointing away from the camera do not hide anything
    pub use_back_face_culling:      bool,

    /// Load the objects in instanced collections
    pub use_object_instances:       bool,

    /// Filtering by face marks
    pub face_mark:                  FaceMarkFilter,

    /// Keep a range of occlusion levels rather than just `level_start`
    pub use_multiple_levels:        bool,

    /// The first occlusion level to keep (0 is visible)
    pub level_start:                u32,

    /// The last occlusion level to keep, when `use_multiple_levels` is set
    pub level_end:                  u32,

    /// Extra space around the camera frame to compute lines for, as a fraction of the frame size
    pub overscan:                   f64,

    /// Use `source_camera` instead of the scene camera
    pub use_custom_camera:          bool,

    /// The camera to use when `use_custom_camera` is set
    pub source_camera:              Option<ObjectId>,

    /// The light used for light contours and the light pass
    pub light_object:               Option<ObjectId>,

    /// Selects lines by their illumination (anything other than `None` requests a light pass)
    pub shadow_selection:           ShadowSelection,

    /// Size of the frame of the camera used for the light pass
    pub shadow_camera_size:         f64,

    /// Near clipping distance of the camera used for the light pass
    pub shadow_camera_near:         f64,

    /// Far clipping distance of the camera used for the light pass
    pub shadow_camera_far:          f64,

    /// Selects contours by the objects behind them (anything other than `None` requests a silhouette pass)
    pub silhouette_filtering:       SilhouetteFilter,

    /// Keep the contours that the silhouette filter would remove instead
    pub use_invert_silhouette:      bool,

    /// How the visible segments are turned into chains
    pub chaining:                   ChainingSettings,
}

impl Default for ChainingSettings {
    fn default() -> Self {
        ChainingSettings {
            image_threshold:            0.001,
            geometry_space:             false,
            fuzzy_intersections:        true,
            fuzzy_all:                  false,
            loose_edge_chain:           false,
            overlapping_edge_types:     false,
            detail_preserve:            true,
            image_boundary_trimming:    false,
            split_angle:                0.0,
            smooth_tolerance:           0.0,
        }
    }
}

impl Default for LineartSettings {
    fn default() -> Self {
        LineartSettings {
            edge_types:                 EdgeTypes::default(),
            crease_threshold:           40.0,
            use_crease_on_smooth:       false,
            use_crease_on_sharp:        true,
            use_loose_as_contour:       false,
            use_clip_plane_boundaries:  false,
            use_back_face_culling:      false,
            use_object_instances:       true,
            face_mark:                  FaceMarkFilter::default(),
            use_multiple_levels:        false,
            level_start:                0,
            level_end:                  0,
            overscan:                   0.1,
            use_custom_camera:          false,
            source_camera:              None,
            light_object:               None,
            shadow_selection:           ShadowSelection::None,
            shadow_camera_size:         200.0,
            shadow_camera_near:         0.1,
            shadow_camera_far:          200.0,
            silhouette_filtering:       SilhouetteFilter::None,
            use_invert_silhouette:      false,
            chaining:                   ChainingSettings::default(),
        }
    }
}

impl LineartSettings {
    ///
    /// The range of occlusion levels kept by these settings
    ///
    pub fn levels(&self) -> RangeInclusive<u32> {
        if self.use_multiple_levels {
            self.level_start..=self.level_end.max(self.level_start)
        } else {
            self.level_start..=self.level_start
        }
    }

    ///
    /// The camera that these settings override the scene camera with, if any
    ///
    pub fn camera_override(&self) -> Option<ObjectId> {
        if self.use_custom_camera {
            self.source_camera
        } else {
            None
        }
    }

    ///
    /// True if a computation with these settings needs to run the light pass
    ///
    pub fn needs_light_pass(&self) -> bool {
        self.light_object.is_some() && self.shadow_selection != ShadowSelection::None
    }

    ///
    /// True if a computation with these settings casts shadow lines from the light contours
    ///
    pub fn casts_shadows(&self) -> bool {
        self.light_object.is_some() && self.edge_types.contains(EdgeTypes::SHADOW)
    }

    ///
    /// True if a computation with these settings needs to look at the scene from the light
    ///
    pub fn needs_shadow_view(&self) -> bool {
        self.needs_light_pass() || self.casts_shadows()
    }

    ///
    /// True if a computation with these settings needs to find what is behind each contour
    ///
    pub fn needs_silhouette_pass(&self) -> bool {
        self.silhouette_filtering != SilhouetteFilter::None && self.edge_types.contains(EdgeTypes::CONTOUR)
    }

    ///
    /// The edge types that the classifier has to find (light contours are needed to cast shadows even if they're not drawn)
    ///
    pub fn classified_types(&self) -> EdgeTypes {
        if self.casts_shadows() {
            self.edge_types | EdgeTypes::LIGHT_CONTOUR
        } else {
            self.edge_types
        }
    }

    ///
    /// Checks that these settings can be used for a computation
    ///
    pub fn validate(&self) -> Result<(), LineartError> {
        let finite = [
            self.crease_threshold, self.overscan, self.shadow_camera_size, self.shadow_camera_near, self.shadow_camera_far,
            self.chaining.image_threshold, self.chaining.split_angle, self.chaining.smooth_tolerance
        ];

        if finite.iter().any(|val| !val.is_finite()) {
            return Err(LineartError::InvalidSettings("all numeric settings must be finite".to_string()));
        }

        if self.overscan < 0.0 {
            return Err(LineartError::InvalidSettings(format!("overscan must not be negative (found {})", self.overscan)));
        }

        if self.use_multiple_levels && self.level_end < self.level_start {
            return Err(LineartError::InvalidSettings(format!("level_end ({}) is before level_start ({})", self.level_end, self.level_start)));
        }

        if self.chaining.image_threshold < 0.0 || self.chaining.smooth_tolerance < 0.0 {
            return Err(LineartError::InvalidSettings("chaining tolerances must not be negative".to_string()));
        }

        if self.needs_shadow_view() && !(self.shadow_camera_near > 0.0 && self.shadow_camera_far > self.shadow_camera_near) {
            return Err(LineartError::InvalidSettings("the shadow camera needs a near distance greater than 0 and less than the far distance".to_string()));
        }

        Ok(())
    }

    ///
    /// A hash of every setting that affects the result of a computation
    ///
    /// Two computations for the same scene with the same key produce the same result, so a cached result can be reused
    /// whenever the keys match.
    ///
    pub fn computation_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.edge_types.hash(&mut hasher);
        self.crease_threshold.to_bits().hash(&mut hasher);
        self.use_crease_on_smooth.hash(&mut hasher);
        self.use_crease_on_sharp.hash(&mut hasher);
        self.use_loose_as_contour.hash(&mut hasher);
        self.use_clip_plane_boundaries.hash(&mut hasher);
        self.use_back_face_culling.hash(&mut hasher);
        self.use_object_instances.hash(&mut hasher);
        self.face_mark.hash(&mut hasher);
        self.levels().hash(&mut hasher);
        self.overscan.to_bits().hash(&mut hasher);
        self.camera_override().hash(&mut hasher);

        self.needs_light_pass().hash(&mut hasher);
        self.needs_shadow_view().hash(&mut hasher);
        if self.needs_shadow_view() {
            self.light_object.hash(&mut hasher);
            self.shadow_camera_size.to_bits().hash(&mut hasher);
            self.shadow_camera_near.to_bits().hash(&mut hasher);
            self.shadow_camera_far.to_bits().hash(&mut hasher);
        } else if self.edge_types.contains(EdgeTypes::LIGHT_CONTOUR) {
            self.light_object.hash(&mut hasher);
        }

        self.needs_silhouette_pass().hash(&mut hasher);

        let chaining = &self.chaining;
        chaining.image_threshold.to_bits().hash(&mut hasher);
        chaining.geometry_space.hash(&mut hasher);
        chaining.fuzzy_intersections.hash(&mut hasher);
        chaining.fuzzy_all.hash(&mut hasher);
        chaining.loose_edge_chain.hash(&mut hasher);
        chaining.overlapping_edge_types.hash(&mut hasher);
        chaining.detail_preserve.hash(&mut hasher);
        chaining.image_boundary_trimming.hash(&mut hasher);
        chaining.split_angle.to_bits().hash(&mut hasher);
        chaining.smooth_tolerance.to_bits().hash(&mut hasher);

        hasher.finish()
    }
}
