use crate::chain::*;
use crate::classify::*;
use crate::occlusion::*;
use crate::scene::*;
use crate::settings::*;

use std::ops::{RangeInclusive};

///
/// Selects the chains of a shared result that a single modifier draws
///
/// A cache entry can hold lines for several modifiers: each one picks out the levels, edge types, source objects, masks
/// and lighting that it was configured for.
///
pub struct ChainFilter<'a> {
    scene:              &'a SceneDescription,
    levels:             RangeInclusive<u32>,
    edge_types:         EdgeTypes,
    source:             LineartSource,
    invert_source:      bool,
    material_mask:      MaskFilter,
    intersection:       MaskFilter,
    shadow:             ShadowSelection,
    silhouette:         SilhouetteFilter,
    invert_silhouette:  bool,
}

impl<'a> ChainFilter<'a> {
    ///
    /// Creates the chain filter for a modifier
    ///
    pub fn new(modifier: &LineartModifier, scene: &'a SceneDescription) -> ChainFilter<'a> {
        ChainFilter {
            scene:              scene,
            levels:             modifier.settings.levels(),
            edge_types:         modifier.settings.edge_types,
            source:             modifier.source,
            invert_source:      modifier.use_invert_collection,
            material_mask:      modifier.material_mask,
            intersection:       modifier.intersection_mask,
            shadow:             modifier.settings.shadow_selection,
            silhouette:         modifier.settings.silhouette_filtering,
            invert_silhouette:  modifier.settings.use_invert_silhouette,
        }
    }

    fn accepts_source(&self, object: ObjectId) -> bool {
        match self.source {
            LineartSource::Scene                    => true,
            LineartSource::Object(source_object)    => object == source_object,
            LineartSource::Collection(collection)   => self.scene.collection_contains(collection, object) != self.invert_source,
        }
    }

    fn accepts_illumination(&self, illumination: Illumination) -> bool {
        match self.shadow {
            ShadowSelection::None           => true,
            ShadowSelection::Illuminated    => illumination != Illumination::Shaded,
            ShadowSelection::Shaded         => illumination == Illumination::Shaded,
        }
    }

    ///
    /// True if a contour chain is drawn by the silhouette filter
    ///
    /// A contour is a silhouette if nothing is behind it, or if what is behind it is outside the object (for individual
    /// filtering) or outside the source of the modifier (for group filtering).
    ///
    fn accepts_silhouette(&self, chain: &Chain) -> bool {
        if self.silhouette == SilhouetteFilter::None || !chain.types.contains(EdgeTypes::CONTOUR) {
            return true;
        }

        let is_silhouette = match (self.silhouette, chain.backdrop) {
            (_, Backdrop::Unknown)                                      => { return true; }
            (_, Backdrop::Empty)                                        => true,
            (SilhouetteFilter::Individual, Backdrop::Object(behind))    => behind != chain.object,
            (_, Backdrop::Object(behind))                               => !self.accepts_source(behind),
        };

        is_silhouette != self.invert_silhouette
    }

    ///
    /// True if a chain should be drawn by the modifier
    ///
    pub fn accepts(&self, chain: &Chain) -> bool {
        if !self.levels.contains(&chain.level)              { return false; }
        if !chain.types.intersects(self.edge_types)         { return false; }
        if !self.accepts_source(chain.object)               { return false; }
        if !self.material_mask.matches(chain.material_mask) { return false; }
        if !self.accepts_illumination(chain.illumination)   { return false; }
        if !self.accepts_silhouette(chain)                  { return false; }

        if chain.types.contains(EdgeTypes::INTERSECTION) && !self.intersection.matches(chain.intersection_mask) {
            return false;
        }

        true
    }
}
