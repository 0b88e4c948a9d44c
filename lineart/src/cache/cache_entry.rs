use crate::chain::*;
use crate::classify::*;
use crate::occlusion::*;
use crate::settings::*;
use crate::snapshot::*;

use std::sync::*;

///
/// The result of a feature line computation, shared by the modifiers that use it
///
/// Entries are immutable once they've been created: modifiers read them through an `Arc` and filter the chains
/// into their own strokes.
///
#[derive(Clone, Debug)]
pub struct CacheEntry {
    /// The scene that the lines were computed from
    pub snapshot:       Arc<SceneSnapshot>,

    /// Every feature edge found in the snapshot
    pub edges:          Vec<FeatureEdge>,

    /// The occlusion record for each edge in `edges`
    pub records:        Vec<OcclusionRecord>,

    /// The chains built from the visible parts of the edges
    pub chains:         Vec<Chain>,

    /// The settings used for the computation
    pub settings:       LineartSettings,

    /// `settings.computation_key()`
    pub key:            u64,

    pub diagnostics:    Diagnostics,
}

impl CacheEntry {
    ///
    /// Creates an entry with no lines in it (for a scene with nothing to draw)
    ///
    pub fn empty(snapshot: SceneSnapshot, settings: &LineartSettings) -> CacheEntry {
        let diagnostics = snapshot.diagnostics;

        CacheEntry {
            snapshot:       Arc::new(snapshot),
            edges:          vec![],
            records:        vec![],
            chains:         vec![],
            settings:       settings.clone(),
            key:            settings.computation_key(),
            diagnostics:    diagnostics,
        }
    }

    ///
    /// The camera the lines were computed for, if there was one
    ///
    #[inline]
    pub fn view(&self) -> Option<&ViewProjection> {
        self.snapshot.view.as_ref()
    }

    ///
    /// The edge and occlusion record for a feature edge ID
    ///
    pub fn edge(&self, id: FeatureEdgeId) -> Option<(&FeatureEdge, &OcclusionRecord)> {
        Some((self.edges.get(id.idx())?, self.records.get(id.idx())?))
    }

    ///
    /// Looks up a chain by its handle
    ///
    #[inline]
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id.0 as usize)
    }

    ///
    /// True if this entry was computed with settings that produce the same result as the specified key
    ///
    #[inline]
    pub fn matches_key(&self, key: u64) -> bool {
        self.key == key
    }
}
