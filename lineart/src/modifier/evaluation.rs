use super::modifier_stack::*;
use crate::cache::*;
use crate::compute::*;
use crate::error::*;
use crate::scene::*;
use crate::stroke::*;

use log::*;

use std::sync::*;

///
/// Where the lines drawn by a modifier came from
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResultSource {
    /// The modifier is disabled or baked and generated nothing
    Skipped,

    /// The shared result was computed for this evaluation
    Computed,

    /// A valid shared result was reused
    Reused,

    /// The modifier doesn't use the cache and computed a result of its own
    Private,

    /// The shared result wasn't available, so the modifier computed a result of its own
    Fallback,
}

///
/// The result of evaluating a single modifier
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluationOutcome {
    pub source:     ResultSource,

    /// Number of strokes written to the target layer
    pub strokes:    usize,
}

///
/// Summary of evaluating every modifier in a stack
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvaluationReport {
    pub computed:   usize,
    pub reused:     usize,
    pub private:    usize,
    pub fallback:   usize,
    pub skipped:    usize,

    /// The names of the modifiers that failed, with the reason
    pub failed:     Vec<(String, String)>,

    /// Total number of strokes written
    pub strokes:    usize,
}

impl EvaluationReport {
    fn add(&mut self, outcome: EvaluationOutcome) {
        match outcome.source {
            ResultSource::Skipped   => self.skipped += 1,
            ResultSource::Computed  => self.computed += 1,
            ResultSource::Reused    => self.reused += 1,
            ResultSource::Private   => self.private += 1,
            ResultSource::Fallback  => self.fallback += 1,
        }

        self.strokes += outcome.strokes;
    }
}

///
/// Evaluates a single modifier in a stack, writing its strokes into the target layer at a frame
///
/// The first modifier in the stack that uses the cache computes the shared result (if there isn't already a valid
/// one). Later modifiers that use the cache read that result, and compute their own if it's not available. Modifiers
/// that don't use the cache always compute a private result, which is discarded once the strokes have been generated.
///
pub fn evaluate_modifier(stack: &ModifierStack, modifier_idx: usize, scene: &SceneDescription, cache: &LineartCacheTable, layers: &mut StrokeLayers, frame_number: i32) -> Result<EvaluationOutcome, LineartError> {
    let modifier = stack.modifiers.get(modifier_idx)
        .ok_or_else(|| LineartError::InvalidSettings(format!("there is no modifier at index {}", modifier_idx)))?;

    if modifier.is_baked {
        trace!("Line art: modifier '{}' is baked", modifier.name);
        return Ok(EvaluationOutcome { source: ResultSource::Skipped, strokes: 0 });
    }

    if let Some(reason) = unusable_reason(scene, layers, modifier) {
        trace!("Line art: skipping modifier '{}' because {}", modifier.name, reason);
        return Ok(EvaluationOutcome { source: ResultSource::Skipped, strokes: 0 });
    }

    let (entry, source) = if !modifier.use_cache {
        let entry = compute_feature_lines(scene, &modifier.settings, &CancelToken::new())?;
        (Arc::new(entry), ResultSource::Private)
    } else {
        let settings    = stack.stack_settings(scene, layers)
            .ok_or_else(|| LineartError::InvalidSettings("no modifier in the stack uses the cache".to_string()))?;
        let key         = settings.computation_key();

        if is_first_lineart_in_stack(stack, modifier_idx, scene, layers) {
            let (entry, outcome) = cache.get_or_compute(stack.object, key, |cancel| compute_feature_lines(scene, &settings, cancel))?;

            match outcome {
                CacheOutcome::Computed  => (entry, ResultSource::Computed),
                CacheOutcome::Reused    => (entry, ResultSource::Reused),
            }
        } else if let Some(entry) = cache.valid_entry(stack.object, key) {
            (entry, ResultSource::Reused)
        } else {
            warn!("Line art: modifier '{}' has no shared result to use, computing its own lines", modifier.name);

            let entry = compute_feature_lines(scene, &modifier.settings, &CancelToken::new())?;
            (Arc::new(entry), ResultSource::Fallback)
        }
    };

    let strokes     = generate_strokes(&entry, modifier, scene);
    let num_strokes = strokes.len();
    let layer_name  = modifier.target_layer.as_deref().unwrap_or_default();

    layers.replace_generated(layer_name, frame_number, &modifier.name, strokes);

    Ok(EvaluationOutcome { source, strokes: num_strokes })
}

///
/// Evaluates every modifier in a stack in order
///
/// A modifier that fails generates no strokes and is recorded in the report. The rest of the stack is still evaluated.
///
pub fn evaluate_stack(stack: &ModifierStack, scene: &SceneDescription, cache: &LineartCacheTable, layers: &mut StrokeLayers, frame_number: i32) -> EvaluationReport {
    let mut report = EvaluationReport::default();

    for modifier_idx in 0..stack.modifiers.len() {
        match evaluate_modifier(stack, modifier_idx, scene, cache, layers, frame_number) {
            Ok(outcome) => report.add(outcome),
            Err(err)    => {
                let name = &stack.modifiers[modifier_idx].name;
                error!("Line art: modifier '{}' failed: {}", name, err);

                report.failed.push((name.clone(), err.to_string()));
            }
        }
    }

    debug!("Line art: evaluated {} modifiers for {:?} ({} computed, {} reused, {} private, {} fallback, {} skipped, {} failed)",
        stack.modifiers.len(), stack.object, report.computed, report.reused, report.private, report.fallback, report.skipped, report.failed.len());

    report
}
