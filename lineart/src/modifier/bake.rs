use super::modifier_stack::*;
use crate::cache::*;
use crate::compute::*;
use crate::error::*;
use crate::scene::*;
use crate::stroke::*;

use log::*;

///
/// Computes the lines for a modifier and stores them permanently in its target layer
///
/// The computation uses only the modifier's own settings and never reads or writes the shared cache. Once baked, the
/// modifier generates nothing until `clear_bake()` is called. Returns the number of strokes that were baked.
///
pub fn bake_modifier(stack: &mut ModifierStack, modifier_idx: usize, scene: &SceneDescription, layers: &mut StrokeLayers, frame_number: i32) -> Result<usize, LineartError> {
    let modifier = stack.modifiers.get_mut(modifier_idx)
        .ok_or_else(|| LineartError::InvalidSettings(format!("there is no modifier at index {}", modifier_idx)))?;

    if modifier.is_baked {
        return Ok(0);
    }

    if let Some(reason) = unusable_reason(scene, layers, modifier) {
        return Err(LineartError::InvalidSettings(format!("cannot bake '{}' because {}", modifier.name, reason)));
    }

    let entry       = compute_feature_lines(scene, &modifier.settings, &CancelToken::new())?;
    let strokes     = generate_strokes(&entry, modifier, scene).into_iter()
        .map(|stroke| GeneratedStroke { baked: true, ..stroke })
        .collect::<Vec<_>>();
    let num_strokes = strokes.len();
    let layer_name  = modifier.target_layer.as_deref().unwrap_or_default();

    layers.replace_generated(layer_name, frame_number, &modifier.name, strokes);
    modifier.is_baked = true;

    debug!("Line art: baked {} strokes for modifier '{}'", num_strokes, modifier.name);

    Ok(num_strokes)
}

///
/// Removes the baked strokes of a modifier so that it generates lines again
///
/// Returns the number of strokes that were removed.
///
pub fn clear_bake(stack: &mut ModifierStack, modifier_idx: usize, layers: &mut StrokeLayers) -> usize {
    let modifier = if let Some(modifier) = stack.modifiers.get_mut(modifier_idx) { modifier } else { return 0; };

    let removed         = layers.remove_baked_strokes(&modifier.name);
    modifier.is_baked   = false;

    removed
}
