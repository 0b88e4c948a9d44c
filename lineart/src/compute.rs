use crate::cache::*;
use crate::chain::*;
use crate::classify::*;
use crate::error::*;
use crate::occlusion::*;
use crate::scene::*;
use crate::settings::*;
use crate::snapshot::*;

use log::*;

use std::sync::*;
use std::time::{Instant};

///
/// Computes the feature lines for a scene
///
/// This runs the whole pipeline: the scene is loaded into a snapshot, the feature edges are classified, and any cast
/// shadows and silhouette backdrops are found. The occlusion of each edge is then solved (followed by the light pass if
/// the settings ask for one) and the visible segments are chained.
/// The cancellation token is checked between stages.
///
/// A scene with no camera or with no geometry produces an empty entry rather than an error.
///
pub fn compute_feature_lines(scene: &SceneDescription, settings: &LineartSettings, cancel: &CancelToken) -> Result<CacheEntry, LineartError> {
    let start_time = Instant::now();

    settings.validate()?;

    let snapshot = load_scene(scene, settings)?;
    cancel.check()?;

    let view = match snapshot.view {
        Some(view) if !snapshot.is_empty()  => view,
        _                                   => {
            debug!("Line art: nothing to compute");
            return Ok(CacheEntry::empty(snapshot, settings));
        }
    };

    let mut diagnostics = snapshot.diagnostics;

    // Index the triangles on the screen
    let (projected, degenerate) = project_triangles(&snapshot, &view);
    diagnostics.degenerate_projections += degenerate;

    let area = BoundingArea::build(&projected)?;
    trace!("Line art: {} triangles indexed in {} areas", projected.len(), area.num_areas());

    // Find the feature edges
    let mut edges = classify_edges(&snapshot, settings, &mut diagnostics);
    edges.extend(find_intersection_edges(&snapshot, &projected, &area, settings));
    cancel.check()?;

    if settings.casts_shadows() {
        let shadows = find_cast_shadow_edges(&snapshot, &edges)?;
        edges.extend(shadows);
        cancel.check()?;
    }

    // Drop the light contours that were only found to cast shadows
    retain_edge_types(&mut edges, settings.edge_types);

    if settings.needs_silhouette_pass() {
        find_silhouette_backdrops(&snapshot, &view, &projected, &area, &mut edges);
    }

    // Work out which parts are hidden
    let records = solve_occlusion(&snapshot, &view, &projected, &area, &edges);
    let records = if settings.needs_light_pass() {
        apply_light_pass(&snapshot, &edges, records)?
    } else {
        records
    };
    cancel.check()?;

    // Link the visible parts into chains
    let chains = build_chains(&snapshot, &edges, &records, settings);
    cancel.check()?;

    diagnostics.log_summary();
    debug!("Line art: {} feature edges and {} chains computed in {}ms", edges.len(), chains.len(), start_time.elapsed().as_millis());

    Ok(CacheEntry {
        snapshot:       Arc::new(snapshot),
        edges:          edges,
        records:        records,
        chains:         chains,
        settings:       settings.clone(),
        key:            settings.computation_key(),
        diagnostics:    diagnostics,
    })
}
