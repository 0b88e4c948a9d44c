use super::surface_lookup::*;
use super::light_pass::*;
use crate::classify::*;
use crate::error::*;
use crate::scene::*;
use crate::settings::*;
use crate::snapshot::*;

use glam::{DVec3};
use itertools::*;
use log::*;
use smallvec::*;

/// Light contours are sampled at about this spacing on the screen of the shadow camera
const SHADOW_SAMPLE_SPACING: f64 = 0.005;

/// The most samples taken along a single light contour
const MAX_SHADOW_SAMPLES: usize = 64;

/// Shadow lines shorter than this are discarded
const MIN_SHADOW_LENGTH: f64 = 1e-9;

///
/// Projects the light contours of a snapshot onto the surfaces behind them
///
struct ShadowCaster<'a> {
    snapshot:   &'a SceneSnapshot,
    light:      &'a LightSnapshot,
    view:       &'a ViewProjection,
    lookup:     SurfaceLookup<'a>,
}

impl<'a> ShadowCaster<'a> {
    ///
    /// Where the shadow of a point lands, and the triangle it lands on
    ///
    /// Returns `None` for points that are already in shadow, and for points whose shadow doesn't land on anything.
    ///
    fn shadow_of(&self, point: DVec3, ignore: &[TriangleIdx]) -> Option<(DVec3, TriangleIdx)> {
        let view_point = self.view.to_view(point);
        if self.view.is_perspective() && ViewProjection::depth(view_point) < self.view.clip_start * 0.5 {
            return None;
        }

        let screen      = self.view.project(view_point);
        let depth_key   = self.view.depth_key(view_point);

        if self.lookup.is_covered(screen, depth_key, ignore) {
            return None;
        }

        let receiver    = self.lookup.nearest_behind(screen, depth_key, ignore)?;
        let triangle    = self.snapshot.triangle(receiver);
        let direction   = match self.light.kind {
            LightKind::Sun      => self.light.direction,
            LightKind::Point    => (point - self.light.position).normalize_or_zero(),
        };

        // Follow the light from the point to the plane of the receiving triangle
        let denominator = triangle.normal.dot(direction);
        if denominator.abs() < 1e-12 {
            return None;
        }

        let on_plane    = self.snapshot.vertex(triangle.vertices[0]).world;
        let distance    = triangle.normal.dot(on_plane - point) / denominator;

        if distance > 0.0 && distance.is_finite() {
            Some((point + direction * distance, receiver))
        } else {
            None
        }
    }

    ///
    /// The shadow lines cast by a single edge
    ///
    fn cast(&self, edge: &FeatureEdge) -> Vec<FeatureEdge> {
        if !edge.types.contains(EdgeTypes::LIGHT_CONTOUR) {
            return vec![];
        }

        let screen      = edge.endpoints.map(|point| self.view.screen_position(point.world));
        let length      = screen[0].distance(screen[1]);
        let num_samples = if length.is_finite() { ((length / SHADOW_SAMPLE_SPACING).ceil() as usize).clamp(1, MAX_SHADOW_SAMPLES) } else { 1 };

        let shadows = (0..=num_samples)
            .map(|idx| self.shadow_of(edge.point_at(idx as f64 / num_samples as f64), &edge.triangles))
            .collect::<Vec<_>>();

        shadows.into_iter()
            .tuple_windows()
            .filter_map(|(start, end)| {
                let (start, start_triangle) = start?;
                let (end, end_triangle)     = end?;
                let start_triangle_data     = self.snapshot.triangle(start_triangle);
                let end_triangle_data       = self.snapshot.triangle(end_triangle);

                // Shadows that fall across two objects are broken where they move from one to the other
                if start_triangle_data.object != end_triangle_data.object || start.distance(end) < MIN_SHADOW_LENGTH {
                    return None;
                }

                let triangles: SmallVec<[TriangleIdx; 2]> = if start_triangle == end_triangle { smallvec![start_triangle] } else { smallvec![start_triangle, end_triangle] };

                Some(FeatureEdge {
                    endpoints:          [EdgePoint { world: start, vertex: None }, EdgePoint { world: end, vertex: None }],
                    types:              EdgeTypes::SHADOW,
                    triangles:          triangles,
                    object:             start_triangle_data.object,
                    material_mask:      start_triangle_data.material_mask | end_triangle_data.material_mask,
                    intersection_mask:  0,
                    backdrop:           Backdrop::Unknown,
                })
            })
            .collect()
    }
}

#[cfg(feature="multithreading")]
fn cast_all(caster: &ShadowCaster, edges: &[FeatureEdge]) -> Vec<FeatureEdge> {
    use rayon::prelude::*;

    edges.par_iter()
        .map(|edge| caster.cast(edge))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

#[cfg(not(feature="multithreading"))]
fn cast_all(caster: &ShadowCaster, edges: &[FeatureEdge]) -> Vec<FeatureEdge> {
    edges.iter()
        .flat_map(|edge| caster.cast(edge))
        .collect()
}

///
/// Finds the outlines of the shadows that the light contours of a snapshot cast onto the surfaces behind them
///
/// The light contours are followed away from the light onto the nearest surface behind them, as seen from the light's
/// shadow camera. The parts of a light contour that are already in shadow cast nothing. The shadow lines belong to the
/// object they fall on, and are returned in the order of the edges that cast them.
///
pub fn find_cast_shadow_edges(snapshot: &SceneSnapshot, edges: &[FeatureEdge]) -> Result<Vec<FeatureEdge>, LineartError> {
    let light       = if let Some(light) = &snapshot.light { light } else { return Ok(vec![]); };
    let shadow_view = if let Some(view) = light.shadow_view { view } else { return Ok(vec![]); };

    let (projected, area)   = project_for_light(snapshot, &shadow_view)?;
    let caster              = ShadowCaster {
        snapshot:   snapshot,
        light:      light,
        view:       &shadow_view,
        lookup:     SurfaceLookup::new(&projected, &area),
    };

    let shadows = cast_all(&caster, edges);
    debug!("Line art: {} shadow lines cast", shadows.len());

    Ok(shadows)
}
