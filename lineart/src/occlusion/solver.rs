use super::screen_bounds::*;
use super::projected_triangle::*;
use super::bounding_area::*;
use super::occlusion_record::*;
use crate::classify::*;
use crate::snapshot::*;

use glam::{DVec2};

/// Points closer than this (in screen units) to the side of a triangle are treated as outside it
const INSIDE_EPSILON: f64 = 1e-9;

/// Relative difference in depth keys needed before a triangle is treated as being in front of an edge
const DEPTH_EPSILON: f64 = 1e-9;

/// Hidden intervals shorter than this (as a fraction of the edge) are ignored
const PARAM_EPSILON: f64 = 1e-9;

///
/// Restricts a range of parameters to where `start + s * (end - start)` is positive
///
/// Returns false if nothing is left
///
#[inline]
fn clip_to_positive(range: &mut (f64, f64), start: f64, end: f64) -> bool {
    if start > 0.0 && end > 0.0 {
        true
    } else if start <= 0.0 && end <= 0.0 {
        false
    } else {
        let root = start / (start - end);

        if start > 0.0 {
            range.1 = range.1.min(root);
        } else {
            range.0 = range.0.max(root);
        }

        range.1 > range.0
    }
}

///
/// Works out the occlusion levels of feature edges as seen from a view
///
pub struct OcclusionSolver<'a> {
    snapshot:   &'a SceneSnapshot,
    view:       &'a ViewProjection,
    projected:  &'a [Option<ProjectedTriangle>],
    area:       &'a BoundingArea,
}

impl<'a> OcclusionSolver<'a> {
    ///
    /// Creates a solver for the triangles of a snapshot projected using a view
    ///
    pub fn new(snapshot: &'a SceneSnapshot, view: &'a ViewProjection, projected: &'a [Option<ProjectedTriangle>], area: &'a BoundingArea) -> OcclusionSolver<'a> {
        OcclusionSolver { snapshot, view, projected, area }
    }

    ///
    /// Finds the part of the projection of an edge that a triangle is in front of
    ///
    fn occluded_interval(triangle: &ProjectedTriangle, screen: [DVec2; 2], keys: [f64; 2]) -> Option<(f64, f64)> {
        let mut range = (0.0, 1.0);

        // Inside the triangle
        let start_distances = triangle.side_distances(screen[0]);
        let end_distances   = triangle.side_distances(screen[1]);

        for side in 0..3 {
            if !clip_to_positive(&mut range, start_distances[side] - INSIDE_EPSILON, end_distances[side] - INSIDE_EPSILON) {
                return None;
            }
        }

        // In front of the edge (depth keys increase towards the camera)
        let epsilon     = DEPTH_EPSILON * keys[0].abs().max(keys[1].abs()).max(1e-12);
        let start_diff  = triangle.depth_key_at(screen[0]) - keys[0] - epsilon;
        let end_diff    = triangle.depth_key_at(screen[1]) - keys[1] - epsilon;

        if !clip_to_positive(&mut range, start_diff, end_diff) {
            return None;
        }

        if range.1 - range.0 > PARAM_EPSILON {
            Some(range)
        } else {
            None
        }
    }

    ///
    /// Works out the occlusion record for a single edge
    ///
    /// Returns `None` if the edge cannot be projected by this view (when part of it is behind a perspective camera).
    /// `intervals` is working storage that is reused between calls.
    ///
    pub fn solve_edge(&self, edge: &FeatureEdge, intervals: &mut Vec<OccludedInterval>) -> Option<OcclusionRecord> {
        let view        = self.view;
        let view_points = edge.endpoints.map(|point| view.to_view(point.world));
        let depths      = view_points.map(ViewProjection::depth);

        if view.is_perspective() && depths.iter().any(|depth| *depth < view.clip_start * 0.5) {
            return None;
        }

        let screen      = view_points.map(|point| view.project(point));
        let keys        = view_points.map(|point| view.depth_key(point));
        let bounds      = ScreenBounds::from_points(&screen);

        intervals.clear();

        for triangle_idx in self.area.candidates(&bounds) {
            if edge.is_on_triangle(TriangleIdx(triangle_idx)) {
                continue;
            }

            let projected = match &self.projected[triangle_idx as usize] {
                Some(projected) if projected.occluder   => projected,
                _                                       => { continue; }
            };

            if let Some((start, end)) = Self::occluded_interval(projected, screen, keys) {
                let weight = self.snapshot.triangles[triangle_idx as usize].occlusion as u32;
                intervals.push(OccludedInterval { start, end, weight });
            }
        }

        Some(OcclusionRecord::from_occluded_intervals(intervals, |s| view.screen_to_world_param(s, depths[0], depths[1])))
    }

    ///
    /// Works out the occlusion records for a set of edges, one after the other
    ///
    pub fn solve_sequential(&self, edges: &[FeatureEdge]) -> Vec<Option<OcclusionRecord>> {
        let mut intervals = vec![];

        edges.iter()
            .map(|edge| self.solve_edge(edge, &mut intervals))
            .collect()
    }

    ///
    /// Works out the occlusion records for a set of edges
    ///
    /// The records are in the same order as the edges, and do not depend on how the work was scheduled.
    ///
    #[cfg(feature="multithreading")]
    pub fn solve(&self, edges: &[FeatureEdge]) -> Vec<Option<OcclusionRecord>> {
        use rayon::prelude::*;

        edges.par_iter()
            .map_init(|| vec![], |intervals, edge| self.solve_edge(edge, intervals))
            .collect()
    }

    ///
    /// Works out the occlusion records for a set of edges
    ///
    /// The records are in the same order as the edges, and do not depend on how the work was scheduled.
    ///
    #[cfg(not(feature="multithreading"))]
    pub fn solve(&self, edges: &[FeatureEdge]) -> Vec<Option<OcclusionRecord>> {
        self.solve_sequential(edges)
    }
}

///
/// Works out the occlusion records for the edges of a snapshot as seen from its camera
///
/// Edges that cannot be projected are treated as visible.
///
pub fn solve_occlusion(snapshot: &SceneSnapshot, view: &ViewProjection, projected: &[Option<ProjectedTriangle>], area: &BoundingArea, edges: &[FeatureEdge]) -> Vec<OcclusionRecord> {
    OcclusionSolver::new(snapshot, view, projected, area)
        .solve(edges)
        .into_iter()
        .map(|record| record.unwrap_or_else(OcclusionRecord::visible))
        .collect()
}
