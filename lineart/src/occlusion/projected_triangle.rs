use super::screen_bounds::*;
use crate::snapshot::*;

use glam::{DVec2, DVec3};

/// Triangles covering less than this area of the screen are degenerate
const MIN_SCREEN_AREA: f64 = 1e-12;

///
/// A triangle projected onto the screen
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedTriangle {
    /// Corners in counter-clockwise order
    pub corners:        [DVec2; 3],
    pub bounds:         ScreenBounds,

    /// The depth key across the triangle is `x * depth_plane.x + y * depth_plane.y + depth_plane.z`
    pub depth_plane:    DVec3,

    /// False if the triangle has no area on screen
    pub has_area:       bool,

    /// True if the triangle can hide the lines behind it
    pub occluder:       bool,
}

impl ProjectedTriangle {
    ///
    /// Projects a triangle from world space using a view
    ///
    /// Returns `None` if part of the triangle is behind a perspective camera
    ///
    pub fn project(triangle: &Triangle, world: &[DVec3; 3], view: &ViewProjection) -> Option<ProjectedTriangle> {
        let view_points = world.map(|pos| view.to_view(pos));

        if view.is_perspective() && view_points.iter().any(|pos| ViewProjection::depth(*pos) < view.clip_start * 0.5) {
            return None;
        }

        let mut corners = view_points.map(|pos| view.project(pos));
        let mut keys    = view_points.map(|pos| view.depth_key(pos));

        if !corners.iter().all(|corner| corner.is_finite()) || !keys.iter().all(|key| key.is_finite()) {
            return None;
        }

        let mut area    = (corners[1] - corners[0]).perp_dot(corners[2] - corners[0]);
        if area < 0.0 {
            corners.swap(1, 2);
            keys.swap(1, 2);
            area = -area;
        }

        let has_area    = area * 0.5 > MIN_SCREEN_AREA;
        let depth_plane = if has_area {
            let (d1, d2)    = (corners[1] - corners[0], corners[2] - corners[0]);
            let (q1, q2)    = (keys[1] - keys[0], keys[2] - keys[0]);
            let a           = (q1 * d2.y - q2 * d1.y) / area;
            let b           = (d1.x * q2 - d2.x * q1) / area;
            let c           = keys[0] - a * corners[0].x - b * corners[0].y;

            DVec3::new(a, b, c)
        } else {
            DVec3::new(0.0, 0.0, keys[0])
        };

        Some(ProjectedTriangle {
            corners:        corners,
            bounds:         ScreenBounds::from_points(&corners),
            depth_plane:    depth_plane,
            has_area:       has_area,
            occluder:       has_area && triangle.can_occlude(),
        })
    }

    ///
    /// The depth key of the plane of this triangle at a point on the screen
    ///
    #[inline]
    pub fn depth_key_at(&self, point: DVec2) -> f64 {
        self.depth_plane.x * point.x + self.depth_plane.y * point.y + self.depth_plane.z
    }

    ///
    /// Signed distance from a point to each side of this triangle (positive inside)
    ///
    #[inline]
    pub fn side_distances(&self, point: DVec2) -> [f64; 3] {
        [0usize, 1, 2].map(|idx| {
            let start   = self.corners[idx];
            let end     = self.corners[(idx + 1) % 3];
            let side    = end - start;
            let length  = side.length();

            if length > 0.0 { side.perp_dot(point - start) / length } else { 0.0 }
        })
    }
}

///
/// Projects every triangle of a snapshot, returning the projections and the number of triangles with no area on screen
///
pub fn project_triangles(snapshot: &SceneSnapshot, view: &ViewProjection) -> (Vec<Option<ProjectedTriangle>>, usize) {
    let projected = snapshot.triangles.iter()
        .map(|triangle| ProjectedTriangle::project(triangle, &snapshot.triangle_positions(triangle), view))
        .collect::<Vec<_>>();

    let degenerate = projected.iter()
        .filter(|projected| matches!(projected, Some(projected) if !projected.has_area))
        .count();

    (projected, degenerate)
}
