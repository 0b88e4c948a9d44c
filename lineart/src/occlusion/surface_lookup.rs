use super::screen_bounds::*;
use super::projected_triangle::*;
use super::bounding_area::*;
use crate::snapshot::*;

use glam::{DVec2};

/// Relative difference in depth keys needed before one surface is treated as being in front of another
const DEPTH_EPSILON: f64 = 1e-9;

///
/// Finds the projected triangles under single points on the screen
///
#[derive(Clone, Copy)]
pub struct SurfaceLookup<'a> {
    projected:  &'a [Option<ProjectedTriangle>],
    area:       &'a BoundingArea,
}

impl<'a> SurfaceLookup<'a> {
    pub fn new(projected: &'a [Option<ProjectedTriangle>], area: &'a BoundingArea) -> SurfaceLookup<'a> {
        SurfaceLookup { projected, area }
    }

    ///
    /// True if a triangle covers a point on the screen
    ///
    pub fn contains(&self, triangle: TriangleIdx, point: DVec2) -> bool {
        match self.projected.get(triangle.idx()) {
            Some(Some(projected))   => projected.has_area && projected.side_distances(point).iter().all(|distance| *distance >= 0.0),
            _                       => false,
        }
    }

    ///
    /// The occluding triangles under a point, with their depth keys at that point
    ///
    fn surfaces_at<'b>(&'b self, point: DVec2, ignore: &'b [TriangleIdx]) -> impl 'b + Iterator<Item=(TriangleIdx, f64)> {
        let bounds = ScreenBounds { min: point, max: point };

        self.area.candidates(&bounds)
            .into_iter()
            .map(TriangleIdx)
            .filter(move |triangle| !ignore.contains(triangle))
            .filter_map(move |triangle| {
                let projected = self.projected[triangle.idx()].as_ref()?;

                if projected.occluder && self.contains(triangle, point) {
                    Some((triangle, projected.depth_key_at(point)))
                } else {
                    None
                }
            })
    }

    ///
    /// True if a surface under a point on the screen is in front of the specified depth key
    ///
    pub fn is_covered(&self, point: DVec2, depth_key: f64, ignore: &[TriangleIdx]) -> bool {
        self.surfaces_at(point, ignore)
            .any(|(_, key)| key - depth_key > DEPTH_EPSILON * key.abs().max(depth_key.abs()).max(1e-12))
    }

    ///
    /// The nearest surface under a point on the screen that is further away than the specified depth key
    ///
    pub fn nearest_behind(&self, point: DVec2, depth_key: f64, ignore: &[TriangleIdx]) -> Option<TriangleIdx> {
        self.surfaces_at(point, ignore)
            .filter(|(_, key)| depth_key - key > DEPTH_EPSILON * key.abs().max(depth_key.abs()).max(1e-12))
            .fold(None, |nearest: Option<(TriangleIdx, f64)>, (triangle, key)| match nearest {
                Some((_, nearest_key)) if nearest_key >= key    => nearest,
                _                                               => Some((triangle, key)),
            })
            .map(|(triangle, _)| triangle)
    }
}
