use super::projected_triangle::*;
use super::bounding_area::*;
use super::surface_lookup::*;
use crate::classify::*;
use crate::settings::*;
use crate::snapshot::*;

/// Distance from a contour (in screen units) at which the surface behind it is looked up
const BACKDROP_OFFSET: f64 = 1e-4;

///
/// Finds what the camera sees just outside the middle of a contour edge
///
fn edge_backdrop(snapshot: &SceneSnapshot, view: &ViewProjection, lookup: &SurfaceLookup, edge: &FeatureEdge) -> Backdrop {
    if !edge.types.contains(EdgeTypes::CONTOUR) {
        return Backdrop::Unknown;
    }

    let view_points = edge.endpoints.map(|point| view.to_view(point.world));
    if view.is_perspective() && view_points.iter().any(|point| ViewProjection::depth(*point) < view.clip_start * 0.5) {
        return Backdrop::Unknown;
    }

    let screen      = view_points.map(|point| view.project(point));
    let direction   = screen[1] - screen[0];
    let length      = direction.length();

    if !(length > 0.0) || !length.is_finite() {
        return Backdrop::Unknown;
    }

    let middle      = view.to_view(edge.point_at(0.5));
    let centre      = view.project(middle);
    let depth_key   = view.depth_key(middle);
    let normal      = direction.perp() / length;

    // The triangles of the contour are all on one side of it: the backdrop is on the other side
    let outside     = [centre + normal * BACKDROP_OFFSET, centre - normal * BACKDROP_OFFSET]
        .into_iter()
        .find(|point| !edge.triangles.iter().any(|triangle| lookup.contains(*triangle, *point)));

    let outside = match outside {
        Some(outside)   => outside,
        None            => { return Backdrop::Unknown; }
    };

    match lookup.nearest_behind(outside, depth_key, &edge.triangles) {
        Some(triangle)  => Backdrop::Object(snapshot.objects[snapshot.triangle(triangle).object as usize].id),
        None            => Backdrop::Empty,
    }
}

///
/// Works out what is behind each contour edge, as seen from the camera
///
/// Modifiers use this to tell the outline of an object or a group of objects apart from the contours that are drawn
/// in front of other parts of the same object or group.
///
#[cfg(feature="multithreading")]
pub fn find_silhouette_backdrops(snapshot: &SceneSnapshot, view: &ViewProjection, projected: &[Option<ProjectedTriangle>], area: &BoundingArea, edges: &mut [FeatureEdge]) {
    use rayon::prelude::*;

    let lookup = SurfaceLookup::new(projected, area);

    edges.par_iter_mut()
        .for_each(|edge| edge.backdrop = edge_backdrop(snapshot, view, &lookup, edge));
}

///
/// Works out what is behind each contour edge, as seen from the camera
///
/// Modifiers use this to tell the outline of an object or a group of objects apart from the contours that are drawn
/// in front of other parts of the same object or group.
///
#[cfg(not(feature="multithreading"))]
pub fn find_silhouette_backdrops(snapshot: &SceneSnapshot, view: &ViewProjection, projected: &[Option<ProjectedTriangle>], area: &BoundingArea, edges: &mut [FeatureEdge]) {
    let lookup = SurfaceLookup::new(projected, area);

    edges.iter_mut()
        .for_each(|edge| edge.backdrop = edge_backdrop(snapshot, view, &lookup, edge));
}
