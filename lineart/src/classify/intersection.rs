use super::feature_edge::*;
use crate::occlusion::*;
use crate::settings::*;
use crate::snapshot::*;

use glam::{DVec3};
use smallvec::*;

/// Distances from a plane smaller than this count as being on the plane
const PLANE_EPSILON: f64 = 1e-9;

/// Intersection lines shorter than this are ignored
const MIN_INTERSECTION_LENGTH: f64 = 1e-9;

///
/// The world space bounding box of a triangle
///
#[inline]
fn world_bounds(points: &[DVec3; 3]) -> (DVec3, DVec3) {
    (points[0].min(points[1]).min(points[2]), points[0].max(points[1]).max(points[2]))
}

#[inline]
fn bounds_overlap(a: &(DVec3, DVec3), b: &(DVec3, DVec3)) -> bool {
    a.0.cmple(b.1).all() && b.0.cmple(a.1).all()
}

///
/// The points where the sides of a triangle cross a plane, given the distance of each corner from the plane
///
fn plane_crossings(points: &[DVec3; 3], distances: &[f64; 3]) -> SmallVec<[DVec3; 4]> {
    let mut crossings = smallvec![];

    for idx in 0..3 {
        let next                    = (idx + 1) % 3;
        let (start, end)            = (distances[idx], distances[next]);

        if start.abs() <= PLANE_EPSILON {
            crossings.push(points[idx]);
        } else if (start > PLANE_EPSILON && end < -PLANE_EPSILON) || (start < -PLANE_EPSILON && end > PLANE_EPSILON) {
            let t = start / (start - end);
            crossings.push(points[idx].lerp(points[next], t));
        }
    }

    crossings
}

///
/// True if every distance is on the same side of a plane
///
#[inline]
fn all_one_side(distances: &[f64; 3]) -> bool {
    distances.iter().all(|distance| *distance > PLANE_EPSILON) || distances.iter().all(|distance| *distance < -PLANE_EPSILON)
}

///
/// Finds the line where two triangles intersect
///
/// Returns `None` if the triangles don't intersect, only touch at a point or are in the same plane.
///
pub fn intersect_triangles(a: &[DVec3; 3], normal_a: DVec3, b: &[DVec3; 3], normal_b: DVec3) -> Option<(DVec3, DVec3)> {
    let distances_b = b.map(|point| normal_a.dot(point - a[0]));
    if all_one_side(&distances_b) || distances_b.iter().all(|distance| distance.abs() <= PLANE_EPSILON) {
        return None;
    }

    let distances_a = a.map(|point| normal_b.dot(point - b[0]));
    if all_one_side(&distances_a) {
        return None;
    }

    let direction   = normal_a.cross(normal_b);
    if direction.length_squared() < 1e-18 {
        return None;
    }

    // Both triangles cross the line where the planes meet: the intersection is where their crossings overlap
    let extent = |crossings: &SmallVec<[DVec3; 4]>| {
        crossings.iter().fold(None, |extent: Option<((f64, DVec3), (f64, DVec3))>, point| {
            let pos = direction.dot(*point);

            match extent {
                None            => Some(((pos, *point), (pos, *point))),
                Some((lo, hi))  => Some((if pos < lo.0 { (pos, *point) } else { lo }, if pos > hi.0 { (pos, *point) } else { hi })),
            }
        })
    };

    let (a_lo, a_hi) = extent(&plane_crossings(a, &distances_a))?;
    let (b_lo, b_hi) = extent(&plane_crossings(b, &distances_b))?;

    let start   = if a_lo.0 > b_lo.0 { a_lo } else { b_lo };
    let end     = if a_hi.0 < b_hi.0 { a_hi } else { b_hi };

    if end.0 - start.0 <= 0.0 || start.1.distance(end.1) < MIN_INTERSECTION_LENGTH {
        None
    } else {
        Some((start.1, end.1))
    }
}

///
/// Finds the intersection edges for a single triangle against the triangles with higher indexes
///
fn intersections_for_triangle(snapshot: &SceneSnapshot, projected: &[Option<ProjectedTriangle>], area: &BoundingArea, triangle_idx: usize) -> Vec<FeatureEdge> {
    let triangle = &snapshot.triangles[triangle_idx];
    let bounds   = match &projected[triangle_idx] {
        Some(projected) if triangle.can_intersect() => projected.bounds,
        _                                           => { return vec![]; }
    };

    let points          = snapshot.triangle_positions(triangle);
    let triangle_bounds = world_bounds(&points);
    let mut edges       = vec![];

    for other_idx in area.candidates(&bounds) {
        let other_idx = other_idx as usize;
        if other_idx <= triangle_idx { continue; }

        let other = &snapshot.triangles[other_idx];
        if !other.can_intersect() { continue; }
        if other.object == triangle.object && triangle.shares_vertex(other) { continue; }

        let other_points = snapshot.triangle_positions(other);
        if !bounds_overlap(&triangle_bounds, &world_bounds(&other_points)) { continue; }

        if let Some((start, end)) = intersect_triangles(&points, triangle.normal, &other_points, other.normal) {
            let masks = snapshot.objects[triangle.object as usize].intersection_mask | snapshot.objects[other.object as usize].intersection_mask;

            edges.push(FeatureEdge {
                endpoints:          [EdgePoint { world: start, vertex: None }, EdgePoint { world: end, vertex: None }],
                types:              EdgeTypes::INTERSECTION,
                triangles:          smallvec![TriangleIdx(triangle_idx as u32), TriangleIdx(other_idx as u32)],
                object:             triangle.object,
                material_mask:      triangle.material_mask | other.material_mask,
                intersection_mask:  masks,
                backdrop:           Backdrop::Unknown,
            });
        }
    }

    edges
}

///
/// Finds the lines where the triangles of a snapshot intersect each other
///
/// Candidate pairs are found using the bounding areas of the projected triangles. The edges are ordered by the indexes of the
/// two triangles that created them.
///
#[cfg(feature="multithreading")]
pub fn find_intersection_edges(snapshot: &SceneSnapshot, projected: &[Option<ProjectedTriangle>], area: &BoundingArea, settings: &LineartSettings) -> Vec<FeatureEdge> {
    use rayon::prelude::*;

    if !settings.edge_types.contains(EdgeTypes::INTERSECTION) {
        return vec![];
    }

    (0..snapshot.triangles.len()).into_par_iter()
        .map(|triangle_idx| intersections_for_triangle(snapshot, projected, area, triangle_idx))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

///
/// Finds the lines where the triangles of a snapshot intersect each other
///
/// Candidate pairs are found using the bounding areas of the projected triangles. The edges are ordered by the indexes of the
/// two triangles that created them.
///
#[cfg(not(feature="multithreading"))]
pub fn find_intersection_edges(snapshot: &SceneSnapshot, projected: &[Option<ProjectedTriangle>], area: &BoundingArea, settings: &LineartSettings) -> Vec<FeatureEdge> {
    if !settings.edge_types.contains(EdgeTypes::INTERSECTION) {
        return vec![];
    }

    (0..snapshot.triangles.len())
        .flat_map(|triangle_idx| intersections_for_triangle(snapshot, projected, area, triangle_idx))
        .collect()
}
