use super::projected_triangle::*;
use super::bounding_area::*;
use super::occlusion_record::*;
use super::solver::*;
use crate::classify::*;
use crate::error::*;
use crate::snapshot::*;

use log::*;

///
/// Projects the triangles of a snapshot onto the screen of a light's shadow camera, and indexes them
///
/// Every surface that hides lines from the camera casts shadows, including back faces that are culled for the camera.
///
pub fn project_for_light(snapshot: &SceneSnapshot, shadow_view: &ViewProjection) -> Result<(Vec<Option<ProjectedTriangle>>, BoundingArea), LineartError> {
    let (mut projected, _) = project_triangles(snapshot, shadow_view);
    for (projected, triangle) in projected.iter_mut().zip(snapshot.triangles.iter()) {
        if let Some(projected) = projected {
            projected.occluder = projected.has_area && triangle.occlusion > 0 && !triangle.flags.contains(TriangleFlags::INTERSECTION_ONLY);
        }
    }

    let area = BoundingArea::build(&projected)?;

    Ok((projected, area))
}

///
/// Marks the parts of each edge that the light of a snapshot can see
///
/// The edges are solved again from the point of view of the light's shadow camera. Where the light sees an edge at level 0
/// it's lit, otherwise it's shaded. Edges the shadow camera cannot see keep an unknown illumination.
///
pub fn apply_light_pass(snapshot: &SceneSnapshot, edges: &[FeatureEdge], records: Vec<OcclusionRecord>) -> Result<Vec<OcclusionRecord>, LineartError> {
    let shadow_view = match snapshot.light.as_ref().and_then(|light| light.shadow_view) {
        Some(view)  => view,
        None        => { return Ok(records); }
    };

    let (projected, area)   = project_for_light(snapshot, &shadow_view)?;
    let light_records       = OcclusionSolver::new(snapshot, &shadow_view, &projected, &area).solve(edges);

    debug!("Line art: light pass over {} edges using {} areas", edges.len(), area.num_areas());

    Ok(records.into_iter()
        .zip(light_records)
        .map(|(record, light_record)| {
            match light_record {
                Some(light_record)  => record.with_light(&light_record),
                None                => record,
            }
        })
        .collect())
}
