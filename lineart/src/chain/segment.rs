use super::chain::*;
use crate::classify::*;
use crate::occlusion::*;
use crate::snapshot::*;

use std::ops::{RangeInclusive};

///
/// A visible part of a feature edge, ready to be linked into a chain
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub points: [ChainPoint; 2],
    pub key:    ChainKey,
}

impl Segment {
    ///
    /// Creates the chain point at a parameter along an edge
    ///
    pub fn edge_point(view: &ViewProjection, edge: &FeatureEdge, edge_id: FeatureEdgeId, t: f64) -> ChainPoint {
        let world       = edge.point_at(t);
        let view_point  = view.to_view(world);

        ChainPoint {
            screen: view.project(view_point),
            world:  world,
            depth:  ViewProjection::depth(view_point),
            source: PointSource { edge: edge_id, t: t },
        }
    }
}

///
/// Extracts the segments of the feature edges whose occlusion level is in a range
///
/// Ranges outside the level range are discarded. Unless `overlapping_types` is set, each segment keeps only the
/// highest-priority type of its edge.
///
pub fn extract_segments(snapshot: &SceneSnapshot, edges: &[FeatureEdge], records: &[OcclusionRecord], levels: RangeInclusive<u32>, overlapping_types: bool) -> Vec<Segment> {
    let view = if let Some(view) = &snapshot.view { view } else { return vec![]; };

    edges.iter()
        .zip(records.iter())
        .enumerate()
        .flat_map(|(edge_idx, (edge, record))| {
            let edge_id = FeatureEdgeId(edge_idx as u32);
            let types   = if overlapping_types { edge.types } else { edge.types.highest_priority() };
            let object  = snapshot.objects[edge.object as usize].id;
            let levels  = levels.clone();

            record.ranges().iter()
                .filter(move |range| levels.contains(&range.level))
                .map(move |range| {
                    Segment {
                        points: [Segment::edge_point(view, edge, edge_id, range.start), Segment::edge_point(view, edge, edge_id, range.end)],
                        key:    ChainKey {
                            types:              types,
                            level:              range.level,
                            object:             object,
                            material_mask:      edge.material_mask,
                            intersection_mask:  edge.intersection_mask,
                            illumination:       range.illumination,
                            backdrop:           edge.backdrop,
                        }
                    }
                })
        })
        .collect()
}
