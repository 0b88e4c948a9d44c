use super::chain::*;
use super::segment::*;
use super::endpoint_grid::*;
use super::refine::*;
use crate::classify::*;
use crate::occlusion::*;
use crate::settings::*;
use crate::snapshot::*;

use glam::{DVec3};

use std::collections::{BTreeMap};

/// Segment ends closer than this in world space are joined when linking
const LINK_EPSILON: f64 = 1e-6;

///
/// Finds the nearest unpicked segment end to a position that can be linked exactly
///
fn find_link(grid: &EndpointGrid, segments: &[Segment], picked: &[bool], key: &ChainKey, pos: DVec3) -> Option<(usize, usize)> {
    grid.nearby(pos)
        .filter_map(|id| {
            let (segment_idx, end) = ((id / 2) as usize, (id % 2) as usize);
            let segment = &segments[segment_idx];

            if picked[segment_idx] || segment.key != *key {
                return None;
            }

            let distance = segment.points[end].world.distance(pos);
            if distance <= LINK_EPSILON { Some((distance, id)) } else { None }
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, id)| ((id / 2) as usize, (id % 2) as usize))
}

///
/// Links segments whose ends meet into chains
///
/// Each chain starts at the first unpicked segment and grows in both directions by joining segments with exactly the same
/// properties. A chain that returns to where it started is closed. Every step picks a segment, so this finishes after at
/// most one step per segment.
///
pub fn link_segments(segments: &[Segment]) -> Vec<Chain> {
    let mut grid = EndpointGrid::new(LINK_EPSILON * 4.0);
    for (idx, segment) in segments.iter().enumerate() {
        grid.insert(segment.points[0].world, (idx * 2) as u32);
        grid.insert(segment.points[1].world, (idx * 2 + 1) as u32);
    }

    let mut picked = vec![false; segments.len()];
    let mut chains = vec![];

    for first_idx in 0..segments.len() {
        if picked[first_idx] { continue; }
        picked[first_idx] = true;

        let first_segment   = &segments[first_idx];
        let key             = first_segment.key;
        let mut forward     = first_segment.points.to_vec();
        let mut backward    = vec![];
        let mut closed      = false;

        // Grow from the end
        while let Some((segment_idx, end)) = find_link(&grid, segments, &picked, &key, forward[forward.len()-1].world) {
            picked[segment_idx] = true;
            forward.push(segments[segment_idx].points[1 - end]);

            if forward.len() > 3 && forward[forward.len()-1].world.distance(forward[0].world) <= LINK_EPSILON {
                forward.pop();
                closed = true;
                break;
            }
        }

        // Grow from the start
        if !closed {
            while let Some((segment_idx, end)) = find_link(&grid, segments, &picked, &key, backward.last().unwrap_or(&forward[0]).world) {
                picked[segment_idx] = true;
                backward.push(segments[segment_idx].points[1 - end]);

                let start = backward[backward.len()-1].world;
                if forward.len() + backward.len() > 3 && start.distance(forward[forward.len()-1].world) <= LINK_EPSILON {
                    backward.pop();
                    closed = true;
                    break;
                }
            }
        }

        backward.reverse();
        backward.extend(forward);

        let mut chain   = Chain::new(backward, key);
        chain.closed    = closed;
        chains.push(chain);
    }

    chains
}

///
/// Properties used to decide if two chains can be connected
///
struct ConnectionRules {
    fuzzy_intersections:    bool,
    fuzzy_all:              bool,
    loose_edge_chain:       bool,
}

impl ConnectionRules {
    ///
    /// Returns the match quality between two chains (0 for an exact match, 1 for a fuzzy match), or `None` if they can't be connected
    ///
    fn match_quality(&self, a: &Chain, b: &Chain) -> Option<u8> {
        if a.level != b.level {
            return None;
        }

        let a_loose = a.types.contains(EdgeTypes::LOOSE);
        let b_loose = b.types.contains(EdgeTypes::LOOSE);
        if (a_loose || b_loose) && !(a_loose && b_loose && self.loose_edge_chain) {
            return None;
        }

        if a.key() == b.key() {
            Some(0)
        } else if a.illumination != b.illumination {
            None
        } else if self.fuzzy_all {
            Some(1)
        } else if self.fuzzy_intersections && (a.types.contains(EdgeTypes::INTERSECTION) || b.types.contains(EdgeTypes::INTERSECTION)) {
            Some(1)
        } else {
            None
        }
    }
}

///
/// Connects the ends of chains that are closer than the chaining threshold
///
/// Starting from each chain in turn, the nearest compatible chain end within the threshold is joined on, preferring chains
/// with exactly the same properties. Chains are marked as picked once they've been used, so no chain is connected twice.
/// Every chain that is returned is marked as picked.
///
pub fn connect_chains(mut chains: Vec<Chain>, settings: &ChainingSettings) -> Vec<Chain> {
    let threshold = settings.image_threshold;
    if threshold <= 0.0 || chains.len() < 2 {
        chains.iter_mut().for_each(|chain| chain.picked = true);
        return chains;
    }

    let geometry_space  = settings.geometry_space;
    let position        = move |point: &ChainPoint| if geometry_space { point.world } else { point.screen.extend(0.0) };
    let rules           = ConnectionRules {
        fuzzy_intersections:    settings.fuzzy_intersections,
        fuzzy_all:              settings.fuzzy_all,
        loose_edge_chain:       settings.loose_edge_chain,
    };

    let mut grid = EndpointGrid::new(threshold);
    for (idx, chain) in chains.iter_mut().enumerate() {
        chain.picked = false;
        if chain.closed || chain.points.is_empty() { continue; }

        grid.insert(position(&chain.points[0]), (idx * 2) as u32);
        grid.insert(position(&chain.points[chain.points.len()-1]), (idx * 2 + 1) as u32);
    }

    let mut result = vec![];

    for idx in 0..chains.len() {
        if chains[idx].picked { continue; }
        chains[idx].picked = true;

        let points      = std::mem::take(&mut chains[idx].points);
        let mut current = chains[idx].with_points(points, chains[idx].closed);

        if current.closed || current.points.is_empty() {
            result.push(current);
            continue;
        }

        // Extend from the end, then from the start (by working on the reversed chain)
        for _ in 0..2 {
            loop {
                let end_pos     = position(&current.points[current.points.len()-1]);
                let candidate   = grid.nearby(end_pos)
                    .filter_map(|id| {
                        let (other_idx, end) = ((id / 2) as usize, (id % 2) as usize);
                        let other = &chains[other_idx];

                        if other.picked { return None; }

                        let quality     = rules.match_quality(&current, other)?;
                        let other_pos   = if end == 0 { position(&other.points[0]) } else { position(&other.points[other.points.len()-1]) };
                        let distance    = other_pos.distance(end_pos);

                        if distance <= threshold { Some((quality, distance, id)) } else { None }
                    })
                    .min_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)).then(a.2.cmp(&b.2)));

                let (other_idx, end) = match candidate {
                    Some((_, _, id))    => ((id / 2) as usize, (id % 2) as usize),
                    None                => { break; }
                };

                let other           = &mut chains[other_idx];
                other.picked        = true;
                let mut points      = std::mem::take(&mut other.points);

                if end == 1 {
                    points.reverse();
                }

                let duplicate_join = match (points.first(), current.points.last()) {
                    (Some(first), Some(last))   => first.world.distance(last.world) <= LINK_EPSILON,
                    _                           => false,
                };

                current.points.extend(points.into_iter().skip(if duplicate_join { 1 } else { 0 }));
            }

            current.points.reverse();
        }

        result.push(current);
    }

    result
}

///
/// Links, connects and refines the segments of a single occlusion level
///
fn chain_level(segments: &[Segment], settings: &ChainingSettings, view: &ViewProjection) -> Vec<Chain> {
    let chains = link_segments(segments);
    let chains = connect_chains(chains, settings);

    refine_chains(chains, settings, view)
}

#[cfg(feature="multithreading")]
fn chain_levels(buckets: &[Vec<Segment>], settings: &ChainingSettings, view: &ViewProjection) -> Vec<Vec<Chain>> {
    use rayon::prelude::*;

    buckets.par_iter()
        .map(|segments| chain_level(segments, settings, view))
        .collect()
}

#[cfg(not(feature="multithreading"))]
fn chain_levels(buckets: &[Vec<Segment>], settings: &ChainingSettings, view: &ViewProjection) -> Vec<Vec<Chain>> {
    buckets.iter()
        .map(|segments| chain_level(segments, settings, view))
        .collect()
}

///
/// Turns the visible parts of a set of feature edges into chains
///
/// The segments of each occlusion level are chained independently (and in parallel when multithreading is enabled). The
/// chains are returned in order of level, then in the order that they were started.
///
pub fn build_chains(snapshot: &SceneSnapshot, edges: &[FeatureEdge], records: &[OcclusionRecord], settings: &LineartSettings) -> Vec<Chain> {
    let view = if let Some(view) = &snapshot.view { view } else { return vec![]; };

    let segments = extract_segments(snapshot, edges, records, settings.levels(), settings.chaining.overlapping_edge_types);

    let mut buckets = BTreeMap::<u32, Vec<Segment>>::new();
    for segment in segments {
        buckets.entry(segment.key.level).or_insert_with(|| vec![]).push(segment);
    }

    let buckets = buckets.into_values().collect::<Vec<_>>();

    chain_levels(&buckets, &settings.chaining, view)
        .into_iter()
        .flatten()
        .collect()
}
