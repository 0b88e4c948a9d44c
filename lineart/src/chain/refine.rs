use super::chain::*;
use crate::settings::*;
use crate::snapshot::*;

use glam::{DVec2};

/// Points where the chain turns back by more than this many degrees are zig-zags
const ZIGZAG_ANGLE: f64 = 170.0;

///
/// The angle in degrees between two directions, or `None` if either is zero-length
///
#[inline]
fn angle_between(a: DVec2, b: DVec2) -> Option<f64> {
    let a = a.try_normalize()?;
    let b = b.try_normalize()?;

    Some(a.dot(b).clamp(-1.0, 1.0).acos().to_degrees())
}

///
/// Removes points where a chain doubles back on itself
///
pub fn remove_zigzags(chain: &Chain) -> Chain {
    if chain.points.len() < 3 {
        return chain.clone();
    }

    let mut points: Vec<ChainPoint> = Vec::with_capacity(chain.points.len());
    points.push(chain.points[0]);

    for idx in 1..chain.points.len()-1 {
        let prev    = points[points.len()-1].screen;
        let here    = chain.points[idx].screen;
        let next    = chain.points[idx+1].screen;

        let turn    = angle_between(here - prev, next - here);
        if turn.map(|turn| turn > ZIGZAG_ANGLE).unwrap_or(false) {
            continue;
        }

        points.push(chain.points[idx]);
    }

    points.push(chain.points[chain.points.len()-1]);

    if chain.closed && points.len() < 3 {
        chain.clone()
    } else {
        chain.with_points(points, chain.closed)
    }
}

///
/// True if the corner at `here` is sharper than `split_angle` degrees
///
#[inline]
fn is_sharp_corner(prev: &ChainPoint, here: &ChainPoint, next: &ChainPoint, split_angle: f64) -> bool {
    angle_between(prev.screen - here.screen, next.screen - here.screen)
        .map(|angle| angle < split_angle)
        .unwrap_or(false)
}

///
/// Splits an open list of points at its sharp corners (the corner point is part of both pieces)
///
fn split_open_points(points: &[ChainPoint], split_angle: f64) -> Vec<Vec<ChainPoint>> {
    let mut pieces  = vec![];
    let mut current = vec![];

    for idx in 0..points.len() {
        current.push(points[idx]);

        if idx > 0 && idx+1 < points.len() && is_sharp_corner(&points[idx-1], &points[idx], &points[idx+1], split_angle) {
            pieces.push(current);
            current = vec![points[idx]];
        }
    }

    pieces.push(current);
    pieces
}

///
/// Splits a chain at corners sharper than an angle in degrees (a split angle of 0 never splits)
///
/// A closed chain with a sharp corner is opened at that corner before being split.
///
pub fn split_by_angle(chain: &Chain, split_angle: f64) -> Vec<Chain> {
    if split_angle <= 0.0 || chain.points.len() < 3 {
        return vec![chain.clone()];
    }

    if chain.closed {
        let len         = chain.points.len();
        let first_split = (0..len).find(|idx| {
            is_sharp_corner(&chain.points[(idx + len - 1) % len], &chain.points[*idx], &chain.points[(idx + 1) % len], split_angle)
        });

        match first_split {
            None            => vec![chain.clone()],
            Some(split_idx) => {
                // Open the loop at the first corner
                let mut opened = chain.points[split_idx..].to_vec();
                opened.extend(chain.points[..=split_idx].iter().copied());

                split_open_points(&opened, split_angle).into_iter()
                    .map(|points| chain.with_points(points, false))
                    .collect()
            }
        }
    } else {
        split_open_points(&chain.points, split_angle).into_iter()
            .map(|points| chain.with_points(points, false))
            .collect()
    }
}

///
/// The distance from a point to the line segment between two others
///
#[inline]
fn distance_to_segment(point: DVec2, start: DVec2, end: DVec2) -> f64 {
    let along   = end - start;
    let len_sq  = along.length_squared();

    if len_sq <= 0.0 {
        point.distance(start)
    } else {
        let t = ((point - start).dot(along) / len_sq).clamp(0.0, 1.0);
        point.distance(start + along * t)
    }
}

///
/// Simplifies a list of points, keeping the points that are further than `tolerance` from the simplified line
///
fn simplify_points(points: &[ChainPoint], tolerance: f64) -> Vec<ChainPoint> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut keep    = vec![false; points.len()];
    let mut stack   = vec![(0, points.len()-1)];
    keep[0]                 = true;
    keep[points.len()-1]    = true;

    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 { continue; }

        let (furthest, distance) = (start+1..end)
            .map(|idx| (idx, distance_to_segment(points[idx].screen, points[start].screen, points[end].screen)))
            .fold((start, -1.0), |best, candidate| if candidate.1 > best.1 { candidate } else { best });

        if distance > tolerance {
            keep[furthest] = true;
            stack.push((start, furthest));
            stack.push((furthest, end));
        }
    }

    points.iter().zip(keep)
        .filter(|(_, keep)| *keep)
        .map(|(point, _)| *point)
        .collect()
}

///
/// Removes points that are within `tolerance` of the line between their neighbours on the screen
///
pub fn smooth_chain(chain: &Chain, tolerance: f64) -> Chain {
    if tolerance <= 0.0 || chain.points.len() < 3 {
        return chain.clone();
    }

    if chain.closed {
        let mut looped = chain.points.clone();
        looped.push(chain.points[0]);

        let mut simplified = simplify_points(&looped, tolerance);
        simplified.pop();

        if simplified.len() < 3 {
            chain.clone()
        } else {
            chain.with_points(simplified, true)
        }
    } else {
        chain.with_points(simplify_points(&chain.points, tolerance), false)
    }
}

///
/// Clips the line from `start` to `end` against a square from `-extent` to `extent`, returning the parameters of the visible part
///
fn clip_line_to_square(start: DVec2, end: DVec2, extent: f64) -> Option<(f64, f64)> {
    let delta       = end - start;
    let boundaries  = [
        (-delta.x, start.x + extent),
        (delta.x, extent - start.x),
        (-delta.y, start.y + extent),
        (delta.y, extent - start.y),
    ];

    let mut t0 = 0.0;
    let mut t1 = 1.0;

    for (p, q) in boundaries {
        if p == 0.0 {
            if q < 0.0 { return None; }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t0 { t0 = r; }
            } else if r < t1 {
                t1 = r;
            }
        }

        if t0 > t1 { return None; }
    }

    Some((t0, t1))
}

///
/// Cuts a chain at the edge of the camera frame, discarding the parts that are outside
///
/// A chain that leaves and re-enters the frame is split into several chains. A closed chain only stays closed if it's
/// entirely inside the frame.
///
pub fn trim_to_frame(chain: &Chain, view: &ViewProjection) -> Vec<Chain> {
    let extent = view.frame_extent();
    let inside = |point: &ChainPoint| point.screen.x.abs() <= extent && point.screen.y.abs() <= extent;

    if chain.points.len() < 2 {
        return vec![];
    }

    // Closed chains are opened at a point outside the frame so the pieces don't need rejoining
    let points = if chain.closed {
        match chain.points.iter().position(|point| !inside(point)) {
            None            => { return vec![chain.clone()]; }
            Some(outside)   => {
                let mut opened = chain.points[outside..].to_vec();
                opened.extend(chain.points[..=outside].iter().copied());
                opened
            }
        }
    } else {
        chain.points.clone()
    };

    let to_world_param  = |s: f64, d0: f64, d1: f64| view.screen_to_world_param(s, d0, d1);
    let mut pieces      = vec![];
    let mut current     = vec![];

    for pair in points.windows(2) {
        let (start, end) = (&pair[0], &pair[1]);

        match clip_line_to_square(start.screen, end.screen, extent) {
            None => {
                if !current.is_empty() { pieces.push(std::mem::take(&mut current)); }
            }

            Some((t0, t1)) => {
                if current.is_empty() {
                    current.push(if t0 > 0.0 { ChainPoint::interpolate(start, end, t0, to_world_param) } else { *start });
                }

                current.push(if t1 < 1.0 { ChainPoint::interpolate(start, end, t1, to_world_param) } else { *end });

                if t1 < 1.0 {
                    pieces.push(std::mem::take(&mut current));
                }
            }
        }
    }

    if !current.is_empty() { pieces.push(current); }

    pieces.into_iter()
        .filter(|piece| piece.len() >= 2)
        .map(|piece| chain.with_points(piece, false))
        .collect()
}

///
/// Applies the chain refinements in the chaining settings to a set of chains
///
/// Zig-zags are removed first (unless detail is being preserved), then chains are split at sharp corners, smoothed and
/// finally trimmed to the camera frame.
///
pub fn refine_chains(chains: Vec<Chain>, settings: &ChainingSettings, view: &ViewProjection) -> Vec<Chain> {
    chains.into_iter()
        .map(|chain| if settings.detail_preserve { chain } else { remove_zigzags(&chain) })
        .flat_map(|chain| split_by_angle(&chain, settings.split_angle))
        .map(|chain| smooth_chain(&chain, settings.smooth_tolerance))
        .flat_map(|chain| if settings.image_boundary_trimming { trim_to_frame(&chain, view) } else { vec![chain] })
        .filter(|chain| chain.points.len() >= 2)
        .collect()
}
