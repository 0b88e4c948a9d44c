use itertools::*;
use smallvec::*;

/// Parts of an edge narrower than this (as a fraction of its length on the screen) are merged into their neighbours
const MIN_RANGE_WIDTH: f64 = 1e-6;

///
/// Whether the light can see part of an edge
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Illumination {
    /// There was no light pass, or the light pass could not see this part of the edge
    Unknown,

    /// Nothing lies between the light and this part of the edge
    Lit,

    /// This part of the edge is in the shadow of another surface
    Shaded,
}

///
/// A part of an edge with its occlusion level
///
/// `start` and `end` are parameters along the edge in world space (0 is the start of the edge and 1 is the end)
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OcclusionRange {
    pub start:          f64,
    pub end:            f64,

    /// Number of surface layers between the camera and this part of the edge (0 is visible)
    pub level:          u32,

    pub illumination:   Illumination,
}

///
/// The occlusion levels along a feature edge
///
/// The ranges in a record are always in order, contiguous and non-overlapping, and cover the whole edge from 0 to 1. Neighbouring
/// ranges always differ in their level or illumination.
///
#[derive(Clone, Debug, PartialEq)]
pub struct OcclusionRecord {
    ranges: SmallVec<[OcclusionRange; 2]>,
}

///
/// A part of an edge hidden by a single triangle, as parameters along the projection of the edge on the screen
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OccludedInterval {
    pub start:  f64,
    pub end:    f64,
    pub weight: u32,
}

impl OcclusionRecord {
    ///
    /// A record for an edge that is visible along its whole length
    ///
    pub fn visible() -> OcclusionRecord {
        OcclusionRecord::uniform(0, Illumination::Unknown)
    }

    ///
    /// A record with the same level and illumination along the whole edge
    ///
    pub fn uniform(level: u32, illumination: Illumination) -> OcclusionRecord {
        OcclusionRecord {
            ranges: smallvec![OcclusionRange { start: 0.0, end: 1.0, level, illumination }]
        }
    }

    ///
    /// Builds a record from a list of ranges that cover the edge in order, merging neighbouring ranges that are the same and
    /// removing ranges with no length
    ///
    pub fn from_ranges(ranges: impl IntoIterator<Item=OcclusionRange>) -> OcclusionRecord {
        let mut result: SmallVec<[OcclusionRange; 2]> = smallvec![];

        for range in ranges {
            if range.end <= range.start {
                continue;
            }

            match result.last_mut() {
                Some(last) if last.level == range.level && last.illumination == range.illumination  => { last.end = range.end; }
                Some(last)                                                                          => { let start = last.end; result.push(OcclusionRange { start, ..range }); }
                None                                                                                => { result.push(OcclusionRange { start: 0.0, ..range }); }
            }
        }

        match result.last_mut() {
            Some(last)  => { last.end = 1.0; }
            None        => { return OcclusionRecord::visible(); }
        }

        OcclusionRecord { ranges: result }
    }

    ///
    /// Builds a record from the intervals hidden by each occluding triangle
    ///
    /// The intervals are parameters along the projection of the edge on the screen, and `to_edge_param` converts these into
    /// parameters along the edge itself.
    ///
    pub fn from_occluded_intervals(intervals: &[OccludedInterval], to_edge_param: impl Fn(f64) -> f64) -> OcclusionRecord {
        let events = intervals.iter()
            .flat_map(|interval| [(interval.start, interval.weight as i64), (interval.end, -(interval.weight as i64))])
            .sorted_by(|a, b| a.0.total_cmp(&b.0));

        // Sweep along the edge, tracking the total weight of the intervals covering each position
        let mut screen_ranges: SmallVec<[(f64, f64, u32); 4]> = smallvec![];
        let mut level = 0i64;
        let mut start = 0.0;

        for (pos, delta) in events {
            let pos = pos.clamp(0.0, 1.0);

            // Events closer together than the minimum width happen at the same place (this closes the gaps between neighbouring occluders)
            if pos - start > MIN_RANGE_WIDTH {
                screen_ranges.push((start, pos, level.max(0) as u32));
                start = pos;
            }

            level += delta;
        }

        if 1.0 - start > MIN_RANGE_WIDTH || screen_ranges.is_empty() {
            screen_ranges.push((start, 1.0, level.max(0) as u32));
        } else if let Some(last) = screen_ranges.last_mut() {
            last.1 = 1.0;
        }

        OcclusionRecord::from_ranges(screen_ranges.into_iter()
            .map(|(start, end, level)| {
                OcclusionRange {
                    start:          if start <= 0.0 { 0.0 } else { to_edge_param(start) },
                    end:            if end >= 1.0 { 1.0 } else { to_edge_param(end) },
                    level:          level,
                    illumination:   Illumination::Unknown,
                }
            }))
    }

    ///
    /// The ranges of this record
    ///
    #[inline]
    pub fn ranges(&self) -> &[OcclusionRange] {
        &self.ranges
    }

    ///
    /// The lowest occlusion level anywhere along the edge
    ///
    pub fn min_level(&self) -> u32 {
        self.ranges.iter().map(|range| range.level).min().unwrap_or(0)
    }

    ///
    /// The range containing a parameter along the edge
    ///
    pub fn range_at(&self, t: f64) -> &OcclusionRange {
        self.ranges.iter()
            .find(|range| t < range.end)
            .unwrap_or(&self.ranges[self.ranges.len()-1])
    }

    ///
    /// True if the ranges of this record cover the edge from 0 to 1 with no gaps or overlaps
    ///
    pub fn covers_edge(&self) -> bool {
        let (first, last) = match (self.ranges.first(), self.ranges.last()) {
            (Some(first), Some(last))   => (first, last),
            _                           => { return false; }
        };

        first.start == 0.0
            && last.end == 1.0
            && self.ranges.iter().all(|range| range.start < range.end)
            && self.ranges.iter().tuple_windows().all(|(a, b)| a.end == b.start)
    }

    ///
    /// Combines this record with the record of the same edge as seen from a light
    ///
    /// Where the light sees the edge at level 0 it is lit, otherwise it is shaded.
    ///
    pub fn with_light(&self, light: &OcclusionRecord) -> OcclusionRecord {
        let boundaries = self.ranges.iter().map(|range| range.end)
            .merge_by(light.ranges.iter().map(|range| range.end), |a, b| a <= b)
            .dedup();

        let mut start = 0.0;
        let ranges = boundaries
            .filter_map(|end| {
                if end <= start { return None; }

                let middle          = (start + end) * 0.5;
                let level           = self.range_at(middle).level;
                let illumination    = if light.range_at(middle).level == 0 { Illumination::Lit } else { Illumination::Shaded };
                let range           = OcclusionRange { start, end, level, illumination };

                start = end;
                Some(range)
            })
            .collect::<Vec<_>>();

        OcclusionRecord::from_ranges(ranges)
    }
}
