use glam::{DVec2};

///
/// An axis-aligned rectangle in screen space
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenBounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl ScreenBounds {
    ///
    /// The smallest bounds containing a set of points
    ///
    pub fn from_points(points: &[DVec2]) -> ScreenBounds {
        let min = points.iter().fold(DVec2::splat(f64::INFINITY), |min, point| min.min(*point));
        let max = points.iter().fold(DVec2::splat(f64::NEG_INFINITY), |max, point| max.max(*point));

        ScreenBounds { min, max }
    }

    ///
    /// True if these bounds overlap another set of bounds (touching counts as overlapping)
    ///
    #[inline]
    pub fn overlaps(&self, other: &ScreenBounds) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x && self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    ///
    /// True if these bounds contain the whole of another set of bounds
    ///
    #[inline]
    pub fn contains(&self, other: &ScreenBounds) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x && self.min.y <= other.min.y && self.max.y >= other.max.y
    }

    ///
    /// The smallest bounds containing both these bounds and another set
    ///
    #[inline]
    pub fn union(&self, other: &ScreenBounds) -> ScreenBounds {
        ScreenBounds { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    ///
    /// Splits these bounds into four quarters
    ///
    pub fn quarters(&self) -> [ScreenBounds; 4] {
        let mid = (self.min + self.max) * 0.5;

        [
            ScreenBounds { min: self.min, max: mid },
            ScreenBounds { min: DVec2::new(mid.x, self.min.y), max: DVec2::new(self.max.x, mid.y) },
            ScreenBounds { min: DVec2::new(self.min.x, mid.y), max: DVec2::new(mid.x, self.max.y) },
            ScreenBounds { min: mid, max: self.max },
        ]
    }
}
