//! Prediction interval

use serde::{Deserialize, Serialize};

/// A closed [lower, upper] interval around an estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

impl Interval {
    /// Create a new interval
    ///
    /// # Panics
    /// Panics if a bound is not finite or lower > upper
    pub fn new(lower: f64, upper: f64) -> Self {
        assert!(lower.is_finite() && upper.is_finite(), "Bounds must be finite");
        assert!(lower <= upper, "Lower bound must be <= upper bound");

        Self { lower, upper }
    }

    /// Create an interval from two bounds in either order
    pub fn spanning(a: f64, b: f64) -> Self {
        Self {
            lower: a.min(b),
            upper: a.max(b),
        }
    }

    /// Scale both bounds by a non-negative factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self::spanning(self.lower * factor, self.upper * factor)
    }

    /// Midpoint of the interval
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// Width of the interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Width as a percentage of `center`; 0 when `center` is 0
    pub fn relative_width_pct(&self, center: f64) -> f64 {
        if center == 0.0 {
            0.0
        } else {
            self.width() / center * 100.0
        }
    }

    /// Check if the interval contains a value
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_creation() {
        let i = Interval::new(80.0, 120.0);
        assert_eq!(i.midpoint(), 100.0);
        assert_eq!(i.width(), 40.0);
        assert!(i.contains(100.0));
        assert!(!i.contains(121.0));
    }

    #[test]
    fn test_relative_width() {
        let i = Interval::new(80.0, 120.0);
        assert_eq!(i.relative_width_pct(100.0), 40.0);
        assert_eq!(i.relative_width_pct(0.0), 0.0);
    }

    #[test]
    fn test_spanning_orders_bounds() {
        let i = Interval::spanning(5.0, 2.0);
        assert_eq!(i.lower, 2.0);
        assert_eq!(i.upper, 5.0);
        assert_eq!(i.scaled(2.0), Interval::new(4.0, 10.0));
    }

    #[test]
    #[should_panic]
    fn test_invalid_bounds() {
        Interval::new(0.9, 0.5); // Lower > upper
    }
}
