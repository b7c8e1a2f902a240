//! Resampling of ascending `(x, y)` samples at arbitrary points.
//!
//! Both rules clamp outside the sampled range: a query before the first
//! sample yields the first `y`, a query after the last sample yields the last
//! `y`. When several samples share the same `x`, the last one wins.

/// How to fill values between two consecutive samples.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Interpolation {
    /// Straight line between the neighbouring samples.
    #[default]
    Linear,
    /// Hold the most recent sample until the next one.
    Step,
}

impl Interpolation {
    /// Evaluates the samples at `x`.
    ///
    /// `points` must be sorted by `x` in ascending order. Returns `None` if
    /// `points` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fuzzstat_stats::interpolate::Interpolation;
    /// let points = [(0.0, 3.0), (2.0, 7.0)];
    /// assert_eq!(Interpolation::Linear.sample(&points, 1.0), Some(5.0));
    /// assert_eq!(Interpolation::Step.sample(&points, 1.0), Some(3.0));
    /// assert_eq!(Interpolation::Linear.sample(&points, 9.0), Some(7.0));
    /// ```
    #[must_use]
    pub fn sample(self, points: &[(f64, f64)], x: f64) -> Option<f64> {
        debug_assert!(points.is_sorted_by(|a, b| a.0 <= b.0));

        let (first, last) = (points.first()?, points.last()?);
        let idx = points.partition_point(|&(px, _)| px <= x);
        if idx == 0 {
            return Some(first.1);
        }
        if idx == points.len() {
            return Some(last.1);
        }

        // points[idx - 1].0 <= x < points[idx].0
        let (x0, y0) = points[idx - 1];
        let (x1, y1) = points[idx];
        let y = match self {
            Interpolation::Step => y0,
            Interpolation::Linear => y0 + (y1 - y0) * (x - x0) / (x1 - x0),
        };
        Some(y)
    }
}
