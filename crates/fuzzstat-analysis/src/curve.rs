//! Ascending `(time, value)` curves and averaging across repeated trials
//!
//! A fuzzing campaign is usually repeated several times with the same
//! configuration. Each trial produces its own coverage curve with its own
//! sample times, so curves must be aligned before they can be averaged.
//!
//! # Alignment
//!
//! [`mean_curve`] builds a common time axis from the union of every trial's
//! sample times, resamples each trial on that axis and averages pointwise:
//!
//! ```text
//! trial A:  (0, 3) ------ (1, 5)
//! trial B:  (0, 3) ---------------- (2, 7)
//! axis:      0             1         2
//! linear:    3             5         6      (A clamped to 5 at t=2)
//! step:      3             4         6      (B holds 3 at t=1)
//! ```
//!
//! Values before a trial's first sample or after its last sample are clamped
//! to the boundary value; nothing is extrapolated.

use fuzzstat_stats::interpolate::Interpolation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CurveError {
    #[display("curve sample {index} is not a number: {point:?}")]
    NotANumber { index: usize, point: (f64, f64) },
    #[display("curve is not ascending at sample {index}: {prev:?} -> {next:?}")]
    NotAscending {
        index: usize,
        prev: (f64, f64),
        next: (f64, f64),
    },
    #[display("no trial curves to average")]
    NoTrials,
    #[display("trial curve {index} has no samples")]
    EmptyTrial { index: usize },
}

/// A sequence of `(time, value)` samples, non-decreasing in both coordinates.
///
/// Serialized as a JSON array of `[time, value]` pairs. Deserialization
/// validates the ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct Curve {
    points: Vec<(f64, f64)>,
}

impl Curve {
    /// Creates a curve, checking that both coordinates never decrease.
    ///
    /// # Examples
    ///
    /// ```
    /// use fuzzstat_analysis::curve::Curve;
    ///
    /// assert!(Curve::new(vec![(0.0, 3.0), (0.5, 3.0), (1.0, 4.0)]).is_ok());
    /// assert!(Curve::new(vec![(0.0, 3.0), (1.0, 2.0)]).is_err());
    /// ```
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, CurveError> {
        if let Some(index) = points.iter().position(|(t, v)| t.is_nan() || v.is_nan()) {
            return Err(CurveError::NotANumber {
                index,
                point: points[index],
            });
        }
        for (i, pair) in points.windows(2).enumerate() {
            let (prev, next) = (pair[0], pair[1]);
            if prev.0 > next.0 || prev.1 > next.1 {
                return Err(CurveError::NotAscending {
                    index: i + 1,
                    prev,
                    next,
                });
            }
        }
        Ok(Self { points })
    }

    /// Wraps points the caller has already produced in ascending order.
    pub(crate) fn from_ascending(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|&(t, _)| t)
    }

    /// Last sample of the curve, i.e. the final value reached.
    #[must_use]
    pub fn last(&self) -> Option<(f64, f64)> {
        self.points.last().copied()
    }

    /// Evaluates the curve at `time`, clamping outside the sampled range.
    ///
    /// Returns `None` for an empty curve.
    #[must_use]
    pub fn value_at(&self, time: f64, interpolation: Interpolation) -> Option<f64> {
        interpolation.sample(&self.points, time)
    }
}

impl TryFrom<Vec<(f64, f64)>> for Curve {
    type Error = CurveError;

    fn try_from(points: Vec<(f64, f64)>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Curve> for Vec<(f64, f64)> {
    fn from(curve: Curve) -> Self {
        curve.points
    }
}

/// Averages trial curves pointwise on the union of their sample times.
///
/// Each trial is resampled with `interpolation` on the common axis; values
/// outside a trial's sampled range are held at the trial's first or last
/// value. A single trial comes back unchanged, except that samples sharing a
/// time collapse to the last one.
///
/// # Examples
///
/// ```
/// use fuzzstat_analysis::curve::{Curve, mean_curve};
/// use fuzzstat_stats::interpolate::Interpolation;
///
/// let a = Curve::new(vec![(0.0, 3.0), (1.0, 5.0)]).unwrap();
/// let b = Curve::new(vec![(0.0, 3.0), (2.0, 7.0)]).unwrap();
/// let mean = mean_curve(&[a, b], Interpolation::Linear).unwrap();
/// assert_eq!(mean.points(), &[(0.0, 3.0), (1.0, 5.0), (2.0, 6.0)]);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn mean_curve(trials: &[Curve], interpolation: Interpolation) -> Result<Curve, CurveError> {
    if trials.is_empty() {
        return Err(CurveError::NoTrials);
    }
    if let Some(index) = trials.iter().position(Curve::is_empty) {
        return Err(CurveError::EmptyTrial { index });
    }

    let mut axis = trials.iter().flat_map(Curve::times).collect::<Vec<_>>();
    axis.sort_by(f64::total_cmp);
    axis.dedup();

    let n = trials.len() as f64;
    let points = axis
        .into_iter()
        .map(|time| {
            let sum = trials
                .iter()
                .filter_map(|trial| trial.value_at(time, interpolation))
                .sum::<f64>();
            (time, sum / n)
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        trials = trials.len(),
        axis_len = points.len(),
        ?interpolation,
        "averaged trial curves"
    );

    Ok(Curve::from_ascending(points))
}
