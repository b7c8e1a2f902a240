//! Survival analysis for right-censored trial outcomes
//!
//! This module computes mean outcomes across repeated fuzzing trials when
//! some trials never produced the event of interest.
//!
//! # Overview
//!
//! A time-to-event trial (e.g. "seconds until the first crash") ends in one of
//! two ways:
//!
//! - **Event**: the crash was found at a known time
//! - **Censored**: the trial hit its time limit first (`None` observation)
//!
//! Averaging only the observed times ignores every timeout and makes a weak
//! configuration look fast. The restricted mean survival time, the area under
//! the Kaplan-Meier survival curve up to the trial horizon, uses timeouts as
//! "at least horizon" instead.
//!
//! ```text
//! Event:     |----x        (crash at 17.5s)
//! Censored:  |------------>| (no crash within the 60s horizon)
//! ```
//!
//! Scalar outcomes without censoring (e.g. throughput in execs/s) use the same
//! estimator with an unbounded horizon, which reduces to the arithmetic mean.
//!
//! # Examples
//!
//! ```
//! use fuzzstat_analysis::survival::censored_mean;
//!
//! let tte = [Some(1.0), Some(2.0), None, None];
//! let mean = censored_mean(&tte, Some(5.0));
//! assert!(mean > 2.0 && mean < 5.0);
//!
//! // No trial found the crash.
//! assert!(censored_mean(&[None, None], Some(60.0)).is_infinite());
//! ```

use fuzzstat_stats::survival::KaplanMeierCurve;

/// Restricted mean of the outcomes, treating `None` as censored at `horizon`.
///
/// `horizon` of `None` means unbounded. If every observation is censored (or
/// there are none) the event was never seen and `f64::INFINITY` is returned
/// without fitting a survival curve.
#[must_use]
pub fn censored_mean(observations: &[Option<f64>], horizon: Option<f64>) -> f64 {
    let horizon = horizon.unwrap_or(f64::INFINITY);
    if observations.iter().all(Option::is_none) {
        return f64::INFINITY;
    }
    KaplanMeierCurve::from_data(survival_data(observations, horizon)).restricted_mean(horizon)
}

/// Converts observations into `(time, is_censored)` pairs.
fn survival_data(observations: &[Option<f64>], horizon: f64) -> Vec<(f64, bool)> {
    observations
        .iter()
        .map(|obs| match obs {
            Some(time) => (*time, false),
            None => (horizon, true),
        })
        .collect()
}

/// Summary of one configuration's trial outcomes
#[derive(Debug, Clone)]
pub struct CensoredSummary {
    /// Total number of trials
    pub trials_count: usize,
    /// Number of censored trials
    pub censored_count: usize,
    /// Mean of the observed outcomes only, `None` if all were censored
    pub mean_observed: Option<f64>,
    /// Kaplan-Meier median
    pub median_km: Option<f64>,
    /// Restricted mean survival time up to the horizon
    pub restricted_mean: f64,
    /// Kaplan-Meier survival curve, `None` if all trials were censored
    pub km_curve: Option<KaplanMeierCurve>,
}

impl CensoredSummary {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_observations(observations: &[Option<f64>], horizon: Option<f64>) -> Self {
        let trials_count = observations.len();
        let observed = observations.iter().flatten().copied().collect::<Vec<_>>();
        let censored_count = trials_count - observed.len();

        let mean_observed =
            (!observed.is_empty()).then(|| observed.iter().sum::<f64>() / observed.len() as f64);

        let restricted_mean = censored_mean(observations, horizon);
        let km_curve = (!observed.is_empty()).then(|| {
            KaplanMeierCurve::from_data(survival_data(
                observations,
                horizon.unwrap_or(f64::INFINITY),
            ))
        });
        let median_km = km_curve.as_ref().and_then(KaplanMeierCurve::median_survival);

        Self {
            trials_count,
            censored_count,
            mean_observed,
            median_km,
            restricted_mean,
            km_curve,
        }
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn censored_ratio(&self) -> f64 {
        if self.trials_count == 0 {
            0.0
        } else {
            self.censored_count as f64 / self.trials_count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_censored_mean_between_last_event_and_horizon() {
        let mean = censored_mean(&[Some(1.0), Some(2.0), None, None], Some(5.0));
        assert!(mean > 2.0 && mean < 5.0);
        assert_close(mean, 3.25);
    }

    #[test]
    fn test_all_censored_is_unbounded() {
        assert_eq!(censored_mean(&[None, None, None], Some(60.0)), f64::INFINITY);
        assert_eq!(censored_mean(&[None], None), f64::INFINITY);
        assert_eq!(censored_mean(&[], Some(1.0)), f64::INFINITY);
    }

    #[test]
    fn test_uncensored_unbounded_is_arithmetic_mean() {
        let throughput = [
            257.72, 280.76, 250.50, 255.16, 253.11, 245.48, 265.50, 266.40, 269.85, 274.71,
        ];
        let observations = throughput.map(Some);
        let expected = throughput.iter().sum::<f64>() / 10.0;
        assert!((censored_mean(&observations, None) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_censored_without_horizon_is_unbounded() {
        assert!(censored_mean(&[Some(3.0), None], None).is_infinite());
    }

    #[test]
    fn test_time_to_exposure_with_timeouts() {
        let tte = [
            None,
            None,
            None,
            Some(31.527),
            None,
            Some(28.340),
            None,
            Some(17.466),
            Some(7.356),
            None,
        ];
        let mean = censored_mean(&tte, Some(60.0));
        let naive = (31.527 + 28.340 + 17.466 + 7.356) / 4.0;
        assert!(mean > naive && mean < 60.0, "{mean}");
    }

    #[test]
    fn test_summary() {
        let summary =
            CensoredSummary::from_observations(&[Some(1.0), Some(2.0), None, None], Some(5.0));
        assert_eq!(summary.trials_count, 4);
        assert_eq!(summary.censored_count, 2);
        assert_close(summary.censored_ratio(), 0.5);
        assert_close(summary.mean_observed.unwrap(), 1.5);
        assert_close(summary.restricted_mean, 3.25);
        assert!(summary.km_curve.is_some());
    }

    #[test]
    fn test_summary_all_censored() {
        let summary = CensoredSummary::from_observations(&[None, None], Some(60.0));
        assert_eq!(summary.censored_count, 2);
        assert_eq!(summary.mean_observed, None);
        assert_eq!(summary.median_km, None);
        assert!(summary.km_curve.is_none());
        assert!(summary.restricted_mean.is_infinite());
    }
}
