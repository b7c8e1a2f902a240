//! Per-configuration trial data sets
//!
//! A comparison between two fuzzer configurations (e.g. an ASAN build vs. a
//! normal build) is fed with one data set per configuration, each holding the
//! results of repeated trials.
//!
//! # Serialization
//!
//! Both types implement `serde` traits for JSON files:
//!
//! ```json
//! {
//!   "label": "ASAN",
//!   "trials": [
//!     [[0.0, 3], [0.057, 4], [5.69, 5]],
//!     [[0.0, 3], [0.088, 4], [10.984, 5], [50.175, 6]]
//!   ]
//! }
//! ```
//!
//! ```json
//! {
//!   "label": "ASAN",
//!   "horizon": 60.0,
//!   "observations": [null, 31.527, 28.34, null]
//! }
//! ```

use fuzzstat_stats::interpolate::Interpolation;
use serde::{Deserialize, Serialize};

use crate::{
    curve::{self, Curve, CurveError},
    survival::CensoredSummary,
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("data set {label:?} has {actual} trials, expected {expected}")]
pub struct TrialCountError {
    pub label: String,
    pub expected: usize,
    pub actual: usize,
}

fn check_trial_count(label: &str, actual: usize, expected: usize) -> Result<(), TrialCountError> {
    if actual == expected {
        Ok(())
    } else {
        Err(TrialCountError {
            label: label.to_owned(),
            expected,
            actual,
        })
    }
}

/// Coverage curves of repeated trials of one configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurveSet {
    /// Configuration name, used as the chart legend
    pub label: String,
    /// One curve per trial
    pub trials: Vec<Curve>,
}

impl CurveSet {
    /// Pointwise mean of all trials, see [`curve::mean_curve`].
    pub fn mean_curve(&self, interpolation: Interpolation) -> Result<Curve, CurveError> {
        curve::mean_curve(&self.trials, interpolation)
    }

    pub fn ensure_trial_count(&self, expected: usize) -> Result<(), TrialCountError> {
        check_trial_count(&self.label, self.trials.len(), expected)
    }
}

/// Scalar outcomes of repeated trials of one configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutcomeSet {
    /// Configuration name
    pub label: String,
    /// Trial time limit; `None` means unbounded
    #[serde(default)]
    pub horizon: Option<f64>,
    /// One outcome per trial; `None` means the event did not happen before the horizon
    pub observations: Vec<Option<f64>>,
}

impl OutcomeSet {
    #[must_use]
    pub fn summary(&self) -> CensoredSummary {
        CensoredSummary::from_observations(&self.observations, self.horizon)
    }

    pub fn ensure_trial_count(&self, expected: usize) -> Result<(), TrialCountError> {
        check_trial_count(&self.label, self.observations.len(), expected)
    }
}
