//! Offline analysis of fuzzing campaign results
//!
//! This crate turns the artifacts left behind by repeated fuzzing trials into
//! comparable numbers and curves.
//!
//! # Overview
//!
//! ## Coverage Workflow
//!
//! 1. **Parse Timestamps** ([`timestamp::snapshot_time`]): read the `time` field of queue entries
//! 2. **Aggregate Coverage** ([`coverage::aggregate_coverage`]): replay per-entry bitmaps into a
//!    cumulative coverage curve per trial
//! 3. **Average Trials** ([`curve::mean_curve`]): align trial curves on a common time axis and
//!    average them
//!
//! ## Outcome Workflow
//!
//! 1. **Load Outcomes** ([`trials::OutcomeSet`]): per-trial throughput or time-to-event values
//! 2. **Censored Mean** ([`survival::censored_mean`]): Kaplan-Meier restricted mean that treats
//!    timeouts as censored
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! use fuzzstat_analysis::{coverage, curve};
//! use fuzzstat_stats::interpolate::Interpolation;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let trials = (0..10)
//!     .map(|i| {
//!         let queue = format!("out/dir_asan/{i}/default/queue");
//!         let cov = format!("out/cov_asan_{i}");
//!         coverage::aggregate_coverage(Path::new(&queue), Path::new(&cov)).map(|c| c.to_curve())
//!     })
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! let mean = curve::mean_curve(&trials, Interpolation::Linear)?;
//! println!("{:?}", mean.last());
//! # Ok(())
//! # }
//! ```

pub mod coverage;
pub mod curve;
pub mod survival;
pub mod timestamp;
pub mod trials;
