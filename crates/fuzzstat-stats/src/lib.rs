//! Numeric building blocks for fuzzing campaign analysis.
//!
//! This crate provides:
//!
//! - **Descriptive statistics**: mean, median, variance, standard deviation
//! - **Interpolation**: resampling ascending `(x, y)` samples with linear or step rules
//! - **Survival analysis**: Kaplan-Meier estimator with restricted mean survival time
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`interpolate`]: Boundary-clamped interpolation of sampled curves
//! - [`survival`]: Kaplan-Meier survival curves for analyzing time-to-event data
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use fuzzstat_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Analyzing survival data
//!
//! ```
//! use fuzzstat_stats::survival::KaplanMeierCurve;
//!
//! // Data: (time, is_censored)
//! let data = vec![
//!     (1.0, false), // Event occurred at time 1
//!     (2.0, false), // Event occurred at time 2
//!     (5.0, true),  // Censored at time 5
//!     (5.0, true),  // Censored at time 5
//! ];
//! let curve = KaplanMeierCurve::from_data(data);
//! let rmst = curve.restricted_mean(5.0);
//! assert!(rmst > 2.0 && rmst < 5.0);
//! ```

pub mod descriptive;
pub mod interpolate;
pub mod survival;
