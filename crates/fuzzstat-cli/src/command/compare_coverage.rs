//! Coverage comparison command
//!
//! Averages the trial coverage curves of two configurations and draws both
//! mean curves on one chart.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use fuzzstat_analysis::{curve::Curve, trials::CurveSet};
use fuzzstat_stats::interpolate::Interpolation;

use crate::{
    plot::{self, Series},
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareCoverageArg {
    /// Curve set JSON file of the first configuration
    pub first: PathBuf,

    /// Curve set JSON file of the second configuration
    pub second: PathBuf,

    /// Output PNG file
    #[arg(long, default_value = "out/coverage.png")]
    pub output: PathBuf,

    /// How trial curves are resampled between samples (linear or step)
    #[arg(long, default_value = "linear")]
    pub interpolation: Interpolation,

    /// Fail unless both sets have exactly this many trials
    #[arg(long)]
    pub expect_trials: Option<usize>,

    /// Also save both mean curves as a JSON file
    #[arg(long)]
    pub mean_output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CompareCoverageArg) -> anyhow::Result<()> {
    let first = util::read_curve_set_file(&arg.first)?;
    let second = util::read_curve_set_file(&arg.second)?;

    let first_mean = mean_of(&first, arg)?;
    let second_mean = mean_of(&second, arg)?;

    for (set, mean) in [(&first, &first_mean), (&second, &second_mean)] {
        let (time, value) = mean.last().unwrap_or_default();
        println!(
            "{}: {} trials, mean coverage {value:.2} at {time:.3}s",
            set.label,
            set.trials.len()
        );
    }

    plot::render_comparison(
        &arg.output,
        &Series {
            label: &first.label,
            curve: &first_mean,
        },
        &Series {
            label: &second.label,
            curve: &second_mean,
        },
        "time (s)",
        "covered locations",
    )?;

    if let Some(path) = &arg.mean_output {
        let means = [
            CurveSet {
                label: first.label.clone(),
                trials: vec![first_mean],
            },
            CurveSet {
                label: second.label.clone(),
                trials: vec![second_mean],
            },
        ];
        Output::save_json(&means, Some(path.clone()))?;
    }

    Ok(())
}

fn mean_of(set: &CurveSet, arg: &CompareCoverageArg) -> anyhow::Result<Curve> {
    if let Some(expected) = arg.expect_trials {
        set.ensure_trial_count(expected)?;
    }
    set.mean_curve(arg.interpolation)
        .with_context(|| format!("Failed to average trial curves of {:?}", set.label))
}
