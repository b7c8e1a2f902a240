//! Censored mean command
//!
//! Compares per-trial outcomes (throughput, time-to-exposure) of several
//! configurations. Trials that timed out are treated as right-censored at the
//! horizon and the mean is estimated with the Kaplan-Meier restricted mean.

mod table;

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Args;
use fuzzstat_analysis::{survival::CensoredSummary, trials::OutcomeSet};
use fuzzstat_stats::descriptive::DescriptiveStats;

use self::table::SummaryTableRow;
use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct CensoredMeanArg {
    /// Outcome set JSON files, one per configuration
    #[arg(required = true)]
    pub sets: Vec<PathBuf>,

    /// Fail unless every set has exactly this many trials
    #[arg(long)]
    pub expect_trials: Option<usize>,

    /// Output directory for KM curve CSV files
    #[arg(long)]
    pub km_output_dir: Option<PathBuf>,
}

pub(crate) fn run(arg: &CensoredMeanArg) -> anyhow::Result<()> {
    let sets = arg
        .sets
        .iter()
        .map(util::read_outcome_set_file)
        .collect::<anyhow::Result<Vec<_>>>()?;

    if let Some(expected) = arg.expect_trials {
        for set in &sets {
            set.ensure_trial_count(expected)?;
        }
    }

    let summaries = sets.iter().map(OutcomeSet::summary).collect::<Vec<_>>();
    for (set, summary) in sets.iter().zip(&summaries) {
        tracing::info!(
            label = %set.label,
            trials = summary.trials_count,
            censored = summary.censored_count,
            mean = summary.restricted_mean,
            "computed censored mean"
        );
    }

    println!("Censored Mean Report");
    println!("====================\n");

    table::print_legend();
    println!();

    let rows = sets
        .iter()
        .zip(&summaries)
        .map(|(set, summary)| SummaryTableRow {
            label: &set.label,
            horizon: set.horizon,
            summary,
        })
        .collect::<Vec<_>>();
    table::print_summary_table(&rows);
    println!();

    println!("Observed outcomes");
    for set in &sets {
        let stats = DescriptiveStats::new(set.observations.iter().flatten().copied());
        table::print_observed_distribution(&set.label, stats.as_ref());
    }

    if let Some(dir) = &arg.km_output_dir {
        println!();
        for (set, summary) in sets.iter().zip(&summaries) {
            save_km_curve(dir, &set.label, summary)?;
        }
    }

    Ok(())
}

/// Save the KM curve of one configuration as CSV
///
/// Configurations where every trial was censored have no curve and are skipped.
fn save_km_curve(dir: &Path, label: &str, summary: &CensoredSummary) -> anyhow::Result<()> {
    let Some(km) = &summary.km_curve else {
        println!("  {label}: all trials censored, no KM curve");
        return Ok(());
    };

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let csv_path = dir.join(format!("{}_km.csv", file_stem(label)));
    let mut csv_content = String::from("time,survival_prob,at_risk,events\n");
    for i in 0..km.times.len() {
        writeln!(
            &mut csv_content,
            "{},{},{},{}",
            km.times[i], km.survival_prob[i], km.at_risk[i], km.events[i]
        )
        .with_context(|| format!("Failed to write CSV data for {label}"))?;
    }

    fs::write(&csv_path, csv_content)
        .with_context(|| format!("Failed to write CSV file: {}", csv_path.display()))?;
    println!("  KM curve saved to: {}", csv_path.display());

    Ok(())
}

/// Turns a configuration label into a file-name-safe stem.
fn file_stem(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}
