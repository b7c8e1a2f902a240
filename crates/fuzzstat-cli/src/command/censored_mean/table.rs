//! Censored mean table display
//!
//! This module provides functions for displaying per-configuration outcome
//! summaries in a consistent tabular format.

use fuzzstat_analysis::survival::CensoredSummary;
use fuzzstat_stats::descriptive::DescriptiveStats;

/// A row in the censored mean table
pub(super) struct SummaryTableRow<'a> {
    /// Configuration label
    pub label: &'a str,
    /// Trial horizon, `None` when unbounded
    pub horizon: Option<f64>,
    /// Outcome summary for this configuration
    pub summary: &'a CensoredSummary,
}

// label(20) + trials(8) + censored%(10) + horizon(10) + mean_obs(12) + median_km(12) + rmst(12) + spaces(6)
const TABLE_WIDTH: usize = 90;

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_infinite() => "inf".to_string(),
        Some(v) => format!("{v:.3}"),
        None => "N/A".to_string(),
    }
}

fn print_summary_table_header() {
    println!(
        "  {:<20} {:>8} {:>10} {:>10} {:>12} {:>12} {:>12}",
        "Configuration", "Trials", "Censored%", "Horizon", "Mean(Obs)", "Median(KM)", "RMST",
    );
    println!("  {}", "-".repeat(TABLE_WIDTH));
}

fn print_summary_table_row(row: &SummaryTableRow) {
    let summary = row.summary;
    println!(
        "  {:<20} {:>8} {:>9.1}% {:>10} {:>12} {:>12} {:>12}",
        row.label,
        summary.trials_count,
        100.0 * summary.censored_ratio(),
        format_value(Some(row.horizon.unwrap_or(f64::INFINITY))),
        format_value(summary.mean_observed),
        format_value(summary.median_km),
        format_value(Some(summary.restricted_mean)),
    );
}

/// Print the summary table
pub(super) fn print_summary_table(rows: &[SummaryTableRow]) {
    print_summary_table_header();
    for row in rows {
        print_summary_table_row(row);
    }
}

/// Print descriptive statistics of the observed (uncensored) outcomes
pub(super) fn print_observed_distribution(label: &str, stats: Option<&DescriptiveStats>) {
    match stats {
        Some(s) => println!(
            "  {:<20} n={:<4} min={:.3} median={:.3} max={:.3} std_dev={:.3}",
            label, s.count, s.min, s.median, s.max, s.std_dev
        ),
        None => println!("  {label:<20} no observed outcomes"),
    }
}

/// Print legend explaining table columns
pub(super) fn print_legend() {
    println!("Legend:");
    println!("  Censored%   : Trials where the event was not observed before the horizon");
    println!("  Mean(Obs)   : Mean of observed outcomes only (censored trials excluded, biased)");
    println!("  Median(KM)  : Kaplan-Meier median (N/A when survival never drops to 50%)");
    println!("  RMST        : Restricted mean survival time up to the horizon (inf when nothing observed)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(3.25)), "3.250");
        assert_eq!(format_value(Some(f64::INFINITY)), "inf");
        assert_eq!(format_value(None), "N/A");
    }
}
