use clap::{Parser, Subcommand};

use self::{
    censored_mean::CensoredMeanArg, compare_coverage::CompareCoverageArg, coverage::CoverageArg,
};

mod censored_mean;
mod compare_coverage;
mod coverage;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compute coverage-over-time curves from queue entries and coverage bitmaps
    Coverage(#[clap(flatten)] CoverageArg),
    /// Estimate mean outcomes with timeouts treated as censored
    CensoredMean(#[clap(flatten)] CensoredMeanArg),
    /// Average trial coverage curves of two configurations and plot them
    CompareCoverage(#[clap(flatten)] CompareCoverageArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    log_invocation();
    match args.mode {
        Mode::Coverage(arg) => coverage::run(&arg)?,
        Mode::CensoredMean(arg) => censored_mean::run(&arg)?,
        Mode::CompareCoverage(arg) => compare_coverage::run(&arg)?,
    }
    Ok(())
}

fn log_invocation() {
    let cwd = std::env::current_dir();
    let exe = std::env::current_exe();
    tracing::debug!(cwd = ?cwd, exe = ?exe, "starting");
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_cli_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_compare_coverage() {
        let args = CommandArgs::try_parse_from([
            "fuzzstat",
            "compare-coverage",
            "asan.json",
            "normal.json",
            "--interpolation",
            "step",
            "--expect-trials",
            "10",
        ])
        .unwrap();
        let Mode::CompareCoverage(arg) = args.mode else {
            panic!("expected compare-coverage mode");
        };
        assert_eq!(
            arg.interpolation,
            fuzzstat_stats::interpolate::Interpolation::Step
        );
        assert_eq!(arg.expect_trials, Some(10));
    }
}
