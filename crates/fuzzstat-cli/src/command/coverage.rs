//! Coverage aggregation command
//!
//! Replays the coverage bitmaps of one or more trials and emits their
//! coverage-over-time curves as a curve set JSON document.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use fuzzstat_analysis::{coverage, trials::CurveSet};

use crate::util::Output;

/// Placeholder replaced by the trial index in directory templates.
const TRIAL_PLACEHOLDER: &str = "{trial}";

#[derive(Debug, Clone, Args)]
pub(crate) struct CoverageArg {
    /// Queue directory of the fuzzer (may contain `{trial}`)
    #[arg(long)]
    pub queue_dir: String,

    /// Directory holding one coverage bitmap per queue entry (may contain `{trial}`)
    #[arg(long)]
    pub coverage_dir: String,

    /// Number of trials; `{trial}` in the directories is replaced by 0..N
    #[arg(long)]
    pub trials: Option<usize>,

    /// Configuration name stored in the output
    #[arg(long, default_value = "coverage")]
    pub label: String,

    /// Output JSON file (stdout if not specified)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CoverageArg) -> anyhow::Result<()> {
    let dirs = trial_dirs(arg);

    let mut trials = Vec::with_capacity(dirs.len());
    for (trial, (queue_dir, coverage_dir)) in dirs.iter().enumerate() {
        let curve = coverage::aggregate_coverage(queue_dir, coverage_dir).with_context(|| {
            format!(
                "Failed to aggregate coverage of trial {trial} ({})",
                queue_dir.display()
            )
        })?;
        tracing::info!(
            trial,
            entries = curve.samples.len(),
            final_coverage = curve.final_coverage(),
            "aggregated coverage"
        );
        trials.push(curve.to_curve());
    }

    let set = CurveSet {
        label: arg.label.clone(),
        trials,
    };
    Output::save_json(&set, arg.output.clone())
}

/// Expands the directory templates into `(queue_dir, coverage_dir)` per trial.
fn trial_dirs(arg: &CoverageArg) -> Vec<(PathBuf, PathBuf)> {
    match arg.trials {
        Some(n) => (0..n)
            .map(|trial| {
                (
                    expand_template(&arg.queue_dir, trial),
                    expand_template(&arg.coverage_dir, trial),
                )
            })
            .collect(),
        None => vec![(
            PathBuf::from(&arg.queue_dir),
            PathBuf::from(&arg.coverage_dir),
        )],
    }
}

fn expand_template(template: &str, trial: usize) -> PathBuf {
    PathBuf::from(template.replace(TRIAL_PLACEHOLDER, &trial.to_string()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::util;

    use super::*;

    fn arg(queue_dir: &str, coverage_dir: &str, trials: Option<usize>) -> CoverageArg {
        CoverageArg {
            queue_dir: queue_dir.to_owned(),
            coverage_dir: coverage_dir.to_owned(),
            trials,
            label: "ASAN".to_owned(),
            output: None,
        }
    }

    #[test]
    fn test_trial_dirs_expand_template() {
        let dirs = trial_dirs(&arg(
            "out/dir_asan/{trial}/default/queue",
            "out/cov_asan_{trial}",
            Some(2),
        ));
        assert_eq!(
            dirs,
            vec![
                (
                    PathBuf::from("out/dir_asan/0/default/queue"),
                    PathBuf::from("out/cov_asan_0")
                ),
                (
                    PathBuf::from("out/dir_asan/1/default/queue"),
                    PathBuf::from("out/cov_asan_1")
                ),
            ]
        );
    }

    #[test]
    fn test_trial_dirs_single() {
        let dirs = trial_dirs(&arg("q", "c", None));
        assert_eq!(dirs, vec![(PathBuf::from("q"), PathBuf::from("c"))]);
    }

    #[test]
    fn test_run_writes_curve_set() {
        let root = tempfile::tempdir().unwrap();
        for trial in 0..2 {
            let queue = root.path().join(format!("run{trial}/queue"));
            let cov = root.path().join(format!("cov{trial}"));
            fs::create_dir_all(&queue).unwrap();
            fs::create_dir_all(&cov).unwrap();
            for (name, bitmap) in [
                ("id:000000,orig:seed", &[1u8, 1, 0][..]),
                ("id:000001,src:000000,time:250,execs:9", &[0, 0, 1][..]),
            ] {
                fs::write(queue.join(name), b"x").unwrap();
                fs::write(cov.join(name), bitmap).unwrap();
            }
        }

        let template = |s: &str| root.path().join(s).to_string_lossy().into_owned();
        let output = root.path().join("curves.json");
        let mut arg = arg(&template("run{trial}/queue"), &template("cov{trial}"), Some(2));
        arg.output = Some(output.clone());
        run(&arg).unwrap();

        let set = util::read_curve_set_file(&output).unwrap();
        assert_eq!(set.label, "ASAN");
        assert_eq!(set.trials.len(), 2);
        for trial in &set.trials {
            assert_eq!(trial.points(), &[(0.0, 2.0), (0.25, 3.0)]);
        }
    }

    #[test]
    fn test_run_missing_bitmap_fails() {
        let root = tempfile::tempdir().unwrap();
        let queue = root.path().join("queue");
        fs::create_dir(&queue).unwrap();
        fs::write(queue.join("id:000000,time:0,"), b"x").unwrap();

        let arg = arg(
            &queue.to_string_lossy(),
            &root.path().join("cov").to_string_lossy(),
            None,
        );
        let err = run(&arg).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read coverage bitmap"), "{err:#}");
    }
}
