//! Coverage-over-time from per-entry coverage bitmaps
//!
//! The fuzzing harness leaves two directories per trial:
//!
//! ```text
//! <queue_dir>/id:000000,orig:seed
//! <queue_dir>/id:000001,src:000000,time:57,execs:120,op:havoc,rep:2
//! ...
//! <coverage_dir>/id:000000,orig:seed                  (raw bitmap)
//! <coverage_dir>/id:000001,src:000000,time:57,...     (raw bitmap)
//! ```
//!
//! Each bitmap holds one byte per tracked location; a nonzero byte means the
//! queue entry exercised that location. Replaying the bitmaps in timestamp
//! order and unioning the covered locations yields the cumulative coverage
//! curve of the trial.

use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    curve::Curve,
    timestamp::{self, TimestampError},
};

/// Prefix of queue entry names; other files in the queue directory are ignored.
pub const QUEUE_ENTRY_PREFIX: &str = "id:";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CoverageError {
    #[display("failed to read queue directory {}", path.display())]
    ReadQueueDir { path: PathBuf, source: io::Error },
    #[display("failed to read coverage bitmap {}", path.display())]
    ReadBitmap { path: PathBuf, source: io::Error },
    #[display("invalid snapshot timestamp")]
    Timestamp(TimestampError),
}

/// Set of bitmap positions covered so far.
///
/// The set only grows: merging a bitmap never removes a location, and
/// merging the same bitmap twice is a no-op.
#[derive(Debug, Clone, Default)]
pub struct CoveredLocations {
    hit: Vec<bool>,
    count: usize,
}

impl CoveredLocations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every position whose byte is nonzero.
    ///
    /// Returns the number of positions that were not covered before.
    pub fn merge_bitmap(&mut self, bitmap: &[u8]) -> usize {
        if bitmap.len() > self.hit.len() {
            self.hit.resize(bitmap.len(), false);
        }
        let mut newly_covered = 0;
        for (hit, _) in self.hit.iter_mut().zip(bitmap).filter(|(_, b)| **b != 0) {
            if !*hit {
                *hit = true;
                newly_covered += 1;
            }
        }
        self.count += newly_covered;
        newly_covered
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Cumulative coverage after one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageSample {
    /// Snapshot timestamp in seconds since the campaign started.
    pub time: f64,
    /// Number of distinct locations covered up to and including this snapshot.
    pub covered: usize,
}

/// Coverage curve of a single trial, one sample per queue entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageCurve {
    pub samples: Vec<CoverageSample>,
}

impl CoverageCurve {
    /// Converts to a general curve for averaging and plotting.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn to_curve(&self) -> Curve {
        Curve::from_ascending(
            self.samples
                .iter()
                .map(|s| (s.time, s.covered as f64))
                .collect(),
        )
    }

    /// Final number of covered locations, `0` for an empty trial.
    #[must_use]
    pub fn final_coverage(&self) -> usize {
        self.samples.last().map_or(0, |s| s.covered)
    }
}

/// Computes the cumulative coverage curve of one trial.
///
/// Queue entries (names starting with [`QUEUE_ENTRY_PREFIX`]) are replayed in
/// ascending timestamp order; entries without a timestamp count as time `0`.
/// Entries with equal timestamps keep their name order. For every entry the
/// same-named bitmap in `coverage_dir` is merged into the covered set and a
/// `(time, covered)` sample is appended.
///
/// # Errors
///
/// Fails if the queue directory cannot be listed, if a bitmap is missing or
/// unreadable, or if an entry's `time` field is malformed.
pub fn aggregate_coverage(
    queue_dir: &Path,
    coverage_dir: &Path,
) -> Result<CoverageCurve, CoverageError> {
    let read_dir_error = |source| CoverageError::ReadQueueDir {
        path: queue_dir.to_owned(),
        source,
    };

    let mut snapshots: Vec<(f64, OsString)> = vec![];
    for entry in fs::read_dir(queue_dir).map_err(read_dir_error)? {
        let file_name = entry.map_err(read_dir_error)?.file_name();
        let time = {
            let name = file_name.to_string_lossy();
            if !name.starts_with(QUEUE_ENTRY_PREFIX) {
                continue;
            }
            timestamp::snapshot_time(&name).map_err(CoverageError::Timestamp)?
        };
        snapshots.push((time, file_name));
    }

    // Directory listing order is unspecified; fix it before the stable sort.
    snapshots.sort_by(|a, b| a.1.cmp(&b.1));
    snapshots.sort_by(|a, b| a.0.total_cmp(&b.0));

    tracing::debug!(
        queue_dir = %queue_dir.display(),
        entries = snapshots.len(),
        "collected queue entries"
    );

    let mut covered = CoveredLocations::new();
    let mut samples = Vec::with_capacity(snapshots.len());
    for (time, file_name) in snapshots {
        let path = coverage_dir.join(&file_name);
        let bitmap = fs::read(&path).map_err(|source| CoverageError::ReadBitmap {
            path: path.clone(),
            source,
        })?;
        let newly_covered = covered.merge_bitmap(&bitmap);
        tracing::trace!(
            snapshot = %file_name.to_string_lossy(),
            time,
            newly_covered,
            covered = covered.len(),
            "merged coverage bitmap"
        );
        samples.push(CoverageSample {
            time,
            covered: covered.len(),
        });
    }

    Ok(CoverageCurve { samples })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    struct Trial {
        _root: TempDir,
        queue: PathBuf,
        coverage: PathBuf,
    }

    impl Trial {
        fn new() -> Self {
            let root = tempfile::tempdir().unwrap();
            let queue = root.path().join("queue");
            let coverage = root.path().join("coverage");
            fs::create_dir(&queue).unwrap();
            fs::create_dir(&coverage).unwrap();
            Self {
                _root: root,
                queue,
                coverage,
            }
        }

        fn add(&self, name: &str, bitmap: &[u8]) {
            fs::write(self.queue.join(name), b"input").unwrap();
            fs::write(self.coverage.join(name), bitmap).unwrap();
        }

        fn aggregate(&self) -> Result<CoverageCurve, CoverageError> {
            aggregate_coverage(&self.queue, &self.coverage)
        }
    }

    fn pairs(curve: &CoverageCurve) -> Vec<(f64, usize)> {
        curve.samples.iter().map(|s| (s.time, s.covered)).collect()
    }

    #[test]
    fn test_covered_locations_merge() {
        let mut covered = CoveredLocations::new();
        assert!(covered.is_empty());
        assert_eq!(covered.merge_bitmap(&[0, 1, 0, 7]), 2);
        assert_eq!(covered.merge_bitmap(&[1, 1, 0, 0, 0, 9]), 2);
        assert_eq!(covered.len(), 4);
        assert_eq!(covered.merge_bitmap(&[0, 0, 0, 0, 0, 3]), 0);
        assert_eq!(covered.merge_bitmap(&[0, 0, 1]), 1);
        assert_eq!(covered.len(), 5);
    }

    #[test]
    fn test_covered_locations_idempotent() {
        let mut covered = CoveredLocations::new();
        covered.merge_bitmap(&[1, 0, 1]);
        assert_eq!(covered.merge_bitmap(&[1, 0, 1]), 0);
        assert_eq!(covered.merge_bitmap(&[0, 0]), 0);
        assert_eq!(covered.len(), 2);
    }

    #[test]
    fn test_three_snapshots() {
        let trial = Trial::new();
        // Written out of order on purpose.
        trial.add("id:000002,src:000001,time:1200,execs:30", &[0, 0, 0, 0, 0, 0]);
        trial.add("id:000000,src:000000,time:0,execs:1", &[1, 1, 0, 0, 0, 0]);
        trial.add("id:000001,src:000000,time:500,execs:10", &[0, 0, 1, 0, 0, 0]);

        let curve = trial.aggregate().unwrap();
        assert_eq!(pairs(&curve), vec![(0.0, 2), (0.5, 3), (1.2, 3)]);
        assert_eq!(curve.final_coverage(), 3);
        assert_eq!(curve.to_curve().points(), &[(0.0, 2.0), (0.5, 3.0), (1.2, 3.0)]);
    }

    #[test]
    fn test_seed_without_timestamp_sorts_first() {
        let trial = Trial::new();
        trial.add("id:000001,src:000000,time:300,execs:2", &[0, 1]);
        trial.add("id:000000,orig:seed", &[1, 0, 0, 0]);
        trial.add("README.txt", &[]);
        fs::create_dir(trial.queue.join(".state")).unwrap();

        let curve = trial.aggregate().unwrap();
        assert_eq!(pairs(&curve), vec![(0.0, 1), (0.3, 2)]);
    }

    #[test]
    fn test_equal_timestamps_keep_name_order() {
        let trial = Trial::new();
        trial.add("id:000001,time:100,", &[0, 1]);
        trial.add("id:000000,time:100,", &[1, 1, 1]);

        let curve = trial.aggregate().unwrap();
        assert_eq!(pairs(&curve), vec![(0.1, 3), (0.1, 3)]);
    }

    #[test]
    fn test_coverage_is_non_decreasing() {
        let trial = Trial::new();
        let bitmaps: [&[u8]; 5] = [&[1, 0, 0, 0], &[0, 0, 0, 0], &[1, 1, 0, 0], &[0, 0, 0, 3], &[1]];
        for (i, bitmap) in bitmaps.iter().enumerate() {
            trial.add(&format!("id:{i:06},time:{},", i * 10), bitmap);
        }

        let curve = trial.aggregate().unwrap();
        assert_eq!(curve.samples.len(), bitmaps.len());
        assert!(curve.samples.is_sorted_by(|a, b| a.time <= b.time && a.covered <= b.covered));
        assert_eq!(curve.final_coverage(), 3);
    }

    #[test]
    fn test_duplicate_snapshot_content_does_not_change_final_coverage() {
        let trial = Trial::new();
        trial.add("id:000000,time:0,", &[1, 0, 1]);
        trial.add("id:000001,time:10,", &[0, 1, 0]);
        let once = trial.aggregate().unwrap().final_coverage();

        trial.add("id:000002,time:20,", &[0, 1, 0]);
        let twice = trial.aggregate().unwrap();
        assert_eq!(twice.final_coverage(), once);
        assert_eq!(twice.samples.len(), 3);
    }

    #[test]
    fn test_empty_queue() {
        let trial = Trial::new();
        let curve = trial.aggregate().unwrap();
        assert!(curve.samples.is_empty());
        assert_eq!(curve.final_coverage(), 0);
    }

    #[test]
    fn test_missing_bitmap() {
        let trial = Trial::new();
        fs::write(trial.queue.join("id:000000,time:0,"), b"input").unwrap();

        let err = trial.aggregate().unwrap_err();
        assert!(matches!(err, CoverageError::ReadBitmap { .. }), "{err}");
    }

    #[test]
    fn test_missing_queue_dir() {
        let root = tempfile::tempdir().unwrap();
        let err = aggregate_coverage(&root.path().join("nope"), root.path()).unwrap_err();
        assert!(matches!(err, CoverageError::ReadQueueDir { .. }), "{err}");
    }

    #[test]
    fn test_malformed_timestamp() {
        let trial = Trial::new();
        trial.add("id:000000,time:soon,", &[1]);

        let err = trial.aggregate().unwrap_err();
        assert!(
            matches!(err, CoverageError::Timestamp(TimestampError::Malformed { .. })),
            "{err}"
        );
    }
}
