use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use fuzzstat_analysis::trials::{CurveSet, OutcomeSet};

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        ensure_parent_dir(&path)?;
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read per-trial coverage curves of one configuration from a JSON file
///
/// # Errors
///
/// Returns error if file cannot be opened or parsed, or if a trial curve is
/// not ascending
pub fn read_curve_set_file<P>(path: P) -> anyhow::Result<CurveSet>
where
    P: AsRef<Path>,
{
    read_json_file("curve set", path)
}

/// Read per-trial outcomes of one configuration from a JSON file
///
/// # Errors
///
/// Returns error if file cannot be opened or parsed
pub fn read_outcome_set_file<P>(path: P) -> anyhow::Result<OutcomeSet>
where
    P: AsRef<Path>,
{
    read_json_file("outcome set", path)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_save_and_read_curve_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/asan.json");
        let set: CurveSet =
            serde_json::from_str(r#"{"label": "ASAN", "trials": [[[0.0, 3], [0.5, 4]]]}"#).unwrap();

        Output::save_json(&set, Some(path.clone())).unwrap();
        let loaded = read_curve_set_file(&path).unwrap();
        assert_eq!(loaded.label, "ASAN");
        assert_eq!(loaded.trials, set.trials);
    }

    #[test]
    fn test_read_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = read_outcome_set_file(&missing).unwrap_err();
        assert!(format!("{err}").contains("missing.json"), "{err}");

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"label": "x", "trials": [[[1.0, 2], [0.0, 3]]]}"#).unwrap();
        let err = read_curve_set_file(&bad).unwrap_err();
        assert!(format!("{err:#}").contains("not ascending"), "{err:#}");
    }
}
