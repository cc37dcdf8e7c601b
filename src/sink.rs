//! Destinations for benchmark measurements.
//!
//! The harness receives a [`ResultSink`] instead of writing files itself:
//! [`CsvSink`] appends to the on-disk artifacts, [`MemorySink`] keeps rows for
//! inspection, and [`NullSink`] drops them.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    error::{artifact_error, Result},
    measurement::{Artifact, Measurement},
};

pub trait ResultSink {
    fn record(&mut self, measurement: &Measurement) -> Result<()>;
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn record(&mut self, measurement: &Measurement) -> Result<()> {
        (**self).record(measurement)
    }
}

/// Appends rows to `results_ilp.csv` / `results_omp.csv` inside a directory.
///
/// Files are opened per row and closed again, so rows from concurrent or
/// interrupted runs are never lost to buffering. A header is written when a
/// file is new or empty.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, artifact: Artifact) -> PathBuf {
        self.dir.join(artifact.file_name())
    }

    fn append(path: &Path, header: &str, row: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        if file.metadata()?.len() == 0 {
            writeln!(file, "{header}")?;
        }
        writeln!(file, "{row}")
    }
}

impl ResultSink for CsvSink {
    fn record(&mut self, measurement: &Measurement) -> Result<()> {
        let artifact = measurement.artifact();
        let path = self.path(artifact);

        Self::append(&path, artifact.header(), &measurement.csv_row())
            .map_err(|e| artifact_error(&path, e.to_string()))?;

        log::debug!("appended {} row to {}", measurement.variant(), path.display());

        Ok(())
    }
}

/// Keeps every measurement in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub measurements: Vec<Measurement>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows as they would appear in `artifact`, without header.
    pub fn rows(&self, artifact: Artifact) -> Vec<String> {
        self.measurements
            .iter()
            .filter(|m| m.artifact() == artifact)
            .map(Measurement::csv_row)
            .collect()
    }
}

impl ResultSink for MemorySink {
    fn record(&mut self, measurement: &Measurement) -> Result<()> {
        self.measurements.push(measurement.clone());
        Ok(())
    }
}

/// Discards every measurement.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn record(&mut self, _measurement: &Measurement) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{kernels::Variant, measurement::SequentialMeasurement};

    fn sample(n: usize) -> Measurement {
        Measurement::Sequential(SequentialMeasurement {
            variant: Variant::Vectorized,
            n,
            symmetric: false,
            check_time: Duration::from_micros(1),
            transpose_time: Duration::from_micros(1),
            flops: 1.0,
            bandwidth: 2.0,
        })
    }

    #[test]
    fn test_csv_sink_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::new(dir.path());

        sink.record(&sample(4)).unwrap();
        sink.record(&sample(8)).unwrap();

        let contents = fs::read_to_string(sink.path(Artifact::Sequential)).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], Artifact::Sequential.header());
        assert!(lines[1].starts_with("V,4,"));
        assert!(lines[2].starts_with("V,8,"));
        assert!(!sink.path(Artifact::Parallel).exists());
    }

    #[test]
    fn test_csv_sink_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::new(dir.path().join("results"));
        sink.record(&sample(4)).unwrap();
        assert!(sink.path(Artifact::Sequential).exists());
    }

    #[test]
    fn test_csv_sink_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "file").unwrap();

        let mut sink = CsvSink::new(&blocker);
        let err = sink.record(&sample(4)).unwrap_err();
        assert!(matches!(
            err,
            crate::error::SymtransError::ArtifactWriteError { .. }
        ));
    }

    #[test]
    fn test_memory_sink_filters_by_artifact() {
        let mut sink = MemorySink::new();
        sink.record(&sample(16)).unwrap();
        assert_eq!(sink.rows(Artifact::Sequential).len(), 1);
        assert!(sink.rows(Artifact::Parallel).is_empty());
    }
}
