//! Load, multiply, persist.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;

use crate::config::RunConfig;
use crate::error::Result;
use crate::executor::execute;
use crate::loader::{ensure_same_dimension, load, MatrixView};
use crate::sample::checksum;
use crate::surface::{Finalized, OutputSurface};

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub dimension: usize,
    pub threads: usize,
    pub output: Option<PathBuf>,
    /// Whether the result was written to a backing file
    pub persisted: bool,
    /// Whether the final synchronous flush succeeded
    pub flushed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flush_error: Option<String>,
    pub checksum: i64,
    pub elapsed_ms: u64,
}

impl RunReport {
    /// The non-fatal diagnostic for a failed flush, if there was one.
    pub fn warning(&self) -> Option<String> {
        let error = self.flush_error.as_ref()?;
        let path = self
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        Some(format!("msync failed on output file {path}: {error}"))
    }
}

/// Split a finalize outcome into `(output, flushed, flush_error)`.
fn flush_outcome(finalized: Finalized) -> (Option<PathBuf>, bool, Option<String>) {
    match finalized {
        Finalized::Persisted { path } => (Some(path), true, None),
        Finalized::FlushFailed { path, error } => (Some(path), false, Some(error.to_string())),
        Finalized::Discarded => (None, false, None),
    }
}

/// Inputs mapped and validated, output allocated, nothing computed yet.
#[derive(Debug)]
pub struct Job {
    a: MatrixView,
    b: MatrixView,
    surface: OutputSurface,
    threads: usize,
}

impl Job {
    pub fn prepare(config: &RunConfig) -> Result<Self> {
        let a = load(&config.input_a)?;
        let b = load(&config.input_b)?;
        let dimension = ensure_same_dimension(&a, &b)?;
        let surface = OutputSurface::allocate(dimension, config.output.as_deref())?;
        Ok(Self {
            a,
            b,
            surface,
            threads: config.threads,
        })
    }

    pub fn dimension(&self) -> usize {
        self.surface.dimension()
    }

    pub fn run(mut self) -> Result<RunReport> {
        let dimension = self.dimension();
        log::info!(
            "multiplying {}x{} matrices with {} threads",
            dimension,
            dimension,
            self.threads
        );

        let started = Instant::now();
        execute(
            self.a.cells(),
            self.b.cells(),
            self.surface.cells_mut(),
            dimension,
            self.threads,
        )?;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let checksum = checksum(self.surface.cells());

        let (output, flushed, flush_error) = flush_outcome(self.surface.finalize());

        Ok(RunReport {
            dimension,
            threads: self.threads,
            persisted: output.is_some(),
            output,
            flushed,
            flush_error,
            checksum,
            elapsed_ms,
        })
    }
}

/// Run the whole pipeline for `config`.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    Job::prepare(config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(output: Option<&str>, flush_error: Option<&str>) -> RunReport {
        RunReport {
            dimension: 2,
            threads: 1,
            output: output.map(PathBuf::from),
            persisted: output.is_some(),
            flushed: output.is_some() && flush_error.is_none(),
            flush_error: flush_error.map(str::to_string),
            checksum: 0,
            elapsed_ms: 0,
        }
    }

    #[test]
    fn test_flush_failure_is_not_fatal() {
        let (output, flushed, flush_error) = flush_outcome(Finalized::FlushFailed {
            path: PathBuf::from("c.dat"),
            error: std::io::Error::other("disk gone"),
        });
        assert_eq!(output, Some(PathBuf::from("c.dat")));
        assert!(!flushed);
        assert_eq!(flush_error.as_deref(), Some("disk gone"));
    }

    #[test]
    fn test_flush_outcome_persisted_and_discarded() {
        let (output, flushed, flush_error) = flush_outcome(Finalized::Persisted {
            path: PathBuf::from("c.dat"),
        });
        assert!(output.is_some() && flushed && flush_error.is_none());

        let (output, flushed, flush_error) = flush_outcome(Finalized::Discarded);
        assert!(output.is_none() && !flushed && flush_error.is_none());
    }

    #[test]
    fn test_warning_names_output_and_cause() {
        let failed = report(Some("c.dat"), Some("disk gone"));
        assert_eq!(
            failed.warning().as_deref(),
            Some("msync failed on output file c.dat: disk gone")
        );
        assert_eq!(report(Some("c.dat"), None).warning(), None);
        assert_eq!(report(None, None).warning(), None);
    }
}
