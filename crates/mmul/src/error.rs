//! Error types for the multiplication pipeline.
//!
//! Every variant is terminal for the operation. Messages name the path and
//! the operation that failed so the binary can print them as-is.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing input paths, or a thread count that is not positive
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("could not open file {}: not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("could not {op} file {}: permission denied", .path.display())]
    PermissionDenied { path: PathBuf, op: &'static str },

    #[error("could not {op} file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        op: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("file {} is empty", .path.display())]
    Empty { path: PathBuf },

    /// File length is not a multiple of the element width
    #[error("file {} is {size} bytes, not a multiple of {} bytes", .path.display(), crate::ELEMENT_WIDTH)]
    MalformedSize { path: PathBuf, size: u64 },

    /// Element count has no exact integer square root
    #[error("file {} holds {elements} elements, which is not a perfect square", .path.display())]
    NotSquare { path: PathBuf, elements: u64 },

    #[error("the matrices are not the same size ({left}x{left} vs {right}x{right})")]
    DimensionMismatch { left: usize, right: usize },

    /// A buffer handed to the executor does not hold `dimension²` cells
    #[error("buffer holds {actual} cells, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("could not allocate {bytes} bytes")]
    OutOfMemory { bytes: usize },

    #[error("could not create worker thread {started} of {requested}: {source}")]
    ThreadCreation {
        started: usize,
        requested: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker thread {worker} panicked")]
    WorkerPanicked { worker: usize },
}

impl Error {
    /// Classify an I/O failure on `path` during `op` ("open", "stat", "map", ...).
    pub fn io(op: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, op },
            _ => Self::Io { path, op, source },
        }
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(e: derive_builder::UninitializedFieldError) -> Self {
        Self::InvalidConfiguration(format!("`{}` is required", e.field_name()))
    }
}
