//! Multiplication of square `i32` matrices stored as raw binary files.
//!
//! Inputs are mapped read-only, the result goes to a mapped output file or an
//! in-memory buffer, and rows are statically split across a fixed set of
//! worker threads.

pub mod config;
pub mod error;
pub mod executor;
pub mod kernel;
pub mod loader;
pub mod partition;
pub mod pipeline;
pub mod sample;
pub mod surface;

pub use config::{RunConfig, RunConfigBuilder};
pub use error::{Error, Result};
pub use executor::execute;
pub use kernel::{multiply, multiply_range};
pub use loader::{dimension_for_len, ensure_same_dimension, load, write_matrix, MatrixView};
pub use partition::{partition, RowRange, RowRanges};
pub use pipeline::{run, Job, RunReport};
pub use surface::{Finalized, OutputSurface};

/// Size in bytes of one matrix cell
pub const ELEMENT_WIDTH: usize = core::mem::size_of::<i32>();
