//! Read-only square matrices mapped from raw binary files.
//!
//! A matrix file is a headerless run of native-endian `i32` cells in
//! row-major order. Its dimension is recovered from the file length alone,
//! so the length must be a multiple of [`ELEMENT_WIDTH`] and the element
//! count must be a perfect square.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::{Error, Result};
use crate::ELEMENT_WIDTH;

/// Immutable `dimension x dimension` view over a mapped matrix file.
///
/// The mapping is released when the view is dropped.
#[derive(Debug)]
pub struct MatrixView {
    map: Mmap,
    dimension: usize,
    path: PathBuf,
}

impl MatrixView {
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// All cells in row-major order, borrowed from the mapping.
    #[inline]
    pub fn cells(&self) -> &[i32] {
        // Alignment and length were checked in `load`.
        bytemuck::cast_slice(&self.map[..])
    }

    #[inline]
    pub fn row(&self, r: usize) -> &[i32] {
        &self.cells()[r * self.dimension..(r + 1) * self.dimension]
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> i32 {
        self.cells()[r * self.dimension + c]
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Exact integer square root of `elements`, if it has one.
pub fn dimension_for_len(elements: u64) -> Option<usize> {
    let mut root = (elements as f64).sqrt() as u64;
    while root.checked_mul(root).map_or(true, |sq| sq > elements) {
        root -= 1;
    }
    while (root + 1)
        .checked_mul(root + 1)
        .is_some_and(|sq| sq <= elements)
    {
        root += 1;
    }
    if root * root != elements {
        return None;
    }
    usize::try_from(root).ok()
}

fn dimension_for_size(path: &Path, size: u64) -> Result<usize> {
    if size == 0 {
        return Err(Error::Empty {
            path: path.to_path_buf(),
        });
    }
    if size % ELEMENT_WIDTH as u64 != 0 {
        return Err(Error::MalformedSize {
            path: path.to_path_buf(),
            size,
        });
    }
    let elements = size / ELEMENT_WIDTH as u64;
    dimension_for_len(elements).ok_or_else(|| Error::NotSquare {
        path: path.to_path_buf(),
        elements,
    })
}

/// Open, validate and map a matrix file.
pub fn load(path: impl AsRef<Path>) -> Result<MatrixView> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| Error::io("open", path, e))?;
    let meta = file.metadata().map_err(|e| Error::io("stat", path, e))?;
    if !meta.is_file() {
        return Err(Error::io(
            "stat",
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }

    let dimension = dimension_for_size(path, meta.len())?;
    log::debug!("{}: {} bytes, dimension {}", path.display(), meta.len(), dimension);

    // SAFETY: the file is opened read-only and the mapping is never written.
    // Concurrent truncation by another process is outside our contract.
    let map = unsafe { Mmap::map(&file) }.map_err(|e| Error::io("map", path, e))?;

    if let Err(e) = bytemuck::try_cast_slice::<u8, i32>(&map) {
        return Err(Error::io(
            "map",
            path,
            io::Error::new(io::ErrorKind::InvalidData, format!("{e:?}")),
        ));
    }

    Ok(MatrixView {
        map,
        dimension,
        path: path.to_path_buf(),
    })
}

/// Fail with `DimensionMismatch` unless both views have the same dimension.
pub fn ensure_same_dimension(a: &MatrixView, b: &MatrixView) -> Result<usize> {
    if a.dimension() != b.dimension() {
        return Err(Error::DimensionMismatch {
            left: a.dimension(),
            right: b.dimension(),
        });
    }
    Ok(a.dimension())
}

/// Write `cells` to `path` in the raw matrix format, replacing any existing file.
pub fn write_matrix(path: impl AsRef<Path>, cells: &[i32]) -> Result<()> {
    let path = path.as_ref();
    if cells.is_empty() || dimension_for_len(cells.len() as u64).is_none() {
        return Err(Error::NotSquare {
            path: path.to_path_buf(),
            elements: cells.len() as u64,
        });
    }
    std::fs::write(path, bytemuck::cast_slice::<i32, u8>(cells))
        .map_err(|e| Error::io("write", path, e))
}
