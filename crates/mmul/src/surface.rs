//! Writable result matrix, either file-backed or discarded.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use memmap2::MmapMut;

use crate::error::{Error, Result};
use crate::partition::RowRange;
use crate::ELEMENT_WIDTH;

#[derive(Debug)]
enum Backing {
    /// Shared read-write mapping of the output file.
    Mapped {
        map: MmapMut,
        // Kept open until finalize so the mapping and handle go away together.
        _file: File,
        path: PathBuf,
    },
    Memory(Vec<i32>),
}

/// Mutable `dimension x dimension` matrix that receives the product.
#[derive(Debug)]
pub struct OutputSurface {
    backing: Backing,
    dimension: usize,
}

/// What [`OutputSurface::finalize`] did with the result.
#[derive(Debug)]
pub enum Finalized {
    /// All writes reached the output file.
    Persisted { path: PathBuf },
    /// The synchronous flush reported an error. The computed values were
    /// correct in memory; this is a warning, not a failure.
    FlushFailed {
        path: PathBuf,
        error: std::io::Error,
    },
    /// No output path was given; the buffer was dropped.
    Discarded,
}

impl Finalized {
    pub fn is_persisted(&self) -> bool {
        !matches!(self, Finalized::Discarded)
    }
}

fn byte_len(dimension: usize) -> Option<usize> {
    dimension
        .checked_mul(dimension)
        .and_then(|cells| cells.checked_mul(ELEMENT_WIDTH))
}

impl OutputSurface {
    /// Allocate the result matrix.
    ///
    /// With `output`, the file is created or truncated, resized to
    /// `dimension² * 4` bytes and mapped read-write. Without it, an in-memory
    /// buffer is used and nothing on disk is touched.
    pub fn allocate(dimension: usize, output: Option<&Path>) -> Result<Self> {
        let bytes = byte_len(dimension).ok_or(Error::OutOfMemory { bytes: usize::MAX })?;
        let backing = match output {
            Some(path) => Self::map_file(path, bytes)?,
            None => Self::alloc_memory(dimension * dimension)?,
        };
        Ok(Self { backing, dimension })
    }

    fn map_file(path: &Path, bytes: usize) -> Result<Backing> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| Error::io("create", path, e))?;

        file.set_len(bytes as u64)
            .map_err(|e| Error::io("resize", path, e))?;

        // SAFETY: the file was just created or truncated by us and is only
        // accessed through this mapping until finalize.
        let map = unsafe { MmapMut::map_mut(&file) }.map_err(|e| Error::io("map", path, e))?;

        log::debug!("{}: mapped {} bytes for output", path.display(), bytes);
        Ok(Backing::Mapped {
            map,
            _file: file,
            path: path.to_path_buf(),
        })
    }

    fn alloc_memory(cells: usize) -> Result<Backing> {
        let mut buf: Vec<i32> = Vec::new();
        buf.try_reserve_exact(cells)
            .map_err(|_| Error::OutOfMemory {
                bytes: cells.saturating_mul(ELEMENT_WIDTH),
            })?;
        buf.resize(cells, 0);
        Ok(Backing::Memory(buf))
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Whether writes must survive in a backing file.
    #[inline]
    pub fn is_persisted(&self) -> bool {
        matches!(self.backing, Backing::Mapped { .. })
    }

    pub fn cells(&self) -> &[i32] {
        match &self.backing {
            Backing::Mapped { map, .. } => bytemuck::cast_slice(&map[..]),
            Backing::Memory(buf) => buf.as_slice(),
        }
    }

    /// The whole surface as one mutable row-major slice.
    pub fn cells_mut(&mut self) -> &mut [i32] {
        match &mut self.backing {
            Backing::Mapped { map, .. } => bytemuck::cast_slice_mut(&mut map[..]),
            Backing::Memory(buf) => buf.as_mut_slice(),
        }
    }

    /// Mutable access to rows `[range.start, range.end)`.
    ///
    /// Panics if the range lies outside the matrix.
    pub fn rows_mut(&mut self, range: RowRange) -> &mut [i32] {
        let cells = range.cells(self.dimension);
        &mut self.cells_mut()[cells]
    }

    /// Flush and release the surface.
    ///
    /// A flush error is logged and returned as [`Finalized::FlushFailed`]
    /// rather than an `Err`.
    pub fn finalize(self) -> Finalized {
        match self.backing {
            Backing::Mapped { map, _file, path } => match map.flush() {
                Ok(()) => {
                    log::debug!("{}: flushed", path.display());
                    Finalized::Persisted { path }
                }
                Err(error) => {
                    log::warn!("msync failed on output file {}: {}", path.display(), error);
                    Finalized::FlushFailed { path, error }
                }
            },
            Backing::Memory(_) => Finalized::Discarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_surface() {
        let mut surface = OutputSurface::allocate(3, None).unwrap();
        assert!(!surface.is_persisted());
        assert_eq!(surface.cells().len(), 9);
        assert!(surface.cells().iter().all(|&v| v == 0));

        surface.rows_mut(RowRange::new(1, 2)).copy_from_slice(&[4, 5, 6]);
        assert_eq!(surface.cells(), &[0, 0, 0, 4, 5, 6, 0, 0, 0]);
        assert!(matches!(surface.finalize(), Finalized::Discarded));
    }

    #[test]
    fn test_mapped_surface_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.dat");
        std::fs::write(&path, b"stale contents that must be truncated away").unwrap();

        let mut surface = OutputSurface::allocate(2, Some(&path)).unwrap();
        assert!(surface.is_persisted());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 16);
        surface.cells_mut().copy_from_slice(&[19, 22, 43, 50]);

        let done = surface.finalize();
        assert!(matches!(done, Finalized::Persisted { .. }));
        assert!(done.is_persisted());

        let view = crate::loader::load(&path).unwrap();
        assert_eq!(view.cells(), &[19, 22, 43, 50]);
    }

    #[test]
    fn test_create_failure_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.dat");
        let err = OutputSurface::allocate(2, Some(&path)).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(err.to_string().contains("out.dat"));
    }

    #[test]
    fn test_oversized_dimension() {
        assert!(matches!(
            OutputSurface::allocate(usize::MAX, None),
            Err(Error::OutOfMemory { .. })
        ));
    }
}
