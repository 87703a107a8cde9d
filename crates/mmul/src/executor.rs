//! Fixed pool of worker threads, one per row range.
//!
//! The output buffer is carved with `split_at_mut` into one owned block per
//! range before any worker starts, so each worker can only write its own
//! rows. There is no queue and no rebalancing; every worker runs its range
//! to completion and all of them are joined before `execute` returns.

use std::thread::{self, ScopedJoinHandle};

use crate::error::{Error, Result};
use crate::kernel::multiply_range;
use crate::partition::partition;

/// Compute `out = a * b` with `thread_count` workers.
///
/// All three buffers must hold `dimension²` cells in row-major order.
pub fn execute(
    a: &[i32],
    b: &[i32],
    out: &mut [i32],
    dimension: usize,
    thread_count: usize,
) -> Result<()> {
    execute_with(a, b, out, dimension, thread_count, |worker| {
        thread::Builder::new().name(format!("mmul-worker-{worker}"))
    })
}

fn check_shape(dimension: usize, lens: [usize; 3]) -> Result<()> {
    let expected = dimension.checked_mul(dimension).ok_or(Error::ShapeMismatch {
        expected: usize::MAX,
        actual: lens[0],
    })?;
    match lens.into_iter().find(|&len| len != expected) {
        Some(actual) => Err(Error::ShapeMismatch { expected, actual }),
        None => Ok(()),
    }
}

fn execute_with<F>(
    a: &[i32],
    b: &[i32],
    out: &mut [i32],
    dimension: usize,
    thread_count: usize,
    builder: F,
) -> Result<()>
where
    F: Fn(usize) -> thread::Builder,
{
    if thread_count == 0 {
        return Err(Error::InvalidConfiguration(
            "thread count must be positive".into(),
        ));
    }
    check_shape(dimension, [a.len(), b.len(), out.len()])?;

    thread::scope(|scope| {
        let mut handles: Vec<ScopedJoinHandle<'_, ()>> = Vec::new();
        handles
            .try_reserve_exact(thread_count)
            .map_err(|_| Error::OutOfMemory {
                bytes: thread_count
                    .saturating_mul(std::mem::size_of::<ScopedJoinHandle<'static, ()>>()),
            })?;

        let mut rest = out;
        for (worker, range) in partition(dimension, thread_count).enumerate() {
            let (block, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * dimension);
            rest = tail;

            let spawned = builder(worker).spawn_scoped(scope, move || {
                log::debug!("worker {worker}: rows {}..{}", range.start, range.end);
                multiply_range(a, b, dimension, range, block);
            });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    let started = handles.len();
                    log::debug!("spawn failed after {started} workers, joining them");
                    // Panics are moot here; the spawn failure is what gets reported.
                    let _ = join_workers(handles);
                    return Err(Error::ThreadCreation {
                        started,
                        requested: thread_count,
                        source,
                    });
                }
            }
        }

        join_workers(handles)
    })
}

/// Join every handle, reporting the first worker that panicked.
fn join_workers(handles: Vec<ScopedJoinHandle<'_, ()>>) -> Result<()> {
    let mut panicked = None;
    for (worker, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() && panicked.is_none() {
            panicked = Some(worker);
        }
    }
    match panicked {
        Some(worker) => Err(Error::WorkerPanicked { worker }),
        None => Ok(()),
    }
}
