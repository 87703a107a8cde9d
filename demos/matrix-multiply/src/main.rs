//! Parallel matrix multiplication demo.
//!
//! Multiplies two generated matrices in memory, once on a single thread and
//! once split into row blocks across worker threads, and checks that both
//! results agree.

use std::process::ExitCode;

use mmul::sample::{checksum, lcg_matrix};
use mmul::{execute, multiply, partition};

/// Matrix dimension (NxN matrices)
const DIM: usize = 64;

/// Number of parallel row blocks, one worker each
const NUM_BLOCKS: usize = 4;

/// Leading cells of row 0 shown per matrix
const PREVIEW: usize = 4;

fn preview(name: &str, cells: &[i32]) -> String {
    let shown = PREVIEW.min(cells.len());
    format!("{name}[0][0..{shown}]: {:?}", &cells[..shown])
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("[matrix-multiply] matrix size: {DIM}x{DIM}, blocks: {NUM_BLOCKS}");
    for (i, range) in partition(DIM, NUM_BLOCKS).enumerate() {
        log::info!("[matrix-multiply] block {i}: rows {}..{}", range.start, range.end);
    }

    let a = lcg_matrix(0x12345678, DIM, 100);
    let b = lcg_matrix(0xDEADBEEF, DIM, 100);
    println!("{}", preview("Matrix A", &a));
    println!("{}", preview("Matrix B", &b));

    let mut c_std = vec![0; DIM * DIM];
    multiply(&a, &b, DIM, &mut c_std);

    let mut c_blk = vec![0; DIM * DIM];
    if let Err(e) = execute(&a, &b, &mut c_blk, DIM, NUM_BLOCKS) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    println!("{}", preview("Result C", &c_std));
    println!("Result checksum: {}", checksum(&c_std));

    if c_std == c_blk {
        println!("Verification: PASSED (standard == blocked)");
        ExitCode::SUCCESS
    } else {
        println!("Verification: FAILED (mismatch!)");
        ExitCode::FAILURE
    }
}
