use std::path::PathBuf;

use anyhow::{ensure, Context};
use clap::Args;

/// Generate an NxN matrix from a linear congruential sequence
#[derive(Args, Debug)]
pub struct GenArgs {
    /// Side length of the matrix
    #[arg(long)]
    pub dim: usize,

    /// Seed for the generator
    #[arg(long, default_value_t = 1)]
    pub seed: u32,

    /// Values fall in [0, modulus). 0 keeps the full signed 32-bit range.
    #[arg(long, default_value_t = 100)]
    pub modulus: u32,

    /// Output file
    #[arg(short, long)]
    pub out: PathBuf,
}

pub fn run(args: GenArgs) -> anyhow::Result<()> {
    ensure!(args.dim > 0, "--dim must be positive");

    let cells = mmul::sample::lcg_matrix(args.seed, args.dim, args.modulus);
    mmul::write_matrix(&args.out, &cells)
        .with_context(|| format!("generating {}x{} matrix", args.dim, args.dim))?;

    log::info!("seed {:#x}, modulus {}", args.seed, args.modulus);
    println!(
        "wrote {}x{} matrix to {} ({} bytes)",
        args.dim,
        args.dim,
        args.out.display(),
        cells.len() * mmul::ELEMENT_WIDTH
    );
    Ok(())
}
