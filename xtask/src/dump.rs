use std::fmt::Write;
use std::path::PathBuf;

use clap::Args;
use mmul::MatrixView;

/// Print a summary of a matrix file
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Matrix file to inspect
    pub path: PathBuf,

    /// Number of leading rows to print
    #[arg(long, default_value_t = 4)]
    pub rows: usize,

    /// Number of leading columns to print per row
    #[arg(long, default_value_t = 8)]
    pub cols: usize,
}

fn render(view: &MatrixView, rows: usize, cols: usize) -> String {
    let dimension = view.dimension();
    let mut s = String::new();
    let _ = writeln!(s, "dimension: {dimension}");
    let _ = writeln!(s, "checksum: {}", mmul::sample::checksum(view.cells()));

    for r in 0..rows.min(dimension) {
        let row = view.row(r);
        let shown: Vec<String> = row[..cols.min(dimension)]
            .iter()
            .map(i32::to_string)
            .collect();
        let more = if cols < dimension { " ..." } else { "" };
        let _ = writeln!(s, "[{r}] {}{more}", shown.join(" "));
    }
    if rows < dimension {
        let _ = writeln!(s, "... {} more rows", dimension - rows);
    }
    s
}

pub fn run(args: DumpArgs) -> anyhow::Result<()> {
    let view = mmul::load(&args.path)?;
    print!("{}", render(&view, args.rows, args.cols));
    Ok(())
}
