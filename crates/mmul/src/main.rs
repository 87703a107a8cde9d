use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mmul::{Error, Job, RunConfigBuilder};

/// mmul command-line interface
#[derive(Parser)]
#[command(
    name = "mmul",
    version,
    about = "Multiply two square matrices of 32-bit integers stored as raw binary files"
)]
struct Cli {
    /// The first input file
    input1: PathBuf,

    /// The second input file
    input2: PathBuf,

    /// Number of threads to use
    #[arg(short = 't', long = "threads", allow_negative_numbers = true)]
    threads: i64,

    /// Output file name (if not specified the result is discarded)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print a JSON run report on success
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let threads = usize::try_from(cli.threads).map_err(|_| {
        Error::InvalidConfiguration(format!(
            "thread count must be positive, got {}",
            cli.threads
        ))
    })?;

    let mut builder = RunConfigBuilder::default();
    builder.input_a(cli.input1).input_b(cli.input2).threads(threads);
    if let Some(output) = cli.output {
        builder.output(output);
    }
    let config = builder.build()?;

    let job = Job::prepare(&config)?;
    println!("Multiplying arrays of dimension {}", job.dimension());
    let report = job.run()?;
    if let Some(warning) = report.warning() {
        eprintln!("warning: {warning}");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
