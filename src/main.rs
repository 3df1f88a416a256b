use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use avgbench::config::HarnessConfig;
use avgbench::display;
use avgbench::exec::ShellExecutor;
use avgbench::pipeline::run_pipeline;
use avgbench::report::build_report;
use avgbench::types::OutputFormat;

#[derive(Parser)]
#[command(
    name = "avgbench",
    version,
    about = "Build, run and compare averaging benchmarks across implementations"
)]
struct Cli {
    /// TOML file describing variants and metric labels (built-in roster if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Runs per variant (overrides the config)
    #[arg(short = 'n', long)]
    runs: Option<usize>,

    /// Directory to build and run in (overrides the config)
    #[arg(short, long)]
    workdir: Option<PathBuf>,

    /// Assume every variant is already built
    #[arg(long)]
    skip_build: bool,

    /// Also report each run's elapsed wall-clock time as its own category
    #[arg(long)]
    wall_clock: bool,

    #[arg(long, default_value = "table")]
    format: OutputFormat,

    #[arg(long)]
    json: bool,

    /// Debug-level logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "avgbench=debug" } else { "avgbench=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(runs) = cli.runs {
        config.runs = runs;
    }
    if let Some(dir) = cli.workdir {
        config.workdir = Some(dir);
    }
    if cli.wall_clock {
        config.wall_clock = true;
    }
    config.validate()?;

    if let Some(dir) = &config.workdir
        && !dir.is_dir()
    {
        anyhow::bail!("Working directory {} does not exist", dir.display());
    }

    let mut executor = ShellExecutor::new(config.workdir.clone());
    let results = run_pipeline(&mut executor, &config, cli.skip_build)
        .context("Benchmark aborted, no measurements were taken")?;

    let report = build_report(&results, &config.categories(), config.runs, Utc::now());
    let output = if cli.json {
        display::format_json(&report)
    } else {
        match cli.format {
            OutputFormat::Table => display::format_table(&report),
            OutputFormat::Compact => display::format_compact(&report),
        }
    };

    print!("{}", output);
    if cli.json {
        println!();
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        process::exit(1);
    }
}
