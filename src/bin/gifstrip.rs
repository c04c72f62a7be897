use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "gifstrip", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge animated GIFs side by side into one resynchronized GIF.
    Merge(MergeArgs),
    /// Print a JSON report describing each input animation.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Input GIF paths, pasted left to right (at least two).
    #[arg(num_args = 2.., required = true)]
    inputs: Vec<PathBuf>,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// How the uniform row height is chosen before concatenation.
    #[arg(long, value_enum, default_value_t = HeightChoice::FirstFrame)]
    height_policy: HeightChoice,

    /// Extract and resize sources on a worker pool.
    #[arg(long)]
    parallel: bool,

    /// Explicit worker thread count (implies --parallel).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Input GIF paths.
    #[arg(num_args = 1.., required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HeightChoice {
    /// Minimum first-frame height across sources (never upscales).
    FirstFrame,
    /// Minimum height across every frame of every source.
    GlobalMin,
    /// Maximum height across every frame of every source.
    GlobalMax,
}

impl From<HeightChoice> for gifstrip::HeightPolicy {
    fn from(choice: HeightChoice) -> Self {
        match choice {
            HeightChoice::FirstFrame => gifstrip::HeightPolicy::FirstFrame,
            HeightChoice::GlobalMin => gifstrip::HeightPolicy::GlobalMin,
            HeightChoice::GlobalMax => gifstrip::HeightPolicy::GlobalMax,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Merge(args) => cmd_merge(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn cmd_merge(args: MergeArgs) -> anyhow::Result<()> {
    let opts = gifstrip::MergeOptions {
        height_policy: args.height_policy.into(),
        parallel: args.parallel || args.threads.is_some(),
        threads: args.threads,
    };

    let stats = gifstrip::merge_files(&args.inputs, &args.out, &opts)
        .with_context(|| format!("merge into '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} frames from {} sources, {} ms)",
        args.out.display(),
        stats.frames_written,
        stats.sources,
        stats.total_duration_ms
    );
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let mut reports = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let report = gifstrip::probe_path(path)
            .with_context(|| format!("probe '{}'", path.display()))?;
        reports.push(report);
    }

    let json = serde_json::to_string_pretty(&reports).context("serialize probe report")?;
    println!("{json}");
    Ok(())
}
