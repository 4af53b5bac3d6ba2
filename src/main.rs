use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use k4_derand::estimate::DEFAULT_PARALLEL_MIN_VERTICES;
use k4_derand::graph::choose2;
use k4_derand::solve::{solve_with, ColoringConfig};
use k4_derand::validate::monochromatic_quadruples;

/// Color the edges of K_n so that few 4-cliques are monochromatic.
#[derive(Debug, Parser)]
#[command(name = "k4-derand", version)]
#[command(about = "Derandomized two-coloring of K_n minimizing monochromatic K4")]
struct Args {
    /// Number of vertices
    #[arg(
        short = 'n',
        long = "num-vertices",
        default_value_t = 20,
        allow_negative_numbers = true
    )]
    num_vertices: i64,

    /// Enable debug output (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,

    /// Worker threads for the estimator (default: one per logical core)
    #[arg(long)]
    threads: Option<usize>,

    /// Evaluate every expectation on the main thread
    #[arg(long)]
    sequential: bool,

    /// Smallest vertex count evaluated in parallel
    #[arg(long, default_value_t = DEFAULT_PARALLEL_MIN_VERTICES)]
    parallel_min_vertices: usize,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Write the final coloring as an n x n matrix to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Args {
    fn config(&self) -> ColoringConfig {
        ColoringConfig {
            parallel: !self.sequential,
            parallel_min_vertices: self.parallel_min_vertices,
            ..ColoringConfig::default()
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn progress_bar(args: &Args) -> Result<ProgressBar> {
    if args.no_progress || args.json || args.verbose {
        return Ok(ProgressBar::hidden());
    }
    let edges = usize::try_from(args.num_vertices).map_or(0, choose2);
    let pb = ProgressBar::new(edges as u64);
    pb.set_style(
        ProgressStyle::with_template("[color] [{elapsed_precise}] {wide_bar:.green/white} {pos}/{len} edges")
            .context("invalid progress bar template")?,
    );
    Ok(pb)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure the estimator thread pool")?;
    }

    let config = args.config();
    info!(n = args.num_vertices, ?config, "starting");

    let pb = progress_bar(&args)?;
    let outcome = solve_with(args.num_vertices, &config, |_| pb.inc(1));
    pb.finish_and_clear();
    let outcome = outcome.with_context(|| format!("failed to color K_{}", args.num_vertices))?;

    for quad in monochromatic_quadruples(&outcome.graph)? {
        debug!(%quad, "monochromatic K4");
    }

    if let Some(path) = &args.output {
        outcome
            .graph
            .save_to_file(path)
            .with_context(|| format!("failed to write coloring to {}", path.display()))?;
        info!(path = %path.display(), "coloring written");
    }

    if args.json {
        let report = serde_json::to_string_pretty(&outcome.report())
            .context("failed to serialize the report")?;
        println!("{report}");
    } else {
        println!("number of monochromatic K[4] in the graph: {}", outcome.count);
        println!(
            "ceiling n(n-1)(n-2)(n-3)/64 = {} | initial expectation = {}",
            outcome.ceiling, outcome.trace.initial_expectation
        );
    }

    Ok(())
}
