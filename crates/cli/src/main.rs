//! audioplot CLI — inspect and query the level-of-detail index of an audio file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use audioplot_core::config::PlotConfig;
use audioplot_core::load_traces;
use audioplot_core::pyramid::Point;
use audioplot_core::session::{Session, SessionEvent};
use audioplot_core::traces::TraceSet;
use audioplot_core::viewport::ViewportIndexer;

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "audioplot",
    about = "Multi-resolution peak index for long audio recordings",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print channels, duration and the detail levels built for a file
    Info(InfoArgs),
    /// Select a detail level and visible index ranges for a time window
    Query(QueryArgs),
    /// Print the visible points of a time window as JSON
    Dump(DumpArgs),
}

// ─── Shared arguments ────────────────────────────────────────────

#[derive(Parser, Debug)]
struct SharedArgs {
    /// Audio file (wav, mp3, ogg, flac)
    input: PathBuf,

    /// JSON config file (default: $AUDIOPLOT_CONFIG, then built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct WindowArgs {
    /// Window start in seconds
    #[arg(long, allow_hyphen_values = true)]
    start: f64,

    /// Window end in seconds
    #[arg(long, allow_hyphen_values = true)]
    end: f64,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    #[command(flatten)]
    shared: SharedArgs,
}

#[derive(Parser, Debug)]
struct QueryArgs {
    #[command(flatten)]
    shared: SharedArgs,

    #[command(flatten)]
    window: WindowArgs,

    /// Level the selection starts from (hysteresis depends on it)
    #[arg(long, default_value_t = 0)]
    level: usize,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    #[command(flatten)]
    shared: SharedArgs,

    #[command(flatten)]
    window: WindowArgs,

    /// Only dump this trace (0-based); default dumps all
    #[arg(long)]
    trace: Option<usize>,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Command::Info(a) => a.shared.verbose,
        Command::Query(a) => a.shared.verbose,
        Command::Dump(a) => a.shared.verbose,
    };
    let log_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Info(args) => run_info(args),
        Command::Query(args) => run_query(args),
        Command::Dump(args) => run_dump(args),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Resolve config and load the input file into traces.
fn prepare(shared: &SharedArgs) -> Result<(PlotConfig, TraceSet)> {
    validate_input(&shared.input)?;
    let config = PlotConfig::discover(shared.config.as_deref())?;
    let traces = load_traces(&shared.input, &config)?;
    Ok((config, traces))
}

fn validate_input(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    Ok(())
}

fn validate_window(window: &WindowArgs) -> Result<()> {
    if !(window.start.is_finite() && window.end.is_finite()) || window.start >= window.end {
        bail!(
            "Invalid window: --start {} must be less than --end {}",
            window.start,
            window.end
        );
    }
    Ok(())
}

// ─── Runners ─────────────────────────────────────────────────────

fn run_info(args: InfoArgs) -> Result<()> {
    let (_, traces) = prepare(&args.shared)?;

    println!("File: {}", args.shared.input.display());
    println!(
        "Channels: {}  Sample rate: {} Hz  Samples: {}  Duration: {:.3}s",
        traces.num_traces(),
        traces.sample_rate(),
        traces.num_samples(),
        traces.max_time()
    );
    let reference = traces.reference().context("No traces loaded")?;
    println!("{:>5}  {:>8}  {:>12}  {:>12}", "Level", "Window", "Points", "Window (s)");
    for (k, level) in reference.levels().iter().enumerate() {
        println!(
            "{:>5}  {:>8}  {:>12}  {:>12.6}",
            k,
            level.window_size,
            level.len(),
            level.window_time
        );
    }
    Ok(())
}

fn run_query(args: QueryArgs) -> Result<()> {
    validate_window(&args.window)?;
    let (config, traces) = prepare(&args.shared)?;
    let reference = traces.reference().context("No traces loaded")?;

    let mut indexer = ViewportIndexer::new(config.min_detail_level_points).starting_at(args.level);
    indexer.update(reference, args.window.start, args.window.end);

    let level = indexer.level();
    println!(
        "Window [{}, {}]: level {} (window {} samples), ~{} points visible",
        args.window.start,
        args.window.end,
        level,
        reference.window_size(level).unwrap_or(1),
        indexer.visible_points()
    );
    for trace in traces.traces() {
        let range = indexer.range_for(&trace.pyramid);
        println!(
            "  {}: [{}, {}) of {}",
            trace.name,
            range.start,
            range.end,
            trace.pyramid.num_points(level)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct DumpedTrace<'a> {
    index: usize,
    name: &'a str,
    start: usize,
    end: usize,
    points: &'a [Point],
}

#[derive(Serialize)]
struct Dump<'a> {
    level: usize,
    window_size: usize,
    traces: Vec<DumpedTrace<'a>>,
}

fn run_dump(args: DumpArgs) -> Result<()> {
    validate_window(&args.window)?;
    let (config, traces) = prepare(&args.shared)?;
    if let Some(t) = args.trace {
        if t >= traces.num_traces() {
            bail!("Trace {} out of range ({} traces)", t, traces.num_traces());
        }
    }

    let mut session = Session::new(traces, config);
    session.send(SessionEvent::SetXRange {
        min: args.window.start,
        max: args.window.end,
    });
    session.process_events();

    let frame = session.frame();
    let dump = Dump {
        level: frame.level,
        window_size: session
            .traces()
            .reference()
            .and_then(|p| p.window_size(frame.level))
            .unwrap_or(1),
        traces: frame
            .traces
            .iter()
            .filter(|s| args.trace.map(|t| t == s.index).unwrap_or(true))
            .map(|s| DumpedTrace {
                index: s.index,
                name: s.name,
                start: s.range.start,
                end: s.range.end,
                points: s.points,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}
