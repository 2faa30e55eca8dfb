//! Cache hierarchy simulator CLI.
//!
//! Replays a memory reference trace through the simulated hierarchy and
//! prints the statistics report. It performs:
//! 1. **Configuration:** Built-in defaults, optionally overridden by a JSON file
//!    and by per-flag overrides for the shared L3.
//! 2. **Replay:** Streams the trace file (or stdin) through the simulator.
//! 3. **Report:** Prints the requested statistics sections.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rwpsim_core::config::{Config, ReplacementPolicy};
use rwpsim_core::sim::{Simulator, TraceReader};
use rwpsim_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "rwpsim",
    author,
    version,
    about = "Trace-driven cache hierarchy simulator with RWP replacement",
    long_about = "Replay a memory reference trace through private L1/L2 caches and a shared L3.\n\nTrace lines read `<core> <kind> <address> <pc> [size]`; use `-` to read stdin.\n\nExamples:\n  rwpsim traces/mcf.trace\n  rwpsim traces/mcf.trace --config hierarchy.json --sections caches,replacement\n  zcat big.trace.gz | rwpsim - --l3-policy lru"
)]
struct Cli {
    /// Trace file, or `-` for stdin.
    trace: PathBuf,

    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the L3 replacement policy (lru, random, rwp).
    #[arg(long)]
    l3_policy: Option<ReplacementPolicy>,

    /// Override the number of cores.
    #[arg(long)]
    cores: Option<usize>,

    /// Stop after this many references.
    #[arg(short = 'n', long)]
    max_references: Option<u64>,

    /// Comma-separated stats sections to print (default: all).
    #[arg(long, value_delimiter = ',')]
    sections: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config, String> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("reading {}: {e}", path.display()))?;
            Config::from_json(&text).map_err(|e| format!("parsing {}: {e}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(policy) = cli.l3_policy {
        config.hierarchy.l3.policy = policy;
    }
    if let Some(cores) = cli.cores {
        config.hierarchy.cores = cores;
    }
    if cli.max_references.is_some() {
        config.general.max_references = cli.max_references;
    }
    if !cli.sections.is_empty() {
        config.general.stats_sections.clone_from(&cli.sections);
    }
    if let Some(bad) = config
        .general
        .stats_sections
        .iter()
        .find(|s| !STATS_SECTIONS.contains(&s.as_str()))
    {
        return Err(format!(
            "unknown stats section `{bad}` (expected one of {})",
            STATS_SECTIONS.join(", ")
        ));
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = load_config(cli)?;
    let mut sim = Simulator::new(&config).map_err(|e| e.to_string())?;
    let size = config.general.default_access_size;

    let result = if cli.trace.as_os_str() == "-" {
        sim.run(TraceReader::new(io::stdin().lock(), size))
    } else {
        let file = File::open(&cli.trace)
            .map_err(|e| format!("opening {}: {e}", cli.trace.display()))?;
        sim.run(TraceReader::new(BufReader::new(file), size))
    };
    let serviced = result.map_err(|e| e.to_string())?;
    info!(serviced, trace = %cli.trace.display(), "replay complete");

    sim.finish().print_sections(&config.general.stats_sections);
    Ok(())
}
