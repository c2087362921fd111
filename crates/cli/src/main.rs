//! Cache controller simulator CLI.
//!
//! This binary provides two entry points:
//! 1. **Run:** Drive the cache through a stimulus trace and report per-cycle results and statistics.
//! 2. **Decode:** Show how an address splits into tag, set index, and block offset.

use std::process;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use lrusim_core::Simulator;
use lrusim_core::cache::{Action, CacheController};
use lrusim_core::common::{ConfigError, SimError};
use lrusim_core::config::{Config, GeneralConfig};
use lrusim_core::sim::loader::{self, parse_number};
use lrusim_core::sim::{CycleRecord, Stimulus};

#[derive(Parser, Debug)]
#[command(
    name = "lrusim",
    author,
    version,
    about = "4-way true-LRU cache controller simulator",
    long_about = "Drive a cycle-accurate 4-way set-associative cache model from a stimulus trace.\n\nExamples:\n  lrusim run traces/fill.trace --cycles\n  lrusim run traces/fill.trace --config traces/cache.json --stats summary,replacement\n  lrusim decode 0x1234_5678"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a stimulus trace through the cache.
    Run {
        /// Trace file (text or JSON lines).
        trace: String,

        /// JSON configuration file; defaults are used when omitted.
        #[arg(short, long)]
        config: Option<String>,

        /// Log every request at trace level.
        #[arg(long)]
        trace_requests: bool,

        /// Verify set invariants after every cycle.
        #[arg(long)]
        check: bool,

        /// Print one line per cycle.
        #[arg(long)]
        cycles: bool,

        /// Comma-separated stats sections to print (summary, reads, writes, replacement).
        #[arg(long, value_delimiter = ',')]
        stats: Vec<String>,

        /// Dump every occupied set after the run.
        #[arg(long)]
        dump: bool,
    },

    /// Split an address into its cache fields.
    Decode {
        /// Address, decimal or 0x-prefixed hex.
        address: String,

        /// JSON configuration file; defaults are used when omitted.
        #[arg(short, long)]
        config: Option<String>,
    },
}

/// Failures reported by the command-line front end.
#[derive(Debug, Error)]
enum CliError {
    /// Error from the cache model.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Address argument is neither decimal nor `0x` hex.
    #[error("not a number: '{0}'")]
    BadAddress(String),
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Sim(e.into())
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            trace,
            config,
            trace_requests,
            check,
            cycles,
            stats,
            dump,
        } => cmd_run(&RunArgs {
            trace,
            config,
            trace_requests,
            check,
            cycles,
            stats,
            dump,
        }),
        Commands::Decode { address, config } => cmd_decode(&address, config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("[!] error: {e}");
        process::exit(1);
    }
}

/// Default log level when `RUST_LOG` is unset.
///
/// Request tracing, whether enabled by flag or by the config file, needs
/// the per-request `trace` events.
const fn default_level(general: &GeneralConfig) -> &'static str {
    if general.trace_requests { "trace" } else { "warn" }
}

/// Installs the global subscriber. `RUST_LOG` wins over the default level.
fn init_tracing(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct RunArgs {
    trace: String,
    config: Option<String>,
    trace_requests: bool,
    check: bool,
    cycles: bool,
    stats: Vec<String>,
    dump: bool,
}

fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    Ok(match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    })
}

/// Loads the trace, runs it, and prints the requested reports.
fn cmd_run(args: &RunArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;
    config.general.trace_requests |= args.trace_requests;
    config.general.check_invariants |= args.check;
    init_tracing(default_level(&config.general));

    let trace = loader::load_trace(&args.trace).map_err(SimError::from)?;
    let mut sim = Simulator::new(&config)?;

    let geometry = sim.controller.geometry();
    println!(
        "[*] {} sets x 4 ways, {}-bit address ({} tag / {} set / {} offset), {}-bit data",
        geometry.num_sets(),
        geometry.addr_width(),
        geometry.tag_bits(),
        geometry.set_bits(),
        geometry.block_offset(),
        geometry.data_width()
    );
    println!("[*] {} cycles from {}", trace.len(), args.trace);

    let print_cycles = args.cycles;
    let outcome = sim.run_with(&trace, |record| {
        if print_cycles {
            println!("{}", format_record(record));
        }
    });

    if let Err(e) = outcome {
        eprint!("\n{}", sim.controller.dump_state());
        sim.stats.print_sections(&args.stats);
        return Err(e.into());
    }

    if args.dump {
        println!("\nFINAL STATE");
        print!("{}", sim.controller.dump_state());
    }
    let last = sim.controller.outputs();
    println!(
        "\n[*] outputs after final edge: read_data={:#x} result_valid={}",
        last.read_data, last.result_valid
    );
    sim.stats.print_sections(&args.stats);
    Ok(())
}

fn format_record(record: &CycleRecord) -> String {
    let request = match record.stimulus {
        Stimulus::Reset => "RESET".to_string(),
        Stimulus::Request(r) => match (r.write_en, r.read_en) {
            (true, true) => format!("RW {:#010x} {:#x}", r.address, r.write_data),
            (true, false) => format!("W  {:#010x} {:#x}", r.address, r.write_data),
            (false, true) => format!("R  {:#010x}", r.address),
            (false, false) => "IDLE".to_string(),
        },
    };
    let action = record.outcome.map_or_else(
        || "reset".to_string(),
        |o| match o.action {
            Action::Idle => "idle".to_string(),
            Action::ReadHit { way, .. } => format!("read hit w{way}"),
            Action::ReadMiss => "read miss".to_string(),
            Action::WriteHit { way } => format!("write hit w{way}"),
            Action::Allocate {
                way,
                evicted: Some(addr),
            } => format!("alloc w{way} (evict {addr:#x})"),
            Action::Allocate { way, evicted: None } => format!("alloc w{way}"),
        },
    );
    format!(
        "{:>6}  {:<28} hit={:<5} | visible read_data={:#x} valid={:<5} | {}",
        record.cycle,
        request,
        record.hit(),
        record.visible.read_data,
        record.visible.result_valid,
        action
    )
}

/// Prints the decoded fields of `address`.
fn cmd_decode(address: &str, config: Option<&str>) -> Result<(), CliError> {
    let config = load_config(config)?;
    init_tracing(default_level(&config.general));
    let cache = CacheController::from_config(&config.cache)?;
    let addr = parse_address(address)?;
    let decoded = cache.decoder().decode(addr);
    println!("address  {addr:#x}");
    println!("tag      {:#x}", decoded.tag);
    println!("set      {}", decoded.set_index);
    println!("offset   {}", decoded.offset);
    Ok(())
}

fn parse_address(text: &str) -> Result<u64, CliError> {
    parse_number(text).ok_or_else(|| CliError::BadAddress(text.to_string()))
}
