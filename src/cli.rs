//! Command line front end.
//!
//! ```text
//! bibgraph counter read br --prov se --id 3 --dir ./counters
//! bibgraph counter increment ra --dir ./counters
//! bibgraph import batch.json --config bibgraph.yaml
//! ```

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::{
    config::Settings,
    counter::{CounterAddress, CounterHandle, DurableCounterHandler},
    graph::{EntityRegistry, TripleBatch},
    import::{GraphImporter, ImportOutcome},
    logger, Result,
};

#[derive(Parser)]
#[command(name = "bibgraph")]
#[command(about = "Identifier counters and validated import of bibliographic graphs", long_about = None)]
#[command(version)]
struct Cli {
    /// YAML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or advance identifier counters
    Counter {
        #[command(subcommand)]
        command: CounterCommands,
    },
    /// Import a JSON triple batch and report what was accepted
    Import {
        /// Path of the batch file
        batch: PathBuf,
    },
}

#[derive(Subcommand)]
enum CounterCommands {
    /// Print the current value of a counter
    Read(CounterArgs),
    /// Increment a counter and print its new value
    Increment(CounterArgs),
}

#[derive(clap::Args)]
struct CounterArgs {
    /// Entity type code (an, ar, be, br, ci, de, id, pl, ra, re, rp)
    entity: String,
    /// Provenance type code (se)
    #[arg(long)]
    prov: Option<String>,
    /// Sequence number of the owning entity
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    id: i64,
    /// Counter directory; overrides the configured backend
    #[arg(long)]
    dir: Option<PathBuf>,
}

/// Runs using the current process arguments.
///
/// # Errors
///
/// When settings, counters or the batch cannot be loaded.
pub fn run() -> Result<()> {
    run_with_args(std::env::args_os())
}

/// Runs using the provided argument iterator.
///
/// # Errors
///
/// When settings, counters or the batch cannot be loaded.
pub fn run_with_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    logger::init(&settings.logger)?;

    match cli.command {
        Commands::Counter { command } => run_counter(&settings, command),
        Commands::Import { batch } => run_import(&settings, &batch),
    }
}

fn counter_handler(settings: &Settings, dir: Option<&Path>) -> Result<Arc<CounterHandle>> {
    let handler: Arc<CounterHandle> = match dir {
        Some(dir) => Arc::new(DurableCounterHandler::open(dir)?),
        None => settings.counter.build()?,
    };
    Ok(handler)
}

fn run_counter(settings: &Settings, command: CounterCommands) -> Result<()> {
    let (args, increment) = match command {
        CounterCommands::Read(args) => (args, false),
        CounterCommands::Increment(args) => (args, true),
    };
    let address = CounterAddress::parse(&args.entity, args.prov.as_deref(), args.id)?;
    let handler = counter_handler(settings, args.dir.as_deref())?;
    let value = if increment {
        address.increment(handler.as_ref())?
    } else {
        address.read(handler.as_ref())?
    };
    println!("{value}");
    Ok(())
}

fn run_import(settings: &Settings, batch: &Path) -> Result<()> {
    let content = fs::read_to_string(batch)?;
    let batch = TripleBatch::from_json(&content)?;

    let mut registry = EntityRegistry::new(settings.namespace()?, settings.counter.build()?);
    let importer = GraphImporter::new(settings.import.clone());
    let outcome = importer.import(&mut registry, batch.triples)?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &ImportOutcome) {
    println!(
        "{} {}  {} {}  {} {}",
        "accepted".green().bold(),
        outcome.accepted.len(),
        "rejected".red().bold(),
        outcome.rejected.len(),
        "skipped".yellow(),
        outcome.skipped.len(),
    );
    for (subject, diagnostic) in &outcome.rejected {
        println!("  {} <{}> ({:?})", "x".red(), subject, diagnostic.kind);
        for message in &diagnostic.messages {
            println!("      {message}");
        }
    }
    for triple in &outcome.dangling {
        println!("  {} dropped {}", "!".yellow(), triple);
    }
}
