//! # nominal CLI
//!
//! Demonstration driver for the nominal association model.

mod scenario;

use clap::{Parser, Subcommand};
use nominal::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nominal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Give one identity a name and print it through a behavior
    Greet {
        /// Name associated with the identity
        #[arg(long, default_value = "Tester")]
        name: String,
    },

    /// Run a YAML scenario file
    Run {
        /// Path to the scenario file
        scenario: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::WARN.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None => greet("Tester"),
        Some(Commands::Greet { name }) => greet(&name),
        Some(Commands::Run { scenario }) => run_scenario(&scenario),
    }
}

fn greet(name: &str) -> anyhow::Result<()> {
    let mut names = KeyedDatum::new();
    let mut print = Behavior::named("print", |ctx: Dispatch, names: &KeyedDatum<String>| {
        if let Some(name) = ctx.resolve(names) {
            println!("{name}");
        }
    });

    let t1 = Identity::create();
    names.try_associate(t1, name.to_string())?;
    print.subscribe(t1);
    print.invoke_all(&names);

    tracing::debug!(metrics = %print.metrics().snapshot(), "greeting done");
    Ok(())
}

fn run_scenario(path: &std::path::Path) -> anyhow::Result<()> {
    let config = scenario::ScenarioConfig::from_file(path)?;
    tracing::info!(source = ?config.source(), "loaded scenario");
    for line in scenario::run(&config)? {
        println!("{line}");
    }
    Ok(())
}
