//! douglas - run declaratively configured apps and browse their records
//!
//! Use subcommands to list apps, manage their databases, or browse records.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use douglas::cli::commands::{Cli, Commands};
use douglas::cli::{apps, browse, db};
use douglas::core::{Config, Settings};
use douglas::error::Result;

fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(cli.overrides(), Config::load()?)?;

    match cli.command {
        Commands::Apps => apps::handle_apps(&settings),
        Commands::Browse(args) => browse::handle_browse(args, &settings),
        Commands::Db(args) => db::handle_db(args, &settings),
    }
}
