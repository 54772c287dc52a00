//! Flotilla CLI - work on a constellation of dependent git repositories

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Session;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("flotilla=debug")
    } else if cli.quiet {
        EnvFilter::new("flotilla=error")
    } else {
        EnvFilter::new("flotilla=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let session = Session::from_cli(&cli);

    // Execute command
    match cli.command {
        Commands::Init => commands::init::execute(&session),
        Commands::MakeProjects => commands::make_projects::execute(&session),
        Commands::Status => commands::status::execute(&session),
        Commands::Pull => commands::pull::execute(&session),
        Commands::Push => commands::push::execute(&session),
        Commands::Tag(args) => commands::tag::execute(args, &session),
        Commands::Checkout(args) => commands::checkout::execute(args, &session),
        Commands::Commit(args) => commands::commit::execute(args, &session),
        Commands::Tree(args) => commands::tree::execute(args, &session),
        Commands::Discover(args) => commands::discover::execute(args, &session),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
