//! qtprobe CLI - introspection of qmake-based SDK installations

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("qtprobe=debug")
    } else {
        EnvFilter::new("qtprobe=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none();

    match cli.command {
        Commands::Detect(args) => commands::detect::execute(args),
        Commands::Probe(args) => commands::probe::execute(args, cli.verbose, color),
        Commands::LinkLine(args) => commands::link_line::execute(args, color),
    }
}
