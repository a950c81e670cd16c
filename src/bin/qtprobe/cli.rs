//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// qtprobe - introspect qmake-based SDK installations
#[derive(Parser)]
#[command(name = "qtprobe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List qmake executables found in PATH
    Detect(DetectArgs),

    /// Probe installations and report their modules
    Probe(ProbeArgs),

    /// Print the flattened link line of a module
    LinkLine(LinkLineArgs),
}

#[derive(Args)]
pub struct DetectArgs {
    /// Executable base names to look for (defaults to the configured names)
    #[arg(long = "name", value_name = "NAME")]
    pub names: Vec<String>,
}

#[derive(Args)]
pub struct ProbeArgs {
    /// qmake executables to probe (defaults to the configured ones, then PATH)
    pub qmake: Vec<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Only resolve this ABI of a multi-ABI installation
    #[arg(long, value_name = "ABI")]
    pub abi: Vec<String>,

    /// Resolve the ABIs of an installation in parallel
    #[arg(long, env = "QTPROBE_PARALLEL_ABIS")]
    pub parallel_abis: bool,
}

#[derive(Args)]
pub struct LinkLineArgs {
    /// qmake executable of the installation
    pub qmake: PathBuf,

    /// Module identifier (e.g. `network`, `gui-private`)
    pub module: String,

    /// Use the debug variant
    #[arg(long)]
    pub debug: bool,

    /// ABI of a multi-ABI installation
    #[arg(long, value_name = "ABI")]
    pub abi: Option<String>,
}
