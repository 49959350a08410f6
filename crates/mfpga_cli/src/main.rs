//! mfpga CLI: the command-line interface for the multi-FPGA mapper.
//!
//! Provides `mfpga map` to place a design onto a platform, `mfpga cost` to
//! inspect the interconnect cost of an FPGA for a given port count, and
//! `mfpga check` to validate descriptors and show what each group needs.

#![warn(missing_docs)]

mod check;
mod cost;
mod map;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

/// mfpga maps component designs onto multi-FPGA platforms.
#[derive(Parser, Debug)]
#[command(name = "mfpga", version, about = "Multi-FPGA component mapper")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Place a design onto a platform.
    Map(MapArgs),
    /// Print the interconnect cost of an FPGA for a port count.
    Cost(CostArgs),
    /// Validate descriptors and print group requirements.
    Check(CheckArgs),
}

/// Arguments for the `mfpga map` subcommand.
#[derive(Parser, Debug)]
pub struct MapArgs {
    /// Path to `platform.toml`.
    #[arg(long)]
    pub platform: PathBuf,

    /// Path to `design.toml`.
    #[arg(long)]
    pub design: PathBuf,

    /// Output format for the placement report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `mfpga cost` subcommand.
#[derive(Parser, Debug)]
pub struct CostArgs {
    /// Path to `platform.toml`.
    #[arg(long)]
    pub platform: PathBuf,

    /// Name of the FPGA whose interconnect is priced.
    #[arg(long)]
    pub fpga: String,

    /// Number of attachment ports to seat.
    #[arg(long)]
    pub ports: u32,
}

/// Arguments for the `mfpga check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to `platform.toml`.
    #[arg(long)]
    pub platform: PathBuf,

    /// Path to `design.toml`.
    #[arg(long)]
    pub design: PathBuf,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
}

/// Installs the logger. `RUST_LOG` applies unless a verbosity flag is given.
fn init_logger(global: &GlobalArgs) {
    let mut builder = pretty_env_logger::formatted_builder();
    if global.quiet {
        builder.filter_level(LevelFilter::Error);
    } else if global.verbose {
        builder.filter_level(LevelFilter::Debug);
    } else if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    } else {
        builder.filter_level(LevelFilter::Warn);
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
    };
    init_logger(&global);

    let result = match cli.command {
        Command::Map(ref args) => map::run(args, &global),
        Command::Cost(ref args) => cost::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
