//! Textual dump tool for binary Shard IR modules
//!
//! With no argument the tool prints a built-in example module, which is
//! handy for format sanity checks. With a path it loads the binary module
//! and prints its textual form on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

mod dump;
mod example;

/// Dump Shard IR modules in textual form
#[derive(Parser)]
#[command(name = "irdump")]
#[command(about = "Dump Shard IR modules in textual form")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Binary IR file to dump; prints a built-in example module when omitted
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let module = match &cli.path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("unable to open '{}'", path.display()))?;
            shard_ir::codec::deserialize(&mut BufReader::new(file))
                .with_context(|| format!("unable to load '{}'", path.display()))?
        }
        None => example::example_module(),
    };

    let stdout = std::io::stdout();
    dump::dump_module(&mut stdout.lock(), &module)?;

    Ok(())
}
