//! watchdog-analyzer CLI
//!
//! Browse the allocation histories recorded by the memory watchdog and
//! find addresses that were never freed.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use watchdog_analyzer::aggregator::View;
use watchdog_analyzer::commands::{
    display_version, execute_analyze, validate_args, validate_dump_file, AnalyzeArgs,
};
use watchdog_analyzer::utils::config::{DEFAULT_SUMMARY_ROWS, DEFAULT_VIEW_DEPTH};

/// watchdog-analyzer - Memory watchdog dump browser
#[derive(Parser, Debug)]
#[command(name = "watchdog-analyzer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a watchdog dump
    Analyze {
        /// Dump file (.watchdog-<version>-<timestamp>.jsonl)
        #[arg(conflicts_with = "scan", required_unless_present = "scan")]
        path: Option<PathBuf>,

        /// Use the newest dump found in this directory
        #[arg(short, long)]
        scan: Option<PathBuf>,

        /// Rebuild the trace even if a cache exists
        #[arg(long)]
        no_cache: bool,

        /// Do not write the trace cache
        #[arg(long)]
        no_save: bool,

        /// Which addresses to show
        #[arg(long, value_enum, default_value_t = View::All)]
        view: View,

        /// Levels of the tree to expand
        #[arg(short, long, default_value_t = DEFAULT_VIEW_DEPTH)]
        depth: usize,

        /// Print the outstanding allocation table
        #[arg(long)]
        summary: bool,

        /// Rows in the outstanding allocation table
        #[arg(long, default_value_t = DEFAULT_SUMMARY_ROWS)]
        top: usize,

        /// Write the selected view as JSON
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Validate a watchdog dump
    Validate {
        /// Path to the dump file
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            path,
            scan,
            no_cache,
            no_save,
            view,
            depth,
            summary,
            top,
            export,
        } => {
            let args = AnalyzeArgs {
                path,
                scan,
                no_cache,
                no_save,
                view,
                depth,
                summary,
                top,
                export,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_dump_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
