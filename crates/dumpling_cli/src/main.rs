//! Dumpling CLI
//!
//! Runs the differential oracle over two captured frame dumps.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use console::style;
use dumpling_core::Trace;
use dumpling_oracle::{DiffOracle, OracleConfig, Verdict};
use dumpling_trace::{decode_trace, render_full};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dumpling")]
#[command(about = "Dumpling - differential oracle for V8 tier frame dumps", long_about = None)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an optimized dump against a reference dump
    Relate {
        /// Dump from the optimizing tiers
        #[arg(short, long)]
        optimized: PathBuf,
        /// Dump from the interpreter/baseline tiers
        #[arg(short, long)]
        reference: PathBuf,
        /// Only match frames from the same tier
        #[arg(long)]
        compare_frame_type: bool,
        /// JSON oracle config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode a dump and print its frames as JSON
    Decode {
        /// Dump file
        file: PathBuf,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Rewrite a dump with every field spelled out in every block
    Expand {
        /// Dump file
        file: PathBuf,
    },
}

/// Filter used when `RUST_LOG` is unset; the prefix covers every `dumpling_*` crate
fn default_filter(quiet: bool) -> &'static str {
    if quiet { "dumpling=warn" } else { "dumpling=info" }
}

fn init_tracing(quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(quiet)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_dump(path: &Path) -> Result<String> {
    fs::read_to_string(path).wrap_err_with(|| format!("failed to read dump {}", path.display()))
}

fn decode_file(path: &Path) -> Result<Trace> {
    let dump = read_dump(path)?;
    decode_trace(&dump).wrap_err_with(|| format!("failed to decode {}", path.display()))
}

/// Config file (if any) with command-line overrides applied
fn load_config(path: Option<&Path>, compare_frame_type: bool) -> Result<OracleConfig> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
            OracleConfig::from_json(&json)
                .wrap_err_with(|| format!("failed to parse config {}", path.display()))?
        }
        None => OracleConfig::default(),
    };

    if compare_frame_type {
        config.compare_frame_type = true;
    }
    // The report is printed below; logging it as well would duplicate it.
    config.log_mismatches = false;

    debug!(?config, "oracle config");
    Ok(config)
}

fn relate_files(optimized: &Path, reference: &Path, config: OracleConfig) -> Result<Verdict> {
    let optimized_dump = read_dump(optimized)?;
    let reference_dump = read_dump(reference)?;

    let verdict = DiffOracle::new()
        .with_config(config)
        .relate(&optimized_dump, &reference_dump)?;
    Ok(verdict)
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match cli.command {
        Commands::Relate {
            optimized,
            reference,
            compare_frame_type,
            config,
            json,
        } => {
            let config = load_config(config.as_deref(), compare_frame_type)?;
            let verdict = relate_files(&optimized, &reference, config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else if verdict.is_consistent() {
                println!("{}", style("consistent").green().bold());
            } else {
                println!("{}", style("mismatch").red().bold());
            }

            match &verdict.mismatch {
                Some(mismatch) => {
                    eprintln!("{mismatch}");
                    Ok(ExitCode::from(1))
                }
                None => Ok(ExitCode::SUCCESS),
            }
        }
        Commands::Decode { file, pretty } => {
            let trace = decode_file(&file)?;
            let json = if pretty {
                serde_json::to_string_pretty(&trace)?
            } else {
                serde_json::to_string(&trace)?
            };
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Expand { file } => {
            let trace = decode_file(&file)?;
            print!("{}", render_full(&trace));
            Ok(ExitCode::SUCCESS)
        }
    }
}
