mod bucket;
mod classify;
mod cli;
mod engine;
mod error;
mod filter;
mod model;
mod nucleotide;
mod output;
mod project;
mod reader;
mod samples;
mod sites;

use crate::error::Result;
use chrono::Local;
use clap::Parser;
use env_logger::Env;
use miette::IntoDiagnostic;
use std::path::PathBuf;

/// Classify and summarize per-sample genotype calls in a VCF.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Input VCF (plain or gzip/BGZF compressed) or BCF.
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    input: PathBuf,

    /// Output directory.
    #[arg(
        short,
        long,
        value_hint = clap::ValueHint::DirPath,
        default_value_t = format!("gtsummary_output_{}", Local::now().format("%Y%m%d_%H%M%S"))
    )]
    output_directory: String,

    #[command(subcommand)]
    mode: cli::Mode,
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.output_directory)
        .map_err(|e| error::CustomError::OutputDir { source: e })?;

    let mut source = cli::open_source(&args.input)?;
    cli::run(source.as_mut(), &args.mode, &args.output_directory)?;
    Ok(())
}

fn main() -> miette::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    try_main().into_diagnostic()
}
