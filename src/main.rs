//! data-prepare CLI
//!
//! Convert CSV files to Parquet, splitting valid and rejected rows.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use data_prepare::Converter;
use data_prepare::cli::Cli;

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let converter = Converter::new(cli.load_schema()?, cli.convert_options());

    let start = Instant::now();
    let code = if let Some(dir) = &cli.input.directory {
        let report = converter.convert_directory(dir)?;
        if let Some(path) = &cli.report {
            report.write_to_file(path)?;
            tracing::info!("Batch report written to {}", path.display());
        }
        if report.has_failures() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    } else if let Some(file) = &cli.input.file {
        converter.run(file)?;
        ExitCode::SUCCESS
    } else {
        // clap enforces that one of the two inputs is present
        ExitCode::FAILURE
    };

    tracing::info!(
        "Time to convert files to Parquet: {:.4} seconds",
        start.elapsed().as_secs_f64()
    );
    Ok(code)
}
