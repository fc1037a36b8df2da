//! Command-line surface of the `coros` binary.

use clap::{Parser, Subcommand};
use coros_client::{ExportFormat, Region};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "coros",
    about = "List and download your COROS activities",
    long_about = "List recent activities of a COROS account and download them as GPX, FIT, TCX, KML or CSV.\n\n\
                  Credentials are read from COROS_EMAIL and COROS_PASSWORD. Logging in signs out \
                  any other COROS web session of the account."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// API region (europe, america, china); overrides COROS_REGION
    #[arg(long, global = true, value_parser = parse_region)]
    pub region: Option<Region>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List recent activities
    List {
        /// Number of activities to show (defaults to COROS_LIMIT or 10)
        #[arg(long, short = 'n')]
        limit: Option<u32>,
    },

    /// Download activity files
    Download {
        /// File format: gpx, fit, tcx, kml, csv
        #[arg(long, short = 'f', default_value = "gpx", value_parser = parse_format)]
        format: ExportFormat,

        /// Number of recent activities to choose from
        #[arg(long, short = 'n')]
        limit: Option<u32>,

        /// Output directory
        #[arg(long, short = 'o', default_value = ".")]
        output: PathBuf,

        /// Activity id to download without prompting (repeatable)
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Replace files that already exist
        #[arg(long)]
        overwrite: bool,
    },
}

fn parse_region(s: &str) -> Result<Region, String> {
    s.parse().map_err(|e: coros_client::CorosError| e.to_string())
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse().map_err(|e: coros_client::CorosError| e.to_string())
}
