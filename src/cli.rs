//! CLI argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

use crate::error::{ImportError, Result};
use crate::format::MAX_FILE_SIZE;
use crate::import::ImportOptions;
use crate::logger::VerbosityLevel;

const MIB: f64 = 1024.0 * 1024.0;

/// Command line arguments for geofile-import.
#[derive(Parser, Debug)]
#[command(name = "geofile-import")]
#[command(version, about = "Import KML, KMZ, zipped Shapefile and GeoJSON geometries", long_about = None)]
pub struct Args {
    /// Files to import (.kml, .kmz, .zip, .geojson).
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory where each import is written as <name>.geojson.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Largest accepted file size in MiB.
    #[arg(long, default_value_t = (MAX_FILE_SIZE as f64) / MIB)]
    pub max_size_mib: f64,

    /// Pretty-print written GeoJSON.
    #[arg(long)]
    pub pretty: bool,

    /// Only print written paths and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Print timestamped details of each import step.
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

/// Fully validated configuration object.
#[derive(Debug)]
pub struct Config {
    /// Files to import, in command line order.
    pub inputs: Vec<PathBuf>,
    /// Output directory (None means nothing is written).
    pub output_dir: Option<PathBuf>,
    /// Importer settings.
    pub options: ImportOptions,
    /// Pretty-print written GeoJSON.
    pub pretty: bool,
    /// Output verbosity.
    pub verbosity: VerbosityLevel,
    /// Disable colors.
    pub no_color: bool,
}

impl Args {
    /// Validates arguments and converts them to a structured `Config`.
    pub fn validate(self) -> Result<Config> {
        if self.quiet && self.verbose {
            return Err(ImportError::MutuallyExclusiveOptions(
                "quiet".to_string(),
                "verbose".to_string(),
            ));
        }

        let max_file_size = parse_max_size(self.max_size_mib)?;

        let verbosity = if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        };

        Ok(Config {
            inputs: self.inputs,
            output_dir: self.output_dir,
            options: ImportOptions { max_file_size },
            pretty: self.pretty,
            verbosity,
            no_color: self.no_color,
        })
    }
}

fn parse_max_size(mib: f64) -> Result<u64> {
    if !mib.is_finite() || mib <= 0.0 {
        return Err(ImportError::InvalidMaxSize(mib));
    }
    Ok((mib * MIB).floor() as u64)
}
