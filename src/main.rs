use std::path::Path;

use anyhow::Context;
use clap::Parser;

use geofile_import::cli::{Args, Config};
use geofile_import::export::write_geojson;
use geofile_import::logger::{self, Logger};
use geofile_import::math::Summary;
use geofile_import::{DiskFile, Importer};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    let config = match args.validate() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    Logger::init(config.verbosity, config.no_color);

    match run(&config).await {
        Ok(0) => {}
        Ok(failed) => {
            logger::warn(&format!(
                "{} of {} file(s) could not be imported",
                failed,
                config.inputs.len()
            ));
            std::process::exit(1);
        }
        Err(e) => {
            logger::error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Imports every input in order and returns the number of failed files.
async fn run(config: &Config) -> anyhow::Result<usize> {
    if let Some(dir) = &config.output_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("cannot create output directory {}", dir.display()))?;
    }

    let importer = Importer::new(config.options);
    let mut failed = 0;

    for input in &config.inputs {
        let result = match DiskFile::open(input).await {
            Ok(file) => importer.import(&file).await,
            Err(e) => Err(e),
        };

        let geometries = match result {
            Ok(geometries) => geometries,
            Err(e) => {
                logger::error(&format!("{}: {}", input.display(), e));
                failed += 1;
                continue;
            }
        };

        let summary = Summary::new(&geometries);
        logger::info(&format!("{}: {}", input.display(), summary.describe()));
        if let Some(bbox) = summary.bbox {
            logger::info(&format!(
                "  bbox {:.6},{:.6},{:.6},{:.6}",
                bbox.min_lon, bbox.min_lat, bbox.max_lon, bbox.max_lat
            ));
        }
        if summary.area > 0.0 {
            logger::info(&format!("  area {:.1} m²", summary.area));
        }

        if let Some(dir) = &config.output_dir {
            let path = output_path(dir, input);
            write_geojson(&path, &geometries, config.pretty)
                .await
                .with_context(|| format!("cannot write {}", path.display()))?;
            logger::output(&path.display().to_string());
        }
    }

    Ok(failed)
}

fn output_path(dir: &Path, input: &Path) -> std::path::PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    dir.join(format!("{}.geojson", stem))
}
