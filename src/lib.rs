//! Import of spatial files (KML, KMZ, zipped Shapefile, GeoJSON) into a
//! validated, canonical list of geometries.
//!
//! ```no_run
//! # async fn run() -> geofile_import::Result<()> {
//! use geofile_import::{import, DiskFile};
//!
//! let file = DiskFile::open(std::path::Path::new("fields.kmz")).await?;
//! let geometries = import(&file).await?;
//! println!("{} geometries", geometries.len());
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod cli;
pub mod coords;
pub mod error;
pub mod export;
pub mod format;
pub mod geometry;
pub mod import;
pub mod kml;
pub mod logger;
pub mod math;
pub mod normalize;

pub use error::{ImportError, Result};
pub use format::{FileFormat, MAX_FILE_SIZE};
pub use geometry::{Coordinate, Geometry, GeometryKind, Ring};
pub use import::{import, DiskFile, ImportOptions, Importer, MemoryFile, SourceFile};
