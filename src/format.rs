//! Input format detection from file name and size.

use std::fmt;

use crate::error::{ImportError, Result};

/// Largest accepted input, 15 MiB.
pub const MAX_FILE_SIZE: u64 = 15 * 1024 * 1024;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Kml,
    Kmz,
    /// Zipped Shapefile, or a KML archive saved with a `.zip` extension.
    Zip,
    Geojson,
}

impl FileFormat {
    /// Picks the format for a file.
    ///
    /// The size guard runs first, so an oversized file is rejected whatever
    /// its extension. Only the extension is examined; contents are not read.
    pub fn sniff(name: &str, size: u64, max_size: u64) -> Result<Self> {
        if size > max_size {
            return Err(ImportError::FileTooLarge {
                size,
                max: max_size,
            });
        }

        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .ok_or_else(|| ImportError::UnsupportedFormat(name.to_string()))?;

        match ext.as_str() {
            "kml" => Ok(FileFormat::Kml),
            "kmz" => Ok(FileFormat::Kmz),
            "zip" => Ok(FileFormat::Zip),
            "geojson" => Ok(FileFormat::Geojson),
            _ => Err(ImportError::UnsupportedFormat(name.to_string())),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileFormat::Kml => "kml",
            FileFormat::Kmz => "kmz",
            FileFormat::Zip => "zip",
            FileFormat::Geojson => "geojson",
        };
        f.write_str(name)
    }
}
