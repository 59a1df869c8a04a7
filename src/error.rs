use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File too large: {size} bytes (max: {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Unsupported format: {0} (allowed: kml, kmz, zip, geojson)")]
    UnsupportedFormat(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Document is neither a FeatureCollection nor a GeoJSON geometry")]
    UnrecognizedStructure,

    #[error("Archive does not contain a .kml entry")]
    ArchiveMissingPayload,

    #[error("No valid geometry found")]
    NoGeometryFound,

    #[error("Maximum file size must be positive, got: {0}")]
    InvalidMaxSize(f64),

    #[error("Options --{0} and --{1} are mutually exclusive")]
    MutuallyExclusiveOptions(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ImportError::FileNotFound("parcels.kml".to_string());
        assert_eq!(err.to_string(), "File not found: parcels.kml");
    }

    #[test]
    fn test_file_too_large_display() {
        let err = ImportError::FileTooLarge {
            size: 20,
            max: 10,
        };
        assert_eq!(err.to_string(), "File too large: 20 bytes (max: 10)");
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = ImportError::UnsupportedFormat("roads.gpx".to_string());
        assert!(err.to_string().contains("roads.gpx"));
        assert!(err.to_string().contains("geojson"));
    }
}
