//! File import orchestration.
//!
//! [`Importer::import`] sniffs the format, dispatches to the matching reader
//! and turns an empty result into [`ImportError::NoGeometryFound`]. Nothing is
//! kept between calls.

use std::path::{Path, PathBuf};

use crate::archive::{self, ZipPayload};
use crate::error::{ImportError, Result};
use crate::format::{FileFormat, MAX_FILE_SIZE};
use crate::geometry::Geometry;
use crate::{kml, logger, normalize};

/// An input file: a name, a size and its contents.
#[allow(async_fn_in_trait)]
pub trait SourceFile {
    /// File name, used for format detection.
    fn name(&self) -> &str;

    /// Size in bytes, checked before anything is read.
    fn size(&self) -> u64;

    async fn read_bytes(&self) -> Result<Vec<u8>>;

    /// Contents decoded as UTF-8; invalid sequences are replaced.
    async fn read_text(&self) -> Result<String> {
        let bytes = self.read_bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// A file on disk, read with `tokio::fs`.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    size: u64,
}

impl DiskFile {
    /// Looks up the file's metadata; contents are read on demand.
    pub async fn open(path: &Path) -> Result<Self> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ImportError::FileNotFound(path.display().to_string())
            } else {
                ImportError::Io(e)
            }
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }
}

impl SourceFile for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// An in-memory file, e.g. an upload.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl SourceFile for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Import settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Largest accepted file, in bytes.
    pub max_file_size: u64,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

/// Imports spatial files into canonical geometries.
#[derive(Debug, Clone, Default)]
pub struct Importer {
    options: ImportOptions,
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    /// Imports one file.
    ///
    /// On success the list is never empty. Any failure aborts the whole file;
    /// partial results are not returned.
    pub async fn import<F: SourceFile>(&self, file: &F) -> Result<Vec<Geometry>> {
        let format = FileFormat::sniff(file.name(), file.size(), self.options.max_file_size)?;
        logger::debug(&format!(
            "{}: {} bytes, format {}",
            file.name(),
            file.size(),
            format
        ));

        let geometries = match format {
            FileFormat::Geojson => normalize::normalize(&file.read_text().await?)?,
            FileFormat::Kml => kml::parse_str(&file.read_text().await?)?,
            FileFormat::Kmz => {
                let text = archive::unwrap_kmz(&file.read_bytes().await?)?;
                kml::parse_str(&text)?
            }
            FileFormat::Zip => match archive::unwrap_zip(&file.read_bytes().await?)? {
                ZipPayload::Geometries(geometries) => geometries,
                ZipPayload::Kml(text) => kml::parse_str(&text)?,
            },
        };

        if geometries.is_empty() {
            return Err(ImportError::NoGeometryFound);
        }
        Ok(geometries)
    }
}

/// Imports one file with the default options.
pub async fn import<F: SourceFile>(file: &F) -> Result<Vec<Geometry>> {
    Importer::default().import(file).await
}
