//! Payload selection for zip-based inputs (KMZ and `.zip`).

use std::io::{self, Cursor, Read, Seek};

use zip::ZipArchive;

use crate::error::{ImportError, Result};
use crate::format::MAX_FILE_SIZE;
use crate::geometry::Geometry;
use crate::logger;

pub mod shp;

/// Largest decompressed size read from a single archive entry.
///
/// Sizes declared by the archive are never trusted; entries are read
/// incrementally up to this limit.
pub const MAX_ENTRY_SIZE: u64 = 16 * MAX_FILE_SIZE;

/// What a `.zip` input turned out to contain.
#[derive(Debug)]
pub enum ZipPayload {
    /// Geometries converted from the shapefiles of the archive.
    Geometries(Vec<Geometry>),
    /// Text of the first `.kml` entry.
    Kml(String),
}

/// Returns the text of the first `.kml` entry of a KMZ archive.
pub fn unwrap_kmz(bytes: &[u8]) -> Result<String> {
    let mut archive = open(bytes)?;
    find_kml(&mut archive)?.ok_or(ImportError::ArchiveMissingPayload)
}

/// Resolves a `.zip` input.
///
/// The archive is read as a shapefile bundle first. If that fails or yields
/// nothing, the first `.kml` entry is used instead. If neither works, fails
/// with [`ImportError::NoGeometryFound`].
pub fn unwrap_zip(bytes: &[u8]) -> Result<ZipPayload> {
    let mut archive = open(bytes)?;

    match shp::convert(&mut archive) {
        Ok(geometries) if !geometries.is_empty() => {
            return Ok(ZipPayload::Geometries(geometries));
        }
        Ok(_) => logger::debug("Shapefile conversion yielded no geometry, looking for KML"),
        Err(e) => logger::debug(&format!(
            "Shapefile conversion failed ({}), looking for KML",
            e
        )),
    }

    match find_kml(&mut archive)? {
        Some(text) => Ok(ZipPayload::Kml(text)),
        None => Err(ImportError::NoGeometryFound),
    }
}

fn open(bytes: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>> {
    ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ImportError::MalformedDocument(format!("invalid zip archive: {}", e)))
}

/// First entry, in archive order, whose name ends in `.kml` (any case).
fn find_kml<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Option<String>> {
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(archive_error)?;
        if entry.is_dir() || !entry.name().to_ascii_lowercase().ends_with(".kml") {
            continue;
        }

        let name = entry.name().to_string();
        logger::debug(&format!("Using archive entry '{}'", name));
        let bytes = read_entry(&mut entry, MAX_ENTRY_SIZE).map_err(|e| {
            ImportError::MalformedDocument(format!("cannot read '{}': {}", name, e))
        })?;
        return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()));
    }
    Ok(None)
}

/// Reads at most `limit` bytes, failing if the entry holds more.
pub(crate) fn read_entry<R: Read>(entry: R, limit: u64) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    entry.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
    if bytes.len() as u64 > limit {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("entry is larger than {} bytes", limit),
        ));
    }
    Ok(bytes)
}

fn archive_error(e: zip::result::ZipError) -> ImportError {
    ImportError::MalformedDocument(format!("invalid zip archive: {}", e))
}
