//! Shapefile-in-zip conversion.
//!
//! Every `.shp` entry of the archive is decoded with the `shapefile` crate
//! and mapped onto the canonical geometry model. Only the geometry file is
//! needed; attribute tables and projections are not read, so coordinates
//! stay in the shapefile's own CRS.

use std::io::{Cursor, Read, Seek};

use shapefile::{PolygonRing, Shape, ShapeReader};
use thiserror::Error;
use zip::ZipArchive;

use super::{read_entry, MAX_ENTRY_SIZE};
use crate::geometry::{Coordinate, Geometry, Ring, MIN_LINE_POINTS};
use crate::logger;

/// Why an archive could not be read as a shapefile bundle.
#[derive(Error, Debug)]
pub enum ShapefileError {
    #[error("archive contains no .shp entry")]
    NoShapefile,

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid shapefile '{entry}': {source}")]
    Shapefile {
        entry: String,
        source: shapefile::Error,
    },
}

/// Converts every shapefile of the archive, in archive order.
pub fn convert<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> std::result::Result<Vec<Geometry>, ShapefileError> {
    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if !entry.is_dir() && is_shp_entry(entry.name()) {
            entries.push(index);
        }
    }

    if entries.is_empty() {
        return Err(ShapefileError::NoShapefile);
    }

    let mut geometries = Vec::new();
    for index in entries {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();
        let bytes = read_entry(&mut entry, MAX_ENTRY_SIZE)?;

        let shapes = ShapeReader::new(Cursor::new(bytes))
            .and_then(|reader| reader.read())
            .map_err(|source| ShapefileError::Shapefile {
                entry: name.clone(),
                source,
            })?;

        let before = geometries.len();
        geometries.extend(shapes.into_iter().filter_map(shape_to_geometry));
        logger::debug(&format!(
            "Shapefile '{}': {} geometries",
            name,
            geometries.len() - before
        ));
    }

    Ok(geometries)
}

/// `.shp` entries, skipping macOS resource-fork copies (`__MACOSX/`, `._*`).
fn is_shp_entry(name: &str) -> bool {
    if !name.to_ascii_lowercase().ends_with(".shp") {
        return false;
    }
    let file_name = name.rsplit('/').next().unwrap_or(name);
    !name.starts_with("__MACOSX/") && !file_name.starts_with("._")
}

/// Maps one shape; Z and M values are dropped.
pub fn shape_to_geometry(shape: Shape) -> Option<Geometry> {
    match shape {
        Shape::NullShape | Shape::Multipatch(_) => None,
        Shape::Point(p) => p.coordinate().map(Geometry::point),
        Shape::PointM(p) => p.coordinate().map(Geometry::point),
        Shape::PointZ(p) => p.coordinate().map(Geometry::point),
        Shape::Multipoint(m) => Geometry::multi_point(points(m.points())),
        Shape::MultipointM(m) => Geometry::multi_point(points(m.points())),
        Shape::MultipointZ(m) => Geometry::multi_point(points(m.points())),
        Shape::Polyline(l) => lines(l.parts()),
        Shape::PolylineM(l) => lines(l.parts()),
        Shape::PolylineZ(l) => lines(l.parts()),
        Shape::Polygon(p) => polygons(p.rings()),
        Shape::PolygonM(p) => polygons(p.rings()),
        Shape::PolygonZ(p) => polygons(p.rings()),
    }
}

trait PlanarPoint {
    fn coordinate(&self) -> Option<Coordinate>;
}

impl PlanarPoint for shapefile::Point {
    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::new(self.x, self.y)
    }
}

impl PlanarPoint for shapefile::PointM {
    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::new(self.x, self.y)
    }
}

impl PlanarPoint for shapefile::PointZ {
    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::new(self.x, self.y)
    }
}

fn points<P: PlanarPoint>(points: &[P]) -> Vec<Coordinate> {
    points.iter().filter_map(PlanarPoint::coordinate).collect()
}

fn lines<P: PlanarPoint>(parts: &[Vec<P>]) -> Option<Geometry> {
    let mut lines: Vec<Vec<Coordinate>> = parts
        .iter()
        .map(|part| points(part))
        .filter(|line| line.len() >= MIN_LINE_POINTS)
        .collect();
    match lines.len() {
        0 => None,
        1 => Geometry::line_string(lines.pop()?),
        _ => Geometry::multi_line_string(lines),
    }
}

/// Each outer ring starts a polygon and inner rings attach to the preceding
/// outer ring. An inner ring with no outer ring before it is read as an outer.
fn polygons<P: PlanarPoint>(rings: &[PolygonRing<P>]) -> Option<Geometry> {
    let mut groups: Vec<(Ring, Vec<Ring>)> = Vec::new();
    for ring in rings {
        match ring {
            PolygonRing::Outer(pts) => groups.push((points(pts), Vec::new())),
            PolygonRing::Inner(pts) => match groups.last_mut() {
                Some((_, holes)) => holes.push(points(pts)),
                None => groups.push((points(pts), Vec::new())),
            },
        }
    }

    match Geometry::multi_polygon(groups)? {
        Geometry::MultiPolygon(mut polygons) if polygons.len() == 1 => {
            Some(Geometry::Polygon(polygons.remove(0)))
        }
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn shp_file(shape_type: i32, records: &[Vec<u8>]) -> Vec<u8> {
        let body: usize = records.iter().map(|r| 8 + r.len()).sum();
        let mut out = Vec::new();
        out.extend_from_slice(&9994i32.to_be_bytes());
        out.extend_from_slice(&[0u8; 20]);
        out.extend_from_slice(&(((100 + body) / 2) as i32).to_be_bytes());
        out.extend_from_slice(&1000i32.to_le_bytes());
        out.extend_from_slice(&shape_type.to_le_bytes());
        for _ in 0..8 {
            out.extend_from_slice(&0f64.to_le_bytes());
        }
        for (i, content) in records.iter().enumerate() {
            out.extend_from_slice(&((i + 1) as i32).to_be_bytes());
            out.extend_from_slice(&((content.len() / 2) as i32).to_be_bytes());
            out.extend_from_slice(content);
        }
        out
    }

    fn point_record(x: f64, y: f64) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&1i32.to_le_bytes());
        out.extend_from_slice(&x.to_le_bytes());
        out.extend_from_slice(&y.to_le_bytes());
        out
    }

    fn polygon_record(rings: &[&[(f64, f64)]]) -> Vec<u8> {
        let num_points: usize = rings.iter().map(|r| r.len()).sum();
        let mut out = Vec::new();
        out.extend_from_slice(&5i32.to_le_bytes());
        for _ in 0..4 {
            out.extend_from_slice(&0f64.to_le_bytes());
        }
        out.extend_from_slice(&(rings.len() as i32).to_le_bytes());
        out.extend_from_slice(&(num_points as i32).to_le_bytes());
        let mut start = 0;
        for ring in rings {
            out.extend_from_slice(&(start as i32).to_le_bytes());
            start += ring.len();
        }
        for ring in rings {
            for (x, y) in ring.iter() {
                out.extend_from_slice(&x.to_le_bytes());
                out.extend_from_slice(&y.to_le_bytes());
            }
        }
        out
    }

    fn archive(entries: &[(&str, Vec<u8>)]) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        let bytes = writer.finish().unwrap().into_inner();
        ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    // Clockwise, so the shapefile reader classifies it as an outer ring.
    const OUTER: [(f64, f64); 5] = [(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0), (0.0, 0.0)];
    const HOLE: [(f64, f64); 5] = [(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0), (1.0, 1.0)];

    #[test]
    fn test_convert_points() {
        let shp = shp_file(1, &[point_record(69.2, 41.3), point_record(70.0, 42.0)]);
        let mut zip = archive(&[("wells.shp", shp), ("wells.dbf", vec![0u8; 4])]);
        let geometries = convert(&mut zip).unwrap();
        assert_eq!(geometries.len(), 2);
        assert_eq!(
            geometries[0],
            Geometry::Point(Coordinate::new(69.2, 41.3).unwrap())
        );
    }

    #[test]
    fn test_convert_polygon_with_hole() {
        let shp = shp_file(5, &[polygon_record(&[&OUTER, &HOLE])]);
        let mut zip = archive(&[("fields.shp", shp)]);
        let geometries = convert(&mut zip).unwrap();
        match &geometries[0] {
            Geometry::Polygon(rings) => {
                assert_eq!(rings.len(), 2);
                assert_eq!(rings[0].len(), 5);
            }
            other => panic!("unexpected geometry: {:?}", other),
        }
    }

    #[test]
    fn test_convert_without_shp_entry() {
        let mut zip = archive(&[("doc.kml", b"<kml/>".to_vec())]);
        assert!(matches!(convert(&mut zip), Err(ShapefileError::NoShapefile)));
    }

    #[test]
    fn test_convert_invalid_shp() {
        let mut zip = archive(&[("broken.shp", b"not a shapefile".to_vec())]);
        assert!(matches!(
            convert(&mut zip),
            Err(ShapefileError::Shapefile { .. })
        ));
    }

    #[test]
    fn test_is_shp_entry() {
        assert!(is_shp_entry("data/Fields.SHP"));
        assert!(!is_shp_entry("fields.shx"));
        assert!(!is_shp_entry("__MACOSX/data/._fields.shp"));
        assert!(!is_shp_entry("data/._fields.shp"));
    }

    #[test]
    fn test_polygons_grouping() {
        let outer: Vec<shapefile::Point> =
            OUTER.iter().map(|(x, y)| shapefile::Point::new(*x, *y)).collect();
        let hole: Vec<shapefile::Point> =
            HOLE.iter().map(|(x, y)| shapefile::Point::new(*x, *y)).collect();
        let rings = vec![
            PolygonRing::Outer(outer.clone()),
            PolygonRing::Inner(hole),
            PolygonRing::Outer(outer),
        ];
        match polygons(&rings).unwrap() {
            Geometry::MultiPolygon(polys) => {
                assert_eq!(polys.len(), 2);
                assert_eq!(polys[0].len(), 2);
                assert_eq!(polys[1].len(), 1);
            }
            other => panic!("unexpected geometry: {:?}", other),
        }
    }

    #[test]
    fn test_lines_single_and_multi() {
        let part: Vec<shapefile::Point> = vec![
            shapefile::Point::new(0.0, 0.0),
            shapefile::Point::new(1.0, 1.0),
        ];
        let short = vec![shapefile::Point::new(5.0, 5.0)];
        assert!(matches!(
            lines(&[part.clone(), short]),
            Some(Geometry::LineString(_))
        ));
        assert!(matches!(
            lines(&[part.clone(), part]),
            Some(Geometry::MultiLineString(_))
        ));
    }
}
