//! Canonical geometry model produced by every importer.
//!
//! Geometries are only built through the validating constructors on
//! [`Geometry`], so KML, GeoJSON and Shapefile inputs all obey the same
//! minimum sizes: two points per line, three points per ring.

use crate::logger;

/// Minimum number of points a line keeps.
pub const MIN_LINE_POINTS: usize = 2;

/// Minimum number of points a polygon ring keeps.
pub const MIN_RING_POINTS: usize = 3;

/// A longitude/latitude pair. Both values are finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    /// Returns `None` unless both values are finite.
    pub fn new(lon: f64, lat: f64) -> Option<Self> {
        if lon.is_finite() && lat.is_finite() {
            Some(Self { lon, lat })
        } else {
            None
        }
    }

    pub fn as_pair(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// Ordered points of a polygon boundary. Not required to be closed.
pub type Ring = Vec<Coordinate>;

/// An imported geometry.
///
/// For `Polygon`, the first ring is the outer boundary and the rest are holes.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    LineString(Vec<Coordinate>),
    Polygon(Vec<Ring>),
    MultiPoint(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
    MultiPolygon(Vec<Vec<Ring>>),
}

/// Geometry kind, used for summaries and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryKind {
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
        }
    }
}

impl Geometry {
    pub fn point(coord: Coordinate) -> Self {
        Geometry::Point(coord)
    }

    /// Builds a line, or `None` if it has fewer than two points.
    pub fn line_string(coords: Vec<Coordinate>) -> Option<Self> {
        if coords.len() < MIN_LINE_POINTS {
            logger::debug(&format!(
                "Dropped LineString with {} point(s)",
                coords.len()
            ));
            return None;
        }
        Some(Geometry::LineString(coords))
    }

    /// Builds a polygon from an outer ring and candidate holes.
    ///
    /// Returns `None` when the outer ring is too short; holes that are too
    /// short are dropped individually.
    pub fn polygon(outer: Ring, holes: Vec<Ring>) -> Option<Self> {
        polygon_rings(outer, holes).map(Geometry::Polygon)
    }

    /// Builds a multi-point, or `None` when there are no points.
    pub fn multi_point(coords: Vec<Coordinate>) -> Option<Self> {
        if coords.is_empty() {
            return None;
        }
        Some(Geometry::MultiPoint(coords))
    }

    /// Keeps the members with at least two points.
    pub fn multi_line_string(lines: Vec<Vec<Coordinate>>) -> Option<Self> {
        let lines: Vec<Vec<Coordinate>> = lines
            .into_iter()
            .filter(|line| line.len() >= MIN_LINE_POINTS)
            .collect();
        if lines.is_empty() {
            return None;
        }
        Some(Geometry::MultiLineString(lines))
    }

    /// Each member is `(outer, holes)` and is validated like [`Geometry::polygon`].
    pub fn multi_polygon(polygons: Vec<(Ring, Vec<Ring>)>) -> Option<Self> {
        let polygons: Vec<Vec<Ring>> = polygons
            .into_iter()
            .filter_map(|(outer, holes)| polygon_rings(outer, holes))
            .collect();
        if polygons.is_empty() {
            return None;
        }
        Some(Geometry::MultiPolygon(polygons))
    }

    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Visits every coordinate of the geometry, rings included.
    pub fn for_each_coordinate<F: FnMut(&Coordinate)>(&self, mut f: F) {
        match self {
            Geometry::Point(c) => f(c),
            Geometry::LineString(coords) | Geometry::MultiPoint(coords) => {
                coords.iter().for_each(&mut f)
            }
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                rings.iter().flatten().for_each(&mut f)
            }
            Geometry::MultiPolygon(polygons) => {
                polygons.iter().flatten().flatten().for_each(&mut f)
            }
        }
    }

    /// Converts into a `geo` geometry. Rings are closed by `geo`.
    pub fn to_geo(&self) -> geo::Geometry<f64> {
        match self {
            Geometry::Point(c) => geo::Geometry::Point(geo::Point::new(c.lon, c.lat)),
            Geometry::LineString(coords) => geo::Geometry::LineString(to_geo_line(coords)),
            Geometry::Polygon(rings) => geo::Geometry::Polygon(to_geo_polygon(rings)),
            Geometry::MultiPoint(coords) => geo::Geometry::MultiPoint(geo::MultiPoint::new(
                coords
                    .iter()
                    .map(|c| geo::Point::new(c.lon, c.lat))
                    .collect(),
            )),
            Geometry::MultiLineString(lines) => geo::Geometry::MultiLineString(
                geo::MultiLineString::new(lines.iter().map(|l| to_geo_line(l)).collect()),
            ),
            Geometry::MultiPolygon(polygons) => geo::Geometry::MultiPolygon(
                geo::MultiPolygon::new(polygons.iter().map(|p| to_geo_polygon(p)).collect()),
            ),
        }
    }
}

fn polygon_rings(outer: Ring, holes: Vec<Ring>) -> Option<Vec<Ring>> {
    if outer.len() < MIN_RING_POINTS {
        logger::debug(&format!(
            "Dropped Polygon with {}-point outer ring",
            outer.len()
        ));
        return None;
    }

    let mut rings = Vec::with_capacity(holes.len() + 1);
    rings.push(outer);
    for hole in holes {
        if hole.len() >= MIN_RING_POINTS {
            rings.push(hole);
        } else {
            logger::debug(&format!("Dropped {}-point hole", hole.len()));
        }
    }
    Some(rings)
}

fn to_geo_line(coords: &[Coordinate]) -> geo::LineString<f64> {
    geo::LineString::from(
        coords
            .iter()
            .map(|c| geo::Coord { x: c.lon, y: c.lat })
            .collect::<Vec<_>>(),
    )
}

fn to_geo_polygon(rings: &[Ring]) -> geo::Polygon<f64> {
    let exterior = rings
        .first()
        .map(|r| to_geo_line(r))
        .unwrap_or_else(|| geo::LineString::new(Vec::new()));
    let interiors = rings.iter().skip(1).map(|r| to_geo_line(r)).collect();
    geo::Polygon::new(exterior, interiors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lon: f64, lat: f64) -> Coordinate {
        Coordinate::new(lon, lat).unwrap()
    }

    fn square() -> Ring {
        vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0)]
    }

    #[test]
    fn test_coordinate_rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 1.0).is_none());
        assert!(Coordinate::new(1.0, f64::INFINITY).is_none());
        assert!(Coordinate::new(500.0, -200.0).is_some());
    }

    #[test]
    fn test_line_string_minimum() {
        assert!(Geometry::line_string(vec![c(0.0, 0.0)]).is_none());
        assert!(Geometry::line_string(vec![c(0.0, 0.0), c(1.0, 1.0)]).is_some());
    }

    #[test]
    fn test_polygon_drops_short_hole() {
        let hole = vec![c(0.2, 0.2), c(0.4, 0.4)];
        let poly = Geometry::polygon(square(), vec![hole]).unwrap();
        match poly {
            Geometry::Polygon(rings) => assert_eq!(rings.len(), 1),
            other => panic!("unexpected geometry: {:?}", other),
        }
    }

    #[test]
    fn test_polygon_short_outer_discards_holes() {
        let outer = vec![c(0.0, 0.0), c(1.0, 1.0)];
        assert!(Geometry::polygon(outer, vec![square()]).is_none());
    }

    #[test]
    fn test_multi_polygon_keeps_valid_members() {
        let short = vec![c(0.0, 0.0), c(1.0, 1.0)];
        let mp = Geometry::multi_polygon(vec![(short, vec![]), (square(), vec![])]).unwrap();
        match mp {
            Geometry::MultiPolygon(polygons) => assert_eq!(polygons.len(), 1),
            other => panic!("unexpected geometry: {:?}", other),
        }
        assert!(Geometry::multi_polygon(vec![]).is_none());
    }

    #[test]
    fn test_for_each_coordinate_visits_holes() {
        let hole = vec![c(0.2, 0.2), c(0.4, 0.2), c(0.4, 0.4)];
        let poly = Geometry::polygon(square(), vec![hole]).unwrap();
        let mut count = 0;
        poly.for_each_coordinate(|_| count += 1);
        assert_eq!(count, 7);
    }

    #[test]
    fn test_to_geo_closes_ring() {
        let poly = Geometry::polygon(square(), vec![]).unwrap();
        match poly.to_geo() {
            geo::Geometry::Polygon(p) => assert_eq!(p.exterior().0.len(), 5),
            other => panic!("unexpected geometry: {:?}", other),
        }
    }
}
