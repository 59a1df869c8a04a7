//! Bounding boxes and areas of imported geometries.

use std::collections::BTreeMap;

use geo::GeodesicArea;

use crate::geometry::{Geometry, GeometryKind};

/// Bounding box in WGS84 coordinates (longitude, latitude).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    /// Minimum longitude (degrees).
    pub min_lon: f64,
    /// Minimum latitude (degrees).
    pub min_lat: f64,
    /// Maximum longitude (degrees).
    pub max_lon: f64,
    /// Maximum latitude (degrees).
    pub max_lat: f64,
}

impl Bbox {
    /// Creates a new bounding box.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Computes the bounding box of all coordinates, holes included.
    pub fn from_geometries(geometries: &[Geometry]) -> Option<Self> {
        let mut bbox: Option<Bbox> = None;
        for geometry in geometries {
            geometry.for_each_coordinate(|coord| {
                bbox = Some(match bbox {
                    Some(b) => Bbox::new(
                        b.min_lon.min(coord.lon),
                        b.min_lat.min(coord.lat),
                        b.max_lon.max(coord.lon),
                        b.max_lat.max(coord.lat),
                    ),
                    None => Bbox::new(coord.lon, coord.lat, coord.lon, coord.lat),
                });
            });
        }
        bbox
    }
}

/// Unsigned geodesic area in square meters of the polygonal geometries.
///
/// Points and lines contribute nothing.
pub fn geodesic_area(geometries: &[Geometry]) -> f64 {
    geometries
        .iter()
        .map(|geometry| match geometry.to_geo() {
            geo::Geometry::Polygon(p) => p.geodesic_area_unsigned(),
            geo::Geometry::MultiPolygon(mp) => mp.geodesic_area_unsigned(),
            _ => 0.0,
        })
        .sum()
}

/// Per-file overview of an import.
#[derive(Debug, Clone)]
pub struct Summary {
    pub total: usize,
    pub counts: BTreeMap<GeometryKind, usize>,
    pub bbox: Option<Bbox>,
    /// Square meters.
    pub area: f64,
}

impl Summary {
    pub fn new(geometries: &[Geometry]) -> Self {
        let mut counts = BTreeMap::new();
        for geometry in geometries {
            *counts.entry(geometry.kind()).or_insert(0) += 1;
        }
        Self {
            total: geometries.len(),
            counts,
            bbox: Bbox::from_geometries(geometries),
            area: geodesic_area(geometries),
        }
    }

    /// One-line description such as `3 geometries (2 Polygon, 1 Point)`.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind.name()))
            .collect();
        format!("{} geometries ({})", self.total, parts.join(", "))
    }
}
