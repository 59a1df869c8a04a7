//! GeoJSON output of imported geometries.

use std::path::Path;

use geojson::{Feature, FeatureCollection, Value};

use crate::error::Result;
use crate::geometry::{Coordinate, Geometry, Ring};

impl From<&Geometry> for Value {
    fn from(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point(c) => Value::Point(position(c)),
            Geometry::LineString(coords) => Value::LineString(positions(coords)),
            Geometry::Polygon(rings) => Value::Polygon(polygon(rings)),
            Geometry::MultiPoint(coords) => Value::MultiPoint(positions(coords)),
            Geometry::MultiLineString(lines) => {
                Value::MultiLineString(lines.iter().map(|l| positions(l)).collect())
            }
            Geometry::MultiPolygon(polygons) => {
                Value::MultiPolygon(polygons.iter().map(|p| polygon(p)).collect())
            }
        }
    }
}

fn position(coord: &Coordinate) -> Vec<f64> {
    vec![coord.lon, coord.lat]
}

fn positions(coords: &[Coordinate]) -> Vec<Vec<f64>> {
    coords.iter().map(position).collect()
}

fn polygon(rings: &[Ring]) -> Vec<Vec<Vec<f64>>> {
    rings.iter().map(|r| positions(r)).collect()
}

/// One feature per geometry, in order, without properties.
pub fn to_feature_collection(geometries: &[Geometry]) -> FeatureCollection {
    let features = geometries
        .iter()
        .map(|g| Feature::from(geojson::Geometry::new(Value::from(g))))
        .collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Writes the geometries as a GeoJSON `FeatureCollection`.
pub async fn write_geojson(path: &Path, geometries: &[Geometry], pretty: bool) -> Result<()> {
    let collection = to_feature_collection(geometries);
    let json = if pretty {
        serde_json::to_string_pretty(&collection)
    } else {
        serde_json::to_string(&collection)
    }
    .map_err(std::io::Error::from)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
