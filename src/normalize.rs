//! GeoJSON reading and normalization.

use geojson::Value;
use serde_json::Value as JsonValue;

use crate::coords::{from_position, from_positions};
use crate::error::{ImportError, Result};
use crate::geometry::{Geometry, Ring};
use crate::logger;

/// Parses GeoJSON text into canonical geometries.
///
/// Accepts a `FeatureCollection` (features without geometry are skipped) or a
/// bare geometry object carrying `type` and `coordinates`. Each geometry is
/// decoded and checked with the same size rules as KML input; the ones that
/// fail are dropped, so the result may be empty.
pub fn normalize(text: &str) -> Result<Vec<Geometry>> {
    let value: JsonValue = serde_json::from_str(text)
        .map_err(|e| ImportError::MalformedDocument(format!("invalid JSON: {}", e)))?;

    let mut geometries = Vec::new();
    for (index, raw) in raw_geometries(value)?.into_iter().enumerate() {
        match geojson::Geometry::from_json_value(raw) {
            Ok(geometry) => push_geometry(&geometry.value, &mut geometries),
            Err(e) => logger::debug(&format!("Skipped geometry #{}: {}", index, e)),
        }
    }
    Ok(geometries)
}

/// Recognizes the top-level shape and returns the geometry objects in order.
fn raw_geometries(value: JsonValue) -> Result<Vec<JsonValue>> {
    let JsonValue::Object(mut object) = value else {
        return Err(ImportError::UnrecognizedStructure);
    };

    // A collection without a `features` array is checked as a bare geometry.
    if object.get("type").and_then(JsonValue::as_str) == Some("FeatureCollection") {
        if let Some(JsonValue::Array(features)) = object.remove("features") {
            return Ok(features
                .into_iter()
                .filter_map(|feature| match feature {
                    JsonValue::Object(mut feature) => {
                        feature.remove("geometry").filter(|g| !g.is_null())
                    }
                    _ => None,
                })
                .collect());
        }
    }

    let has = |key: &str| object.get(key).is_some_and(|v| !v.is_null());
    if has("type") && has("coordinates") {
        return Ok(vec![JsonValue::Object(object)]);
    }

    Err(ImportError::UnrecognizedStructure)
}

fn push_geometry(value: &Value, out: &mut Vec<Geometry>) {
    let geometry = match value {
        Value::Point(position) => from_position(position).map(Geometry::point),
        Value::MultiPoint(positions) => Geometry::multi_point(from_positions(positions)),
        Value::LineString(positions) => Geometry::line_string(from_positions(positions)),
        Value::MultiLineString(lines) => {
            Geometry::multi_line_string(lines.iter().map(|l| from_positions(l)).collect())
        }
        Value::Polygon(rings) => {
            split_rings(rings).and_then(|(outer, holes)| Geometry::polygon(outer, holes))
        }
        Value::MultiPolygon(polygons) => {
            Geometry::multi_polygon(polygons.iter().filter_map(|p| split_rings(p)).collect())
        }
        Value::GeometryCollection(members) => {
            for member in members {
                push_geometry(&member.value, out);
            }
            return;
        }
    };

    match geometry {
        Some(geometry) => out.push(geometry),
        None => logger::debug(&format!("Skipped invalid {}", type_name(value))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn split_rings(rings: &[Vec<Vec<f64>>]) -> Option<(Ring, Vec<Ring>)> {
    let (outer, holes) = rings.split_first()?;
    Some((
        from_positions(outer),
        holes.iter().map(|hole| from_positions(hole)).collect(),
    ))
}
