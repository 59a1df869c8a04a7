//! Coordinate text and position parsing.

use crate::geometry::Coordinate;

/// Parses KML-style coordinate text into ordered lon/lat pairs.
///
/// Tuples are separated by whitespace and their fields by commas. Only the
/// first two fields are used; altitude is ignored. Tuples whose lon or lat is
/// not a finite number are skipped without error.
pub fn parse_coordinates(text: &str) -> Vec<Coordinate> {
    text.split_whitespace().filter_map(parse_tuple).collect()
}

/// Parses the first tuple of `text` as a single point.
pub fn parse_point(text: &str) -> Option<Coordinate> {
    text.split_whitespace().next().and_then(parse_tuple)
}

/// Converts GeoJSON positions, keeping the first two members of each.
pub fn from_positions(positions: &[Vec<f64>]) -> Vec<Coordinate> {
    positions.iter().filter_map(|p| from_position(p)).collect()
}

pub fn from_position(position: &[f64]) -> Option<Coordinate> {
    match position {
        [lon, lat, ..] => Coordinate::new(*lon, *lat),
        _ => None,
    }
}

fn parse_tuple(token: &str) -> Option<Coordinate> {
    let mut fields = token.split(',');
    let lon = fields.next()?.trim().parse::<f64>().ok()?;
    let lat = fields.next()?.trim().parse::<f64>().ok()?;
    Coordinate::new(lon, lat)
}
