//! KML geometry extraction.
//!
//! Placemarks are visited in document order. A placemark holding
//! `MultiGeometry` containers is read container by container; otherwise the
//! placemark itself is the container. Inside a container, polygons come
//! first, then line strings, then points, each group in document order.

use crate::coords::{parse_coordinates, parse_point};
use crate::error::Result;
use crate::geometry::{Geometry, Ring};
use crate::logger;

pub mod xml;

use xml::XmlNode;

const OUTER_RING: [&str; 3] = ["outerBoundaryIs", "LinearRing", "coordinates"];
const INNER_RING: [&str; 3] = ["innerBoundaryIs", "LinearRing", "coordinates"];

/// Parses KML text and extracts its geometries.
pub fn parse_str(text: &str) -> Result<Vec<Geometry>> {
    let document = xml::parse(text)?;
    Ok(extract(&document))
}

/// Extracts every valid geometry of a parsed KML document.
///
/// Returns an empty list when nothing survives; deciding whether that is an
/// error is left to the caller.
pub fn extract(document: &XmlNode) -> Vec<Geometry> {
    let mut geometries = Vec::new();
    let mut placemarks = 0;

    for placemark in document.elements("Placemark") {
        placemarks += 1;
        let containers = placemark.outermost("MultiGeometry");
        if containers.is_empty() {
            extract_container(placemark, &mut geometries);
        } else {
            for container in containers {
                extract_container(container, &mut geometries);
            }
        }
    }

    logger::debug(&format!(
        "KML: {} placemark(s), {} geometries",
        placemarks,
        geometries.len()
    ));
    geometries
}

fn extract_container(container: &XmlNode, out: &mut Vec<Geometry>) {
    out.extend(container.select(&["Polygon"]).into_iter().filter_map(polygon));
    out.extend(container.select(&["LineString"]).into_iter().filter_map(line_string));
    out.extend(container.select(&["Point"]).into_iter().filter_map(point));
}

fn polygon(node: &XmlNode) -> Option<Geometry> {
    let outer = ring(node.select_first(&OUTER_RING));
    let holes: Vec<Ring> = node
        .select(&INNER_RING)
        .into_iter()
        .map(|coords| ring(Some(coords)))
        .collect();
    Geometry::polygon(outer, holes)
}

fn line_string(node: &XmlNode) -> Option<Geometry> {
    let coords = node
        .select_first(&["coordinates"])
        .map(|c| parse_coordinates(&c.text))
        .unwrap_or_default();
    Geometry::line_string(coords)
}

fn point(node: &XmlNode) -> Option<Geometry> {
    node.select_first(&["coordinates"])
        .and_then(|c| parse_point(&c.text))
        .map(Geometry::point)
}

fn ring(coordinates: Option<&XmlNode>) -> Ring {
    coordinates
        .map(|c| parse_coordinates(&c.text))
        .unwrap_or_default()
}
