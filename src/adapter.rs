//! Geography adapter: flatten a polygonal geography value into the
//! ordered vertex sequence the hull generator consumes.

use geo_types::{Geometry, LineString, Polygon};

use crate::error::HtmError;
use crate::types::CartesianPoint;

/// Flatten a geography value into an ordered vertex sequence.
///
/// Each polygon contributes its exterior ring and then its holes, in ring
/// order; holes are not distinguished in the output, which only feeds the
/// orientation-agnostic hull generator. Sub-geometries of a collection
/// are visited depth-first and concatenated.
pub fn vertices_of(geom: &Geometry<f64>) -> Result<Vec<CartesianPoint>, HtmError> {
    let polygons = collect_polygons(geom)?;
    let mut vertices = Vec::new();
    for polygon in &polygons {
        push_ring(polygon.exterior(), &mut vertices);
        for hole in polygon.interiors() {
            push_ring(hole, &mut vertices);
        }
    }
    Ok(vertices)
}

/// Recursively collect the polygons of a geography value.
///
/// Only `Polygon` leaves and (nested) `GeometryCollection`s are accepted.
/// Everything else fails with `UnsupportedGeometry` naming the type; the
/// stricter reject rule applies to `MultiPolygon` as well, preserving the
/// vertex-ordering guarantees of explicit polygon lists.
pub(crate) fn collect_polygons(geom: &Geometry<f64>) -> Result<Vec<Polygon<f64>>, HtmError> {
    let mut polygons = Vec::new();
    collect_into(geom, &mut polygons)?;
    Ok(polygons)
}

fn collect_into(geom: &Geometry<f64>, out: &mut Vec<Polygon<f64>>) -> Result<(), HtmError> {
    match geom {
        Geometry::Polygon(polygon) => {
            out.push(polygon.clone());
            Ok(())
        }
        Geometry::GeometryCollection(collection) => {
            for child in &collection.0 {
                collect_into(child, out)?;
            }
            Ok(())
        }
        other => Err(HtmError::UnsupportedGeometry(type_name(other).to_string())),
    }
}

fn type_name(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Append a ring's vertices, skipping the closing repeat of the first
/// coordinate. Coordinates are (longitude, latitude) degrees.
fn push_ring(ring: &LineString<f64>, out: &mut Vec<CartesianPoint>) {
    let coords = &ring.0;
    let take = if coords.len() > 1 && coords.first() == coords.last() {
        coords.len() - 1
    } else {
        coords.len()
    };
    out.extend(
        coords[..take]
            .iter()
            .map(|c| CartesianPoint::from_lonlat_deg(c.x, c.y)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, GeometryCollection, MultiPolygon, Point};

    fn unit_square() -> Polygon<f64> {
        polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ]
    }

    #[test]
    fn test_polygon_vertices_skip_closing_repeat() {
        let vertices = vertices_of(&Geometry::Polygon(unit_square())).unwrap();
        assert_eq!(vertices.len(), 4);
        assert!((vertices[0].lon_deg()).abs() < 1e-12);
        assert!((vertices[2].lat_deg() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_holes_contribute_vertices() {
        let with_hole = Polygon::new(
            unit_square().exterior().clone(),
            vec![LineString::from(vec![
                (0.25, 0.25),
                (0.75, 0.25),
                (0.5, 0.75),
                (0.25, 0.25),
            ])],
        );
        let vertices = vertices_of(&Geometry::Polygon(with_hole)).unwrap();
        assert_eq!(vertices.len(), 7);
    }

    #[test]
    fn test_collection_concatenates_depth_first() {
        let shifted = polygon![
            (x: 5.0, y: 5.0),
            (x: 6.0, y: 5.0),
            (x: 6.0, y: 6.0),
            (x: 5.0, y: 5.0),
        ];
        let nested = Geometry::GeometryCollection(GeometryCollection::new_from(vec![
            Geometry::Polygon(unit_square()),
            Geometry::GeometryCollection(GeometryCollection::new_from(vec![Geometry::Polygon(
                shifted,
            )])),
        ]));
        let vertices = vertices_of(&nested).unwrap();
        assert_eq!(vertices.len(), 7);
        // Order: first polygon's ring, then the nested one's.
        assert!(vertices[4].lon_deg() > 4.0);
    }

    #[test]
    fn test_rejects_non_polygon_leaves() {
        let cases: Vec<(Geometry<f64>, &str)> = vec![
            (Geometry::Point(Point::new(0.0, 0.0)), "Point"),
            (
                Geometry::LineString(LineString::from(vec![(0.0, 0.0), (1.0, 1.0)])),
                "LineString",
            ),
            (
                Geometry::MultiPolygon(MultiPolygon::new(vec![unit_square()])),
                "MultiPolygon",
            ),
        ];
        for (geom, expected) in cases {
            match vertices_of(&geom) {
                Err(HtmError::UnsupportedGeometry(name)) => assert_eq!(name, expected),
                other => panic!("expected UnsupportedGeometry, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_rejects_non_polygon_inside_collection() {
        let mixed = Geometry::GeometryCollection(GeometryCollection::new_from(vec![
            Geometry::Polygon(unit_square()),
            Geometry::Point(Point::new(2.0, 2.0)),
        ]));
        assert!(matches!(
            vertices_of(&mixed),
            Err(HtmError::UnsupportedGeometry(_))
        ));
    }
}
