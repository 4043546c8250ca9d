#![allow(dead_code)]

use geo_types::{polygon, Coord, Geometry, GeometryCollection, LineString, Polygon};
use htm_index::htm::triangle_of;
use htm_index::GeoRegion;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Axis-aligned rectangle in lon/lat degrees.
pub fn rect(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Geometry<f64> {
    Geometry::Polygon(polygon![
        (x: lon0, y: lat0),
        (x: lon1, y: lat0),
        (x: lon1, y: lat1),
        (x: lon0, y: lat1),
        (x: lon0, y: lat0),
    ])
}

/// Square with the given lower-left corner and side, degrees.
pub fn square(lon0: f64, lat0: f64, size: f64) -> Geometry<f64> {
    rect(lon0, lat0, lon0 + size, lat0 + size)
}

/// The planar-proxy polygon of a trixel, as a geography value.
///
/// Uses the same edge sampling as the shipped region host, so a region
/// built from this geometry is exactly the trixel's own boundary.
pub fn trixel_geometry(id: i64) -> Geometry<f64> {
    let tri = triangle_of(id).expect("valid trixel id");
    Geometry::Polygon(GeoRegion::triangle_polygon(&tri))
}

/// A collection of disjoint square polygons.
pub fn square_collection(squares: &[(f64, f64, f64)]) -> Geometry<f64> {
    Geometry::GeometryCollection(GeometryCollection::new_from(
        squares
            .iter()
            .map(|&(lon, lat, size)| square(lon, lat, size))
            .collect(),
    ))
}

/// A random star-convex polygon around a center, seeded for
/// reproducibility.
pub fn random_blob(
    center_lon: f64,
    center_lat: f64,
    radius_deg: f64,
    vertices: usize,
    seed: u64,
) -> Geometry<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut coords: Vec<Coord<f64>> = (0..vertices)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / vertices as f64;
            let r = radius_deg * rng.gen_range(0.5..1.0);
            Coord {
                x: center_lon + r * angle.cos(),
                y: center_lat + r * angle.sin(),
            }
        })
        .collect();
    coords.push(coords[0]);
    Geometry::Polygon(Polygon::new(LineString::new(coords), vec![]))
}

/// Interior sample points of a rectangle, inset by `margin` degrees.
pub fn grid_samples(
    lon0: f64,
    lat0: f64,
    lon1: f64,
    lat1: f64,
    margin: f64,
    per_axis: usize,
) -> Vec<(f64, f64)> {
    let (lon0, lat0) = (lon0 + margin, lat0 + margin);
    let (lon1, lat1) = (lon1 - margin, lat1 - margin);
    let mut samples = Vec::with_capacity(per_axis * per_axis);
    for i in 0..per_axis {
        for j in 0..per_axis {
            let fx = (i as f64 + 0.5) / per_axis as f64;
            let fy = (j as f64 + 0.5) / per_axis as f64;
            samples.push((lon0 + fx * (lon1 - lon0), lat0 + fy * (lat1 - lat0)));
        }
    }
    samples
}
