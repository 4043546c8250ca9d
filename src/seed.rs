//! Seed generation: bound a region with a convex and cover the bound
//! with trixels at a shallow level for the refinement to iterate on.

use geo::ConvexHull;
use geo_types::{Geometry, MultiPolygon};
use glam::DVec3;

use crate::adapter::{collect_polygons, vertices_of};
use crate::error::HtmError;
use crate::geometry::{chull, Convex, Halfspace, PointOrder};
use crate::htm::{Cover, Markup, FIRST_FACE, LAST_FACE};
use crate::log_enabled;
use crate::types::CartesianPoint;

/// Seed level used by the full indexer when the caller does not choose.
pub const DEFAULT_SEED_LEVEL: u8 = 8;

/// Substituted for out-of-range seed levels.
pub const FALLBACK_SEED_LEVEL: u8 = 10;

/// Deepest level the seed cover may be driven to.
pub const MAX_SEED_LEVEL: u8 = 16;

/// Upstream unit convention for converting an envelope angle to a
/// halfspace radius. Reproduced bit-exactly.
const ENVELOPE_ANGLE_FACTOR: f64 = 60.0;

/// How the initial convex bound of a region is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// Spherical convex hull of the region's vertices (preferred).
    SphericalHull,
    /// Convex hull computed by the host geometry library, re-bounded
    /// with the `Safe` point-ordering policy.
    HostHull,
    /// A single cap around the region's envelope center.
    EnclosingCap,
    /// No bound: start from the eight faces.
    FullGlobe,
}

/// Substitute the fallback for seed levels outside `[1, MAX_SEED_LEVEL]`.
#[inline]
pub fn coerce_seed_level(level: u8) -> u8 {
    if level == 0 || level > MAX_SEED_LEVEL {
        FALLBACK_SEED_LEVEL
    } else {
        level
    }
}

/// The eight face trixels, the whole-sphere seed.
pub fn full_globe_trixels() -> Vec<i64> {
    (FIRST_FACE..=LAST_FACE).collect()
}

/// Build the convex bound of a geography value for the given mode.
/// `FullGlobe` has no bound and yields `None`.
pub fn seed_convex(geom: &Geometry<f64>, mode: SeedMode) -> Result<Option<Convex>, HtmError> {
    match mode {
        SeedMode::SphericalHull => {
            let vertices = vertices_of(geom)?;
            Ok(Some(chull(&vertices)?))
        }
        SeedMode::HostHull => {
            let shape = MultiPolygon::new(collect_polygons(geom)?);
            let hull = shape.convex_hull();
            let points = ring_points(hull.exterior());
            Ok(Some(Convex::from_points(&points, PointOrder::Safe)?))
        }
        SeedMode::EnclosingCap => {
            let vertices = vertices_of(geom)?;
            Ok(Some(enclosing_cap(&vertices)?))
        }
        SeedMode::FullGlobe => Ok(None),
    }
}

/// Cover a convex with trixels at `seed_level`, returning the outer
/// markup as sorted IDs. Out-of-range levels are coerced first.
pub fn seed_trixels(convex: &Convex, seed_level: u8) -> Result<Vec<i64>, HtmError> {
    let seed_level = coerce_seed_level(seed_level);
    let mut simplified = convex.clone();
    simplified.simplify();
    let mut cover = Cover::new(&simplified)?;
    while cover.level() < seed_level {
        cover.step()?;
    }
    let ids = cover.trixels(Markup::Outer)?;
    if log_enabled() {
        eprintln!("seed cover: {} trixels at level {}", ids.len(), seed_level);
    }
    Ok(ids)
}

/// Single-cap bound: envelope center at the normalized vertex centroid,
/// halfspace radius at sixty times the envelope angle.
fn enclosing_cap(vertices: &[CartesianPoint]) -> Result<Convex, HtmError> {
    if vertices.is_empty() {
        return Err(HtmError::HullFailure(
            "no vertices for enclosing cap".to_string(),
        ));
    }
    let sum: DVec3 = vertices.iter().map(|p| p.to_glam()).sum();
    if sum.length() < 1e-12 {
        return Err(HtmError::HullFailure(
            "vertices have no envelope center".to_string(),
        ));
    }
    let center = CartesianPoint::from_glam(sum.normalize());
    let envelope_deg = vertices
        .iter()
        .map(|p| center.angular_distance_deg(*p))
        .fold(0.0f64, f64::max);
    Ok(Convex::from_cap(Halfspace::new(
        center.to_glam(),
        ENVELOPE_ANGLE_FACTOR * envelope_deg,
    )))
}

fn ring_points(ring: &geo_types::LineString<f64>) -> Vec<CartesianPoint> {
    let coords = &ring.0;
    let take = if coords.len() > 1 && coords.first() == coords.last() {
        coords.len() - 1
    } else {
        coords.len()
    };
    coords[..take]
        .iter()
        .map(|c| CartesianPoint::from_lonlat_deg(c.x, c.y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::htm::{id_of, level_of};
    use geo_types::polygon;

    fn square(lon0: f64, lat0: f64, size: f64) -> Geometry<f64> {
        Geometry::Polygon(polygon![
            (x: lon0, y: lat0),
            (x: lon0 + size, y: lat0),
            (x: lon0 + size, y: lat0 + size),
            (x: lon0, y: lat0 + size),
            (x: lon0, y: lat0),
        ])
    }

    #[test]
    fn test_coerce_seed_level() {
        assert_eq!(coerce_seed_level(0), FALLBACK_SEED_LEVEL);
        assert_eq!(coerce_seed_level(17), FALLBACK_SEED_LEVEL);
        assert_eq!(coerce_seed_level(1), 1);
        assert_eq!(coerce_seed_level(16), 16);
    }

    #[test]
    fn test_spherical_hull_seed_covers_region() {
        let geom = square(10.0, 10.0, 4.0);
        let convex = seed_convex(&geom, SeedMode::SphericalHull)
            .unwrap()
            .expect("hull mode produces a convex");
        let seeds = seed_trixels(&convex, 7).unwrap();
        assert!(!seeds.is_empty());
        for &id in &seeds {
            assert_eq!(level_of(id).unwrap(), 7);
        }
        // The region's interior must be covered by the seed set.
        let inside = CartesianPoint::from_lonlat_deg(12.0, 12.0);
        let id = id_of(inside.to_glam(), 7).unwrap();
        assert!(seeds.binary_search(&id).is_ok());
    }

    #[test]
    fn test_host_hull_matches_spherical_hull_coverage() {
        let geom = square(-30.0, 20.0, 6.0);
        let spherical = seed_convex(&geom, SeedMode::SphericalHull).unwrap().unwrap();
        let host = seed_convex(&geom, SeedMode::HostHull).unwrap().unwrap();
        let probe = CartesianPoint::from_lonlat_deg(-27.0, 23.0).to_glam();
        assert!(spherical.contains_point(probe));
        assert!(host.contains_point(probe));
    }

    #[test]
    fn test_enclosing_cap_uses_envelope_factor() {
        let geom = square(0.0, 0.0, 2.0);
        let convex = seed_convex(&geom, SeedMode::EnclosingCap).unwrap().unwrap();
        let cap = convex.halfspaces()[0];
        // Envelope angle is the center-to-corner distance (about 1.4
        // degrees for a 2-degree square); the radius carries the 60x
        // upstream convention.
        assert!(cap.radius_deg() > 60.0 && cap.radius_deg() <= 180.0);
    }

    #[test]
    fn test_full_globe_mode() {
        let geom = square(0.0, 0.0, 1.0);
        assert!(seed_convex(&geom, SeedMode::FullGlobe).unwrap().is_none());
        assert_eq!(full_globe_trixels(), vec![8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_hull_failure_propagates() {
        // A degenerate polygon with all vertices coincident.
        let geom = Geometry::Polygon(polygon![
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 1.0),
        ]);
        assert!(matches!(
            seed_convex(&geom, SeedMode::SphericalHull),
            Err(HtmError::HullFailure(_))
        ));
    }
}
