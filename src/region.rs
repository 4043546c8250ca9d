//! Region predicates: the host-geometry seam of the refinement.
//!
//! The evaluator only ever asks three questions of a region: does it
//! contain a trixel triangle, what is its intersection with one, and is
//! it empty. [`Region`] is that seam; [`GeoRegion`] is the shipped
//! implementation, backed by `geo` planar predicates over longitude /
//! latitude degrees, with trixel edges chord-sampled along their great
//! circles so the planar proxy tracks the geodesic boundary.
//!
//! The planar proxy does not model regions that cross the antimeridian
//! or enclose a pole; such inputs need a fully spherical `Region`
//! implementation behind the same trait.

use geo::{BooleanOps, Contains};
use geo_types::{Coord, Geometry, LineString, MultiPolygon, Polygon};
use glam::DVec3;

use crate::adapter::collect_polygons;
use crate::error::HtmError;
use crate::types::{slerp, SphericalTriangle};

/// Maximum arc length, in degrees, represented by one chord of a sampled
/// trixel edge.
const EDGE_SAMPLE_STEP_DEG: f64 = 2.0;

/// Cap on chords per edge (face edges are 90 degrees long).
const MAX_EDGE_SEGMENTS: usize = 48;

/// Geometric predicate interface consumed by the trixel evaluator.
///
/// `intersection` returning `None` and returning an empty region are
/// treated identically by callers: the branch is pruned.
pub trait Region: Sized {
    /// Does the region contain the whole triangle?
    fn contains(&self, tri: &SphericalTriangle) -> Result<bool, HtmError>;

    /// The intersection of the region with the triangle, or `None` when
    /// they do not overlap.
    fn intersection(&self, tri: &SphericalTriangle) -> Result<Option<Self>, HtmError>;

    /// Whether the region is empty.
    fn is_empty(&self) -> bool;
}

/// A polygonal region in longitude/latitude degrees, evaluated with the
/// `geo` crate's exact predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRegion {
    shape: MultiPolygon<f64>,
}

impl GeoRegion {
    pub fn new(shape: MultiPolygon<f64>) -> Self {
        Self { shape }
    }

    /// Build from a host geography value: a `Polygon` or a
    /// `GeometryCollection` of polygons. Other leaf types fail with
    /// `UnsupportedGeometry`.
    pub fn from_geometry(geom: &Geometry<f64>) -> Result<Self, HtmError> {
        Ok(Self::new(MultiPolygon::new(collect_polygons(geom)?)))
    }

    /// A region equal to one spherical triangle's planar proxy.
    pub fn from_triangle(tri: &SphericalTriangle) -> Self {
        Self::new(MultiPolygon::new(vec![Self::triangle_polygon(tri)]))
    }

    /// The planar-proxy polygon of a spherical triangle, with edges
    /// chord-sampled along their great circles. This is the exact shape
    /// the predicates see for a trixel.
    pub fn triangle_polygon(tri: &SphericalTriangle) -> Polygon<f64> {
        triangle_polygon(tri)
    }

    #[inline]
    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }
}

impl Region for GeoRegion {
    fn contains(&self, tri: &SphericalTriangle) -> Result<bool, HtmError> {
        Ok(self.shape.contains(&triangle_polygon(tri)))
    }

    fn intersection(&self, tri: &SphericalTriangle) -> Result<Option<Self>, HtmError> {
        let clip = MultiPolygon::new(vec![triangle_polygon(tri)]);
        let result = self.shape.intersection(&clip);
        if result.0.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Self::new(result)))
        }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.shape.0.is_empty()
    }
}

/// Materialize a spherical triangle as a closed lon/lat ring,
/// chord-sampling each great-circle edge.
pub(crate) fn triangle_polygon(tri: &SphericalTriangle) -> Polygon<f64> {
    let corners = [tri.a, tri.b, tri.c];
    let mut coords: Vec<Coord<f64>> = Vec::new();
    let mut prev_lon: Option<f64> = None;

    for i in 0..3 {
        let p = corners[i];
        let q = corners[(i + 1) % 3];
        let arc_deg = p.dot(q).clamp(-1.0, 1.0).acos().to_degrees();
        let segments = ((arc_deg / EDGE_SAMPLE_STEP_DEG).ceil() as usize)
            .clamp(1, MAX_EDGE_SEGMENTS);
        for k in 0..segments {
            let t = k as f64 / segments as f64;
            let coord = unwrapped_coord(slerp(p, q, t), prev_lon);
            prev_lon = Some(coord.x);
            coords.push(coord);
        }
    }
    // A leading pole vertex has no longitude of its own; give it its
    // neighbor's so the ring does not sweep across the map.
    if coords.len() > 1 && coords[0].y.abs() > 90.0 - 1e-9 {
        coords[0].x = coords[1].x;
    }
    if let Some(first) = coords.first().copied() {
        coords.push(first);
    }
    Polygon::new(LineString::new(coords), vec![])
}

/// Convert a unit vector to lon/lat, keeping longitude continuous with
/// the previous ring coordinate. Pole points inherit the previous
/// longitude since their own is undefined.
fn unwrapped_coord(v: DVec3, prev_lon: Option<f64>) -> Coord<f64> {
    let lat = v.z.clamp(-1.0, 1.0).asin().to_degrees();
    let mut lon = v.y.atan2(v.x).to_degrees();
    if let Some(prev) = prev_lon {
        if lat.abs() > 90.0 - 1e-9 {
            lon = prev;
        } else {
            while lon - prev > 180.0 {
                lon -= 360.0;
            }
            while prev - lon > 180.0 {
                lon += 360.0;
            }
        }
    }
    Coord { x: lon, y: lat }
}
