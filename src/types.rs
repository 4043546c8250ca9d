//! Core types for spherical trixel computation.

use glam::DVec3;

/// A point on the unit sphere, represented as a 3D unit vector.
///
/// Construction from geographic coordinates normalizes onto the sphere;
/// the raw `from_xyz` constructor normalizes as well, so a `CartesianPoint`
/// is always unit length up to floating-point error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    /// Create from Cartesian components, normalizing onto the sphere.
    pub fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Self::from_glam(DVec3::new(x, y, z).normalize())
    }

    /// Create from geographic (longitude, latitude) in degrees.
    pub fn from_lonlat_deg(lon_deg: f64, lat_deg: f64) -> Self {
        let lon = lon_deg.to_radians();
        let lat = lat_deg.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        Self {
            x: cos_lat * cos_lon,
            y: cos_lat * sin_lon,
            z: sin_lat,
        }
    }

    #[inline]
    pub fn to_glam(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn from_glam(v: DVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }

    /// Latitude in degrees, in [-90, 90].
    #[inline]
    pub fn lat_deg(self) -> f64 {
        self.z.clamp(-1.0, 1.0).asin().to_degrees()
    }

    /// Longitude in degrees, in (-180, 180].
    #[inline]
    pub fn lon_deg(self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }

    /// Declination in degrees (astronomical alias for latitude).
    #[inline]
    pub fn dec_deg(self) -> f64 {
        self.lat_deg()
    }

    /// Right ascension in degrees, normalized to [0, 360).
    pub fn ra_deg(self) -> f64 {
        let ra = self.lon_deg();
        if ra < 0.0 {
            ra + 360.0
        } else {
            ra
        }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Angular distance to another point, in degrees.
    pub fn angular_distance_deg(self, other: Self) -> f64 {
        self.dot(other).clamp(-1.0, 1.0).acos().to_degrees()
    }
}

impl From<DVec3> for CartesianPoint {
    #[inline]
    fn from(v: DVec3) -> Self {
        Self::from_glam(v)
    }
}

impl From<CartesianPoint> for DVec3 {
    #[inline]
    fn from(p: CartesianPoint) -> DVec3 {
        p.to_glam()
    }
}

/// A spherical triangle: three unit vectors with counterclockwise winding
/// when viewed from outside the sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalTriangle {
    pub a: DVec3,
    pub b: DVec3,
    pub c: DVec3,
}

impl SphericalTriangle {
    #[inline]
    pub fn new(a: DVec3, b: DVec3, c: DVec3) -> Self {
        Self { a, b, c }
    }

    /// The normalized centroid of the triangle.
    #[inline]
    pub fn centroid(&self) -> DVec3 {
        (self.a + self.b + self.c).normalize()
    }

    /// Vertices in order.
    #[inline]
    pub fn vertices(&self) -> [DVec3; 3] {
        [self.a, self.b, self.c]
    }

    /// Contract the triangle toward its centroid by `epsilon`.
    ///
    /// Each vertex moves to `v - epsilon * (v - centroid)` and is
    /// renormalized onto the sphere. Used to absorb floating-point error
    /// in containment predicates; intersection tests keep the exact
    /// triangle.
    pub fn shrink(&self, epsilon: f64) -> Self {
        let centroid = self.centroid();
        let pull = |v: DVec3| (v - epsilon * (v - centroid)).normalize();
        Self {
            a: pull(self.a),
            b: pull(self.b),
            c: pull(self.c),
        }
    }

    /// Whether `p` lies inside the triangle (boundary inclusive).
    ///
    /// Relies on the counterclockwise winding invariant: a point is inside
    /// when it sits on the non-negative side of all three edge planes.
    pub fn contains_point(&self, p: DVec3) -> bool {
        const EDGE_TOL: f64 = -1e-12;
        self.a.cross(self.b).dot(p) >= EDGE_TOL
            && self.b.cross(self.c).dot(p) >= EDGE_TOL
            && self.c.cross(self.a).dot(p) >= EDGE_TOL
    }
}

/// Spherical linear interpolation between two unit vectors.
///
/// `t = 0` yields `a`, `t = 1` yields `b`, tracking the minor great-circle
/// arc. Falls back to normalized lerp for nearly parallel inputs.
pub(crate) fn slerp(a: DVec3, b: DVec3, t: f64) -> DVec3 {
    let cos_angle = a.dot(b).clamp(-1.0, 1.0);
    let angle = cos_angle.acos();
    if angle < 1e-9 {
        return (a + t * (b - a)).normalize();
    }
    let sin_angle = angle.sin();
    ((((1.0 - t) * angle).sin() * a + (t * angle).sin() * b) / sin_angle).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lonlat_roundtrip() {
        let p = CartesianPoint::from_lonlat_deg(45.0, 30.0);
        assert!((p.lon_deg() - 45.0).abs() < 1e-12);
        assert!((p.lat_deg() - 30.0).abs() < 1e-12);
        let len = (p.x * p.x + p.y * p.y + p.z * p.z).sqrt();
        assert!((len - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_ra_wraps_positive() {
        let p = CartesianPoint::from_lonlat_deg(-90.0, 0.0);
        assert!((p.ra_deg() - 270.0).abs() < 1e-12);
        assert!((p.dec_deg()).abs() < 1e-12);
    }

    #[test]
    fn test_shrink_pulls_toward_centroid() {
        let tri = SphericalTriangle::new(DVec3::X, DVec3::Y, DVec3::Z);
        let centroid = tri.centroid();
        let shrunk = tri.shrink(1e-3);
        for (v, s) in tri.vertices().into_iter().zip(shrunk.vertices()) {
            assert!(s.dot(centroid) > v.dot(centroid));
            assert!((s.length() - 1.0).abs() < 1e-15);
        }
    }

    #[test]
    fn test_contains_point_centroid_and_outside() {
        let tri = SphericalTriangle::new(DVec3::X, DVec3::Y, DVec3::Z);
        assert!(tri.contains_point(tri.centroid()));
        assert!(tri.contains_point(DVec3::X));
        assert!(!tri.contains_point(-tri.centroid()));
        assert!(!tri.contains_point(DVec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_slerp_endpoints_and_midpoint() {
        let a = DVec3::X;
        let b = DVec3::Y;
        assert!(slerp(a, b, 0.0).distance(a) < 1e-15);
        assert!(slerp(a, b, 1.0).distance(b) < 1e-15);
        let mid = slerp(a, b, 0.5);
        let expected = (a + b).normalize();
        assert!(mid.distance(expected) < 1e-12);
    }
}
