//! Oriented spherical caps.

use glam::DVec3;

/// An oriented spherical cap: all points within `radius_deg` of `axis`.
///
/// A radius of 90 degrees is a hemisphere bounded by the great circle
/// perpendicular to the axis; radii up to 180 degrees (the whole sphere)
/// are allowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Halfspace {
    axis: DVec3,
    radius_deg: f64,
    cos_radius: f64,
}

impl Halfspace {
    /// Create a halfspace; the axis is normalized, the radius clamped to
    /// [0, 180] degrees.
    pub fn new(axis: DVec3, radius_deg: f64) -> Self {
        let radius_deg = radius_deg.clamp(0.0, 180.0);
        Self {
            axis: axis.normalize(),
            radius_deg,
            cos_radius: radius_deg.to_radians().cos(),
        }
    }

    /// The hemisphere on the positive side of the great circle
    /// perpendicular to `axis`.
    #[inline]
    pub fn great_circle(axis: DVec3) -> Self {
        Self::new(axis, 90.0)
    }

    #[inline]
    pub fn axis(&self) -> DVec3 {
        self.axis
    }

    #[inline]
    pub fn radius_deg(&self) -> f64 {
        self.radius_deg
    }

    #[inline]
    pub fn cos_radius(&self) -> f64 {
        self.cos_radius
    }

    #[inline]
    pub fn contains(&self, p: DVec3) -> bool {
        self.axis.dot(p) >= self.cos_radius
    }

    #[inline]
    pub(crate) fn contains_with_tol(&self, p: DVec3, tol: f64) -> bool {
        self.axis.dot(p) >= self.cos_radius - tol
    }

    /// Angular distance between the two cap axes, degrees.
    #[inline]
    fn axis_distance_deg(&self, other: &Halfspace) -> f64 {
        self.axis.dot(other.axis).clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Whether this cap lies entirely within `other` (so `other` is
    /// implied by membership in `self`).
    pub(crate) fn implies(&self, other: &Halfspace) -> bool {
        self.axis_distance_deg(other) + self.radius_deg <= other.radius_deg + 1e-12
    }

    /// Whether the two caps share no point.
    pub(crate) fn disjoint_with(&self, other: &Halfspace) -> bool {
        self.axis_distance_deg(other) > self.radius_deg + other.radius_deg + 1e-12
    }

    /// Extrema of `axis . p` along the minor great-circle arc from `a`
    /// to `b`, returned as `(min, max)`.
    ///
    /// The dot product along the arc is `A cos t + B sin t` for the
    /// tangent frame at `a`; the interior extremum only counts when its
    /// parameter falls inside the arc.
    pub(crate) fn dot_extrema_on_arc(&self, a: DVec3, b: DVec3) -> (f64, f64) {
        let n = self.axis;
        let da = a.dot(n);
        let db = b.dot(n);
        let cos_arc = a.dot(b).clamp(-1.0, 1.0);
        let arc = cos_arc.acos();
        if arc < 1e-9 {
            return (da.min(db), da.max(db));
        }
        let tangent = (b - cos_arc * a).normalize();
        let dt = tangent.dot(n);
        let amplitude = (da * da + dt * dt).sqrt();
        let peak = dt.atan2(da);

        let mut max = da.max(db);
        if peak >= 0.0 && peak <= arc {
            max = amplitude;
        }
        let mut min = da.min(db);
        let trough = if peak > 0.0 {
            peak - std::f64::consts::PI
        } else {
            peak + std::f64::consts::PI
        };
        if trough >= 0.0 && trough <= arc {
            min = -amplitude;
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Point at the given latitude on the prime meridian.
    fn lat_point(lat_deg: f64) -> DVec3 {
        let lat = lat_deg.to_radians();
        DVec3::new(lat.cos(), 0.0, lat.sin())
    }

    #[test]
    fn test_contains_cap() {
        let h = Halfspace::new(DVec3::Z, 45.0);
        assert!(h.contains(DVec3::Z));
        assert!(h.contains(lat_point(60.0)));
        assert!(!h.contains(DVec3::X));
        assert!(!h.contains(-DVec3::Z));
    }

    #[test]
    fn test_implies_and_disjoint() {
        let small = Halfspace::new(DVec3::Z, 10.0);
        let big = Halfspace::new(DVec3::Z, 40.0);
        assert!(small.implies(&big));
        assert!(!big.implies(&small));

        let north = Halfspace::new(DVec3::Z, 10.0);
        let south = Halfspace::new(-DVec3::Z, 10.0);
        assert!(north.disjoint_with(&south));
        assert!(!north.disjoint_with(&big));
    }

    #[test]
    fn test_arc_extrema_interior_peak() {
        // Arc from (1,0,0) to (-ish) the other side of the z-axis peak:
        // both endpoints at z=0.5, the arc top passes closer to the pole.
        let a = DVec3::new(0.75f64.sqrt(), 0.0, 0.5);
        let b = DVec3::new(-0.75f64.sqrt(), 0.0, 0.5).normalize();
        let h = Halfspace::great_circle(DVec3::Z);
        let (min, max) = h.dot_extrema_on_arc(a, b);
        assert!(max > 0.99, "arc should pass near the pole, max = {}", max);
        assert!((min - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_arc_extrema_endpoints_only() {
        // Short arc on the equator: z-dot stays zero.
        let a = DVec3::X;
        let b = DVec3::new(1.0, 0.2, 0.0).normalize();
        let h = Halfspace::great_circle(DVec3::Z);
        let (min, max) = h.dot_extrema_on_arc(a, b);
        assert!(min.abs() < 1e-12 && max.abs() < 1e-12);
    }
}
