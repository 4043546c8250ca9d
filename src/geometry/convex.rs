//! Convex spherical regions as halfspace intersections.

use glam::DVec3;

use super::halfspace::Halfspace;
use crate::error::HtmError;
use crate::types::{CartesianPoint, SphericalTriangle};

/// Tolerance for membership tests against cap boundaries. Witness points
/// produced by the root solver sit exactly on two boundaries, so the
/// emptiness search must not reject them for rounding.
const BOUNDARY_TOL: f64 = 1e-9;

/// Policy for interpreting a point list in [`Convex::from_points`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOrder {
    /// The points already trace the convex boundary in order.
    Trusted,
    /// Reorder the points by angle about their spherical centroid before
    /// building edges. Use when the source's vertex order is unverified.
    Safe,
}

/// Classification of a spherical triangle against a convex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleClass {
    /// The triangle lies entirely inside the convex.
    Inside,
    /// The triangle may straddle the boundary.
    Intersects,
    /// The triangle is provably disjoint from the convex.
    Disjoint,
}

/// An intersection of halfspaces on the sphere.
#[derive(Debug, Clone)]
pub struct Convex {
    halfspaces: Vec<Halfspace>,
    empty: bool,
}

impl Convex {
    /// A convex bounded by a single cap.
    pub fn from_cap(cap: Halfspace) -> Self {
        Self {
            halfspaces: vec![cap],
            empty: false,
        }
    }

    /// Assemble a convex from prebuilt halfspaces. The caller is expected
    /// to `simplify()` before relying on emptiness.
    pub(crate) fn from_halfspaces(halfspaces: Vec<Halfspace>) -> Self {
        Self {
            halfspaces,
            empty: false,
        }
    }

    /// Build a convex polygon from boundary points.
    ///
    /// Consecutive point pairs become great-circle halfspaces oriented so
    /// the points' spherical centroid is inside. Requires at least three
    /// points with a well-defined centroid.
    pub fn from_points(points: &[CartesianPoint], order: PointOrder) -> Result<Self, HtmError> {
        if points.len() < 3 {
            return Err(HtmError::InvalidArgument(format!(
                "convex needs at least 3 points, got {}",
                points.len()
            )));
        }
        let mut vectors: Vec<DVec3> = points.iter().map(|p| p.to_glam()).collect();
        let sum: DVec3 = vectors.iter().copied().sum();
        if sum.length() < 1e-12 {
            return Err(HtmError::InvalidArgument(
                "points have no spherical centroid".to_string(),
            ));
        }
        let center = sum.normalize();

        if order == PointOrder::Safe {
            // Sort by angle in the tangent plane at the centroid.
            let reference = if center.z.abs() < 0.9 { DVec3::Z } else { DVec3::X };
            let u = center.cross(reference).normalize();
            let v = center.cross(u);
            vectors.sort_by(|a, b| {
                let ta = a.dot(v).atan2(a.dot(u));
                let tb = b.dot(v).atan2(b.dot(u));
                ta.total_cmp(&tb)
            });
        }

        let mut halfspaces = Vec::with_capacity(vectors.len());
        for (i, &p) in vectors.iter().enumerate() {
            let q = vectors[(i + 1) % vectors.len()];
            let normal = p.cross(q);
            if normal.length() < 1e-12 {
                // Coincident or antipodal neighbors define no edge.
                continue;
            }
            let axis = if normal.dot(center) >= 0.0 {
                normal
            } else {
                -normal
            };
            halfspaces.push(Halfspace::great_circle(axis));
        }
        if halfspaces.len() < 3 {
            return Err(HtmError::InvalidArgument(
                "points are degenerate (collinear on a great circle)".to_string(),
            ));
        }

        let mut convex = Self {
            halfspaces,
            empty: false,
        };
        convex.simplify();
        Ok(convex)
    }

    #[inline]
    pub fn halfspaces(&self) -> &[Halfspace] {
        &self.halfspaces
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn contains_point(&self, p: DVec3) -> bool {
        !self.empty && self.halfspaces.iter().all(|h| h.contains(p))
    }

    /// Remove redundant halfspaces and detect emptiness.
    ///
    /// A halfspace implied by another is dropped. The convex is empty when
    /// two caps are disjoint, or when no witness point (a cap axis or a
    /// pairwise boundary root) survives every halfspace.
    pub fn simplify(&mut self) {
        if self.empty {
            return;
        }

        // Disjoint cap pair: nothing can satisfy both.
        for i in 0..self.halfspaces.len() {
            for j in (i + 1)..self.halfspaces.len() {
                if self.halfspaces[i].disjoint_with(&self.halfspaces[j]) {
                    self.empty = true;
                    self.halfspaces.clear();
                    return;
                }
            }
        }

        // Drop halfspaces implied by a kept one. Of two mutually implying
        // (identical) caps the earlier survives.
        let n = self.halfspaces.len();
        let mut removed = vec![false; n];
        for i in 0..n {
            for j in 0..n {
                if i == j || removed[j] || removed[i] {
                    continue;
                }
                if self.halfspaces[j].implies(&self.halfspaces[i])
                    && (!self.halfspaces[i].implies(&self.halfspaces[j]) || j < i)
                {
                    removed[i] = true;
                }
            }
        }
        let mut kept = Vec::with_capacity(n);
        for (i, h) in self.halfspaces.drain(..).enumerate() {
            if !removed[i] {
                kept.push(h);
            }
        }
        self.halfspaces = kept;

        if self.halfspaces.len() >= 2 && self.witness().is_none() {
            self.empty = true;
            self.halfspaces.clear();
        }
    }

    /// A point inside every halfspace, if one can be exhibited.
    fn witness(&self) -> Option<DVec3> {
        let inside_all =
            |p: DVec3| self.halfspaces.iter().all(|h| h.contains_with_tol(p, BOUNDARY_TOL));

        for h in &self.halfspaces {
            if inside_all(h.axis()) {
                return Some(h.axis());
            }
        }
        for i in 0..self.halfspaces.len() {
            for j in (i + 1)..self.halfspaces.len() {
                if let Some(roots) = boundary_roots(&self.halfspaces[i], &self.halfspaces[j]) {
                    for root in roots {
                        if inside_all(root) {
                            return Some(root);
                        }
                    }
                }
            }
        }
        None
    }

    /// Classify a trixel triangle against this convex.
    ///
    /// `Disjoint` is only returned when the triangle provably misses one
    /// halfspace entirely; a triangle that intersects every halfspace but
    /// not their intersection is conservatively `Intersects`, which keeps
    /// the covering an over-approximation.
    pub fn classify_triangle(&self, tri: &SphericalTriangle) -> TriangleClass {
        if self.empty {
            return TriangleClass::Disjoint;
        }
        let edges = [(tri.a, tri.b), (tri.b, tri.c), (tri.c, tri.a)];
        let mut inside_all = true;
        for h in &self.halfspaces {
            let mut min_dot = f64::INFINITY;
            let mut max_dot = f64::NEG_INFINITY;
            for &(p, q) in &edges {
                let (lo, hi) = h.dot_extrema_on_arc(p, q);
                min_dot = min_dot.min(lo);
                max_dot = max_dot.max(hi);
            }
            // The global extrema of axis.p over the triangle interior are
            // at the axis or its antipode when either falls inside.
            if tri.contains_point(h.axis()) {
                max_dot = 1.0;
            }
            if tri.contains_point(-h.axis()) {
                min_dot = -1.0;
            }

            if max_dot < h.cos_radius() - BOUNDARY_TOL {
                return TriangleClass::Disjoint;
            }
            if min_dot < h.cos_radius() - BOUNDARY_TOL {
                inside_all = false;
            }
        }
        if inside_all {
            TriangleClass::Inside
        } else {
            TriangleClass::Intersects
        }
    }
}

/// The two intersection points of a pair of cap boundaries, when the
/// boundary circles meet.
fn boundary_roots(h1: &Halfspace, h2: &Halfspace) -> Option<[DVec3; 2]> {
    let a1 = h1.axis();
    let a2 = h2.axis();
    let c1 = h1.cos_radius();
    let c2 = h2.cos_radius();
    let d = a1.dot(a2);
    let denom = 1.0 - d * d;
    if denom < 1e-15 {
        return None;
    }
    let u = (c1 - c2 * d) / denom;
    let v = (c2 - c1 * d) / denom;
    let base = u * a1 + v * a2;
    let rem = 1.0 - base.length_squared();
    if rem < -1e-12 {
        return None;
    }
    let offset = a1.cross(a2).normalize() * rem.max(0.0).sqrt();
    Some([
        (base + offset).normalize(),
        (base - offset).normalize(),
    ])
}
