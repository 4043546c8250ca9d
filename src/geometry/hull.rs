//! Spherical convex hull construction.
//!
//! Gift wrapping on the sphere: walk the boundary keeping every other
//! vertex on the left of each great-circle edge. Only point sets that fit
//! in a hemisphere have a convex hull here; anything wider fails.

use glam::DVec3;

use super::convex::Convex;
use super::halfspace::Halfspace;
use crate::error::HtmError;
use crate::types::CartesianPoint;

/// Squared chord distance below which two vertices are one point.
const DEDUP_TOL: f64 = 1e-20;

/// Side-test tolerance for the wrap: values this close to the edge plane
/// count as collinear.
const SIDE_TOL: f64 = 1e-15;

/// Compute the spherical convex hull of a vertex list as a [`Convex`]
/// (one great-circle halfspace per hull edge).
///
/// Fails with `HullFailure` when fewer than three distinct vertices
/// remain after deduplication, when the vertices do not fit in a
/// hemisphere, or when the boundary walk degenerates.
pub fn chull(points: &[CartesianPoint]) -> Result<Convex, HtmError> {
    let mut vertices: Vec<DVec3> = Vec::with_capacity(points.len());
    for p in points {
        let v = p.to_glam();
        if !vertices.iter().any(|w| w.distance_squared(v) < DEDUP_TOL) {
            vertices.push(v);
        }
    }
    if vertices.len() < 3 {
        return Err(HtmError::HullFailure(format!(
            "need at least 3 distinct vertices, got {}",
            vertices.len()
        )));
    }

    let sum: DVec3 = vertices.iter().copied().sum();
    if sum.length() < 1e-12 {
        return Err(HtmError::HullFailure(
            "vertices have no bounding hemisphere".to_string(),
        ));
    }
    let center = sum.normalize();
    if vertices.iter().any(|v| v.dot(center) <= 1e-12) {
        return Err(HtmError::HullFailure(
            "vertices do not fit in a hemisphere".to_string(),
        ));
    }

    let hull = wrap(&vertices, center)?;

    let mut halfspaces = Vec::with_capacity(hull.len());
    for (i, &a) in hull.iter().enumerate() {
        let b = hull[(i + 1) % hull.len()];
        let normal = vertices[a].cross(vertices[b]);
        if normal.length() < 1e-12 {
            continue;
        }
        let axis = if normal.dot(center) >= 0.0 { normal } else { -normal };
        halfspaces.push(Halfspace::great_circle(axis));
    }
    if halfspaces.len() < 3 {
        return Err(HtmError::HullFailure("degenerate hull boundary".to_string()));
    }

    let mut convex = Convex::from_halfspaces(halfspaces);
    convex.simplify();
    if convex.is_empty() {
        return Err(HtmError::HullFailure("hull simplified to nothing".to_string()));
    }
    Ok(convex)
}

/// Gift-wrap walk over vertex indices. The start vertex is the one
/// farthest from the hemisphere center (deterministic tie-break on
/// coordinates), which is always on the hull.
fn wrap(vertices: &[DVec3], center: DVec3) -> Result<Vec<usize>, HtmError> {
    let start = (0..vertices.len())
        .min_by(|&i, &j| {
            vertices[i]
                .dot(center)
                .total_cmp(&vertices[j].dot(center))
                .then_with(|| cmp_lex(vertices[i], vertices[j]))
        })
        .ok_or_else(|| HtmError::HullFailure("empty vertex set".to_string()))?;

    let mut hull = vec![start];
    let mut current = start;
    loop {
        let mut candidate = usize::MAX;
        for r in 0..vertices.len() {
            if r == current {
                continue;
            }
            if candidate == usize::MAX {
                candidate = r;
                continue;
            }
            let side = vertices[current]
                .cross(vertices[candidate])
                .dot(vertices[r]);
            if side < -SIDE_TOL {
                candidate = r;
            } else if side.abs() <= SIDE_TOL {
                // Collinear with the tentative edge: keep the farther
                // endpoint so interior collinear vertices are skipped.
                if vertices[r].dot(vertices[current])
                    < vertices[candidate].dot(vertices[current])
                {
                    candidate = r;
                }
            }
        }
        if candidate == usize::MAX {
            return Err(HtmError::HullFailure("no wrap candidate".to_string()));
        }
        if candidate == start {
            break;
        }
        if hull.len() > vertices.len() {
            return Err(HtmError::HullFailure("hull walk did not close".to_string()));
        }
        hull.push(candidate);
        current = candidate;
    }
    if hull.len() < 3 {
        return Err(HtmError::HullFailure(
            "hull collapsed to fewer than 3 vertices".to_string(),
        ));
    }
    Ok(hull)
}

fn cmp_lex(a: DVec3, b: DVec3) -> std::cmp::Ordering {
    a.x.total_cmp(&b.x)
        .then(a.y.total_cmp(&b.y))
        .then(a.z.total_cmp(&b.z))
}
