//! Spherical geometry primitives: halfspaces, convexes, and the
//! spherical convex hull used to bound regions before refinement.

mod convex;
mod halfspace;
mod hull;

pub use convex::{Convex, PointOrder, TriangleClass};
pub use halfspace::Halfspace;
pub use hull::chull;
