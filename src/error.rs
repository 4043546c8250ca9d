//! Error types for HTM index construction.

use std::fmt;

/// Errors that can occur while building a trixel covering.
///
/// No error is recovered locally: any failure aborts the indexing
/// invocation that produced it. An empty intersection is not an error,
/// it just prunes a branch of the refinement.
#[derive(Debug, Clone)]
pub enum HtmError {
    /// A leaf sub-geometry had a type other than `Polygon`.
    /// Carries the offending type's name.
    UnsupportedGeometry(String),

    /// The spherical convex-hull generator could not bound the region
    /// (too few distinct vertices, no bounding hemisphere, or a hull
    /// walk that failed to close).
    HullFailure(String),

    /// A caller-supplied parameter was out of range, or a range
    /// operation was given mismatched levels / an inverted range.
    InvalidArgument(String),

    /// The host geometry predicate reported a failure.
    /// Surfaced unchanged from the region implementation.
    HostPredicate(String),
}

impl fmt::Display for HtmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtmError::UnsupportedGeometry(kind) => {
                write!(f, "unsupported geometry type: {}", kind)
            }
            HtmError::HullFailure(msg) => {
                write!(f, "convex hull failed: {}", msg)
            }
            HtmError::InvalidArgument(msg) => {
                write!(f, "invalid argument: {}", msg)
            }
            HtmError::HostPredicate(msg) => {
                write!(f, "host predicate failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for HtmError {}
