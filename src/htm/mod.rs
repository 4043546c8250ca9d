//! Hierarchical Triangular Mesh identifier arithmetic.
//!
//! An HTM ID is a 64-bit signed integer in the paper encoding: a leading
//! 1 bit, three face bits (the eight octahedron faces are IDs 8..=15, the
//! level-1 trixels), then two bits per additional subdivision level. A
//! trixel's four children are `id * 4 + {0, 1, 2, 3}`, its parent is
//! `id >> 2`, and all descendants of a trixel at a deeper level form one
//! contiguous ID range.

mod cover;
mod range;
mod triangle;

pub use cover::{Cover, Markup};
pub use range::{truncate_range, TruncateRange};
pub use triangle::{id_of, triangle_of};

use crate::error::HtmError;

/// Deepest subdivision level supported by the encoding.
pub const MAX_LEVEL: u8 = 20;

/// Fixed level output ranges are normalized to. Point HTM IDs in the
/// downstream classification pipeline are computed at this level.
pub const STORAGE_LEVEL: u8 = 20;

/// First face ID (level-1 trixel S0).
pub(crate) const FIRST_FACE: i64 = 8;

/// Last face ID (level-1 trixel N3).
pub(crate) const LAST_FACE: i64 = 15;

#[inline]
fn bit_length(id: i64) -> u32 {
    64 - id.leading_zeros()
}

/// The subdivision level encoded in `id`.
///
/// IDs 8..=15 are level 1; each additional two bits add a level.
/// Fails with `InvalidArgument` for IDs outside the encoding (below 8,
/// odd bit length, or deeper than [`MAX_LEVEL`]).
pub fn level_of(id: i64) -> Result<u8, HtmError> {
    if id < FIRST_FACE {
        return Err(HtmError::InvalidArgument(format!(
            "not an HTM id: {}",
            id
        )));
    }
    let bits = bit_length(id);
    if bits % 2 != 0 {
        return Err(HtmError::InvalidArgument(format!(
            "not an HTM id: {} (odd bit length)",
            id
        )));
    }
    let level = (bits / 2 - 1) as u8;
    if level > MAX_LEVEL {
        return Err(HtmError::InvalidArgument(format!(
            "HTM id {} is deeper than level {}",
            id, MAX_LEVEL
        )));
    }
    Ok(level)
}

/// The ancestor of `id` at a coarser `level`.
pub fn truncate(id: i64, level: u8) -> Result<i64, HtmError> {
    let current = level_of(id)?;
    if level < 1 || level > current {
        return Err(HtmError::InvalidArgument(format!(
            "cannot truncate level-{} id {} to level {}",
            current, id, level
        )));
    }
    Ok(id >> (2 * (current - level) as u32))
}

/// The contiguous ID range covering all descendants of `id` at a deeper
/// `level`. Returns `(id, id)` when `level` equals the ID's own level.
pub fn extend(id: i64, level: u8) -> Result<(i64, i64), HtmError> {
    let current = level_of(id)?;
    if level < current || level > MAX_LEVEL {
        return Err(HtmError::InvalidArgument(format!(
            "cannot extend level-{} id {} to level {}",
            current, id, level
        )));
    }
    let shift = 2 * (level - current) as u32;
    let lo = id << shift;
    let hi = lo + ((1i64 << shift) - 1);
    Ok((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_levels() {
        for id in FIRST_FACE..=LAST_FACE {
            assert_eq!(level_of(id).unwrap(), 1);
        }
        assert_eq!(level_of(32).unwrap(), 2);
        assert_eq!(level_of(14248).unwrap(), 6);
    }

    #[test]
    fn test_invalid_ids() {
        for id in [-1i64, 0, 1, 7] {
            assert!(level_of(id).is_err());
        }
        // Odd bit length (5 bits).
        assert!(level_of(16).is_err());
        // Deeper than level 20 (44 bits).
        assert!(level_of(8i64 << 40).is_err());
    }

    #[test]
    fn test_truncate_extend_roundtrip() {
        let id = 14248;
        let level = level_of(id).unwrap();
        let (lo, hi) = extend(id, 14).unwrap();
        assert_eq!(hi - lo + 1, 4i64.pow((14 - level) as u32));
        assert_eq!(truncate(lo, level).unwrap(), id);
        assert_eq!(truncate(hi, level).unwrap(), id);

        // extend(truncate(id, L), level(id)) covers id.
        let coarse = truncate(id, 3).unwrap();
        let (lo, hi) = extend(coarse, level).unwrap();
        assert!(lo <= id && id <= hi);
    }

    #[test]
    fn test_extend_same_level_is_singleton() {
        assert_eq!(extend(8, 1).unwrap(), (8, 8));
    }

    #[test]
    fn test_truncate_rejects_deeper_target() {
        assert!(truncate(8, 2).is_err());
        assert!(truncate(8, 0).is_err());
        assert!(extend(14248, 5).is_err());
        assert!(extend(14248, 21).is_err());
    }
}
