//! Range utilities over HTM IDs.

use super::{level_of, truncate};
use crate::error::HtmError;

/// Lazy ascending sequence of ancestor IDs produced by [`truncate_range`].
#[derive(Debug, Clone)]
pub struct TruncateRange {
    next: i64,
    hi: i64,
}

impl Iterator for TruncateRange {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.next > self.hi {
            return None;
        }
        let id = self.next;
        self.next += 1;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.hi - self.next + 1).max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TruncateRange {}

/// Ancestor IDs at `level` covering the range `[lo, hi]`.
///
/// `lo` and `hi` must be valid IDs at the same level, `hi >= lo`, and
/// `level` strictly coarser than theirs; anything else fails with
/// `InvalidArgument`. The result is the inclusive integer range
/// `[truncate(lo, level), truncate(hi, level)]`.
pub fn truncate_range(lo: i64, hi: i64, level: u8) -> Result<TruncateRange, HtmError> {
    let lo_level = level_of(lo)?;
    let hi_level = level_of(hi)?;
    if lo_level != hi_level {
        return Err(HtmError::InvalidArgument(format!(
            "range endpoints at different levels: {} and {}",
            lo_level, hi_level
        )));
    }
    if hi < lo {
        return Err(HtmError::InvalidArgument(format!(
            "inverted range: {} > {}",
            lo, hi
        )));
    }
    if level >= lo_level {
        return Err(HtmError::InvalidArgument(format!(
            "target level {} is not coarser than {}",
            level, lo_level
        )));
    }
    Ok(TruncateRange {
        next: truncate(lo, level)?,
        hi: truncate(hi, level)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::htm::extend;

    #[test]
    fn test_truncate_range_inverts_extend() {
        // truncate_range(extend(id, L)) == [id] at the id's own level.
        let (lo, hi) = extend(14248, 14).unwrap();
        let ids: Vec<i64> = truncate_range(lo, hi, 6).unwrap().collect();
        assert_eq!(ids, vec![14248]);
    }

    #[test]
    fn test_truncate_range_spans_parents() {
        // Children of 8 and 9 at level 3, truncated back to level 2.
        let (lo, _) = extend(8, 3).unwrap();
        let (_, hi) = extend(9, 3).unwrap();
        let ids: Vec<i64> = truncate_range(lo, hi, 2).unwrap().collect();
        assert_eq!(ids, (32..=39).collect::<Vec<i64>>());
    }

    #[test]
    fn test_truncate_range_rejects_mismatched_levels() {
        let lo = extend(8, 10).unwrap().0;
        let hi = extend(8, 11).unwrap().1;
        assert!(truncate_range(lo, hi, 5).is_err());
    }

    #[test]
    fn test_truncate_range_rejects_inverted() {
        let (lo, hi) = extend(9, 8).unwrap();
        assert!(truncate_range(hi, lo, 4).is_err());
    }

    #[test]
    fn test_truncate_range_rejects_same_level_target() {
        let (lo, hi) = extend(9, 8).unwrap();
        assert!(truncate_range(lo, hi, 8).is_err());
    }

    #[test]
    fn test_size_hint_is_exact() {
        let (lo, hi) = extend(8, 4).unwrap();
        let iter = truncate_range(lo, hi, 3).unwrap();
        assert_eq!(iter.len(), 4);
    }
}
