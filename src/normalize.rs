//! Output normalization: uniform level-20 ranges.
//!
//! Every classified trixel, whatever its level, is emitted as the
//! contiguous level-20 ID range covering it. Downstream point
//! classification computes point IDs at level 20, so one
//! `lo <= id AND id <= hi` predicate per row suffices regardless of how
//! deep the refinement went.

use crate::error::HtmError;
use crate::evaluate::{ClassifiedTrixel, TrixelEvaluator, TrixelState};
use crate::htm::{extend, STORAGE_LEVEL};
use crate::region::Region;

/// One output row of the index pipeline.
#[derive(Debug, Clone)]
pub struct RangeRow<R> {
    /// First level-20 ID covered by the trixel.
    pub lo: i64,
    /// Last level-20 ID covered by the trixel.
    pub hi: i64,
    /// True for inner trixels, false for boundary partials.
    pub full: bool,
    /// The region clipped to the trixel, for partials that kept their
    /// intersection.
    pub geomint: Option<R>,
}

/// Normalize one classified trixel to its level-20 range row.
pub fn normalize<R>(record: ClassifiedTrixel<R>) -> Result<RangeRow<R>, HtmError> {
    let (lo, hi) = extend(record.id, STORAGE_LEVEL)?;
    Ok(RangeRow {
        lo,
        hi,
        full: record.state == TrixelState::Inner,
        geomint: record.clip,
    })
}

/// The normalized row stream of a refinement.
pub struct Rows<'a, R: Region> {
    evaluator: TrixelEvaluator<'a, R>,
}

impl<'a, R: Region> Rows<'a, R> {
    pub fn new(evaluator: TrixelEvaluator<'a, R>) -> Self {
        Self { evaluator }
    }
}

impl<'a, R: Region> Iterator for Rows<'a, R> {
    type Item = Result<RangeRow<R>, HtmError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.evaluator.next()?;
        Some(record.and_then(normalize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::TrixelState;

    #[test]
    fn test_normalize_extends_to_level_20() {
        let record: ClassifiedTrixel<()> = ClassifiedTrixel {
            id: 8,
            state: TrixelState::Inner,
            clip: None,
        };
        let row = normalize(record).unwrap();
        let (lo, hi) = extend(8, STORAGE_LEVEL).unwrap();
        assert_eq!((row.lo, row.hi), (lo, hi));
        assert!(row.full);
        assert_eq!(hi - lo + 1, 4i64.pow(19));
    }

    #[test]
    fn test_partial_row_is_not_full() {
        let record: ClassifiedTrixel<()> = ClassifiedTrixel {
            id: 14248,
            state: TrixelState::Partial,
            clip: None,
        };
        let row = normalize(record).unwrap();
        assert!(!row.full);
        assert!(row.geomint.is_none());
    }
}
