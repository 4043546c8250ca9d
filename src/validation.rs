//! Structural validation for trixel coverings.
//!
//! Checks the range-level invariants a covering must satisfy: rows in
//! traversal order are ascending and pairwise disjoint after extension
//! to the storage level, and every span is a whole trixel. Useful for
//! debugging, testing, and catching host-predicate issues.

use rustc_hash::FxHashSet;

use crate::htm::STORAGE_LEVEL;
use crate::normalize::RangeRow;

/// Detailed validation report for a covering's row stream.
#[derive(Debug, Clone)]
pub struct CoveringReport {
    /// Total rows inspected.
    pub num_rows: usize,
    /// Rows with `full = true`.
    pub num_inner: usize,
    /// Rows with `full = false`.
    pub num_partial: usize,

    /// Adjacent row pairs whose level-20 ranges overlap.
    pub overlapping_ranges: usize,
    /// Adjacent row pairs out of ascending `lo` order.
    pub unordered_rows: usize,
    /// Rows sharing a `lo` with an earlier row.
    pub duplicate_rows: usize,
    /// Rows whose span is not a whole trixel (a power of four).
    pub malformed_spans: usize,

    /// Shallowest trixel level seen, if any rows were well-formed.
    pub min_level: Option<u8>,
    /// Deepest trixel level seen.
    pub max_level: Option<u8>,
}

impl CoveringReport {
    /// A covering is valid when its ranges are ordered, disjoint, and
    /// well-formed.
    pub fn is_valid(&self) -> bool {
        self.overlapping_ranges == 0
            && self.unordered_rows == 0
            && self.duplicate_rows == 0
            && self.malformed_spans == 0
    }

    /// Format a summary of any issues found.
    pub fn summary(&self) -> String {
        if self.is_valid() {
            return format!(
                "valid: {} rows ({} inner, {} partial)",
                self.num_rows, self.num_inner, self.num_partial
            );
        }
        let mut issues = Vec::new();
        if self.overlapping_ranges > 0 {
            issues.push(format!("{} overlapping ranges", self.overlapping_ranges));
        }
        if self.unordered_rows > 0 {
            issues.push(format!("{} unordered rows", self.unordered_rows));
        }
        if self.duplicate_rows > 0 {
            issues.push(format!("{} duplicate rows", self.duplicate_rows));
        }
        if self.malformed_spans > 0 {
            issues.push(format!("{} malformed spans", self.malformed_spans));
        }
        issues.join(", ")
    }
}

impl std::fmt::Display for CoveringReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CoveringReport {{ {} }}", self.summary())
    }
}

/// Validate a covering's rows in their emitted order.
pub fn validate_covering<R>(rows: &[RangeRow<R>]) -> CoveringReport {
    let mut report = CoveringReport {
        num_rows: rows.len(),
        num_inner: 0,
        num_partial: 0,
        overlapping_ranges: 0,
        unordered_rows: 0,
        duplicate_rows: 0,
        malformed_spans: 0,
        min_level: None,
        max_level: None,
    };

    let mut seen: FxHashSet<i64> = FxHashSet::default();
    let mut prev: Option<(i64, i64)> = None;
    for row in rows {
        if row.full {
            report.num_inner += 1;
        } else {
            report.num_partial += 1;
        }

        if !seen.insert(row.lo) {
            report.duplicate_rows += 1;
        }
        if let Some((prev_lo, prev_hi)) = prev {
            if row.lo < prev_lo {
                report.unordered_rows += 1;
            }
            if row.lo <= prev_hi && prev_lo <= row.hi {
                report.overlapping_ranges += 1;
            }
        }
        prev = Some((row.lo, row.hi));

        match level_of_span(row.lo, row.hi) {
            Some(level) => {
                report.min_level = Some(report.min_level.map_or(level, |l| l.min(level)));
                report.max_level = Some(report.max_level.map_or(level, |l| l.max(level)));
            }
            None => report.malformed_spans += 1,
        }
    }
    report
}

/// The trixel level a level-20 range corresponds to, when the span is a
/// whole trixel.
fn level_of_span(lo: i64, hi: i64) -> Option<u8> {
    let span = hi.checked_sub(lo)?.checked_add(1)?;
    if span <= 0 || span.count_ones() != 1 {
        return None;
    }
    let shift = span.trailing_zeros();
    if shift % 2 != 0 || shift / 2 > STORAGE_LEVEL as u32 {
        return None;
    }
    let level = STORAGE_LEVEL as u32 - shift / 2;
    if level < 1 || lo % span != 0 {
        return None;
    }
    Some(level as u8)
}
