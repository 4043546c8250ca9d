//! Breadth-first trixel covering of a convex region.
//!
//! Drives the seed generation: classify the eight faces, then repeatedly
//! subdivide the partial frontier one level at a time. Trixels that are
//! fully inside stop subdividing at their discovery level and are expanded
//! arithmetically when the markup is emitted.

use std::mem;

use super::{extend, triangle_of, FIRST_FACE, LAST_FACE, MAX_LEVEL};
use crate::error::HtmError;
use crate::geometry::{Convex, TriangleClass};

/// Which markup to emit from a cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// The over-approximating cover: inner and partial trixels.
    Outer,
    /// Only trixels fully inside the convex.
    Inner,
}

/// An iteratively deepened covering of a [`Convex`].
#[derive(Debug)]
pub struct Cover<'a> {
    convex: &'a Convex,
    level: u8,
    /// Fully-inside trixels at their discovery level.
    inner: Vec<i64>,
    /// Boundary frontier at the current level.
    partial: Vec<i64>,
}

impl<'a> Cover<'a> {
    /// Start a cover at the face level.
    pub fn new(convex: &'a Convex) -> Result<Self, HtmError> {
        let mut cover = Self {
            convex,
            level: 1,
            inner: Vec::new(),
            partial: Vec::new(),
        };
        for id in FIRST_FACE..=LAST_FACE {
            cover.classify(id)?;
        }
        Ok(cover)
    }

    /// Current cover depth.
    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Subdivide the partial frontier one level deeper.
    ///
    /// A no-op at [`MAX_LEVEL`] or once the frontier is exhausted.
    pub fn step(&mut self) -> Result<(), HtmError> {
        if self.level >= MAX_LEVEL {
            return Ok(());
        }
        self.level += 1;
        let frontier = mem::take(&mut self.partial);
        for id in frontier {
            for child in (id * 4)..(id * 4 + 4) {
                self.classify(child)?;
            }
        }
        Ok(())
    }

    /// Emit the requested markup as sorted IDs at the current level.
    pub fn trixels(&self, markup: Markup) -> Result<Vec<i64>, HtmError> {
        let mut ids = Vec::new();
        for &id in &self.inner {
            let (lo, hi) = extend(id, self.level)?;
            ids.extend(lo..=hi);
        }
        if markup == Markup::Outer {
            ids.extend_from_slice(&self.partial);
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn classify(&mut self, id: i64) -> Result<(), HtmError> {
        let tri = triangle_of(id)?;
        match self.convex.classify_triangle(&tri) {
            TriangleClass::Inside => self.inner.push(id),
            TriangleClass::Intersects => self.partial.push(id),
            TriangleClass::Disjoint => {}
        }
        Ok(())
    }
}
