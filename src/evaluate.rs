//! Adaptive trixel refinement.
//!
//! The evaluator classifies candidate trixels against a region,
//! subdividing partial trixels until the maximum level. Each partial's
//! children are tested against the region clipped to that partial, so the
//! cost of the host predicates shrinks with the local geometry as depth
//! grows.
//!
//! The natural recursive formulation is flattened into an explicit stack
//! of (region, candidate-range) frames driven by a pull-based iterator:
//! records stream out as the traversal finds them, and memory stays
//! proportional to the recursion depth. The top frame borrows the
//! caller's region; every deeper frame owns its clip.

use crate::error::HtmError;
use crate::htm::{extend, level_of, triangle_of, MAX_LEVEL};
use crate::region::Region;

/// Classification of an emitted trixel. Trixels outside the region are
/// pruned, never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrixelState {
    /// The trixel lies entirely within the region.
    Inner,
    /// The trixel overlaps the region boundary at the maximum level.
    Partial,
}

/// One record of the refinement stream.
#[derive(Debug, Clone)]
pub struct ClassifiedTrixel<R> {
    pub id: i64,
    pub state: TrixelState,
    /// The region clipped to this trixel; populated only for partials at
    /// the maximum level when intersections were requested.
    pub clip: Option<R>,
}

impl<R> ClassifiedTrixel<R> {
    fn inner(id: i64) -> Self {
        Self {
            id,
            state: TrixelState::Inner,
            clip: None,
        }
    }

    fn partial(id: i64, clip: Option<R>) -> Self {
        Self {
            id,
            state: TrixelState::Partial,
            clip,
        }
    }
}

enum RegionSlot<'a, R> {
    Root(&'a R),
    Clip(R),
}

impl<'a, R> RegionSlot<'a, R> {
    #[inline]
    fn get(&self) -> &R {
        match self {
            RegionSlot::Root(region) => region,
            RegionSlot::Clip(region) => region,
        }
    }
}

enum Candidates {
    Seeds(std::vec::IntoIter<i64>),
    Children { next: i64, hi: i64 },
}

impl Iterator for Candidates {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        match self {
            Candidates::Seeds(iter) => iter.next(),
            Candidates::Children { next, hi } => {
                if *next > *hi {
                    return None;
                }
                let id = *next;
                *next += 1;
                Some(id)
            }
        }
    }
}

struct Frame<'a, R> {
    region: RegionSlot<'a, R>,
    candidates: Candidates,
}

enum Step<R> {
    Pop,
    Skip,
    Emit(ClassifiedTrixel<R>),
    Recurse { clip: R, lo: i64, hi: i64 },
}

/// Lazy refinement over a region.
///
/// Yields one record per surviving trixel in traversal order: a trixel's
/// record precedes any of its descendants, and siblings are visited in
/// ascending ID order. Dropping the iterator cancels the traversal; the
/// only state released is the stack of owned clips.
pub struct TrixelEvaluator<'a, R: Region> {
    stack: Vec<Frame<'a, R>>,
    max_level: u8,
    level_step: u8,
    epsilon: f64,
    keep_intersections: bool,
}

impl<'a, R: Region> TrixelEvaluator<'a, R> {
    /// Start a refinement of `region` from `candidates`.
    ///
    /// Fails with `InvalidArgument` for a negative or >= 1 shrink
    /// epsilon, a max level outside `[1, 20]`, or a level step outside
    /// `[1, 3]`.
    pub fn new(
        region: &'a R,
        candidates: Vec<i64>,
        max_level: u8,
        level_step: u8,
        epsilon: f64,
        keep_intersections: bool,
    ) -> Result<Self, HtmError> {
        if !(0.0..1.0).contains(&epsilon) {
            return Err(HtmError::InvalidArgument(format!(
                "shrink epsilon {} outside [0, 1)",
                epsilon
            )));
        }
        if max_level < 1 || max_level > MAX_LEVEL {
            return Err(HtmError::InvalidArgument(format!(
                "max level {} outside [1, {}]",
                max_level, MAX_LEVEL
            )));
        }
        if !(1..=3).contains(&level_step) {
            return Err(HtmError::InvalidArgument(format!(
                "level step {} outside [1, 3]",
                level_step
            )));
        }
        Ok(Self {
            stack: vec![Frame {
                region: RegionSlot::Root(region),
                candidates: Candidates::Seeds(candidates.into_iter()),
            }],
            max_level,
            level_step,
            epsilon,
            keep_intersections,
        })
    }
}

impl<'a, R: Region> Iterator for TrixelEvaluator<'a, R> {
    type Item = Result<ClassifiedTrixel<R>, HtmError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = {
                let frame = self.stack.last_mut()?;
                match frame.candidates.next() {
                    None => Step::Pop,
                    Some(id) => {
                        let outcome = classify(
                            frame.region.get(),
                            id,
                            self.max_level,
                            self.level_step,
                            self.epsilon,
                            self.keep_intersections,
                        );
                        match outcome {
                            Ok(step) => step,
                            Err(err) => return Some(Err(err)),
                        }
                    }
                }
            };
            match step {
                Step::Pop => {
                    self.stack.pop();
                }
                Step::Skip => {}
                Step::Emit(record) => return Some(Ok(record)),
                Step::Recurse { clip, lo, hi } => self.stack.push(Frame {
                    region: RegionSlot::Clip(clip),
                    candidates: Candidates::Children { next: lo, hi },
                }),
            }
        }
    }
}

/// Classify one candidate against the current region.
fn classify<R: Region>(
    region: &R,
    id: i64,
    max_level: u8,
    level_step: u8,
    epsilon: f64,
    keep_intersections: bool,
) -> Result<Step<R>, HtmError> {
    let triangle = triangle_of(id)?;

    // Containment is tested on the shrunk triangle so exact boundary
    // coincidences do not produce false negatives in the host predicate.
    // Intersection keeps the true triangle.
    let test_triangle = if epsilon > 0.0 {
        triangle.shrink(epsilon)
    } else {
        triangle
    };
    if region.contains(&test_triangle)? {
        return Ok(Step::Emit(ClassifiedTrixel::inner(id)));
    }

    let clip = match region.intersection(&triangle)? {
        Some(clip) if !clip.is_empty() => clip,
        _ => return Ok(Step::Skip),
    };

    let level = level_of(id)?;
    if level >= max_level {
        let kept = keep_intersections.then_some(clip);
        return Ok(Step::Emit(ClassifiedTrixel::partial(id, kept)));
    }

    let child_level = (level + level_step).min(max_level);
    let (lo, hi) = extend(id, child_level)?;
    Ok(Step::Recurse { clip, lo, hi })
}
