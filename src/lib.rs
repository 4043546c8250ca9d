//! Hierarchical Triangular Mesh coverings for regions on the sphere.
//!
//! This crate turns a polygonal region in WGS-84 coordinates into an HTM
//! trixel covering: a stream of trixels classified as fully inside
//! ("inner") or boundary-overlapping ("partial"), refined adaptively to a
//! caller-chosen maximum level and normalized to level-20 ID ranges. The
//! ranges drive a downstream point-classification pipeline as a
//! primary-key filter: point IDs computed at level 20 fall inside exactly
//! one row's `lo..=hi`.
//!
//! The pipeline: a geography adapter flattens the polygon value into
//! vertices, the seed generator bounds them with a spherical convex hull
//! and covers the bound at a shallow level, and the evaluator refines
//! that seed set against the region, clipping the region at each
//! subdivision so deeper predicate calls stay local.
//!
//! # Example
//!
//! ```
//! use geo_types::{polygon, Geometry};
//! use htm_index::{htm_index_create, IndexParams};
//!
//! let region = Geometry::Polygon(polygon![
//!     (x: 10.0, y: 10.0),
//!     (x: 20.0, y: 10.0),
//!     (x: 20.0, y: 18.0),
//!     (x: 10.0, y: 18.0),
//!     (x: 10.0, y: 10.0),
//! ]);
//!
//! let rows = htm_index_create(&region, IndexParams::new(6)).expect("indexing should succeed");
//! assert!(rows.iter().any(|row| row.full));
//! ```

use std::sync::OnceLock;

use geo_types::Geometry;

mod adapter;
mod error;
mod evaluate;
pub mod geometry;
pub mod htm;
mod normalize;
mod region;
mod seed;
mod types;
pub mod validation;

pub use adapter::vertices_of;
pub use error::HtmError;
pub use evaluate::{ClassifiedTrixel, TrixelEvaluator, TrixelState};
pub use normalize::{normalize, RangeRow, Rows};
pub use region::{GeoRegion, Region};
pub use seed::{
    coerce_seed_level, full_globe_trixels, seed_convex, seed_trixels, SeedMode,
    DEFAULT_SEED_LEVEL, FALLBACK_SEED_LEVEL, MAX_SEED_LEVEL,
};
pub use types::{CartesianPoint, SphericalTriangle};

use geometry::chull;
use htm::{extend, Cover, Markup, MAX_LEVEL, STORAGE_LEVEL};

/// Default shrink epsilon for the inner-containment predicate.
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Default number of HTM levels descended per recursion step.
pub const DEFAULT_LEVEL_STEP: u8 = 2;

/// Parameters of an indexing invocation.
#[derive(Debug, Clone, Copy)]
pub struct IndexParams {
    /// Deepest refinement level, in `[1, 20]`.
    pub max_level: u8,
    /// Shrink factor applied to the containment predicate, in `[0, 1)`.
    pub epsilon: f64,
    /// Seed cover level; `0` or values above [`MAX_SEED_LEVEL`] are
    /// substituted with [`FALLBACK_SEED_LEVEL`], and the effective value
    /// never exceeds `max_level`.
    pub seed_level: u8,
    /// Levels descended per subdivision, in `[1, 3]`. Expanding
    /// `4^level_step` children per recursion amortizes the host's
    /// intersection cost.
    pub level_step: u8,
    /// Keep the clipped region on partial rows at the maximum level.
    pub keep_intersections: bool,
}

impl IndexParams {
    /// Parameters with the given maximum level and defaults elsewhere.
    pub fn new(max_level: u8) -> Self {
        Self {
            max_level,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), HtmError> {
        if !(0.0..1.0).contains(&self.epsilon) {
            return Err(HtmError::InvalidArgument(format!(
                "shrink epsilon {} outside [0, 1)",
                self.epsilon
            )));
        }
        if self.max_level < 1 || self.max_level > MAX_LEVEL {
            return Err(HtmError::InvalidArgument(format!(
                "max level {} outside [1, {}]",
                self.max_level, MAX_LEVEL
            )));
        }
        if !(1..=3).contains(&self.level_step) {
            return Err(HtmError::InvalidArgument(format!(
                "level step {} outside [1, 3]",
                self.level_step
            )));
        }
        Ok(())
    }
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            max_level: MAX_LEVEL,
            epsilon: DEFAULT_EPSILON,
            seed_level: DEFAULT_SEED_LEVEL,
            level_step: DEFAULT_LEVEL_STEP,
            keep_intersections: false,
        }
    }
}

/// A prepared indexing invocation: the adapted region plus its seed
/// cover. The row stream is produced lazily from [`HtmIndexer::rows`].
#[derive(Debug)]
pub struct HtmIndexer {
    region: GeoRegion,
    seeds: Vec<i64>,
    params: IndexParams,
}

impl HtmIndexer {
    /// Prepare an indexing run seeded by the spherical convex hull of
    /// the region's vertices.
    pub fn new(geom: &Geometry<f64>, params: IndexParams) -> Result<Self, HtmError> {
        Self::with_seed_mode(geom, SeedMode::SphericalHull, params)
    }

    /// Prepare an indexing run with an explicit seed mode.
    pub fn with_seed_mode(
        geom: &Geometry<f64>,
        mode: SeedMode,
        params: IndexParams,
    ) -> Result<Self, HtmError> {
        params.validate()?;
        let region = GeoRegion::from_geometry(geom)?;
        let seed_level = coerce_seed_level(params.seed_level).min(params.max_level);
        let seeds = match seed_convex(geom, mode)? {
            Some(convex) => seed_trixels(&convex, seed_level)?,
            None => full_globe_trixels(),
        };
        if log_enabled() {
            eprintln!(
                "htm index: {} seeds, max level {}, step {}",
                seeds.len(),
                params.max_level,
                params.level_step
            );
        }
        Ok(Self {
            region,
            seeds,
            params,
        })
    }

    /// The seed cover the refinement starts from.
    #[inline]
    pub fn seeds(&self) -> &[i64] {
        &self.seeds
    }

    #[inline]
    pub fn region(&self) -> &GeoRegion {
        &self.region
    }

    /// The lazy normalized row stream. Consumers may stop pulling at any
    /// point; the traversal stops with them.
    pub fn rows(&self) -> Result<Rows<'_, GeoRegion>, HtmError> {
        let evaluator = TrixelEvaluator::new(
            &self.region,
            self.seeds.clone(),
            self.params.max_level,
            self.params.level_step,
            self.params.epsilon,
            self.params.keep_intersections,
        )?;
        Ok(Rows::new(evaluator))
    }
}

/// Build the full covering of a geography value, collected into rows.
///
/// Streaming consumers should construct an [`HtmIndexer`] and pull from
/// [`HtmIndexer::rows`] instead.
pub fn htm_index_create(
    geom: &Geometry<f64>,
    params: IndexParams,
) -> Result<Vec<RangeRow<GeoRegion>>, HtmError> {
    HtmIndexer::new(geom, params)?.rows()?.collect()
}

/// Cover the spherical convex hull of a geography value with trixels at
/// `max_level` and emit their level-20 ranges, with no refinement.
pub fn geom_to_htm_chull(
    geom: &Geometry<f64>,
    max_level: u8,
) -> Result<Vec<(i64, i64)>, HtmError> {
    if max_level < 1 || max_level > MAX_LEVEL {
        return Err(HtmError::InvalidArgument(format!(
            "max level {} outside [1, {}]",
            max_level, MAX_LEVEL
        )));
    }
    let vertices = vertices_of(geom)?;
    let convex = chull(&vertices)?;
    let mut cover = Cover::new(&convex)?;
    while cover.level() < max_level {
        cover.step()?;
    }
    cover
        .trixels(Markup::Outer)?
        .into_iter()
        .map(|id| extend(id, STORAGE_LEVEL))
        .collect()
}

/// Whether diagnostic logging to stderr was requested via `HTM_LOG`.
pub(crate) fn log_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var("HTM_LOG")
            .ok()
            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
    })
}
