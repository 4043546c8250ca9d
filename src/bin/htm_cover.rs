//! Console harness for trixel coverings.
//!
//! Reads a WKT query, builds the covering, and writes tab-separated
//! `lo<TAB>hi<TAB>full` rows to stdout.
//!
//! Usage:
//!   htm_cover 'POLYGON((10 10, 20 10, 20 18, 10 18, 10 10))' --max-level 8
//!   htm_cover - --seed-only --seed-mode cap < query.wkt
//!   htm_cover '...' --dump-hull hull.txt --validate

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use geo_types::Geometry;
use htm_index::htm::{extend, STORAGE_LEVEL};
use htm_index::validation::validate_covering;
use htm_index::{
    coerce_seed_level, full_globe_trixels, seed_convex, seed_trixels, HtmError, HtmIndexer,
    IndexParams, SeedMode, DEFAULT_EPSILON, DEFAULT_LEVEL_STEP, DEFAULT_SEED_LEVEL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SeedModeArg {
    /// Spherical convex hull of the region vertices.
    Hull,
    /// Convex hull from the host geometry library.
    HostHull,
    /// Single enclosing cap around the envelope center.
    Cap,
    /// No bound: seed with the eight faces.
    Globe,
}

impl From<SeedModeArg> for SeedMode {
    fn from(arg: SeedModeArg) -> SeedMode {
        match arg {
            SeedModeArg::Hull => SeedMode::SphericalHull,
            SeedModeArg::HostHull => SeedMode::HostHull,
            SeedModeArg::Cap => SeedMode::EnclosingCap,
            SeedModeArg::Globe => SeedMode::FullGlobe,
        }
    }
}

#[derive(Debug, Parser)]
#[command(about = "Build an HTM trixel covering for a WKT region")]
struct Args {
    /// WKT query geometry, or '-' to read it from stdin.
    query: String,

    /// Deepest refinement level.
    #[arg(long, default_value_t = 8)]
    max_level: u8,

    /// Seed cover level (0 substitutes the fallback).
    #[arg(long, default_value_t = DEFAULT_SEED_LEVEL)]
    seed_level: u8,

    /// HTM levels descended per subdivision.
    #[arg(long, default_value_t = DEFAULT_LEVEL_STEP)]
    level_skip: u8,

    /// Shrink epsilon for the containment predicate.
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,

    /// How the initial convex bound is obtained.
    #[arg(long, value_enum, default_value_t = SeedModeArg::Hull)]
    seed_mode: SeedModeArg,

    /// Emit only the hull cover at the maximum level, unrefined.
    #[arg(long)]
    seed_only: bool,

    /// Write the bounding convex's halfspaces to this path, one
    /// `x y z radius_deg` line per halfspace.
    #[arg(long)]
    dump_hull: Option<PathBuf>,

    /// Validate the emitted covering and report to stderr.
    #[arg(long)]
    validate: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let query = if args.query == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.query.clone()
    };
    let geom = parse_wkt(query.trim())?;

    if let Some(path) = &args.dump_hull {
        dump_hull(&geom, args.seed_mode.into(), path)?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.seed_only {
        let seeds = match seed_convex(&geom, args.seed_mode.into())? {
            Some(convex) => seed_trixels(&convex, coerce_seed_level(args.seed_level))?,
            None => full_globe_trixels(),
        };
        for id in seeds {
            let (lo, hi) = extend(id, STORAGE_LEVEL)?;
            writeln!(out, "{}\t{}\t0", lo, hi)?;
        }
        return Ok(());
    }

    let params = IndexParams {
        max_level: args.max_level,
        epsilon: args.epsilon,
        seed_level: args.seed_level,
        level_step: args.level_skip,
        keep_intersections: false,
    };
    let indexer = HtmIndexer::with_seed_mode(&geom, args.seed_mode.into(), params)?;

    if args.validate {
        let rows: Vec<_> = indexer.rows()?.collect::<Result<_, _>>()?;
        for row in &rows {
            writeln!(out, "{}\t{}\t{}", row.lo, row.hi, row.full as u8)?;
        }
        eprintln!("{}", validate_covering(&rows).summary());
    } else {
        for row in indexer.rows()? {
            let row = row?;
            writeln!(out, "{}\t{}\t{}", row.lo, row.hi, row.full as u8)?;
        }
    }
    Ok(())
}

fn parse_wkt(query: &str) -> Result<Geometry<f64>, HtmError> {
    wkt::Wkt::from_str(query)
        .map_err(|e| HtmError::InvalidArgument(format!("bad WKT query: {}", e)))
        .and_then(|w: wkt::Wkt<f64>| {
            w.try_into()
                .map_err(|e| HtmError::InvalidArgument(format!("bad WKT query: {:?}", e)))
        })
}

fn dump_hull(
    geom: &Geometry<f64>,
    mode: SeedMode,
    path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(convex) = seed_convex(geom, mode)? else {
        return Ok(());
    };
    let mut file = File::create(path)?;
    for halfspace in convex.halfspaces() {
        let axis = halfspace.axis();
        writeln!(
            file,
            "{} {} {} {}",
            axis.x,
            axis.y,
            axis.z,
            halfspace.radius_deg()
        )?;
    }
    Ok(())
}
