//! Load a vehicle position file and print the recorded position nearest to each query point.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use geo_quadtree::geometry::{Point, Rectangle};
use geo_quadtree::quadtree::{
    QuadtreeBuilder, QuadtreeOptions, SearchStrategy, DEFAULT_NODE_CAPACITY,
};
use geo_quadtree::stream::{load_into, RecordReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Query points used when none are given on the command line.
const DEFAULT_QUERIES: [(f32, f32); 10] = [
    (34.544909, -102.100843),
    (32.345544, -99.123124),
    (33.234235, -100.214124),
    (35.195739, -95.348899),
    (31.895839, -97.789573),
    (32.895839, -101.789573),
    (34.115839, -100.225732),
    (32.335839, -99.992232),
    (33.535339, -94.792232),
    (32.234235, -100.222222),
];

#[derive(Parser)]
#[command(name = "nearest-vehicles")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Find the recorded vehicle positions nearest to a set of coordinates",
    long_about = None
)]
struct Cli {
    /// Binary vehicle position file
    #[arg(default_value = "VehiclePositions.dat", env = "NEAREST_VEHICLES_FILE")]
    path: PathBuf,

    /// Query point as LAT,LON. May be repeated; defaults to a fixed list of ten points
    #[arg(
        short,
        long = "query",
        value_name = "LAT,LON",
        value_parser = parse_point,
        allow_hyphen_values = true
    )]
    queries: Vec<Point<f32>>,

    /// Maximum number of records held by each tree node
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_NODE_CAPACITY,
        value_parser = parse_capacity,
        env = "NEAREST_VEHICLES_CAPACITY"
    )]
    capacity: usize,

    /// Bounds of the tree as MIN_LAT,MIN_LON,MAX_LAT,MAX_LON. Records outside are ignored
    #[arg(
        long,
        value_name = "MIN_LAT,MIN_LON,MAX_LAT,MAX_LON",
        value_parser = parse_bounds,
        allow_hyphen_values = true
    )]
    bounds: Option<Rectangle<f32>>,

    /// Nearest-neighbor search strategy
    #[arg(
        long,
        value_enum,
        default_value_t = Strategy::Exact,
        env = "NEAREST_VEHICLES_STRATEGY"
    )]
    strategy: Strategy,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Always return a nearest record
    Exact,
    /// Prune with the farthest-corner bound and visit quadrants in fixed order
    Compatible,
}

impl From<Strategy> for SearchStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Exact => SearchStrategy::EXACT,
            Strategy::Compatible => SearchStrategy::COMPATIBLE,
        }
    }
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f32; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma separated numbers, got {:?}", s));
    }
    let mut values = [0.0; N];
    for (value, part) in values.iter_mut().zip(parts) {
        *value = part
            .parse()
            .map_err(|err| format!("invalid number {part:?}: {err}"))?;
    }
    Ok(values)
}

fn parse_point(s: &str) -> Result<Point<f32>, String> {
    let [latitude, longitude] = parse_floats::<2>(s)?;
    Point::try_new(latitude, longitude).map_err(|err| err.to_string())
}

fn parse_bounds(s: &str) -> Result<Rectangle<f32>, String> {
    let [min_x, min_y, max_x, max_y] = parse_floats::<4>(s)?;
    Rectangle::try_new(min_x, min_y, max_x, max_y).map_err(|err| err.to_string())
}

fn parse_capacity(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("capacity must be at least 1".to_string()),
        Ok(capacity) => Ok(capacity),
        Err(err) => Err(err.to_string()),
    }
}

fn init_tracing(cli: &Cli) {
    let default = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let options = QuadtreeOptions::new(cli.bounds.unwrap_or_else(Rectangle::world))
        .with_capacity(cli.capacity)
        .with_strategy(cli.strategy.into());
    info!(
        path = %cli.path.display(),
        capacity = options.capacity,
        strategy = ?cli.strategy,
        "loading vehicle positions"
    );

    let reader = RecordReader::open(&cli.path)
        .with_context(|| format!("failed to open {}", cli.path.display()))?;
    let mut builder = QuadtreeBuilder::from_options(options);
    let summary = load_into(reader, &mut builder)
        .with_context(|| format!("failed to load {}", cli.path.display()))?;
    if summary.dropped > 0 {
        warn!(dropped = summary.dropped, "ignored positions outside the tree bounds");
    }

    let tree = builder.finish();
    info!(
        records = tree.len(),
        nodes = tree.num_nodes(),
        depth = tree.depth(),
        "built quadtree"
    );

    let queries = if cli.queries.is_empty() {
        DEFAULT_QUERIES
            .iter()
            .map(|&(latitude, longitude)| Point::new(latitude, longitude))
            .collect()
    } else {
        cli.queries
    };

    let mut out = io::stdout().lock();
    for (target, nearest) in queries.iter().zip(tree.find_nearest_many(&queries)) {
        let Some(nearest) = nearest else {
            warn!(
                latitude = target.latitude(),
                longitude = target.longitude(),
                "no vehicle position found"
            );
            continue;
        };
        let position = nearest.position();
        writeln!(
            out,
            "Nearest vehicle position to target point ({}, {}):",
            target.latitude(),
            target.longitude()
        )?;
        writeln!(out, "Vehicle ID: {}", nearest.id())?;
        writeln!(out, "Vehicle Registration: {}", nearest.label())?;
        writeln!(out, "Latitude: {}", position.latitude())?;
        writeln!(out, "Longitude: {}", position.longitude())?;
        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_query_points() {
        assert_eq!(parse_point("34.5, -102.1").unwrap(), Point::new(34.5, -102.1));
        assert!(parse_point("34.5").is_err());
        assert!(parse_point("NaN,0").is_err());
        assert!(parse_point("0,inf").is_err());
    }

    #[test]
    fn parses_capacity_and_bounds() {
        assert_eq!(parse_capacity("8").unwrap(), 8);
        assert!(parse_capacity("0").is_err());
        assert_eq!(parse_bounds("-90,-180,90,180").unwrap(), Rectangle::world());
        assert!(parse_bounds("1,0,0,1").is_err());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
