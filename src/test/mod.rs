//! Fixtures shared by the unit tests.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::{squared_distance, Point};
use crate::quadtree::{Quadtree, QuadtreeBuilder, QuadtreeOptions};
use crate::record::PositionRecord;

mod integration;

pub(crate) fn record(id: i32, latitude: f32, longitude: f32) -> PositionRecord<f32> {
    PositionRecord::new(
        id,
        format!("REG{id:05}"),
        Point::new(latitude, longitude),
        1_600_000_000 + id as u64,
    )
}

/// Records with pairwise distinct positions, clustered like the fixes of a regional fleet.
pub(crate) fn random_records(n: usize, seed: u64) -> Vec<PositionRecord<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(n);
    while records.len() < n {
        let latitude: f32 = rng.gen_range(30.0..36.0);
        let longitude: f32 = rng.gen_range(-104.0..-94.0);
        if seen.insert((latitude.to_bits(), longitude.to_bits())) {
            records.push(record(records.len() as i32, latitude, longitude));
        }
    }
    records
}

pub(crate) fn random_points(n: usize, seed: u64) -> Vec<Point<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Point::new(rng.gen_range(29.0..37.0), rng.gen_range(-105.0..-93.0)))
        .collect()
}

pub(crate) fn build(
    records: &[PositionRecord<f32>],
    options: QuadtreeOptions<f32>,
) -> Quadtree<f32> {
    let mut builder = QuadtreeBuilder::from_options(options);
    builder.extend(records.iter().cloned());
    builder.finish()
}

/// Linear scan returning the first record at the minimum squared distance.
pub(crate) fn brute_force_nearest<'a>(
    records: &'a [PositionRecord<f32>],
    target: &Point<f32>,
) -> Option<(&'a PositionRecord<f32>, f32)> {
    let mut best: Option<(&PositionRecord<f32>, f32)> = None;
    for record in records {
        let dist = squared_distance(&record.position(), target);
        if best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((record, dist));
        }
    }
    best
}
