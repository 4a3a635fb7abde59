use criterion::{criterion_group, criterion_main, Criterion};
use geo_quadtree::geometry::{Point, Rectangle};
use geo_quadtree::quadtree::{Quadtree, QuadtreeBuilder, QuadtreeOptions, SearchStrategy};
use geo_quadtree::record::PositionRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar::RTree;

const NUM_RECORDS: usize = 100_000;
const NUM_QUERIES: usize = 1_000;

fn random_records(n: usize) -> Vec<PositionRecord> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..n)
        .map(|i| {
            let latitude = rng.gen_range(30.0f32..36.0);
            let longitude = rng.gen_range(-104.0f32..-94.0);
            PositionRecord::new(
                i as i32,
                format!("REG{i:05}"),
                Point::new(latitude, longitude),
                1_600_000_000 + i as u64,
            )
        })
        .collect()
}

fn random_queries(n: usize) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(11);
    (0..n)
        .map(|_| Point::new(rng.gen_range(29.0f32..37.0), rng.gen_range(-105.0f32..-93.0)))
        .collect()
}

fn construct_quadtree(records: &[PositionRecord], strategy: SearchStrategy) -> Quadtree {
    let options = QuadtreeOptions::new(Rectangle::world()).with_strategy(strategy);
    let mut builder = QuadtreeBuilder::from_options(options);
    builder.extend(records.iter().cloned());
    builder.finish()
}

fn construct_rstar(points: Vec<[f32; 2]>) -> RTree<[f32; 2]> {
    RTree::bulk_load(points)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let records = random_records(NUM_RECORDS);
    let points: Vec<[f32; 2]> = records
        .iter()
        .map(|record| [record.position().latitude(), record.position().longitude()])
        .collect();
    let queries = random_queries(NUM_QUERIES);

    c.bench_function("construction (quadtree)", |b| {
        b.iter(|| construct_quadtree(&records, SearchStrategy::EXACT))
    });

    c.bench_function("construction (rstar bulk)", |b| {
        b.iter(|| construct_rstar(points.to_vec()))
    });

    let exact = construct_quadtree(&records, SearchStrategy::EXACT);
    let compatible = construct_quadtree(&records, SearchStrategy::COMPATIBLE);
    let rstar_tree = construct_rstar(points.to_vec());

    c.bench_function("nearest (quadtree exact)", |b| {
        b.iter(|| {
            for query in &queries {
                exact.find_nearest(query);
            }
        })
    });

    c.bench_function("nearest (quadtree compatible)", |b| {
        b.iter(|| {
            for query in &queries {
                compatible.find_nearest(query);
            }
        })
    });

    c.bench_function("nearest (rstar)", |b| {
        b.iter(|| {
            for query in &queries {
                rstar_tree.nearest_neighbor(&[query.latitude(), query.longitude()]);
            }
        })
    });

    c.bench_function("nearest many (quadtree exact)", |b| {
        b.iter(|| exact.find_nearest_many(&queries))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
