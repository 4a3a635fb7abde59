use rstar::RTree;

use crate::geometry::{squared_distance, Point, Rectangle};
use crate::quadtree::{QuadtreeBuilder, QuadtreeOptions, SearchStrategy};
use crate::stream::{load_into, write_records, RecordReader};
use crate::test::{brute_force_nearest, random_points, random_records};

/// Queries issued by the command line driver when none are given.
fn driver_queries() -> Vec<Point<f32>> {
    vec![
        Point::new(34.544909, -102.100843),
        Point::new(32.345544, -99.123124),
        Point::new(33.234235, -100.214124),
        Point::new(35.195739, -95.348899),
        Point::new(31.895839, -97.789573),
        Point::new(32.895839, -101.789573),
        Point::new(34.115839, -100.225732),
        Point::new(32.335839, -99.992232),
        Point::new(33.535339, -94.792232),
        Point::new(32.234235, -100.222222),
    ]
}

#[test]
fn loaded_stream_matches_rstar() {
    let records = random_records(20_000, 100);
    let bytes = write_records(vec![], &records).unwrap();

    let mut builder = QuadtreeBuilder::new(Rectangle::world());
    let summary = load_into(RecordReader::new(bytes.as_slice()), &mut builder).unwrap();
    assert_eq!(summary.read, records.len());
    assert_eq!(summary.stored, records.len());
    let tree = builder.finish();

    let rtree = RTree::bulk_load(
        records
            .iter()
            .map(|record| {
                let position = record.position();
                [position.latitude(), position.longitude()]
            })
            .collect(),
    );

    let mut targets = random_points(1_000, 101);
    targets.extend(driver_queries());
    for target in targets {
        let found = tree.find_nearest(&target).unwrap();
        let dist = squared_distance(&found.position(), &target);

        let [lat, lon] = *rtree
            .nearest_neighbor(&[target.latitude(), target.longitude()])
            .unwrap();
        let expected = squared_distance(&Point::new(lat, lon), &target);
        assert_eq!(dist, expected);

        let (_, brute_force) = brute_force_nearest(&records, &target).unwrap();
        assert_eq!(dist, brute_force);
    }
}

#[test]
fn compatible_search_finds_root_records() {
    let records = random_records(5_000, 102);
    let bytes = write_records(vec![], &records).unwrap();

    let options = QuadtreeOptions::default().with_strategy(SearchStrategy::COMPATIBLE);
    let mut builder = QuadtreeBuilder::from_options(options);
    load_into(RecordReader::new(bytes.as_slice()), &mut builder).unwrap();
    let tree = builder.finish();

    // The first records fill the root, which every search scans.
    let root_ids: Vec<i32> = tree.root().records().iter().map(|r| r.id()).collect();
    assert_eq!(root_ids, vec![0, 1, 2, 3]);
    for record in &records[..4] {
        let (found, dist) = tree.nearest_with_distance(&record.position()).unwrap();
        assert_eq!(found.id(), record.id());
        assert_eq!(dist, 0.0);
    }

    for record in &records {
        let target = record.position();
        let exact = tree
            .find_nearest_with(&target, SearchStrategy::EXACT)
            .unwrap();
        assert_eq!(exact.id(), record.id());
    }
}
