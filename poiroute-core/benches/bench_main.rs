use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use geo::Point;
use poiroute_core::prelude::*;
use poiroute_core::routing::astar_path_length;

const CENTER_LAT: f64 = 52.52;
const CENTER_LON: f64 = 13.405;
const BLOCK_DEG: f64 = 0.0018;

fn grid(size: i64) -> StreetGraph {
    let id = |row: i64, col: i64| row * size + col;
    let mut builder = StreetGraphBuilder::new();
    for row in 0..size {
        for col in 0..size {
            let point = Point::new(
                CENTER_LON + col as f64 * BLOCK_DEG,
                CENTER_LAT + row as f64 * BLOCK_DEG,
            );
            builder.add_node(id(row, col), point);
        }
    }
    for line in 0..size {
        let row: Vec<i64> = (0..size).map(|col| id(line, col)).collect();
        let column: Vec<i64> = (0..size).map(|r| id(r, line)).collect();
        builder.add_way(&row, WayDirection::Both);
        builder.add_way(&column, WayDirection::Both);
    }
    builder.build(true).unwrap()
}

fn candidates(count: usize) -> Vec<Poi> {
    (0..count)
        .map(|i| {
            let offset = (i as f64 * 0.618_033_988_7).fract();
            Poi::new(
                CENTER_LAT + offset * 0.08 - 0.04,
                CENTER_LON + (1.0 - offset) * 0.12 - 0.06,
                "restaurant",
            )
            .with_name(format!("poi-{i}"))
        })
        .collect()
}

fn bench_prefilter(c: &mut Criterion) {
    let pois = candidates(5_000);
    let options = PrefilterOptions::default();
    c.bench_function("prefilter_5000", |b| {
        b.iter(|| {
            prefilter(
                black_box(&pois),
                CENTER_LAT,
                CENTER_LON,
                black_box(2_000.0),
                &options,
            )
        });
    });
}

fn bench_astar(c: &mut Criterion) {
    let graph = grid(60);
    let start = graph.nearest_node(&Point::new(CENTER_LON, CENTER_LAT)).unwrap();
    let target = graph
        .nearest_node(&Point::new(CENTER_LON + 0.1, CENTER_LAT + 0.1))
        .unwrap();
    c.bench_function("astar_grid_60", |b| {
        b.iter(|| astar_path_length(black_box(&graph), start, target, None));
    });
}

fn bench_route_distance(c: &mut Criterion) {
    let graph = grid(60);
    let calculator = RouteCalculator::new(NodeResolver::new(Arc::new(NodeCache::new(256))), None);
    let pois = candidates(200);
    c.bench_function("route_distance_200", |b| {
        b.iter(|| {
            pois.iter()
                .filter_map(|poi| poi.point())
                .map(|p| calculator.route_distance(&graph, CENTER_LAT, CENTER_LON, p.y(), p.x()))
                .sum::<f64>()
        });
    });
}

criterion_group!(benches, bench_prefilter, bench_astar, bench_route_distance);
criterion_main!(benches);
