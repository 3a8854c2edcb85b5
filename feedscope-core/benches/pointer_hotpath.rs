use feedscope_core::{locate, resolve, segments, ValidationIssue};
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use std::hint::black_box;

fn station_feed(stations: usize) -> Value {
    let stations: Vec<Value> = (0..stations)
        .map(|i| {
            json!({
                "station_id": format!("st-{}", i),
                "name": format!("Station {}", i),
                "lat": 45.5 + i as f64 * 0.001,
                "lon": -73.6 - i as f64 * 0.001,
                "rental_methods": ["KEY", "CREDITCARD"],
            })
        })
        .collect();
    json!({ "last_updated": 1700000000, "ttl": 60, "data": { "stations": stations } })
}

fn bench_pointer(c: &mut Criterion) {
    let feed = station_feed(5_000);

    c.bench_function("pointer/segments_escaped", |b| {
        b.iter(|| black_box(segments(black_box("#/data/a~1b/stations/4999/~0name"))));
    });

    c.bench_function("pointer/resolve_deep", |b| {
        b.iter(|| black_box(resolve(&feed, black_box("#/data/stations/4999/rental_methods/1"))));
    });

    let issue = ValidationIssue::new(
        "required key [capacity] not found",
        "required",
        "#/data/stations/2500",
    );
    c.bench_function("pointer/locate_missing_key", |b| {
        b.iter(|| black_box(locate(&feed, black_box(&issue))));
    });
}

criterion_group!(benches, bench_pointer);
criterion_main!(benches);
