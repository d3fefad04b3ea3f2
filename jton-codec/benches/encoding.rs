use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jton_codec::{compress_json, decompress_json};
use serde_json::{json, Value};

fn create_test_document(rows: usize, cardinality: usize) -> Value {
    let users: Vec<String> = (0..cardinality).map(|i| format!("user{}", i)).collect();

    let records: Vec<Value> = (0..rows)
        .map(|i| {
            json!({
                "id": i,
                "user": users[i % cardinality],
                "timestamp": 1600000000 + i,
                "score": (i % 1000) as f64 / 100.0,
                "active": i % 7 != 0
            })
        })
        .collect();
    json!({ "records": records })
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");

    for cardinality in [10, 1000] {
        for rows in [100, 10_000] {
            let document = create_test_document(rows, cardinality);

            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{}rows_{}card", rows, cardinality)),
                &document,
                |b, document| {
                    b.iter(|| compress_json(black_box(document)).unwrap());
                },
            );
        }
    }

    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");

    for rows in [100, 10_000] {
        let document = create_test_document(rows, 100);
        let encoded = compress_json(&document).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}rows", rows)),
            &encoded,
            |b, encoded| {
                b.iter(|| decompress_json(black_box(encoded)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_progressions(c: &mut Criterion) {
    let ids: Vec<i64> = (0..100_000).collect();
    let document = json!({ "ids": ids });

    c.bench_function("compress_long_progression", |b| {
        b.iter(|| compress_json(black_box(&document)).unwrap());
    });
}

criterion_group!(benches, bench_compress, bench_decompress, bench_progressions);
criterion_main!(benches);
