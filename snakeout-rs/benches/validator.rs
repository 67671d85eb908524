use criterion::{black_box, criterion_group, criterion_main, Criterion};

use snakeout_rs::{validate_level, ValidateRequest};

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut g = c.benchmark_group("Validator");

    g.bench_function("fixture level", |b| {
        let request: ValidateRequest =
            serde_json::from_str(include_str!("../fixtures/validate_request.json")).unwrap();
        b.iter(|| validate_level(black_box(&request)).unwrap())
    });

    g.bench_function("long dependency chain", |b| {
        // Fifty snakes in one row, each facing left into its predecessor, so
        // exactly one snake frees up per step.
        let count = 50;
        let snakes: Vec<String> = (0..count)
            .map(|i| {
                let tail = 2 * i + 1;
                let head = 2 * i;
                format!(
                    r#"{{"path":[{{"row":0,"col":{tail}}},{{"row":0,"col":{head}}}]}}"#
                )
            })
            .collect();
        let raw = format!(
            r#"{{"rows":1,"cols":{},"snakes":[{}]}}"#,
            2 * count,
            snakes.join(",")
        );
        let request: ValidateRequest = serde_json::from_str(&raw).unwrap();
        b.iter(|| validate_level(black_box(&request)).unwrap())
    });

    g.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
