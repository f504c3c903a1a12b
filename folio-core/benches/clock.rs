//! Clock value benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_core::clock;

const SAMPLES: &[&str] = &[
    "0:05:01.200",
    "0:00:04",
    "05:01.2",
    "12.5",
    "2345ms",
    "7.25h",
    "13min",
    "garbage",
];

fn clock_benchmark(c: &mut Criterion) {
    c.bench_function("parse_mixed", |b| {
        b.iter(|| {
            for sample in SAMPLES {
                black_box(clock::parse(black_box(sample)));
            }
        })
    });

    c.bench_function("format_clock_text", |b| {
        b.iter(|| black_box(clock::format_clock_text(black_box("0:05:01.200"))))
    });
}

criterion_group!(benches, clock_benchmark);
criterion_main!(benches);
