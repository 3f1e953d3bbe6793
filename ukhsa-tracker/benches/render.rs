use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ukhsa_tracker::{render, DisplayUnit, MetricValue, Reading};

fn reading(value: MetricValue) -> Reading {
    Reading::new(
        Some(value),
        Some("2024-01-14".to_string()),
        Some("England".to_string()),
    )
}

/// Benchmark render() across value representations and units
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let cases = vec![
        ("number_rate", reading(MetricValue::Number(4.21)), DisplayUnit::RatePer100k),
        ("number_percentage", reading(MetricValue::Number(12.34)), DisplayUnit::Percentage),
        ("text_percentage", reading(MetricValue::from("12.34")), DisplayUnit::Percentage),
    ];

    for (name, reading, unit) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &reading, |b, reading| {
            b.iter(|| {
                black_box(render(Some(reading), unit));
            });
        });
    }
    group.finish();
}

/// Benchmark rendering an absent reading
fn bench_render_missing(c: &mut Criterion) {
    c.bench_function("render_missing", |b| {
        b.iter(|| {
            black_box(render(None, DisplayUnit::RatePer100k));
        });
    });
}

criterion_group!(benches, bench_render, bench_render_missing);
criterion_main!(benches);
