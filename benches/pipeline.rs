//! Pipeline benchmark: readings → windows, and the full five-stage run.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sigdrift::config::{PipelineConfig, WindowConfig};
use sigdrift::synth::{generate, SynthConfig};
use sigdrift::{aggregate_windows, Pipeline};

fn bench_aggregation(c: &mut Criterion) {
    let data = generate(&SynthConfig {
        minutes: 240,
        multi_rate: true,
        ..SynthConfig::default()
    });
    let config = WindowConfig::default();

    c.bench_function("aggregate_240min_multi_rate", |b| {
        b.iter(|| black_box(aggregate_windows(black_box(&data.readings), &config)))
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let data = generate(&SynthConfig::default());
    let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();

    c.bench_function("full_pipeline_60min", |b| {
        b.iter(|| black_box(pipeline.run(black_box(&data.readings))))
    });
}

criterion_group!(benches, bench_aggregation, bench_full_pipeline);
criterion_main!(benches);
