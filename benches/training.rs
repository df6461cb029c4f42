//! Model benchmark: encoder–decoder training and scoring by feature width.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use sigdrift::model::Autoencoder;

fn data(rows: usize, dim: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, dim), |(r, c)| ((r * 7 + c * 3) as f64 * 0.1).sin())
}

fn bench_training(c: &mut Criterion) {
    let mut g = c.benchmark_group("train_500_epochs");
    for dim in [12, 48, 192] {
        let x = data(24, dim);
        g.bench_function(format!("dim_{}", dim).as_str(), |b| {
            b.iter(|| {
                let mut model = Autoencoder::new(dim, 8, 4, 7).unwrap();
                black_box(model.fit(x.view(), 500, 0.01))
            })
        });
    }
    g.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let x = data(1440, 12);
    let mut model = Autoencoder::new(12, 8, 4, 7).unwrap();
    let _ = model.fit(x.view(), 50, 0.01);

    c.bench_function("score_1440_windows_12d", |b| {
        b.iter(|| black_box(model.reconstruction_errors(black_box(x.view()))))
    });
}

criterion_group!(benches, bench_training, bench_scoring);
criterion_main!(benches);
