// Benchmarking calculation
// of the robust WARP loss and gradient
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use robust_warp::{Matrix, MultiLabelObjective, RobustWarp};

// data generating
// function
fn synthetic_batch(batch_size: usize, no_classes: usize) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(271828);
    let mut labels = Vec::with_capacity(batch_size * (no_classes + 1));
    let mut scores = Vec::with_capacity(batch_size * no_classes);
    for _ in 0..batch_size {
        for _ in 0..no_classes {
            labels.push(if rng.gen::<f64>() < 0.1 { 1.0 } else { 0.0 });
            scores.push(rng.gen::<f64>() * 2.0 - 1.0);
        }
        // weight column
        labels.push(1.0);
    }
    (labels, scores)
}

pub fn benchmark_robust_warp(c: &mut Criterion) {
    let batch_size = 256usize;
    let no_classes = 81usize;

    let (labels_data, scores_data) = synthetic_batch(batch_size, no_classes);
    let labels = Matrix::new(&labels_data, batch_size, no_classes + 1);
    let scores = Matrix::new(&scores_data, batch_size, no_classes);

    let objective = RobustWarp {
        seed: Some(42),
        ..Default::default()
    };

    let mut group = c.benchmark_group("Robust WARP");

    group.bench_function("loss", |b| {
        b.iter(|| objective.loss(black_box(&labels), black_box(&scores)).unwrap());
    });

    group.bench_function("gradient", |b| {
        b.iter(|| objective.gradient(black_box(&labels), black_box(&scores)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, benchmark_robust_warp);
criterion_main!(benches);
