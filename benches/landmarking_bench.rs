//! Benchmarks for the landmarking probes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use metafe::landmarking::{self, BestNodeConfig};
use metafe::ml::metrics::accuracy_score;
use metafe::StratifiedKFold;

fn dataset(rows: usize, cols: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut x = Vec::with_capacity(rows);
    let mut y = Vec::with_capacity(rows);
    for i in 0..rows {
        let class = if i < rows / 2 { 0.0 } else { 1.0 };
        let row: Vec<f64> = (0..cols)
            .map(|j| class * 2.0 + ((i * (j + 3)) as f64 * 0.37).sin())
            .collect();
        x.push(row);
        y.push(class);
    }
    (x, y)
}

fn bench_split_plan(c: &mut Criterion) {
    let (_, y) = dataset(1000, 8);

    c.bench_function("stratified_kfold_1000_rows", |b| {
        b.iter(|| {
            StratifiedKFold::new(10)
                .with_seed(0)
                .split(black_box(&y))
                .unwrap()
        })
    });
}

fn bench_probes(c: &mut Criterion) {
    let (x, y) = dataset(500, 8);
    let plan = StratifiedKFold::new(10).with_seed(0).split(&y).unwrap();

    c.bench_function("best_node_500x8", |b| {
        b.iter(|| {
            landmarking::best_node(
                black_box(&x),
                black_box(&y),
                &plan,
                accuracy_score,
                &BestNodeConfig::default(),
            )
            .unwrap()
        })
    });

    c.bench_function("one_nn_500x8", |b| {
        b.iter(|| {
            landmarking::one_nn(black_box(&x), black_box(&y), &plan, accuracy_score).unwrap()
        })
    });

    c.bench_function("naive_bayes_500x8", |b| {
        b.iter(|| {
            landmarking::naive_bayes(black_box(&x), black_box(&y), &plan, accuracy_score).unwrap()
        })
    });
}

criterion_group!(benches, bench_split_plan, bench_probes);
criterion_main!(benches);
