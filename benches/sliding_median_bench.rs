use criterion::{criterion_group, criterion_main, Criterion};

use medianwindow::{sliding_median_window_vec, NanPolicy};

fn benchmark(c: &mut Criterion) {
  let input: Vec<f64> = (0..8192).chain((0..8192).rev()).map(|x| x as f64).collect();

  c.bench_function("small window, width 5", |b| {
    b.iter(|| sliding_median_window_vec(&input, 5, 1, NanPolicy::Tolerant).unwrap())
  });

  c.bench_function("large window, width 512", |b| {
    b.iter(|| sliding_median_window_vec(&input, 512, 1, NanPolicy::Tolerant).unwrap())
  });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
