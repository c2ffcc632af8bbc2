use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kmeanseval::{EvaluatorConfig, KMeansConfig, KMeansEvaluator, MetricKind};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use std::time::Duration;

fn config(k_range: &[usize]) -> EvaluatorConfig {
    EvaluatorConfig::new(k_range.iter().copied())
        .with_kmeans(KMeansConfig::default().with_seed(42).with_n_init(1).with_max_iters(10))
}

fn benchmark_wss_varying_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("wss_samples");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let n_features = 32;
    let k_range: Vec<usize> = (2..=10).collect();
    let sample_sizes = [1_000, 5_000, 10_000];

    for n_samples in sample_sizes.iter() {
        group.throughput(Throughput::Elements(*n_samples as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(n_samples),
            n_samples,
            |b, &n_samples| {
                let data = Array2::random((n_samples, n_features), Uniform::new(-1.0f32, 1.0));
                let evaluator = KMeansEvaluator::with_config(data.view(), config(&k_range));

                b.iter(|| {
                    evaluator
                        .compute(black_box(&k_range), MetricKind::Wss)
                        .unwrap()
                });
            },
        );
    }
    group.finish();
}

fn benchmark_silhouette_varying_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("silhouette_samples");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let n_features = 32;
    let k_range = [2, 4, 8];
    let sample_sizes = [500, 1_000, 2_000];

    for n_samples in sample_sizes.iter() {
        group.throughput(Throughput::Elements(*n_samples as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(n_samples),
            n_samples,
            |b, &n_samples| {
                let data = Array2::random((n_samples, n_features), Uniform::new(-1.0f32, 1.0));
                let evaluator = KMeansEvaluator::with_config(data.view(), config(&k_range));

                b.iter(|| {
                    evaluator
                        .compute(black_box(&k_range), MetricKind::AvgSilhouette)
                        .unwrap()
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_wss_varying_samples,
    benchmark_silhouette_varying_samples,
);

criterion_main!(benches);
