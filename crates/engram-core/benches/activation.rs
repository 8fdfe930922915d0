//! Benchmarks for the activation kernels
//!
//! Covers:
//! - Cosine similarity (single and batch)
//! - Base-level activation (ACT-R decay)
//! - Probe activation (MINERVA 2 cubing)
//! - Softmax normalization

#![allow(clippy::expect_used)] // Fine in benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use engram_core::{
	base_level_activation, cosine_similarity, cosine_similarity_batch, probe_activation, softmax,
};
use rand::Rng;

/// Generate normalized random embeddings
fn generate_embeddings(count: usize, dimensions: usize) -> Vec<Vec<f64>> {
	let mut rng = rand::thread_rng();
	(0..count)
		.map(|_| {
			let mut vec: Vec<f64> = (0..dimensions).map(|_| rng.gen::<f64>()).collect();
			let norm: f64 = vec.iter().map(|x| x * x).sum::<f64>().sqrt();
			if norm > 0.0 {
				for x in &mut vec {
					*x /= norm;
				}
			}
			vec
		})
		.collect()
}

fn bench_cosine_similarity(c: &mut Criterion) {
	let mut group = c.benchmark_group("cosine_similarity");

	for dim in &[128, 256, 384, 768, 1536] {
		let embeddings = generate_embeddings(2, *dim);
		let a = &embeddings[0];
		let b = &embeddings[1];

		let _ = group.throughput(Throughput::Elements(1));
		let _ = group.bench_with_input(BenchmarkId::new("single", dim), dim, |bench, _| {
			bench.iter(|| cosine_similarity(black_box(a), black_box(b)));
		});
	}

	group.finish();
}

fn bench_cosine_similarity_batch(c: &mut Criterion) {
	let mut group = c.benchmark_group("cosine_similarity_batch");
	let dim = 768;

	for memory_count in &[100, 500, 1000, 2000, 10_000] {
		let probe = generate_embeddings(1, dim)
			.pop()
			.expect("should have probe");
		let memories = generate_embeddings(*memory_count, dim);

		let _ = group.throughput(Throughput::Elements(*memory_count as u64));
		let _ = group.bench_with_input(
			BenchmarkId::new("memories", memory_count),
			memory_count,
			|bench, _| {
				bench.iter(|| cosine_similarity_batch(black_box(&probe), black_box(&memories)));
			},
		);
	}

	group.finish();
}

fn bench_base_level_activation(c: &mut Criterion) {
	let mut group = c.benchmark_group("base_level_activation");
	let now = 1_000_000_000.0;

	for access_count in &[5, 10, 20, 50, 100] {
		let mut rng = rand::thread_rng();
		let access_times: Vec<f64> = (0..*access_count)
			.map(|_| rng.gen::<f64>().mul_add(-604_800_000.0, now))
			.collect();

		let _ = group.bench_with_input(
			BenchmarkId::new("accesses", access_count),
			access_count,
			|bench, _| {
				bench.iter(|| base_level_activation(black_box(&access_times), black_box(now), 0.5));
			},
		);
	}

	group.finish();
}

fn bench_probe_activation(c: &mut Criterion) {
	let mut group = c.benchmark_group("probe_activation");

	for count in &[100_i32, 500, 1000, 2000] {
		let mut rng = rand::thread_rng();
		let similarities: Vec<f64> = (0..*count)
			.map(|_| rng.gen::<f64>().mul_add(2.0, -1.0))
			.collect();

		#[allow(clippy::cast_sign_loss)]
		let throughput = *count as u64;
		let _ = group.throughput(Throughput::Elements(throughput));
		let _ = group.bench_with_input(BenchmarkId::new("memories", count), count, |bench, _| {
			bench.iter(|| {
				similarities
					.iter()
					.map(|s| probe_activation(black_box(*s)))
					.collect::<Vec<_>>()
			});
		});
	}

	group.finish();
}

fn bench_softmax(c: &mut Criterion) {
	let mut group = c.benchmark_group("softmax");

	for count in &[10_i32, 100, 1000] {
		let mut rng = rand::thread_rng();
		let activations: Vec<f64> = (0..*count)
			.map(|_| rng.gen::<f64>().mul_add(5.0, -2.0))
			.collect();

		#[allow(clippy::cast_sign_loss)]
		let throughput = *count as u64;
		let _ = group.throughput(Throughput::Elements(throughput));
		let _ =
			group.bench_with_input(BenchmarkId::new("candidates", count), count, |bench, _| {
				bench.iter(|| softmax(black_box(&activations)));
			});
	}

	group.finish();
}

criterion_group!(
	benches,
	bench_cosine_similarity,
	bench_cosine_similarity_batch,
	bench_base_level_activation,
	bench_probe_activation,
	bench_softmax,
);

criterion_main!(benches);
