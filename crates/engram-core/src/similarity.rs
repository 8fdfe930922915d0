//! Similarity Kernel
//!
//! Cosine similarity between a probe vector and a corpus of memory traces.
//! The batch form is a plain linear scan: datasets stay in the low tens of
//! thousands, so there is no index structure to maintain.
//!
//! Degenerate rows never abort a batch. A zero-norm vector scores 0; a row
//! whose length differs from the probe's scores 0.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Compute cosine similarity between two vectors.
///
/// # Returns
///
/// Cosine similarity in `[-1, 1]` up to rounding, or 0 if the vectors have
/// different lengths or either has zero norm.
#[inline]
#[must_use]
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
	if a.len() != b.len() {
		return 0.0;
	}

	let (dot, norm_a, norm_b) = a
		.iter()
		.zip(b.iter())
		.fold((0.0, 0.0, 0.0), |(dot, na, nb), (&ai, &bi)| {
			(ai.mul_add(bi, dot), ai.mul_add(ai, na), bi.mul_add(bi, nb))
		});

	let magnitude = norm_a.sqrt() * norm_b.sqrt();
	if magnitude == 0.0 {
		0.0
	} else {
		dot / magnitude
	}
}

/// Similarity of one corpus row against a probe with a precomputed norm.
fn row_similarity(probe: &[f64], probe_norm: f64, row: &[f64]) -> f64 {
	if row.len() != probe.len() {
		return 0.0;
	}

	let (dot, row_norm_sq) = probe
		.iter()
		.zip(row.iter())
		.fold((0.0, 0.0), |(dot, rn), (&pi, &ri)| {
			(pi.mul_add(ri, dot), ri.mul_add(ri, rn))
		});

	let row_norm = row_norm_sq.sqrt();
	if row_norm == 0.0 {
		0.0
	} else {
		dot / (probe_norm * row_norm)
	}
}

/// Batch cosine similarity of a probe against a corpus.
///
/// Pre-computes the probe norm once. Rows are independent, so the
/// `parallel` feature maps them across threads without changing any
/// per-row result.
#[must_use]
pub fn cosine_similarity_batch(probe: &[f64], corpus: &[Vec<f64>]) -> Vec<f64> {
	let probe_norm: f64 = probe.iter().map(|x| x * x).sum::<f64>().sqrt();

	if probe_norm == 0.0 {
		return vec![0.0; corpus.len()];
	}

	#[cfg(feature = "parallel")]
	{
		corpus
			.par_iter()
			.map(|row| row_similarity(probe, probe_norm, row))
			.collect()
	}

	#[cfg(not(feature = "parallel"))]
	{
		corpus
			.iter()
			.map(|row| row_similarity(probe, probe_norm, row))
			.collect()
	}
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
	use super::*;

	#[test]
	fn identical_vectors() {
		let a = vec![1.0, 0.0, 0.0];
		assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-10);
	}

	#[test]
	fn orthogonal_vectors() {
		let a = vec![1.0, 0.0, 0.0];
		let b = vec![0.0, 1.0, 0.0];
		assert!(cosine_similarity(&a, &b).abs() < 1e-10);
	}

	#[test]
	fn opposite_vectors() {
		let a = vec![1.0, 0.0];
		let b = vec![-1.0, 0.0];
		assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-10);
	}

	#[test]
	fn zero_norm_scores_zero() {
		let a = vec![1.0, 0.0];
		let zero = vec![0.0, 0.0];
		assert_eq!(cosine_similarity(&a, &zero), 0.0);
		assert_eq!(cosine_similarity(&zero, &a), 0.0);
	}

	#[test]
	fn length_mismatch_scores_zero() {
		let a = vec![1.0, 0.0, 0.0];
		let b = vec![1.0, 0.0];
		assert_eq!(cosine_similarity(&a, &b), 0.0);
	}

	#[test]
	fn batch_matches_single() {
		let probe = vec![0.6, 0.8, 0.0];
		let corpus = vec![
			vec![1.0, 0.0, 0.0],
			vec![0.0, 1.0, 0.0],
			vec![0.6, 0.8, 0.0],
		];

		let batch = cosine_similarity_batch(&probe, &corpus);
		for (row, &got) in corpus.iter().zip(&batch) {
			let single = cosine_similarity(&probe, row);
			assert!((got - single).abs() < 1e-12);
		}
	}

	#[test]
	fn batch_tolerates_bad_rows() {
		let probe = vec![1.0, 0.0];
		let corpus = vec![
			vec![1.0, 0.0],
			vec![0.0, 0.0],      // zero norm
			vec![1.0, 0.0, 0.0], // wrong dimension
		];

		let batch = cosine_similarity_batch(&probe, &corpus);
		assert!((batch[0] - 1.0).abs() < 1e-10);
		assert_eq!(batch[1], 0.0);
		assert_eq!(batch[2], 0.0);
	}

	#[test]
	fn zero_probe_scores_all_zero() {
		let probe = vec![0.0, 0.0];
		let corpus = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
		assert_eq!(cosine_similarity_batch(&probe, &corpus), vec![0.0, 0.0]);
	}
}
