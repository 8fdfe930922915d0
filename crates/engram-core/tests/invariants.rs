//! Property-based tests for the engine's quantified invariants.
//!
//! Each property mirrors a guarantee the host is allowed to rely on:
//! familiarity monotonicity, the cubing bound, base-level recency,
//! geometric spreading decay, bounded probability mass, and bit-identical
//! zero-noise retrieval.

use proptest::prelude::*;

use engram_core::location::{familiarity, infer_activity, ActivityType, InferenceSource, LocationConfig};
use engram_core::{
	base_level_activation, probe_activation, retrieve, spread_activation, Association,
	RetrievalConfig, RetrievalInput, SpreadParams,
};

proptest! {
	#[test]
	fn familiarity_is_monotone_and_bounded(n in 0u32..100_000) {
		let config = LocationConfig::default();
		let here = familiarity(n, &config);
		let next = familiarity(n + 1, &config);

		prop_assert!(next >= here);
		prop_assert!((0.0..1.0).contains(&here));
	}

	#[test]
	fn cubing_shrinks_and_keeps_sign(s in -1.0f64..=1.0) {
		let cubed = probe_activation(s);

		prop_assert!(cubed.abs() <= s.abs() + 1e-12);
		prop_assert!(cubed.signum() == s.signum() || cubed == 0.0);
	}

	#[test]
	fn base_level_decreases_with_elapsed_time(
		elapsed_ms in 1_000.0f64..1e10,
		extra_ms in 1_000.0f64..1e10,
	) {
		let now = 2e10;
		let recent = base_level_activation(&[now - elapsed_ms], now, 0.5);
		let older = base_level_activation(&[now - elapsed_ms - extra_ms], now, 0.5);

		prop_assert!(recent > older);
	}

	#[test]
	fn base_level_increases_with_accesses(
		timestamps in prop::collection::vec(0.0f64..1e12, 1..20),
	) {
		let now = 2e12;
		let shorter = base_level_activation(&timestamps[..timestamps.len() - 1], now, 0.5);
		let longer = base_level_activation(&timestamps, now, 0.5);

		if timestamps.len() > 1 {
			prop_assert!(longer > shorter);
		} else {
			prop_assert!(shorter == f64::NEG_INFINITY && longer.is_finite());
		}
	}

	/// Along a chain, the deposit at hop depth h is bounded by
	/// `seed × (max weight)^h × γ^h`.
	#[test]
	fn spreading_decays_geometrically_on_chains(
		weights in prop::collection::vec(0.0f64..=1.0, 1..5),
		seed_activation in 0.01f64..5.0,
		gamma in 0.1f64..=0.9,
	) {
		let n = weights.len() + 1;
		let associations: Vec<Association> = weights
			.iter()
			.enumerate()
			.map(|(i, &w)| Association {
				source: i,
				target: i + 1,
				forward_strength: w,
				backward_strength: 0.0,
			})
			.collect();
		let params = SpreadParams {
			decay_per_hop: gamma,
			depth: weights.len(),
			bidirectional: false,
			contribution_floor: 0.0,
		};

		let delta = spread_activation(n, &associations, &[(0, seed_activation)], &params);
		let max_weight = weights.iter().copied().fold(0.0f64, f64::max);

		prop_assert!(delta[0].abs() < 1e-12);
		for (hop, &value) in delta.iter().enumerate().skip(1) {
			#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
			let bound = seed_activation * (max_weight * gamma).powi(hop as i32);
			prop_assert!(value <= bound + 1e-9, "hop {hop}: {value} > {bound}");
		}
	}

	#[test]
	fn retrieval_probability_mass_is_bounded(
		corpus in prop::collection::vec(
			prop::collection::vec(-1.0f64..=1.0, 3),
			1..8,
		),
		history_offsets in prop::collection::vec(1_000.0f64..1e9, 1..8),
	) {
		let now = 1.7e12;
		let n = corpus.len();
		let histories: Vec<Vec<f64>> = (0..n)
			.map(|i| vec![now - history_offsets[i % history_offsets.len()]])
			.collect();
		let input = RetrievalInput {
			probe: &[1.0, 0.0, 0.0],
			embeddings: &corpus,
			access_histories_ms: &histories,
			now_ms: now,
			..Default::default()
		};
		let config = RetrievalConfig {
			noise_parameter: 0.0,
			..Default::default()
		};

		let candidates = retrieve(&input, &config).unwrap();
		let mass: f64 = candidates.iter().map(|c| c.probability).sum();

		prop_assert!(mass <= 1.0 + 1e-9);
		for candidate in &candidates {
			prop_assert!(candidate.probability >= config.min_probability);
		}
	}

	#[test]
	fn zero_noise_retrieval_is_deterministic(
		corpus in prop::collection::vec(
			prop::collection::vec(-1.0f64..=1.0, 3),
			1..6,
		),
	) {
		let now = 1.7e12;
		let histories: Vec<Vec<f64>> = corpus.iter().map(|_| vec![now - 3.6e6]).collect();
		let input = RetrievalInput {
			probe: &[0.6, 0.8, 0.0],
			embeddings: &corpus,
			access_histories_ms: &histories,
			now_ms: now,
			..Default::default()
		};
		let config = RetrievalConfig {
			noise_parameter: 0.0,
			min_probability: 0.0,
			..Default::default()
		};

		let first = retrieve(&input, &config).unwrap();
		let second = retrieve(&input, &config).unwrap();

		prop_assert_eq!(first.len(), second.len());
		for (a, b) in first.iter().zip(&second) {
			prop_assert_eq!(a.index, b.index);
			prop_assert!(a.total_activation.to_bits() == b.total_activation.to_bits());
			prop_assert!(a.probability.to_bits() == b.probability.to_bits());
		}
	}

	/// An explicit activity always reports the explicit source; keyword
	/// rows beat tool names whenever any keyword matches.
	#[test]
	fn activity_precedence_holds(
		context in "[a-z ]{0,30}",
		use_tool in proptest::bool::ANY,
	) {
		let tool = if use_tool { Some("Read") } else { None };

		let explicit = infer_activity(&context, tool, Some(ActivityType::Refactoring));
		prop_assert_eq!(explicit.source, InferenceSource::Explicit);
		prop_assert_eq!(explicit.activity, ActivityType::Refactoring);

		let with_keyword = format!("{context} debug");
		let inferred = infer_activity(&with_keyword, tool, None);
		prop_assert_eq!(inferred.source, InferenceSource::Keyword);
	}
}
