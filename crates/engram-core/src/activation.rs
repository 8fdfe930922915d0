//! Activation Mathematics
//!
//! The scoring primitives every pipeline in this crate is built from:
//!
//! 1. **Base-level activation** (recency/frequency): `B(m) = ln[Σ(ΔT_k + ε)^(-d)]`
//! 2. **Probe activation** (relevance): `A(i) = S(i)³`
//! 3. **Modulators**: working-memory, emotional, project and session
//!    multipliers applied after spreading
//! 4. **Normalization**: softmax over surviving candidates, optionally
//!    perturbed by seeded Gumbel noise
//!
//! The cubed similarity function (MINERVA 2) is what makes retrieval
//! competitive rather than uniform: weakly matching traces contribute
//! almost nothing while strong matches dominate.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Singularity guard for elapsed times, in seconds.
///
/// Elapsed times are computed as `max(ΔT, 0) + ε`, so an access at the
/// query instant (or a future timestamp from clock skew) contributes
/// `ε^(-d)` instead of a pole.
pub const EPSILON_S: f64 = 1e-3;

/// Euler–Mascheroni constant, the mean of the standard Gumbel distribution.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

// ============================================================================
// Base-Level Activation
// ============================================================================

/// Compute base-level activation from access history.
///
/// `B(m) = ln[Σ(ΔT_k + ε)^(-d)]`
///
/// Where:
/// - `ΔT_k` = seconds since access k, clamped non-negative
/// - `d` = decay rate (≈ 0.5 for human-like forgetting)
///
/// Each access strengthens the memory; recent accesses dominate the sum.
/// Timestamps are milliseconds since epoch; elapsed times are converted to
/// seconds before the power law is applied.
///
/// # Returns
///
/// Base-level activation, unbounded in both directions, or negative
/// infinity for an empty history. Callers that need a bounded value pass
/// the result through [`normalized_recency`].
#[must_use]
pub fn base_level_activation(access_times_ms: &[f64], now_ms: f64, decay: f64) -> f64 {
	if access_times_ms.is_empty() {
		return f64::NEG_INFINITY;
	}

	let sum: f64 = access_times_ms
		.iter()
		.map(|&timestamp| {
			let elapsed_s = (now_ms - timestamp).max(0.0) / 1000.0 + EPSILON_S;
			elapsed_s.powf(-decay)
		})
		.sum();

	sum.ln()
}

/// Batch compute base-level activation with a shared decay rate.
#[must_use]
pub fn base_level_batch(histories_ms: &[Vec<f64>], now_ms: f64, decay: f64) -> Vec<f64> {
	histories_ms
		.iter()
		.map(|history| base_level_activation(history, now_ms, decay))
		.collect()
}

/// Map a raw base-level value onto a bounded recency term in `[0, 1]`.
///
/// Raw `B(m)` is unbounded; fed directly into an additive composition it
/// would let sheer access frequency swamp probe relevance. This maps the
/// useful range `[floor, 0]` linearly onto `[0, 1]` and clamps everything
/// outside it — including the negative-infinity empty-history case, which
/// lands on 0.
///
/// `floor` must be negative; the pipeline default is −15.
#[inline]
#[must_use]
pub fn normalized_recency(base_level: f64, floor: f64) -> f64 {
	((base_level - floor) / -floor).clamp(0.0, 1.0)
}

// ============================================================================
// Probe Activation (MINERVA 2)
// ============================================================================

/// Apply MINERVA 2's cubic activation function.
///
/// `A(i) = S(i)³`
///
/// Cubing suppresses weak matches (|S| < 0.5 drops below 0.125) and
/// preserves strong ones, keeping the sign of negative similarities.
#[inline]
#[must_use]
pub fn probe_activation(similarity: f64) -> f64 {
	similarity.powi(3)
}

/// Batch apply the cubic activation function.
#[must_use]
pub fn probe_activation_batch(similarities: &[f64]) -> Vec<f64> {
	similarities.iter().map(|s| s.powi(3)).collect()
}

// ============================================================================
// Modulators
// ============================================================================

/// Emotional multiplier for a weight in `[0, 1]`.
///
/// Linear interpolation across `range`: weight 0 maps to `range[0]`,
/// weight 1 to `range[1]`. The pipeline default range is `[1.0, 1.5]`.
#[inline]
#[must_use]
pub fn emotional_multiplier(emotional_weight: f64, range: [f64; 2]) -> f64 {
	let w = emotional_weight.clamp(0.0, 1.0);
	(range[1] - range[0]).mul_add(w, range[0])
}

/// Configuration for working memory boost computation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkingMemoryConfig {
	/// Decay time constant in milliseconds (τ ≈ 4000ms per Baddeley 2000)
	pub decay_ms: f64,
	/// Maximum additional boost (1.0 means total boost ranges 1.0 to 2.0)
	pub max_boost: f64,
}

impl Default for WorkingMemoryConfig {
	fn default() -> Self {
		Self {
			decay_ms: 4000.0,
			max_boost: 1.0,
		}
	}
}

/// Compute the working-memory boost for a recently activated memory.
///
/// `boost = 1 + max_boost × e^(-age/τ)`
///
/// This is the host-side producer of the per-memory boost array the
/// retrieval pipeline consumes; the pipeline itself only caps the values
/// it is handed. Future timestamps (clock skew) yield no boost.
#[inline]
#[must_use]
pub fn working_memory_boost(
	activated_at_ms: f64,
	now_ms: f64,
	config: &WorkingMemoryConfig,
) -> f64 {
	let age = now_ms - activated_at_ms;
	if age < 0.0 {
		return 1.0;
	}

	let decay_factor = (-age / config.decay_ms).exp();
	config.max_boost.mul_add(decay_factor, 1.0)
}

/// Batch compute working memory boosts.
#[must_use]
pub fn working_memory_boost_batch(
	activated_at_ms: &[f64],
	now_ms: f64,
	config: &WorkingMemoryConfig,
) -> Vec<f64> {
	activated_at_ms
		.iter()
		.map(|&t| working_memory_boost(t, now_ms, config))
		.collect()
}

// ============================================================================
// Normalization
// ============================================================================

/// Softmax with unit temperature.
///
/// Shifts by the maximum for numerical stability; the result sums to 1
/// over the input. Returns an empty vector for empty input.
#[must_use]
pub fn softmax(activations: &[f64]) -> Vec<f64> {
	let Some(max) = activations
		.iter()
		.copied()
		.reduce(f64::max)
	else {
		return Vec::new();
	};

	let exps: Vec<f64> = activations.iter().map(|&a| (a - max).exp()).collect();
	let total: f64 = exps.iter().sum();

	exps.into_iter().map(|e| e / total).collect()
}

/// Draw one centered Gumbel sample.
///
/// `g = -ln(-ln(u)) - γ` where γ is the Euler–Mascheroni constant, so the
/// sample has mean 0. Gumbel perturbation composes with softmax ranking
/// (the Gumbel-max trick); the pipeline scales it by its noise parameter.
pub fn centered_gumbel<R: Rng>(rng: &mut R) -> f64 {
	let u: f64 = rng.gen::<f64>().clamp(1e-12, 1.0 - 1e-12);
	-(-u.ln()).ln() - EULER_GAMMA
}

// ============================================================================
// Consolidation & Association Decay
// ============================================================================

/// Consolidation lifecycle of a memory or association.
///
/// Carried through for the host; the ranking pipeline does not interpret
/// it. Association decay uses it to pick a time constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConsolidationState {
	/// Recently created, not yet consolidated
	#[default]
	Fresh,
	/// In the process of consolidation
	Consolidating,
	/// Fully consolidated into long-term memory
	Consolidated,
	/// Reactivated and undergoing reconsolidation
	Reconsolidating,
}

/// Configuration for association decay.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssociationDecayConfig {
	/// Decay tau for fresh associations (in days)
	pub tau_fresh_days: f64,
	/// Decay tau for consolidating associations (in days)
	pub tau_consolidating_days: f64,
	/// Decay tau for consolidated associations (in days)
	pub tau_consolidated_days: f64,
	/// Decay tau for reconsolidating associations (in days)
	pub tau_reconsolidating_days: f64,
	/// Strength boost when associations are co-accessed
	pub reinforcement_boost: f64,
	/// Associations below this strength are candidates for pruning
	pub prune_threshold: f64,
}

impl Default for AssociationDecayConfig {
	fn default() -> Self {
		Self {
			tau_fresh_days: 1.0 / 24.0,    // 1 hour
			tau_consolidating_days: 1.0,   // 1 day
			tau_consolidated_days: 30.0,   // 30 days
			tau_reconsolidating_days: 7.0, // 7 days
			reinforcement_boost: 0.05,
			prune_threshold: 0.1,
		}
	}
}

/// Get decay tau (in days) for a consolidation state.
#[inline]
#[must_use]
pub const fn decay_tau(state: ConsolidationState, config: &AssociationDecayConfig) -> f64 {
	match state {
		ConsolidationState::Fresh => config.tau_fresh_days,
		ConsolidationState::Consolidating => config.tau_consolidating_days,
		ConsolidationState::Consolidated => config.tau_consolidated_days,
		ConsolidationState::Reconsolidating => config.tau_reconsolidating_days,
	}
}

/// Compute decayed association strength.
///
/// `strength(t) = strength_0 × e^(-t/τ)` with τ from the consolidation
/// state: fresh links fade within hours, consolidated ones persist for
/// weeks.
#[must_use]
pub fn decayed_association_strength(
	initial_strength: f64,
	days_since_reinforced: f64,
	state: ConsolidationState,
	config: &AssociationDecayConfig,
) -> f64 {
	let tau = decay_tau(state, config);
	if tau <= 0.0 {
		return initial_strength;
	}

	(initial_strength * (-days_since_reinforced / tau).exp()).max(0.0)
}

/// Reinforce an association after a co-access.
///
/// `new_strength = min(1.0, old_strength + boost)`
#[inline]
#[must_use]
pub fn reinforce_association(current_strength: f64, config: &AssociationDecayConfig) -> f64 {
	(current_strength + config.reinforcement_boost).min(1.0)
}

/// Check if an association has decayed past the pruning point.
#[inline]
#[must_use]
pub fn should_prune_association(strength: f64, config: &AssociationDecayConfig) -> bool {
	strength < config.prune_threshold
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::suboptimal_flops)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	// Base level

	#[test]
	fn base_level_favors_recency() {
		let now = 1_000_000.0;
		let recent = vec![now - 1000.0]; // 1 second ago
		let old = vec![now - 86_400_000.0]; // 1 day ago

		assert!(
			base_level_activation(&recent, now, 0.5) > base_level_activation(&old, now, 0.5)
		);
	}

	#[test]
	fn base_level_grows_with_accesses() {
		let now = 1_000_000_000.0;
		let one = vec![now - 3_600_000.0];
		let two = vec![now - 3_600_000.0, now - 7_200_000.0];

		assert!(base_level_activation(&two, now, 0.5) > base_level_activation(&one, now, 0.5));
	}

	#[test]
	fn base_level_empty_is_neg_infinity() {
		assert_eq!(base_level_activation(&[], 1000.0, 0.5), f64::NEG_INFINITY);
	}

	#[test]
	fn base_level_clamps_future_timestamps() {
		let now = 1_000_000.0;
		// Future access contributes ε^(-d), a large finite value
		let skewed = vec![now + 500_000.0];
		let b = base_level_activation(&skewed, now, 0.5);
		assert!(b.is_finite());
		assert!((b - EPSILON_S.powf(-0.5).ln()).abs() < 1e-9);
	}

	#[test]
	fn normalized_recency_bounds() {
		assert_eq!(normalized_recency(f64::NEG_INFINITY, -15.0), 0.0);
		assert_eq!(normalized_recency(-15.0, -15.0), 0.0);
		assert_eq!(normalized_recency(0.0, -15.0), 1.0);
		assert_eq!(normalized_recency(5.0, -15.0), 1.0);
		let mid = normalized_recency(-7.5, -15.0);
		assert!((mid - 0.5).abs() < 1e-12);
	}

	// Probe activation

	#[test]
	fn cubing_suppresses_weak_matches() {
		assert!((probe_activation(0.5) - 0.125).abs() < 1e-10);
		assert!((probe_activation(1.0) - 1.0).abs() < 1e-10);
		assert!((probe_activation(-0.5) - (-0.125)).abs() < 1e-10);
	}

	// Modulators

	#[test]
	fn emotional_multiplier_interpolates() {
		let range = [1.0, 1.5];
		assert_eq!(emotional_multiplier(0.0, range), 1.0);
		assert_eq!(emotional_multiplier(1.0, range), 1.5);
		assert!((emotional_multiplier(0.5, range) - 1.25).abs() < 1e-12);
		// Out-of-range weights clamp
		assert_eq!(emotional_multiplier(2.0, range), 1.5);
	}

	#[test]
	fn wm_boost_at_activation() {
		let config = WorkingMemoryConfig::default();
		let now = 10000.0;
		let boost = working_memory_boost(now, now, &config);
		assert!((boost - 2.0).abs() < 0.01);
	}

	#[test]
	fn wm_boost_decays() {
		let config = WorkingMemoryConfig::default();
		let now = 100_000.0;
		let old = now - 5.0 * config.decay_ms;
		assert!(working_memory_boost(old, now, &config) < 1.01);
	}

	#[test]
	fn wm_boost_clock_skew() {
		let config = WorkingMemoryConfig::default();
		assert_eq!(working_memory_boost(20000.0, 10000.0, &config), 1.0);
	}

	// Normalization

	#[test]
	fn softmax_sums_to_one() {
		let p = softmax(&[1.0, 2.0, 3.0]);
		let total: f64 = p.iter().sum();
		assert!((total - 1.0).abs() < 1e-12);
		assert!(p[2] > p[1] && p[1] > p[0]);
	}

	#[test]
	fn softmax_handles_extreme_values() {
		let p = softmax(&[1000.0, 999.0]);
		assert!(p.iter().all(|v| v.is_finite()));
		assert!(p[0] > p[1]);
	}

	#[test]
	fn softmax_empty_input() {
		assert!(softmax(&[]).is_empty());
	}

	#[test]
	fn gumbel_is_seeded_and_centered() {
		let mut rng = StdRng::seed_from_u64(7);
		let a = centered_gumbel(&mut rng);
		let mut rng2 = StdRng::seed_from_u64(7);
		let b = centered_gumbel(&mut rng2);
		assert_eq!(a, b);

		// Empirical mean over a modest sample should sit near zero
		let mut rng3 = StdRng::seed_from_u64(42);
		let mean: f64 = (0..10_000).map(|_| centered_gumbel(&mut rng3)).sum::<f64>() / 10_000.0;
		assert!(mean.abs() < 0.1, "mean {mean} too far from 0");
	}

	// Association decay

	#[test]
	fn fresh_associations_decay_within_hours() {
		let config = AssociationDecayConfig::default();
		let strength =
			decayed_association_strength(1.0, 1.0 / 24.0, ConsolidationState::Fresh, &config);
		// One tau: e^-1
		assert!((strength - 0.368).abs() < 0.01);
	}

	#[test]
	fn consolidated_associations_persist() {
		let config = AssociationDecayConfig::default();
		let strength =
			decayed_association_strength(1.0, 1.0, ConsolidationState::Consolidated, &config);
		assert!(strength > 0.95);
	}

	#[test]
	fn reinforcement_caps_at_one() {
		let config = AssociationDecayConfig::default();
		assert_eq!(reinforce_association(0.5, &config), 0.55);
		assert_eq!(reinforce_association(0.99, &config), 1.0);
	}

	#[test]
	fn prune_threshold() {
		let config = AssociationDecayConfig::default();
		assert!(should_prune_association(0.05, &config));
		assert!(!should_prune_association(0.15, &config));
	}
}
