//! Visual Memory Scoring
//!
//! The retrieval pipeline applied to visual memories (semantic
//! descriptions of images and video frames), with three differences from
//! the textual path:
//!
//! - per-memory **significance** multiplies the final activation;
//! - the emotion modulator reads **arousal**, not valence — arousing
//!   images are retained and surfaced preferentially, pleasant ones are
//!   not privileged. Valence rides along in the candidate for the host;
//! - the project boost applies against the visual's own project tag.
//!
//! The module also carries the retention side: a pruning predicate for
//! stale, insignificant visuals (rehearsal buys protection), batch
//! pruning-candidate scans, and auto-tagging strength.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::activation::{
	base_level_activation, centered_gumbel, emotional_multiplier, normalized_recency,
	probe_activation_batch, softmax, ConsolidationState,
};
use crate::error::{CancelToken, EngineError, Result};
use crate::retrieval::{
	check_finite, check_optional_len, optional_at, validate_config, ActivationComponents,
	RetrievalConfig,
};
use crate::similarity::cosine_similarity_batch;
use crate::spreading::{spread_activation, Association, SpreadParams};

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

// ============================================================================
// Emotional Context
// ============================================================================

/// Emotional context of a visual memory.
///
/// Circumplex model of affect: valence is pleasant (+1) to unpleasant
/// (−1), arousal is activation level (0 to 1). Only arousal affects
/// ranking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmotionalContext {
	/// Pleasant (+1) to unpleasant (-1)
	pub valence: f64,
	/// High activation (1) to low activation (0)
	pub arousal: f64,
}

impl Default for EmotionalContext {
	fn default() -> Self {
		Self {
			valence: 0.0,
			arousal: 0.5,
		}
	}
}

impl EmotionalContext {
	/// Create a new emotional context, clamping to the model's ranges.
	#[must_use]
	pub fn new(valence: f64, arousal: f64) -> Self {
		Self {
			valence: valence.clamp(-1.0, 1.0),
			arousal: arousal.clamp(0.0, 1.0),
		}
	}

	/// Check if this represents a strong emotional moment.
	#[inline]
	#[must_use]
	pub fn is_significant(&self) -> bool {
		self.arousal > 0.7 || self.valence.abs() > 0.7
	}
}

// ============================================================================
// Retrieval
// ============================================================================

/// Input data for visual retrieval.
///
/// Parallel arrays follow the same convention as textual retrieval:
/// `arousal`, `valence`, `significance`, `decay_rates`, `wm_boosts`,
/// `projects` and `memory_models` may be empty (defaults apply) or
/// corpus-length.
#[derive(Default)]
pub struct VisualInput<'a> {
	/// Probe embedding vector
	pub probe: &'a [f64],
	/// All visual memory embeddings
	pub embeddings: &'a [Vec<f64>],
	/// Access timestamps (ms since epoch) per memory
	pub access_histories_ms: &'a [Vec<f64>],
	/// Emotional arousal (0-1) per memory; empty = 0.5 everywhere
	pub arousal: &'a [f64],
	/// Emotional valence (-1..1) per memory; empty = 0.0 everywhere
	pub valence: &'a [f64],
	/// Significance score (0-1) per memory; empty = 1.0 everywhere
	pub significance: &'a [f64],
	/// Decay rate per memory; empty = config default
	pub decay_rates: &'a [f64],
	/// Working-memory boost per memory; empty = 1.0
	pub wm_boosts: &'a [f64],
	/// Project tag per memory; empty = untagged
	pub projects: &'a [Option<String>],
	/// Project scope of the query
	pub query_project: Option<&'a str>,
	/// Association graph edges between visual memories
	pub associations: &'a [Association],
	/// Current time (ms since epoch)
	pub now_ms: f64,
	/// Embedding model tag of the probe
	pub probe_model: Option<&'a str>,
	/// Embedding model tag per memory; empty = untagged
	pub memory_models: &'a [String],
	/// Cooperative cancellation token
	pub cancel: Option<&'a CancelToken>,
}

/// A ranked visual retrieval candidate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisualCandidate {
	/// Visual memory index
	pub index: usize,
	/// Final activation including the significance multiplier
	pub total_activation: f64,
	/// Softmax probability over surviving candidates
	pub probability: f64,
	/// Significance score that scaled the activation
	pub significance: f64,
	/// Valence, carried through for the host; does not affect ranking
	pub valence: f64,
	/// Arousal that fed the emotion modulator
	pub arousal: f64,
	/// Component breakdown (modulated excludes the significance scale)
	pub components: ActivationComponents,
}

fn validate_visual_input(input: &VisualInput<'_>) -> Result<()> {
	let n = input.embeddings.len();
	let dim = input.probe.len();

	if n > 0 && dim == 0 {
		return Err(EngineError::InputShape("probe embedding is empty".into()));
	}
	for (i, embedding) in input.embeddings.iter().enumerate() {
		if embedding.len() != dim {
			return Err(EngineError::InputShape(format!(
				"embedding {i} has dimension {}, probe has {dim}",
				embedding.len()
			)));
		}
	}
	if input.access_histories_ms.len() != n {
		return Err(EngineError::InputShape(format!(
			"access histories have length {}, expected {n}",
			input.access_histories_ms.len()
		)));
	}
	check_optional_len(input.arousal.len(), n, "arousal")?;
	check_optional_len(input.valence.len(), n, "valence")?;
	check_optional_len(input.significance.len(), n, "significance")?;
	check_optional_len(input.decay_rates.len(), n, "decay rates")?;
	check_optional_len(input.wm_boosts.len(), n, "working-memory boosts")?;
	check_optional_len(input.projects.len(), n, "project tags")?;
	check_optional_len(input.memory_models.len(), n, "model tags")?;

	if !input.now_ms.is_finite() {
		return Err(EngineError::NumericInput("current time".into()));
	}
	check_finite(input.probe, "probe embedding")?;
	for (i, embedding) in input.embeddings.iter().enumerate() {
		check_finite(embedding, &format!("embedding {i}"))?;
	}
	for (i, history) in input.access_histories_ms.iter().enumerate() {
		check_finite(history, &format!("access history {i}"))?;
	}
	check_finite(input.arousal, "arousal")?;
	check_finite(input.valence, "valence")?;
	check_finite(input.significance, "significance")?;
	check_finite(input.decay_rates, "decay rates")?;
	check_finite(input.wm_boosts, "working-memory boosts")?;

	if !input.memory_models.is_empty() {
		let expected = input
			.probe_model
			.map_or_else(|| input.memory_models[0].as_str(), |tag| tag);
		for tag in input.memory_models {
			if tag != expected {
				return Err(EngineError::ModelMismatch {
					probe: expected.to_string(),
					found: tag.clone(),
				});
			}
		}
	}

	Ok(())
}

/// Retrieve visual memories for a probe.
///
/// Shares the textual pipeline's configuration, validation, cancellation,
/// noise and softmax rules; see the module docs for the three visual
/// differences.
///
/// # Errors
///
/// Same failure semantics as textual retrieval: fails fast on
/// validation, observes cancellation between stages, never fails after
/// validation passes.
pub fn retrieve_visual(
	input: &VisualInput<'_>,
	config: &RetrievalConfig,
) -> Result<Vec<VisualCandidate>> {
	validate_config(config)?;
	validate_visual_input(input)?;

	let n = input.embeddings.len();
	if n == 0 {
		return Ok(Vec::new());
	}
	if let Some(token) = input.cancel {
		token.check()?;
	}

	let similarities = cosine_similarity_batch(input.probe, input.embeddings);
	let probe_activations = probe_activation_batch(&similarities);

	let recency: Vec<f64> = input
		.access_histories_ms
		.iter()
		.enumerate()
		.map(|(i, history)| {
			let decay = optional_at(input.decay_rates, i, config.decay_rate);
			let base = base_level_activation(history, input.now_ms, decay);
			normalized_recency(base, config.base_level_floor)
		})
		.collect();

	let pre_spread: Vec<f64> = (0..n).map(|i| recency[i] + probe_activations[i]).collect();

	let mut order: Vec<usize> = (0..n).collect();
	order.sort_by(|&a, &b| {
		pre_spread[b]
			.partial_cmp(&pre_spread[a])
			.unwrap_or(std::cmp::Ordering::Equal)
			.then(a.cmp(&b))
	});
	let seeds: Vec<(usize, f64)> = order
		.into_iter()
		.filter(|&i| pre_spread[i] >= config.seed_threshold)
		.take(config.seed_count)
		.map(|i| (i, pre_spread[i]))
		.collect();

	let spread = if config.spreading_depth > 0 && !input.associations.is_empty() {
		let params = SpreadParams {
			decay_per_hop: config.spreading_decay,
			depth: config.spreading_depth,
			bidirectional: config.bidirectional,
			contribution_floor: config.spread_floor,
		};
		spread_activation(n, input.associations, &seeds, &params)
	} else {
		vec![0.0; n]
	};
	if let Some(token) = input.cancel {
		token.check()?;
	}

	// Modulators, then the significance scale on top
	let mut modulated = Vec::with_capacity(n);
	let mut scaled = Vec::with_capacity(n);
	for i in 0..n {
		let wm = optional_at(input.wm_boosts, i, 1.0).min(config.wm_boost_cap);
		let emotion = emotional_multiplier(
			optional_at(input.arousal, i, 0.5),
			config.emotion_multiplier_range,
		);
		let mut activation = (pre_spread[i] + spread[i]) * wm * emotion;
		if let Some(query) = input.query_project {
			if input.projects.get(i).and_then(|p| p.as_deref()) == Some(query) {
				activation *= config.project_boost;
			}
		}
		modulated.push(activation);
		scaled.push(activation * optional_at(input.significance, i, 1.0));
	}

	let survivors: Vec<usize> = (0..n)
		.filter(|&i| scaled[i] >= config.activation_threshold)
		.collect();
	if survivors.is_empty() {
		return Ok(Vec::new());
	}

	let mut noisy = scaled;
	if config.noise_parameter > 0.0 {
		let mut rng = StdRng::seed_from_u64(config.noise_seed);
		for &i in &survivors {
			noisy[i] += config.noise_parameter * centered_gumbel(&mut rng);
		}
	}

	let survivor_activations: Vec<f64> = survivors.iter().map(|&i| noisy[i]).collect();
	let probabilities = softmax(&survivor_activations);

	let mut candidates: Vec<VisualCandidate> = survivors
		.iter()
		.zip(&probabilities)
		.filter(|&(_, &p)| p >= config.min_probability)
		.map(|(&i, &probability)| VisualCandidate {
			index: i,
			total_activation: noisy[i],
			probability,
			significance: optional_at(input.significance, i, 1.0),
			valence: optional_at(input.valence, i, 0.0),
			arousal: optional_at(input.arousal, i, 0.5),
			components: ActivationComponents {
				base: recency[i],
				probe: probe_activations[i],
				spread: spread[i],
				modulated: modulated[i],
			},
		})
		.collect();

	candidates.sort_by(|a, b| {
		b.probability
			.partial_cmp(&a.probability)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then(a.index.cmp(&b.index))
	});
	candidates.truncate(config.max_results);

	Ok(candidates)
}

// ============================================================================
// Retention
// ============================================================================

/// Configuration for visual retention: pruning and tagging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualConfig {
	/// Significance threshold for automatic tagging
	pub tagging_significance_threshold: f64,

	/// Days before a low-significance memory starts scoring for pruning
	pub stale_threshold_days: u32,

	/// Memories below this effective significance may be pruned
	pub pruning_threshold: f64,

	/// Days since access after which a memory counts as stale
	pub pruning_stale_days: u32,

	/// Whether video keyframes are exempt from pruning
	pub preserve_keyframes: bool,

	/// Rehearsal curve coefficient for prune protection
	pub rehearsal_alpha: f64,

	/// How much rehearsal can add to effective significance
	pub rehearsal_weight: f64,
}

impl Default for VisualConfig {
	fn default() -> Self {
		Self {
			tagging_significance_threshold: 0.6,
			stale_threshold_days: 14,
			pruning_threshold: 0.2,
			pruning_stale_days: 90,
			preserve_keyframes: true,
			rehearsal_alpha: 0.1,
			rehearsal_weight: 0.3,
		}
	}
}

/// Effective significance after rehearsal protection.
///
/// Access count buys protection on the same asymptotic curve as location
/// familiarity: a frequently revisited visual behaves as if it were more
/// significant than its raw score says.
fn effective_significance(significance: f64, access_count: u32, config: &VisualConfig) -> f64 {
	let rehearsal =
		1.0 - 1.0 / config.rehearsal_alpha.mul_add(f64::from(access_count), 1.0);
	config
		.rehearsal_weight
		.mul_add(rehearsal, significance)
		.min(1.0)
}

/// Decide whether a visual memory should be pruned.
///
/// Stale and insignificant memories prune; very stale ones (twice the
/// stale window) prune unless their effective significance reaches 0.5.
#[must_use]
pub fn visual_should_prune(
	significance: f64,
	age_ms: f64,
	access_count: u32,
	config: &VisualConfig,
) -> bool {
	let age_days = age_ms / MS_PER_DAY;
	let effective = effective_significance(significance, access_count, config);

	if age_days > f64::from(config.pruning_stale_days) && effective < config.pruning_threshold {
		return true;
	}

	if age_days > f64::from(config.pruning_stale_days) * 2.0 && effective < 0.5 {
		return true;
	}

	false
}

/// Engine-side view of a stored visual memory, for retention scans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualRecord {
	/// Significance score (0-1)
	pub significance: f64,
	/// Most recent access timestamp (ms since epoch)
	pub last_accessed_ms: f64,
	/// Access count
	pub access_count: u32,
	/// Consolidation lifecycle label, carried through for the host
	pub state: ConsolidationState,
	/// Protected from pruning by the user
	pub pinned: bool,
	/// First frame of a video
	pub keyframe: bool,
}

/// Why a memory is a pruning candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PruningReason {
	/// Low significance and not accessed recently
	LowSignificance,
	/// Not accessed in a long time
	Stale,
}

/// A candidate for memory pruning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruningCandidate {
	/// Memory index
	pub index: usize,
	/// Current significance
	pub significance: f64,
	/// Days since last access
	pub days_since_access: f64,
	/// Why this is a pruning candidate
	pub reason: PruningReason,
	/// Pruning score (higher = more prunable)
	pub score: f64,
}

/// Scan visual memories for pruning candidates, most prunable first.
///
/// Pinned memories and (when configured) keyframes are exempt.
#[must_use]
pub fn pruning_candidates(
	records: &[VisualRecord],
	now_ms: f64,
	config: &VisualConfig,
) -> SmallVec<[PruningCandidate; 32]> {
	let mut candidates: SmallVec<[PruningCandidate; 32]> = records
		.iter()
		.enumerate()
		.filter_map(|(i, record)| {
			if record.pinned {
				return None;
			}
			if config.preserve_keyframes && record.keyframe {
				return None;
			}

			let days_since_access = (now_ms - record.last_accessed_ms) / MS_PER_DAY;
			let effective =
				effective_significance(record.significance, record.access_count, config);

			if days_since_access > f64::from(config.pruning_stale_days) {
				let score = (days_since_access / f64::from(config.pruning_stale_days))
					* (1.0 - effective);
				return Some(PruningCandidate {
					index: i,
					significance: record.significance,
					days_since_access,
					reason: PruningReason::Stale,
					score,
				});
			}

			if effective < config.pruning_threshold {
				let score = (config.pruning_threshold - effective)
					* (days_since_access / f64::from(config.stale_threshold_days)).min(1.0);
				return Some(PruningCandidate {
					index: i,
					significance: record.significance,
					days_since_access,
					reason: PruningReason::LowSignificance,
					score,
				});
			}

			None
		})
		.collect();

	candidates.sort_by(|a, b| {
		b.score
			.partial_cmp(&a.score)
			.unwrap_or(std::cmp::Ordering::Equal)
	});

	candidates
}

// ============================================================================
// Tagging
// ============================================================================

/// Compute tag strength from detection confidence, rehearsal and
/// significance.
#[must_use]
pub fn tag_strength(
	base_confidence: f64,
	access_count: u32,
	significance: f64,
	config: &VisualConfig,
) -> f64 {
	let access_boost =
		1.0 - 1.0 / config.rehearsal_alpha.mul_add(f64::from(access_count), 1.0);

	let significance_boost = if significance > config.tagging_significance_threshold {
		(significance - config.tagging_significance_threshold) * 0.5
	} else {
		0.0
	};

	(base_confidence + access_boost * config.rehearsal_weight + significance_boost).min(1.0)
}

/// Check if a tag clears the application threshold.
#[inline]
#[must_use]
pub fn should_tag(strength: f64, threshold: f64) -> bool {
	strength >= threshold
}

// ============================================================================
// Consolidation Window
// ============================================================================

/// A time window during which a visual memory is labile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationWindow {
	/// When the window opened
	pub started_at_ms: f64,
	/// When the window closes (memory becomes stable)
	pub ends_at_ms: f64,
	/// Lifecycle label during the window
	pub state: ConsolidationState,
}

impl ConsolidationWindow {
	/// Open a new consolidation window starting now.
	#[must_use]
	pub const fn open(now_ms: f64, duration_ms: f64) -> Self {
		Self {
			started_at_ms: now_ms,
			ends_at_ms: now_ms + duration_ms,
			state: ConsolidationState::Consolidating,
		}
	}

	/// Check if the window is still open.
	#[inline]
	#[must_use]
	pub fn is_open(&self, now_ms: f64) -> bool {
		now_ms < self.ends_at_ms
	}

	/// Progress through the window (0-1).
	#[must_use]
	pub fn progress(&self, now_ms: f64) -> f64 {
		if now_ms >= self.ends_at_ms {
			return 1.0;
		}
		let elapsed = now_ms - self.started_at_ms;
		let duration = self.ends_at_ms - self.started_at_ms;
		(elapsed / duration).clamp(0.0, 1.0)
	}
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
	use super::*;

	const NOW: f64 = 1_700_000_000_000.0;
	const HOUR_MS: f64 = 3_600_000.0;

	fn quiet_config() -> RetrievalConfig {
		RetrievalConfig {
			noise_parameter: 0.0,
			..Default::default()
		}
	}

	#[test]
	fn emotional_context_clamps_and_flags() {
		let ctx = EmotionalContext::new(2.0, -0.5);
		assert_eq!(ctx.valence, 1.0);
		assert_eq!(ctx.arousal, 0.0);

		assert!(!EmotionalContext::new(0.0, 0.5).is_significant());
		assert!(EmotionalContext::new(0.0, 0.8).is_significant());
		assert!(EmotionalContext::new(-0.9, 0.5).is_significant());
	}

	#[test]
	fn significance_multiplies_activation() {
		let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
		let histories = vec![vec![NOW - HOUR_MS], vec![NOW - HOUR_MS]];
		let input = VisualInput {
			probe: &[1.0, 0.0],
			embeddings: &embeddings,
			access_histories_ms: &histories,
			significance: &[1.0, 0.5],
			now_ms: NOW,
			..Default::default()
		};

		let results = retrieve_visual(&input, &quiet_config()).unwrap();

		assert_eq!(results[0].index, 0);
		let full = &results[0];
		let half = results.iter().find(|c| c.index == 1).unwrap();
		assert!(
			(half.total_activation - full.total_activation * 0.5).abs() < 1e-9,
			"identical memories, half significance → half activation"
		);
	}

	#[test]
	fn arousal_drives_ranking_valence_rides_along() {
		let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
		let histories = vec![vec![NOW - HOUR_MS], vec![NOW - HOUR_MS]];
		let input = VisualInput {
			probe: &[1.0, 0.0],
			embeddings: &embeddings,
			access_histories_ms: &histories,
			arousal: &[0.9, 0.1],
			valence: &[-0.8, 0.8],
			now_ms: NOW,
			..Default::default()
		};

		let results = retrieve_visual(&input, &quiet_config()).unwrap();

		// High arousal wins despite unpleasant valence
		assert_eq!(results[0].index, 0);
		assert_eq!(results[0].valence, -0.8);
		assert_eq!(results[1].valence, 0.8);
	}

	#[test]
	fn project_boost_applies_to_visual_tags() {
		let embeddings = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
		let histories = vec![vec![NOW - HOUR_MS], vec![NOW - HOUR_MS]];
		let projects = vec![Some("atlas".to_string()), None];
		let input = VisualInput {
			probe: &[1.0, 0.0],
			embeddings: &embeddings,
			access_histories_ms: &histories,
			projects: &projects,
			query_project: Some("atlas"),
			now_ms: NOW,
			..Default::default()
		};

		let config = quiet_config();
		let results = retrieve_visual(&input, &config).unwrap();

		let tagged = results.iter().find(|c| c.index == 0).unwrap();
		let plain = results.iter().find(|c| c.index == 1).unwrap();
		let ratio = tagged.components.modulated / plain.components.modulated;
		assert!((ratio - config.project_boost).abs() < 1e-9);
	}

	#[test]
	fn empty_visual_corpus_is_fine() {
		let input = VisualInput {
			probe: &[1.0, 0.0],
			now_ms: NOW,
			..Default::default()
		};
		assert!(retrieve_visual(&input, &quiet_config()).unwrap().is_empty());
	}

	#[test]
	fn visual_validation_rejects_bad_shapes() {
		let embeddings = vec![vec![1.0, 0.0]];
		let histories = vec![vec![NOW]];
		let input = VisualInput {
			probe: &[1.0, 0.0],
			embeddings: &embeddings,
			access_histories_ms: &histories,
			arousal: &[0.5, 0.5],
			now_ms: NOW,
			..Default::default()
		};

		let err = retrieve_visual(&input, &quiet_config()).unwrap_err();
		assert!(matches!(err, EngineError::InputShape(_)));
	}

	#[test]
	fn prune_predicate_respects_rehearsal() {
		let config = VisualConfig::default();
		let stale = 100.0 * MS_PER_DAY;

		// Stale and insignificant → prune
		assert!(visual_should_prune(0.1, stale, 0, &config));
		// Same significance but heavily rehearsed → protected
		assert!(!visual_should_prune(0.1, stale, 50, &config));
		// Significant memories survive even when very stale
		assert!(!visual_should_prune(0.8, 200.0 * MS_PER_DAY, 0, &config));
		// Fresh memories are never pruned
		assert!(!visual_should_prune(0.05, 5.0 * MS_PER_DAY, 0, &config));
	}

	#[test]
	fn very_stale_mediocre_memories_prune() {
		let config = VisualConfig::default();
		let very_stale = 200.0 * MS_PER_DAY;
		assert!(visual_should_prune(0.4, very_stale, 0, &config));
	}

	fn record(significance: f64, last_accessed_ms: f64, pinned: bool) -> VisualRecord {
		VisualRecord {
			significance,
			last_accessed_ms,
			access_count: 1,
			state: ConsolidationState::Consolidated,
			pinned,
			keyframe: false,
		}
	}

	#[test]
	fn pruning_scan_exempts_pins_and_keyframes() {
		let config = VisualConfig::default();
		let now = 100.0 * MS_PER_DAY;

		let mut keyframe = record(0.1, 0.0, false);
		keyframe.keyframe = true;

		let records = vec![
			record(0.1, 0.0, false), // stale, insignificant
			record(0.9, now, false), // fresh, significant
			record(0.1, 0.0, true),  // pinned
			keyframe,
		];

		let candidates = pruning_candidates(&records, now, &config);

		assert_eq!(candidates.len(), 1);
		assert_eq!(candidates[0].index, 0);
		assert_eq!(candidates[0].reason, PruningReason::Stale);
	}

	#[test]
	fn tag_strength_grows_with_rehearsal_and_significance() {
		let config = VisualConfig::default();

		let weak = tag_strength(0.5, 1, 0.3, &config);
		let strong = tag_strength(0.8, 20, 0.9, &config);

		assert!(strong > weak);
		assert!(strong <= 1.0);
		assert!(should_tag(strong, 0.8));
	}

	#[test]
	fn consolidation_window_progress() {
		let window = ConsolidationWindow::open(1000.0, 1000.0);

		assert!(window.is_open(1500.0));
		assert!(!window.is_open(2500.0));
		assert!((window.progress(1500.0) - 0.5).abs() < 1e-9);
		assert_eq!(window.progress(3000.0), 1.0);
	}
}
