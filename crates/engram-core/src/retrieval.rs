//! Retrieval Pipeline
//!
//! The public entry point. One pass over a snapshot of host-supplied
//! arrays, in a fixed stage order so runs are reproducible:
//!
//! 1. Probe-trace similarities and cubed probe activations
//! 2. Base-level activation from access history
//! 3. Bounded composition of recency + relevance
//! 4. Seed selection and graph spreading
//! 5. Multiplicative modulators (WM, emotion, project, session)
//! 6. Episodic spreading when episodes were supplied
//! 7. Threshold cut, optional seeded noise, softmax, final filters
//!
//! Validation is all-or-nothing: the pipeline fails fast before any
//! computation and never fails after validation passes. Pathological but
//! finite inputs (all zeros, disjoint graphs, empty histories) produce a
//! well-defined, possibly empty, result.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::activation::{
	base_level_activation, centered_gumbel, emotional_multiplier, normalized_recency,
	probe_activation_batch, softmax,
};
use crate::error::{CancelToken, EngineError, Result};
use crate::similarity::{cosine_similarity, cosine_similarity_batch};
use crate::spreading::{spread_activation, top_activated, Association, SpreadParams};
use crate::temporal::{spread_temporal_activation, Episode, TemporalParams};

/// Configuration for retrieval.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalConfig {
	/// Default decay rate `d` for base-level activation
	pub decay_rate: f64,
	/// Candidates below this activation are discarded before normalization
	pub activation_threshold: f64,
	/// Scale of the centered Gumbel noise added before softmax (0 disables)
	pub noise_parameter: f64,
	/// Seed for the noise generator; same seed, same inputs → same output
	pub noise_seed: u64,
	/// Spreading activation depth
	pub spreading_depth: usize,
	/// Spreading decay γ per hop
	pub spreading_decay: f64,
	/// Results below this probability are dropped after normalization
	pub min_probability: f64,
	/// Hard cap on returned candidates
	pub max_results: usize,
	/// Whether spreading walks backward strengths
	pub bidirectional: bool,
	/// Emotional weight 0..1 maps linearly onto this multiplier range
	pub emotion_multiplier_range: [f64; 2],
	/// Maximum multiplicative working-memory boost
	pub wm_boost_cap: f64,
	/// Multiplier when a memory's project matches the query project
	pub project_boost: f64,
	/// Multiplier for memories accessed in the active session
	pub session_boost: f64,
	/// How many top-activated memories initiate spreading
	pub seed_count: usize,
	/// Minimum activation for a memory to qualify as a seed
	pub seed_threshold: f64,
	/// Raw base-level values at or below this floor count as zero recency
	pub base_level_floor: f64,
	/// Spreading contributions below this are pruned
	pub spread_floor: f64,
}

impl Default for RetrievalConfig {
	fn default() -> Self {
		Self {
			decay_rate: 0.5,
			activation_threshold: 0.3,
			noise_parameter: 0.1,
			noise_seed: 0,
			spreading_depth: 3,
			spreading_decay: 0.7,
			min_probability: 0.1,
			max_results: 10,
			bidirectional: true,
			emotion_multiplier_range: [1.0, 1.5],
			wm_boost_cap: 2.0,
			project_boost: 1.25,
			session_boost: 1.2,
			seed_count: 5,
			seed_threshold: 0.0,
			base_level_floor: -15.0,
			spread_floor: 1e-6,
		}
	}
}

/// Session and episode context for a query.
#[derive(Clone, Debug, Default)]
pub struct TemporalContext<'a> {
	/// Memory indices accessed in the active session
	pub session_members: &'a [usize],
	/// Episodes available for episodic spreading
	pub episodes: &'a [Episode],
}

/// Input data for retrieval: a snapshot of the host's arrays for the
/// query's scope. The engine mutates nothing persistent.
///
/// `emotional_weights`, `decay_rates`, `wm_boosts`, `projects` and
/// `memory_models` may be empty (defaults apply to every memory) or
/// exactly corpus-length; anything else is an [`EngineError::InputShape`].
#[derive(Default)]
pub struct RetrievalInput<'a> {
	/// Probe embedding vector
	pub probe: &'a [f64],
	/// All memory embeddings
	pub embeddings: &'a [Vec<f64>],
	/// Access timestamps (ms since epoch) for each memory
	pub access_histories_ms: &'a [Vec<f64>],
	/// Emotional weight (0-1) per memory; empty = 0.5 everywhere
	pub emotional_weights: &'a [f64],
	/// Decay rate per memory; empty = config default everywhere
	pub decay_rates: &'a [f64],
	/// Working-memory boost per memory; empty = 1.0 everywhere
	pub wm_boosts: &'a [f64],
	/// Project tag per memory; empty = untagged
	pub projects: &'a [Option<String>],
	/// Project scope of the query
	pub query_project: Option<&'a str>,
	/// Association graph edges
	pub associations: &'a [Association],
	/// Current time (ms since epoch, host clock)
	pub now_ms: f64,
	/// Session membership and episodes, when the host tracked them
	pub temporal: Option<TemporalContext<'a>>,
	/// Embedding model tag of the probe
	pub probe_model: Option<&'a str>,
	/// Embedding model tag per memory; empty = untagged
	pub memory_models: &'a [String],
	/// Cooperative cancellation token
	pub cancel: Option<&'a CancelToken>,
}

/// Per-candidate activation breakdown for explainability.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivationComponents {
	/// Bounded recency term derived from base-level activation
	pub base: f64,
	/// Cubed probe-trace similarity
	pub probe: f64,
	/// Deposit received from graph spreading
	pub spread: f64,
	/// Activation after modulators and episodic spreading, before noise
	pub modulated: f64,
}

/// A ranked retrieval candidate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Candidate {
	/// Memory index into the input arrays
	pub index: usize,
	/// Final activation, including noise when enabled
	pub total_activation: f64,
	/// Softmax probability over the candidates that survived the
	/// activation threshold
	pub probability: f64,
	/// Component breakdown
	pub components: ActivationComponents,
}

fn config_err(message: &str) -> EngineError {
	EngineError::ConfigOutOfRange(message.to_string())
}

/// Validate a retrieval configuration.
///
/// # Errors
///
/// Returns [`EngineError::ConfigOutOfRange`] naming the offending field.
pub fn validate_config(config: &RetrievalConfig) -> Result<()> {
	if !config.decay_rate.is_finite() || config.decay_rate <= 0.0 {
		return Err(config_err("decay_rate must be finite and positive"));
	}
	if !config.activation_threshold.is_finite() {
		return Err(config_err("activation_threshold must be finite"));
	}
	if !config.noise_parameter.is_finite() || config.noise_parameter < 0.0 {
		return Err(config_err("noise_parameter must be finite and non-negative"));
	}
	if !config.spreading_decay.is_finite()
		|| !(0.0..=1.0).contains(&config.spreading_decay)
	{
		return Err(config_err("spreading_decay must lie in [0, 1]"));
	}
	if !config.min_probability.is_finite() || !(0.0..=1.0).contains(&config.min_probability) {
		return Err(config_err("min_probability must lie in [0, 1]"));
	}
	if config.max_results < 1 {
		return Err(config_err("max_results must be at least 1"));
	}
	if config.seed_count < 1 {
		return Err(config_err("seed_count must be at least 1"));
	}
	let [low, high] = config.emotion_multiplier_range;
	if !low.is_finite() || !high.is_finite() || low <= 0.0 || low > high {
		return Err(config_err(
			"emotion_multiplier_range must be finite, positive and ordered",
		));
	}
	if !config.wm_boost_cap.is_finite() || config.wm_boost_cap < 1.0 {
		return Err(config_err("wm_boost_cap must be at least 1"));
	}
	if !config.project_boost.is_finite() || config.project_boost <= 0.0 {
		return Err(config_err("project_boost must be finite and positive"));
	}
	if !config.session_boost.is_finite() || config.session_boost <= 0.0 {
		return Err(config_err("session_boost must be finite and positive"));
	}
	if !config.seed_threshold.is_finite() {
		return Err(config_err("seed_threshold must be finite"));
	}
	if !config.base_level_floor.is_finite() || config.base_level_floor >= 0.0 {
		return Err(config_err("base_level_floor must be finite and negative"));
	}
	if !config.spread_floor.is_finite() || config.spread_floor < 0.0 {
		return Err(config_err("spread_floor must be finite and non-negative"));
	}
	Ok(())
}

/// Length check for an optional parallel array: empty or exactly `n`.
pub(crate) fn check_optional_len(len: usize, n: usize, name: &str) -> Result<()> {
	if len == 0 || len == n {
		Ok(())
	} else {
		Err(EngineError::InputShape(format!(
			"{name} has length {len}, expected 0 or {n}"
		)))
	}
}

pub(crate) fn check_finite(values: &[f64], name: &str) -> Result<()> {
	if values.iter().all(|v| v.is_finite()) {
		Ok(())
	} else {
		Err(EngineError::NumericInput(name.to_string()))
	}
}

fn validate_input(input: &RetrievalInput<'_>) -> Result<()> {
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
	check_optional_len(input.emotional_weights.len(), n, "emotional weights")?;
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
	check_finite(input.emotional_weights, "emotional weights")?;
	check_finite(input.decay_rates, "decay rates")?;
	check_finite(input.wm_boosts, "working-memory boosts")?;
	for (i, assoc) in input.associations.iter().enumerate() {
		if !assoc.forward_strength.is_finite() || !assoc.backward_strength.is_finite() {
			return Err(EngineError::NumericInput(format!("association {i}")));
		}
	}

	// Mixed-model corpora rank on incomparable geometry; refuse them.
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

fn check_cancel(input: &RetrievalInput<'_>) -> Result<()> {
	match input.cancel {
		Some(token) => token.check(),
		None => Ok(()),
	}
}

/// Value of an optional parallel array at `i`, or its default.
pub(crate) fn optional_at(values: &[f64], i: usize, default: f64) -> f64 {
	values.get(i).copied().unwrap_or(default)
}

/// Full retrieval pipeline.
///
/// # Errors
///
/// Fails fast on validation: [`EngineError::ConfigOutOfRange`],
/// [`EngineError::InputShape`], [`EngineError::NumericInput`],
/// [`EngineError::ModelMismatch`]; or [`EngineError::Cancelled`] when the
/// input token fires between stages. Once validation passes and no
/// cancellation is observed, the call cannot fail. An empty corpus
/// returns an empty list.
pub fn retrieve(input: &RetrievalInput<'_>, config: &RetrievalConfig) -> Result<Vec<Candidate>> {
	validate_config(config)?;
	validate_input(input)?;

	let n = input.embeddings.len();
	if n == 0 {
		return Ok(Vec::new());
	}
	check_cancel(input)?;

	// 1. Probe-trace similarities, cubed (MINERVA 2)
	let similarities = cosine_similarity_batch(input.probe, input.embeddings);
	let probe_activations = probe_activation_batch(&similarities);

	// 2. Base-level activation with per-memory decay rates
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
	check_cancel(input)?;

	// 3. Bounded pre-spread composition
	let pre_spread: Vec<f64> = (0..n).map(|i| recency[i] + probe_activations[i]).collect();

	// 4. Seed selection: top seed_count at or above the seed threshold
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

	// 5. Graph spreading
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
	check_cancel(input)?;

	// 6. Multiplicative modulators, fixed order: WM → emotion → project → session
	let session: Option<HashSet<usize>> = input
		.temporal
		.as_ref()
		.map(|ctx| ctx.session_members.iter().copied().collect());

	let mut modulated: Vec<f64> = (0..n)
		.map(|i| {
			let wm = optional_at(input.wm_boosts, i, 1.0).min(config.wm_boost_cap);
			let emotion = emotional_multiplier(
				optional_at(input.emotional_weights, i, 0.5),
				config.emotion_multiplier_range,
			);
			let mut activation = (pre_spread[i] + spread[i]) * wm * emotion;
			if let Some(query) = input.query_project {
				if input.projects.get(i).and_then(|p| p.as_deref()) == Some(query) {
					activation *= config.project_boost;
				}
			}
			if session.as_ref().is_some_and(|s| s.contains(&i)) {
				activation *= config.session_boost;
			}
			activation
		})
		.collect();

	// 7. Episodic spreading between modulators and the threshold cut
	if let Some(ctx) = &input.temporal {
		if !ctx.episodes.is_empty() {
			let params = TemporalParams::default();
			let temporal_seeds = top_activated(&modulated, params.max_seeds);
			let delta =
				spread_temporal_activation(&modulated, ctx.episodes, &temporal_seeds, &params);
			for (value, d) in modulated.iter_mut().zip(&delta) {
				*value += d;
			}
		}
	}
	check_cancel(input)?;

	// 8. Threshold cut
	let survivors: Vec<usize> = (0..n)
		.filter(|&i| modulated[i] >= config.activation_threshold)
		.collect();
	if survivors.is_empty() {
		return Ok(Vec::new());
	}

	// 9. Seeded Gumbel noise for tie-breaking; zero scale disables sampling
	let mut noisy = modulated.clone();
	if config.noise_parameter > 0.0 {
		let mut rng = StdRng::seed_from_u64(config.noise_seed);
		for &i in &survivors {
			noisy[i] += config.noise_parameter * centered_gumbel(&mut rng);
		}
	}

	// 10. Softmax over survivors; later filters keep their mass, so the
	// returned probabilities sum to at most 1.
	let survivor_activations: Vec<f64> = survivors.iter().map(|&i| noisy[i]).collect();
	let probabilities = softmax(&survivor_activations);

	// 11-12. Probability floor, rank, cap
	let mut candidates: Vec<Candidate> = survivors
		.iter()
		.zip(&probabilities)
		.filter(|&(_, &p)| p >= config.min_probability)
		.map(|(&i, &probability)| Candidate {
			index: i,
			total_activation: noisy[i],
			probability,
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

/// Lightweight similarity-only ranking.
///
/// Use when you just need the nearest memories without the activation
/// model — consolidation scans, duplicate checks.
#[must_use]
pub fn rank_by_similarity(probe: &[f64], embeddings: &[Vec<f64>], top_k: usize) -> Vec<usize> {
	let similarities = cosine_similarity_batch(probe, embeddings);

	let mut indexed: Vec<(usize, f64)> = similarities.into_iter().enumerate().collect();
	indexed.sort_by(|a, b| {
		b.1
			.partial_cmp(&a.1)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then(a.0.cmp(&b.0))
	});

	indexed.into_iter().take(top_k).map(|(i, _)| i).collect()
}

/// Compute surprise (prediction error) between expected and retrieved.
///
/// Semantic surprise `1 - cos` is normalized against a threshold that
/// grows with memory age and strength — entrenched traces need more
/// evidence to destabilize.
///
/// # Returns
///
/// Normalized surprise in `[0, 1]`.
#[must_use]
pub fn surprise(
	expected_embedding: &[f64],
	actual_embedding: &[f64],
	memory_age_days: f64,
	memory_strength: f64,
	base_threshold: f64,
) -> f64 {
	let semantic_surprise = 1.0 - cosine_similarity(expected_embedding, actual_embedding);

	let age_adjustment = memory_age_days * 0.01;
	let strength_adjustment = memory_strength * 0.2;
	let adjusted_threshold = base_threshold + age_adjustment + strength_adjustment;

	(semantic_surprise / adjusted_threshold).min(1.0)
}

/// Check if surprise opens a reconsolidation window.
#[must_use]
pub fn triggers_lability(surprise_value: f64, threshold: f64) -> bool {
	surprise_value > threshold
}
