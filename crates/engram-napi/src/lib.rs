//! Node.js bindings for the engram-core memory retrieval engine.
//!
//! Owned-value mirror of the engine API for the TypeScript host. Fallible
//! engine calls surface as JS exceptions carrying the engine's error
//! message; infallible kernels are exposed directly.

// napi-rs requires owned types at the FFI boundary - can't use references
#![allow(clippy::needless_pass_by_value)]
// Memory indices will never exceed u32::MAX in practice
#![allow(clippy::cast_possible_truncation)]

use napi::bindgen_prelude::*;
use napi_derive::napi;

use engram_core::location::{
	associated_locations as core_associated_locations,
	association_multiplier as core_association_multiplier,
	association_strength as core_association_strength, batch_decay as core_batch_decay,
	decayed_familiarity as core_decayed_familiarity, familiarity as core_familiarity,
	infer_activity as core_infer_activity, is_well_known as core_is_well_known, ActivityType,
	InferenceSource, LocationAssociation, LocationConfig, LocationIntuition,
};
use engram_core::visual::{
	retrieve_visual as core_retrieve_visual, should_tag as core_should_tag,
	tag_strength as core_tag_strength, visual_should_prune as core_visual_should_prune,
	VisualConfig, VisualInput,
};
use engram_core::{
	activation, retrieve as core_retrieve, surprise as core_surprise,
	temporal_neighbors as core_temporal_neighbors, Association, Episode, EngineError,
	LinkDirection, RetrievalConfig, RetrievalInput, TemporalContext, TemporalDirection,
	TemporalLink, TemporalParams, WorkingMemoryConfig,
};

fn engine_err(error: EngineError) -> Error {
	Error::from_reason(error.to_string())
}

// ============================================================================
// Retrieval
// ============================================================================

/// Association between two memories for spreading activation.
#[napi(object)]
#[derive(Clone)]
pub struct JsAssociation {
	pub source: u32,
	pub target: u32,
	pub forward_strength: f64,
	pub backward_strength: f64,
}

impl From<JsAssociation> for Association {
	fn from(assoc: JsAssociation) -> Self {
		Self {
			source: assoc.source as usize,
			target: assoc.target as usize,
			forward_strength: assoc.forward_strength,
			backward_strength: assoc.backward_strength,
		}
	}
}

/// A temporal link between two events of an episode.
#[napi(object)]
#[derive(Clone)]
pub struct JsTemporalLink {
	pub source_event: u32,
	pub target_event: u32,
	pub strength: f64,
	/// "forward" or "backward"
	pub direction: String,
}

/// An ordered episode of memory indices.
#[napi(object)]
#[derive(Clone)]
pub struct JsEpisode {
	pub events: Vec<u32>,
	pub links: Vec<JsTemporalLink>,
	pub open: bool,
	pub encoding_strength: f64,
}

fn to_core_episode(episode: JsEpisode) -> Episode {
	Episode {
		events: episode.events.into_iter().map(|e| e as usize).collect(),
		links: episode
			.links
			.into_iter()
			.map(|link| TemporalLink {
				source_event: link.source_event as usize,
				target_event: link.target_event as usize,
				strength: link.strength,
				direction: if link.direction == "backward" {
					LinkDirection::Backward
				} else {
					LinkDirection::Forward
				},
			})
			.collect(),
		open: episode.open,
		encoding_strength: episode.encoding_strength,
	}
}

/// Configuration for retrieval. Missing fields use engine defaults.
#[napi(object)]
#[derive(Clone, Default)]
pub struct JsRetrievalConfig {
	/// Decay rate for base-level activation (default: 0.5)
	pub decay_rate: Option<f64>,
	/// Activation threshold for the pre-normalization cut (default: 0.3)
	pub activation_threshold: Option<f64>,
	/// Gumbel noise scale; 0 disables (default: 0.1)
	pub noise_parameter: Option<f64>,
	/// Seed for the noise generator (default: 0)
	pub noise_seed: Option<u32>,
	/// Spreading activation depth (default: 3)
	pub spreading_depth: Option<u32>,
	/// Spreading decay per hop (default: 0.7)
	pub spreading_decay: Option<f64>,
	/// Minimum probability to include (default: 0.1)
	pub min_probability: Option<f64>,
	/// Maximum results to return (default: 10)
	pub max_results: Option<u32>,
	/// Whether to spread bidirectionally (default: true)
	pub bidirectional: Option<bool>,
	/// Emotional multiplier at weight 0 (default: 1.0)
	pub emotion_multiplier_low: Option<f64>,
	/// Emotional multiplier at weight 1 (default: 1.5)
	pub emotion_multiplier_high: Option<f64>,
	/// Working-memory boost cap (default: 2.0)
	pub wm_boost_cap: Option<f64>,
	/// Project match multiplier (default: 1.25)
	pub project_boost: Option<f64>,
	/// Session membership multiplier (default: 1.2)
	pub session_boost: Option<f64>,
}

fn to_core_config(config: Option<JsRetrievalConfig>) -> RetrievalConfig {
	let defaults = RetrievalConfig::default();
	let Some(c) = config else {
		return defaults;
	};
	RetrievalConfig {
		decay_rate: c.decay_rate.unwrap_or(defaults.decay_rate),
		activation_threshold: c
			.activation_threshold
			.unwrap_or(defaults.activation_threshold),
		noise_parameter: c.noise_parameter.unwrap_or(defaults.noise_parameter),
		noise_seed: c.noise_seed.map_or(defaults.noise_seed, u64::from),
		spreading_depth: c
			.spreading_depth
			.map_or(defaults.spreading_depth, |d| d as usize),
		spreading_decay: c.spreading_decay.unwrap_or(defaults.spreading_decay),
		min_probability: c.min_probability.unwrap_or(defaults.min_probability),
		max_results: c.max_results.map_or(defaults.max_results, |m| m as usize),
		bidirectional: c.bidirectional.unwrap_or(defaults.bidirectional),
		emotion_multiplier_range: [
			c.emotion_multiplier_low
				.unwrap_or(defaults.emotion_multiplier_range[0]),
			c.emotion_multiplier_high
				.unwrap_or(defaults.emotion_multiplier_range[1]),
		],
		wm_boost_cap: c.wm_boost_cap.unwrap_or(defaults.wm_boost_cap),
		project_boost: c.project_boost.unwrap_or(defaults.project_boost),
		session_boost: c.session_boost.unwrap_or(defaults.session_boost),
		..defaults
	}
}

/// Result candidate from retrieval, with the component breakdown
/// flattened for JS consumers.
#[napi(object)]
pub struct JsCandidate {
	/// Memory index
	pub index: u32,
	/// Final activation (including noise when enabled)
	pub total_activation: f64,
	/// Softmax probability over surviving candidates
	pub probability: f64,
	/// Bounded recency term from base-level activation
	pub base: f64,
	/// Cubed probe-trace similarity
	pub probe: f64,
	/// Graph spreading deposit
	pub spread: f64,
	/// Activation after modulators, before noise
	pub modulated: f64,
}

/// Full retrieval pipeline: ACT-R base-level + MINERVA 2 probe matching +
/// spreading activation + modulators, normalized to probabilities.
///
/// Optional arrays may be empty to use per-memory defaults. Throws on
/// malformed input (shape, non-finite values, mixed model tags) or
/// out-of-range configuration.
#[napi]
pub fn retrieve(
	probe: Vec<f64>,
	memory_embeddings: Vec<Vec<f64>>,
	access_histories_ms: Vec<Vec<f64>>,
	emotional_weights: Vec<f64>,
	decay_rates: Vec<f64>,
	working_memory_boosts: Vec<f64>,
	current_time_ms: f64,
	associations: Option<Vec<JsAssociation>>,
	projects: Option<Vec<Option<String>>>,
	query_project: Option<String>,
	session_members: Option<Vec<u32>>,
	episodes: Option<Vec<JsEpisode>>,
	config: Option<JsRetrievalConfig>,
) -> Result<Vec<JsCandidate>> {
	let core_config = to_core_config(config);
	let associations: Vec<Association> = associations
		.unwrap_or_default()
		.into_iter()
		.map(Association::from)
		.collect();
	let projects: Vec<Option<String>> = projects.unwrap_or_default();
	let session: Vec<usize> = session_members
		.unwrap_or_default()
		.into_iter()
		.map(|i| i as usize)
		.collect();
	let episodes: Vec<Episode> = episodes
		.unwrap_or_default()
		.into_iter()
		.map(to_core_episode)
		.collect();

	let temporal = if session.is_empty() && episodes.is_empty() {
		None
	} else {
		Some(TemporalContext {
			session_members: &session,
			episodes: &episodes,
		})
	};

	let input = RetrievalInput {
		probe: &probe,
		embeddings: &memory_embeddings,
		access_histories_ms: &access_histories_ms,
		emotional_weights: &emotional_weights,
		decay_rates: &decay_rates,
		wm_boosts: &working_memory_boosts,
		projects: &projects,
		query_project: query_project.as_deref(),
		associations: &associations,
		now_ms: current_time_ms,
		temporal,
		..Default::default()
	};

	let candidates = core_retrieve(&input, &core_config).map_err(engine_err)?;

	Ok(candidates
		.into_iter()
		.map(|c| JsCandidate {
			index: c.index as u32,
			total_activation: c.total_activation,
			probability: c.probability,
			base: c.components.base,
			probe: c.components.probe,
			spread: c.components.spread,
			modulated: c.components.modulated,
		})
		.collect())
}

/// A temporal neighbor with its asymmetric distance-decayed weight.
#[napi(object)]
pub struct JsTemporalNeighbor {
	pub index: u32,
	pub weight: f64,
}

/// Retrieve up to k temporal neighbors of an anchor memory.
///
/// direction: "before" or "after".
#[napi]
pub fn retrieve_temporal_neighbors(
	episodes: Vec<JsEpisode>,
	anchor: u32,
	direction: String,
	k: u32,
) -> Vec<JsTemporalNeighbor> {
	let episodes: Vec<Episode> = episodes.into_iter().map(to_core_episode).collect();
	let dir = if direction == "before" {
		TemporalDirection::Before
	} else {
		TemporalDirection::After
	};

	core_temporal_neighbors(
		&episodes,
		anchor as usize,
		dir,
		k as usize,
		&TemporalParams::default(),
	)
	.into_iter()
	.map(|n| JsTemporalNeighbor {
		index: n.index as u32,
		weight: n.weight,
	})
	.collect()
}

// ============================================================================
// Kernels
// ============================================================================

/// Compute cosine similarity between two vectors.
#[napi]
pub fn cosine_similarity(a: Vec<f64>, b: Vec<f64>) -> f64 {
	engram_core::cosine_similarity(&a, &b)
}

/// Batch compute cosine similarity between a probe and all memories.
#[napi]
pub fn cosine_similarity_batch(probe: Vec<f64>, memories: Vec<Vec<f64>>) -> Vec<f64> {
	engram_core::cosine_similarity_batch(&probe, &memories)
}

/// Compute base-level activation from access history.
///
/// B(m) = ln[Σ(ΔT_k + ε)^(-d)]
#[napi]
pub fn base_level_activation(access_times_ms: Vec<f64>, current_time_ms: f64, decay: f64) -> f64 {
	engram_core::base_level_activation(&access_times_ms, current_time_ms, decay)
}

/// Apply the cubic probe activation (MINERVA 2).
///
/// A(i) = S(i)³
#[napi]
pub fn probe_activation(similarity: f64) -> f64 {
	engram_core::probe_activation(similarity)
}

/// Compute surprise (prediction error) between expected and retrieved.
#[napi]
pub fn surprise(
	expected_embedding: Vec<f64>,
	actual_embedding: Vec<f64>,
	memory_age_days: f64,
	memory_strength: f64,
	base_threshold: f64,
) -> f64 {
	core_surprise(
		&expected_embedding,
		&actual_embedding,
		memory_age_days,
		memory_strength,
		base_threshold,
	)
}

/// Check if surprise opens a reconsolidation window.
#[napi]
pub fn triggers_lability(surprise_value: f64, threshold: f64) -> bool {
	engram_core::triggers_lability(surprise_value, threshold)
}

// ============================================================================
// Working Memory
// ============================================================================

/// Configuration for working memory boost calculation.
#[napi(object)]
#[derive(Clone)]
pub struct JsWorkingMemoryConfig {
	/// Decay time constant in milliseconds (default: 4000)
	pub decay_ms: Option<f64>,
	/// Maximum additional boost (default: 1.0, giving range [1.0, 2.0])
	pub max_boost: Option<f64>,
}

fn to_core_wm_config(config: Option<JsWorkingMemoryConfig>) -> WorkingMemoryConfig {
	config.map_or_else(WorkingMemoryConfig::default, |c| WorkingMemoryConfig {
		decay_ms: c.decay_ms.unwrap_or(4000.0),
		max_boost: c.max_boost.unwrap_or(1.0),
	})
}

/// Compute working memory boost for a recently activated memory.
#[napi]
pub fn working_memory_boost(
	activated_at_ms: f64,
	current_time_ms: f64,
	config: Option<JsWorkingMemoryConfig>,
) -> f64 {
	activation::working_memory_boost(activated_at_ms, current_time_ms, &to_core_wm_config(config))
}

/// Batch compute working memory boosts.
#[napi]
pub fn working_memory_boost_batch(
	activated_at_ms: Vec<f64>,
	current_time_ms: f64,
	config: Option<JsWorkingMemoryConfig>,
) -> Vec<f64> {
	activation::working_memory_boost_batch(
		&activated_at_ms,
		current_time_ms,
		&to_core_wm_config(config),
	)
}

// ============================================================================
// Association Decay
// ============================================================================

fn parse_consolidation_state(state: &str) -> activation::ConsolidationState {
	match state {
		"consolidating" => activation::ConsolidationState::Consolidating,
		"consolidated" => activation::ConsolidationState::Consolidated,
		"reconsolidating" => activation::ConsolidationState::Reconsolidating,
		_ => activation::ConsolidationState::Fresh,
	}
}

/// Compute decayed association strength.
///
/// state: "fresh", "consolidating", "consolidated", "reconsolidating"
#[napi]
pub fn decayed_association_strength(
	initial_strength: f64,
	days_since_reinforced: f64,
	state: String,
) -> f64 {
	activation::decayed_association_strength(
		initial_strength,
		days_since_reinforced,
		parse_consolidation_state(&state),
		&activation::AssociationDecayConfig::default(),
	)
}

/// Reinforce an association after a co-access.
#[napi]
pub fn reinforce_association(current_strength: f64) -> f64 {
	activation::reinforce_association(
		current_strength,
		&activation::AssociationDecayConfig::default(),
	)
}

/// Check if an association has decayed past the pruning point.
#[napi]
pub fn should_prune_association(strength: f64) -> bool {
	activation::should_prune_association(strength, &activation::AssociationDecayConfig::default())
}

// ============================================================================
// Location Intuitions
// ============================================================================

/// Configuration for location computations. Missing fields use engine
/// defaults.
#[napi(object)]
#[derive(Clone, Default)]
pub struct JsLocationConfig {
	/// Familiarity curve coefficient α (default: 0.1)
	pub familiarity_alpha: Option<f64>,
	/// Days before decay begins (default: 30)
	pub stale_threshold_days: Option<u32>,
	/// Maximum decay rate (default: 0.10)
	pub max_decay_rate: Option<f64>,
	/// Familiarity dampening of decay (default: 0.8)
	pub decay_dampening: Option<f64>,
	/// Minimum familiarity floor (default: 0.1)
	pub base_floor: Option<f64>,
	/// Extra floor above familiarity 0.5 (default: 0.4)
	pub sticky_bonus: Option<f64>,
	/// Well-known threshold (default: 0.7)
	pub well_known_threshold: Option<f64>,
}

fn to_core_location_config(config: Option<JsLocationConfig>) -> LocationConfig {
	let defaults = LocationConfig::default();
	let Some(c) = config else {
		return defaults;
	};
	LocationConfig {
		familiarity_alpha: c.familiarity_alpha.unwrap_or(defaults.familiarity_alpha),
		stale_threshold_days: c
			.stale_threshold_days
			.unwrap_or(defaults.stale_threshold_days),
		max_decay_rate: c.max_decay_rate.unwrap_or(defaults.max_decay_rate),
		decay_dampening: c.decay_dampening.unwrap_or(defaults.decay_dampening),
		base_floor: c.base_floor.unwrap_or(defaults.base_floor),
		sticky_bonus: c.sticky_bonus.unwrap_or(defaults.sticky_bonus),
		well_known_threshold: c
			.well_known_threshold
			.unwrap_or(defaults.well_known_threshold),
		..defaults
	}
}

/// Compute location familiarity for an access count.
#[napi]
pub fn compute_familiarity(access_count: u32, config: Option<JsLocationConfig>) -> f64 {
	core_familiarity(access_count, &to_core_location_config(config))
}

/// Compute decayed familiarity for a single location.
#[napi]
pub fn compute_decayed_familiarity(
	current_familiarity: f64,
	last_accessed_ms: f64,
	last_decayed_ms: f64,
	current_time_ms: f64,
	pinned: bool,
	config: Option<JsLocationConfig>,
) -> f64 {
	core_decayed_familiarity(
		current_familiarity,
		last_accessed_ms,
		last_decayed_ms,
		current_time_ms,
		pinned,
		&to_core_location_config(config),
	)
}

/// A location with familiarity metrics, for batch decay.
#[napi(object)]
#[derive(Clone)]
pub struct JsLocationIntuition {
	pub id: u32,
	pub familiarity: f64,
	pub access_count: u32,
	pub searches_saved: u32,
	pub last_accessed_ms: f64,
	pub last_decayed_ms: f64,
	pub pinned: bool,
}

/// Batch decay over locations; returns new familiarity values in order.
#[napi]
pub fn location_batch_decay(
	locations: Vec<JsLocationIntuition>,
	current_time_ms: f64,
	config: Option<JsLocationConfig>,
) -> Vec<f64> {
	let core_locations: Vec<LocationIntuition> = locations
		.into_iter()
		.map(|loc| LocationIntuition {
			id: loc.id,
			familiarity: loc.familiarity,
			access_count: loc.access_count,
			searches_saved: loc.searches_saved,
			last_accessed_ms: loc.last_accessed_ms,
			last_decayed_ms: loc.last_decayed_ms,
			pinned: loc.pinned,
		})
		.collect();
	core_batch_decay(
		&core_locations,
		current_time_ms,
		&to_core_location_config(config),
	)
}

/// Result of activity inference.
#[napi(object)]
pub struct JsActivityInference {
	/// "reading", "writing", "debugging", "refactoring", "reviewing", "unknown"
	pub activity: String,
	/// "explicit", "keyword", "tool", "default"
	pub source: String,
	pub confidence: f64,
}

fn activity_to_string(activity: ActivityType) -> &'static str {
	match activity {
		ActivityType::Reading => "reading",
		ActivityType::Writing => "writing",
		ActivityType::Debugging => "debugging",
		ActivityType::Refactoring => "refactoring",
		ActivityType::Reviewing => "reviewing",
		ActivityType::Unknown => "unknown",
	}
}

fn parse_activity(activity: &str) -> Option<ActivityType> {
	match activity {
		"reading" => Some(ActivityType::Reading),
		"writing" => Some(ActivityType::Writing),
		"debugging" => Some(ActivityType::Debugging),
		"refactoring" => Some(ActivityType::Refactoring),
		"reviewing" => Some(ActivityType::Reviewing),
		"unknown" => Some(ActivityType::Unknown),
		_ => None,
	}
}

/// Infer the activity type for a location access.
///
/// Precedence: explicit > keyword > tool > default.
#[napi]
pub fn infer_activity(
	context: String,
	tool_name: Option<String>,
	explicit: Option<String>,
) -> JsActivityInference {
	let explicit_activity = explicit.as_deref().and_then(parse_activity);
	let inference = core_infer_activity(&context, tool_name.as_deref(), explicit_activity);

	JsActivityInference {
		activity: activity_to_string(inference.activity).to_string(),
		source: match inference.source {
			InferenceSource::Explicit => "explicit",
			InferenceSource::Keyword => "keyword",
			InferenceSource::Tool => "tool",
			InferenceSource::Default => "default",
		}
		.to_string(),
		confidence: inference.confidence,
	}
}

/// Compute association strength after co-accesses.
#[napi]
pub fn location_association_strength(
	co_access_count: u32,
	multiplier: f64,
	config: Option<JsLocationConfig>,
) -> f64 {
	core_association_strength(co_access_count, multiplier, &to_core_location_config(config))
}

/// Multiplier for an association's quality (task/activity/session).
#[napi]
pub fn location_association_multiplier(
	same_task: bool,
	same_activity: bool,
	same_session: bool,
	config: Option<JsLocationConfig>,
) -> f64 {
	core_association_multiplier(
		same_task,
		same_activity,
		same_session,
		&to_core_location_config(config),
	)
}

/// Check if a location is well-known.
#[napi]
pub fn location_is_well_known(familiarity: f64, config: Option<JsLocationConfig>) -> bool {
	core_is_well_known(familiarity, &to_core_location_config(config))
}

/// An association between two locations.
#[napi(object)]
#[derive(Clone)]
pub struct JsLocationAssociation {
	pub source: u32,
	pub target: u32,
	pub strength: f64,
	pub co_access_count: u32,
}

/// Locations most strongly associated with a given location.
#[napi]
pub fn get_associated_locations(
	location_id: u32,
	associations: Vec<JsLocationAssociation>,
	limit: u32,
) -> Vec<JsLocationAssociation> {
	let core_assocs: Vec<LocationAssociation> = associations
		.iter()
		.map(|a| LocationAssociation {
			source: a.source,
			target: a.target,
			strength: a.strength,
			co_access_count: a.co_access_count,
		})
		.collect();

	core_associated_locations(location_id, &core_assocs, limit as usize)
		.into_iter()
		.map(|(target, strength)| JsLocationAssociation {
			source: location_id,
			target,
			strength,
			co_access_count: associations
				.iter()
				.find(|a| a.source == location_id && a.target == target)
				.map_or(0, |a| a.co_access_count),
		})
		.collect()
}

// ============================================================================
// Visual Memory
// ============================================================================

/// A ranked visual retrieval candidate.
#[napi(object)]
pub struct JsVisualCandidate {
	pub index: u32,
	pub total_activation: f64,
	pub probability: f64,
	pub significance: f64,
	pub valence: f64,
	pub arousal: f64,
}

/// Retrieve visual memories for a probe.
///
/// Significance multiplies final activation; arousal feeds the emotion
/// modulator and valence is carried through untouched.
#[napi]
pub fn retrieve_visual(
	probe: Vec<f64>,
	memory_embeddings: Vec<Vec<f64>>,
	access_histories_ms: Vec<Vec<f64>>,
	arousal: Vec<f64>,
	valence: Vec<f64>,
	significance: Vec<f64>,
	current_time_ms: f64,
	associations: Option<Vec<JsAssociation>>,
	projects: Option<Vec<Option<String>>>,
	query_project: Option<String>,
	config: Option<JsRetrievalConfig>,
) -> Result<Vec<JsVisualCandidate>> {
	let core_config = to_core_config(config);
	let associations: Vec<Association> = associations
		.unwrap_or_default()
		.into_iter()
		.map(Association::from)
		.collect();
	let projects: Vec<Option<String>> = projects.unwrap_or_default();

	let input = VisualInput {
		probe: &probe,
		embeddings: &memory_embeddings,
		access_histories_ms: &access_histories_ms,
		arousal: &arousal,
		valence: &valence,
		significance: &significance,
		projects: &projects,
		query_project: query_project.as_deref(),
		associations: &associations,
		now_ms: current_time_ms,
		..Default::default()
	};

	let candidates = core_retrieve_visual(&input, &core_config).map_err(engine_err)?;

	Ok(candidates
		.into_iter()
		.map(|c| JsVisualCandidate {
			index: c.index as u32,
			total_activation: c.total_activation,
			probability: c.probability,
			significance: c.significance,
			valence: c.valence,
			arousal: c.arousal,
		})
		.collect())
}

/// Decide whether a visual memory should be pruned.
#[napi]
pub fn visual_should_prune(significance: f64, age_ms: f64, access_count: u32) -> bool {
	core_visual_should_prune(significance, age_ms, access_count, &VisualConfig::default())
}

/// Compute tag strength for auto-tagging.
#[napi]
pub fn visual_tag_strength(base_confidence: f64, access_count: u32, significance: f64) -> f64 {
	core_tag_strength(
		base_confidence,
		access_count,
		significance,
		&VisualConfig::default(),
	)
}

/// Check if a tag clears the application threshold.
#[napi]
pub fn visual_should_tag(strength: f64, threshold: f64) -> bool {
	core_should_tag(strength, threshold)
}
