//! Location Intuitions
//!
//! Spatial memory for file paths: how a system develops a feel for
//! *where things are* through repeated exposure.
//!
//! Familiarity follows an asymptotic curve over access count — early
//! visits teach a lot, the hundredth teaches almost nothing. Context is
//! bound to each access as an activity type (reading, debugging, …), and
//! locations touched for the same task wire together into a co-access
//! graph that shares the engine's spreading kernel. Stale locations decay
//! slowly toward a floor that rises with how well-known they once were;
//! pinned locations never decay.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::spreading::{spread_activation, Association, SpreadParams};

// ============================================================================
// Types
// ============================================================================

/// Activity type bound to a location access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
	/// Examining code without modification
	Reading,
	/// Creating or modifying code
	Writing,
	/// Investigating issues or errors
	Debugging,
	/// Restructuring existing code
	Refactoring,
	/// Code review or audit
	Reviewing,
	/// Could not be determined
	Unknown,
}

/// How an activity type was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InferenceSource {
	/// Caller supplied the activity explicitly
	Explicit,
	/// Matched an intent keyword in the context text
	Keyword,
	/// Derived from the tool name
	Tool,
	/// Nothing matched
	Default,
}

/// Result of activity inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityInference {
	/// The inferred activity type
	pub activity: ActivityType,
	/// How it was determined
	pub source: InferenceSource,
	/// Confidence level (0-1)
	pub confidence: f64,
}

/// A location (project scope + path) with familiarity metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationIntuition {
	/// Index in the location array
	pub id: u32,
	/// Familiarity level (0-1, asymptotic curve)
	pub familiarity: f64,
	/// Number of times accessed
	pub access_count: u32,
	/// Number of searches avoided by direct navigation
	pub searches_saved: u32,
	/// Timestamp of last access (ms since epoch)
	pub last_accessed_ms: f64,
	/// Timestamp of the last decay application (ms since epoch; 0 = never)
	pub last_decayed_ms: f64,
	/// Whether this location is pinned (immune to decay)
	pub pinned: bool,
}

/// Association between two locations in the co-access graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationAssociation {
	/// Source location index
	pub source: u32,
	/// Target location index
	pub target: u32,
	/// Association strength (0-1)
	pub strength: f64,
	/// Number of co-accesses
	pub co_access_count: u32,
}

/// Configuration for location computations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
	/// Familiarity curve coefficient α: f(n) = 1 - 1/(1 + α·n)
	pub familiarity_alpha: f64,

	/// Days before decay begins
	pub stale_threshold_days: u32,

	/// Maximum decay rate (at familiarity = 0)
	pub max_decay_rate: f64,

	/// How much familiarity reduces the decay rate (0-1)
	pub decay_dampening: f64,

	/// Minimum familiarity floor
	pub base_floor: f64,

	/// Extra floor protection for familiarity above 0.5
	pub sticky_bonus: f64,

	/// Familiarity threshold for "well-known"
	pub well_known_threshold: f64,

	/// Multiplier for same task + same activity co-accesses
	pub task_same_activity_multiplier: f64,
	/// Multiplier for same task, different activity
	pub task_diff_activity_multiplier: f64,
	/// Multiplier for time-based co-access with same activity
	pub time_same_activity_multiplier: f64,
	/// Multiplier for time-based co-access only
	pub time_diff_activity_multiplier: f64,
	/// Extra factor when the co-access happened in the same session
	pub session_coincidence_multiplier: f64,

	/// Backward association strength relative to forward
	pub backward_strength_factor: f64,
}

impl Default for LocationConfig {
	fn default() -> Self {
		Self {
			familiarity_alpha: 0.1,
			stale_threshold_days: 30,
			max_decay_rate: 0.10,
			decay_dampening: 0.8,
			base_floor: 0.1,
			sticky_bonus: 0.4,
			well_known_threshold: 0.7,
			task_same_activity_multiplier: 5.0,
			task_diff_activity_multiplier: 3.0,
			time_same_activity_multiplier: 2.0,
			time_diff_activity_multiplier: 1.0,
			session_coincidence_multiplier: 1.5,
			backward_strength_factor: 0.7,
		}
	}
}

// ============================================================================
// Familiarity
// ============================================================================

/// Compute familiarity for an access count.
///
/// `f(n) = 1 - 1/(1 + α·n)` — monotone, f(0) = 0, asymptotic to 1.
///
/// # Examples
///
/// ```
/// use engram_core::location::{familiarity, LocationConfig};
///
/// let config = LocationConfig::default();
/// assert!((familiarity(1, &config) - 0.091).abs() < 0.01);
/// assert!((familiarity(10, &config) - 0.5).abs() < 0.01);
/// assert!(familiarity(100, &config) > 0.9);
/// ```
#[inline]
#[must_use]
pub fn familiarity(access_count: u32, config: &LocationConfig) -> f64 {
	let n = f64::from(access_count);
	1.0 - 1.0 / config.familiarity_alpha.mul_add(n, 1.0)
}

/// Familiarity after the first access (aligns with the curve).
#[inline]
#[must_use]
pub fn initial_familiarity(config: &LocationConfig) -> f64 {
	familiarity(1, config)
}

// ============================================================================
// Decay
// ============================================================================

/// Compute decayed familiarity for a single location.
///
/// ```text
/// rate(f)  = maxDecay · (1 - f · dampening)
/// floor(f) = baseFloor + (f > 0.5 ? stickyBonus · (f - 0.5) : 0)
/// ```
///
/// Locations untouched for fewer than `stale_threshold_days` are returned
/// unchanged. `last_decayed_ms` (0 = never decayed) makes repeated
/// application idempotent: a second run within a day of the previous one
/// is a no-op, so a twice-scheduled maintenance pass cannot
/// double-decay. Pinned locations and invalid timestamps are left
/// untouched.
#[must_use]
pub fn decayed_familiarity(
	current_familiarity: f64,
	last_accessed_ms: f64,
	last_decayed_ms: f64,
	now_ms: f64,
	pinned: bool,
	config: &LocationConfig,
) -> f64 {
	if pinned {
		return current_familiarity;
	}

	if !last_accessed_ms.is_finite() || last_accessed_ms < 0.0 {
		return current_familiarity;
	}

	let ms_per_day = 24.0 * 60.0 * 60.0 * 1000.0;
	let days_since_access = (now_ms - last_accessed_ms) / ms_per_day;

	if days_since_access < f64::from(config.stale_threshold_days) {
		return current_familiarity;
	}

	if last_decayed_ms.is_finite()
		&& last_decayed_ms > 0.0
		&& (now_ms - last_decayed_ms) / ms_per_day < 1.0
	{
		return current_familiarity;
	}

	let rate = config.max_decay_rate * current_familiarity.mul_add(-config.decay_dampening, 1.0);

	let floor = if current_familiarity > 0.5 {
		config
			.sticky_bonus
			.mul_add(current_familiarity - 0.5, config.base_floor)
	} else {
		config.base_floor
	};

	(current_familiarity * (1.0 - rate)).max(floor)
}

/// Batch decay over a location slice.
///
/// Returns new familiarity values in input order.
#[must_use]
pub fn batch_decay(
	locations: &[LocationIntuition],
	now_ms: f64,
	config: &LocationConfig,
) -> Vec<f64> {
	locations
		.iter()
		.map(|loc| {
			decayed_familiarity(
				loc.familiarity,
				loc.last_accessed_ms,
				loc.last_decayed_ms,
				now_ms,
				loc.pinned,
				config,
			)
		})
		.collect()
}

// ============================================================================
// Activity Inference
// ============================================================================

/// Infer the activity type for a location access.
///
/// Strict precedence: explicit > keyword > tool > default. Keywords
/// indicate intent while tool names only indicate the action taken —
/// "reading a file to debug" is debugging. Keyword rows are checked in
/// table order and the first matching row wins; matching is lowercased
/// substring.
///
/// # Examples
///
/// ```
/// use engram_core::location::{infer_activity, ActivityType, InferenceSource};
///
/// let result = infer_activity("debugging the issue", Some("Read"), None);
/// assert_eq!(result.activity, ActivityType::Debugging);
/// assert_eq!(result.source, InferenceSource::Keyword);
/// ```
#[must_use]
pub fn infer_activity(
	context: &str,
	tool_name: Option<&str>,
	explicit: Option<ActivityType>,
) -> ActivityInference {
	if let Some(activity) = explicit {
		if activity != ActivityType::Unknown {
			return ActivityInference {
				activity,
				source: InferenceSource::Explicit,
				confidence: 1.0,
			};
		}
	}

	let lower = context.to_lowercase();

	let keyword_rows: &[(ActivityType, &[&str], f64)] = &[
		(
			ActivityType::Debugging,
			&["debug", "fix", "bug", "issue", "error", "trace"],
			0.9,
		),
		(
			ActivityType::Refactoring,
			&["refactor", "clean", "reorganize", "restructure"],
			0.9,
		),
		(
			ActivityType::Reviewing,
			&["review", "understand", "check", "examine", "audit"],
			0.8,
		),
		(
			ActivityType::Writing,
			&["implement", "add", "create", "write", "build"],
			0.7,
		),
		(
			ActivityType::Reading,
			&["read", "look", "see", "view", "inspect"],
			0.6,
		),
	];

	for (activity, keywords, confidence) in keyword_rows {
		if keywords.iter().any(|kw| lower.contains(kw)) {
			return ActivityInference {
				activity: *activity,
				source: InferenceSource::Keyword,
				confidence: *confidence,
			};
		}
	}

	if let Some(tool) = tool_name {
		let tool_activity = match tool {
			"Read" | "Grep" | "Glob" => Some(ActivityType::Reading),
			"Edit" | "Write" => Some(ActivityType::Writing),
			_ => None,
		};

		if let Some(activity) = tool_activity {
			return ActivityInference {
				activity,
				source: InferenceSource::Tool,
				confidence: 0.5,
			};
		}
	}

	ActivityInference {
		activity: ActivityType::Unknown,
		source: InferenceSource::Default,
		confidence: 0.0,
	}
}

// ============================================================================
// Association Strength
// ============================================================================

/// Compute association strength after co-accesses.
///
/// Same asymptotic curve as familiarity over an effective count
/// `n × multiplier`.
#[inline]
#[must_use]
pub fn association_strength(
	co_access_count: u32,
	multiplier: f64,
	config: &LocationConfig,
) -> f64 {
	let effective = f64::from(co_access_count) * multiplier;
	1.0 - 1.0 / config.familiarity_alpha.mul_add(effective, 1.0)
}

/// Multiplier for an association's quality.
///
/// 5x same task + same activity, 3x same task, 2x same activity, 1x
/// time-based only; session coincidence scales whichever applies by 1.5.
#[inline]
#[must_use]
pub fn association_multiplier(
	same_task: bool,
	same_activity: bool,
	same_session: bool,
	config: &LocationConfig,
) -> f64 {
	let base = match (same_task, same_activity) {
		(true, true) => config.task_same_activity_multiplier,
		(true, false) => config.task_diff_activity_multiplier,
		(false, true) => config.time_same_activity_multiplier,
		(false, false) => config.time_diff_activity_multiplier,
	};

	if same_session {
		base * config.session_coincidence_multiplier
	} else {
		base
	}
}

/// Check if a location is well-known.
#[inline]
#[must_use]
pub fn is_well_known(familiarity_value: f64, config: &LocationConfig) -> bool {
	familiarity_value >= config.well_known_threshold
}

// ============================================================================
// Co-Access Spreading
// ============================================================================

/// Spread activation through the location co-access graph.
///
/// Re-expresses location associations as engine edges (backward strength
/// scaled by `backward_strength_factor`) and runs the shared spreading
/// kernel.
///
/// # Returns
///
/// Activation deltas parallel to the location array.
#[must_use]
pub fn spread_location_activation(
	num_locations: usize,
	seed_location: usize,
	seed_activation: f64,
	associations: &[LocationAssociation],
	location_config: &LocationConfig,
	params: &SpreadParams,
) -> Vec<f64> {
	let edges: Vec<Association> = associations
		.iter()
		.map(|assoc| Association {
			source: assoc.source as usize,
			target: assoc.target as usize,
			forward_strength: assoc.strength,
			backward_strength: assoc.strength * location_config.backward_strength_factor,
		})
		.collect();

	spread_activation(
		num_locations,
		&edges,
		&[(seed_location, seed_activation)],
		params,
	)
}

/// Locations most strongly associated with a given location.
///
/// `SmallVec`-backed: no heap allocation when results fit in 16 entries.
#[must_use]
pub fn associated_locations(
	location_id: u32,
	associations: &[LocationAssociation],
	limit: usize,
) -> SmallVec<[(u32, f64); 16]> {
	let mut results: SmallVec<[(u32, f64); 16]> = associations
		.iter()
		.filter(|assoc| assoc.source == location_id)
		.map(|assoc| (assoc.target, assoc.strength))
		.collect();

	results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
	results.truncate(limit);
	results
}

// ============================================================================
// Tests
// ============================================================================
