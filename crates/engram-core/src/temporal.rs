//! Temporal Spreading
//!
//! Episodic memory for narrative queries. Memories retrieved together in
//! an episode prime their temporal neighbors, and the priming is
//! asymmetric: recalling an event cues what came *after* it more strongly
//! than what came before (the contiguity effect of temporal context
//! models).
//!
//! Forward transitions carry factor 1.0, backward transitions 0.7, and
//! contributions fall off with positional distance as `β^(|Δpos|-1)`,
//! β = 0.8, under a hard hop cap independent of graph spreading.

use serde::{Deserialize, Serialize};

/// Which way a temporal link conducts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkDirection {
	/// Conducts source → target
	Forward,
	/// Conducts target → source
	Backward,
}

/// A link between two events of an episode.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemporalLink {
	/// Memory index of the source event
	pub source_event: usize,
	/// Memory index of the target event
	pub target_event: usize,
	/// Link strength in `[0, 1]`
	pub strength: f64,
	/// Conduction direction
	pub direction: LinkDirection,
}

/// An ordered group of memories representing a coherent work unit.
///
/// `events` holds memory indices in episode order; indices refer to the
/// memory arrays of the current call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Episode {
	/// Member memory indices, in order
	pub events: Vec<usize>,
	/// Explicit links between events
	pub links: Vec<TemporalLink>,
	/// Whether the episode is still accumulating events
	pub open: bool,
	/// Encoding strength of the episode as a whole (0-1)
	pub encoding_strength: f64,
}

/// Query direction for neighbor lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemporalDirection {
	/// Events earlier in the episode
	Before,
	/// Events later in the episode
	After,
}

/// Parameters for temporal spreading.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemporalParams {
	/// Factor for forward transitions
	pub forward_strength: f64,
	/// Factor for backward transitions (contiguity asymmetry)
	pub backward_strength: f64,
	/// Distance decay β over episode positions
	pub position_decay: f64,
	/// Hard hop cap, independent of graph spreading depth
	pub hop_cap: usize,
	/// Maximum seeds the retrieval pipeline hands to this module
	pub max_seeds: usize,
}

impl Default for TemporalParams {
	fn default() -> Self {
		Self {
			forward_strength: 1.0,
			backward_strength: 0.7,
			position_decay: 0.8,
			hop_cap: 3,
			max_seeds: 5,
		}
	}
}

/// A neighbor returned by [`temporal_neighbors`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemporalNeighbor {
	/// Memory index of the neighbor
	pub index: usize,
	/// Asymmetric distance-decayed weight
	pub weight: f64,
}

/// Strength of the transition between two adjacent events.
///
/// A link conducts in its tagged direction only; adjacent positions with
/// no conducting link fall back to 1.0 — episode order itself is the
/// implicit link.
fn transition_strength(episode: &Episode, from: usize, to: usize) -> f64 {
	for link in &episode.links {
		let conducts = match link.direction {
			LinkDirection::Forward => link.source_event == from && link.target_event == to,
			LinkDirection::Backward => link.source_event == to && link.target_event == from,
		};
		if conducts {
			return link.strength;
		}
	}
	1.0
}

/// Walk outward from `pos` in one direction, depositing into `delta`.
fn walk_and_deposit(
	episode: &Episode,
	pos: usize,
	step: isize,
	factor: f64,
	seed_activation: f64,
	is_seed: &[bool],
	params: &TemporalParams,
	delta: &mut [f64],
) {
	let mut path_strength = 1.0;

	for hop in 1..=params.hop_cap {
		let offset = step * hop as isize;
		let Some(to_pos) = pos.checked_add_signed(offset) else {
			break;
		};
		if to_pos >= episode.events.len() {
			break;
		}
		let from_pos = (pos as isize + step * (hop as isize - 1)) as usize;

		path_strength *=
			transition_strength(episode, episode.events[from_pos], episode.events[to_pos]);

		let target = episode.events[to_pos];
		if target >= delta.len() || is_seed.get(target).copied().unwrap_or(false) {
			continue;
		}

		let weight = factor * params.position_decay.powi(hop as i32 - 1) * path_strength;
		delta[target] += seed_activation * weight;
	}
}

/// Spread activation through episode structure from seed memories.
///
/// For each seed, every episode containing it is walked outward from the
/// seed's position: forward with full strength, backward with the
/// contiguity-asymmetry factor, decaying with positional distance and
/// multiplying explicit link strengths along the path. Seeds receive
/// nothing.
///
/// # Returns
///
/// An additive delta vector the caller folds into total activation.
#[must_use]
pub fn spread_temporal_activation(
	activations: &[f64],
	episodes: &[Episode],
	seeds: &[usize],
	params: &TemporalParams,
) -> Vec<f64> {
	let n = activations.len();
	let mut delta = vec![0.0; n];

	let mut is_seed = vec![false; n];
	for &seed in seeds {
		if seed < n {
			is_seed[seed] = true;
		}
	}

	for &seed in seeds {
		if seed >= n {
			continue;
		}
		let seed_activation = activations[seed];
		if seed_activation <= 0.0 {
			continue;
		}

		for episode in episodes {
			for pos in 0..episode.events.len() {
				if episode.events[pos] != seed {
					continue;
				}

				walk_and_deposit(
					episode,
					pos,
					1,
					params.forward_strength,
					seed_activation,
					&is_seed,
					params,
					&mut delta,
				);
				walk_and_deposit(
					episode,
					pos,
					-1,
					params.backward_strength,
					seed_activation,
					&is_seed,
					params,
					&mut delta,
				);
			}
		}
	}

	delta
}

/// Retrieve up to `k` temporal neighbors of `anchor` in one direction.
///
/// The anchor is located in its **latest** episode — the highest-indexed
/// episode in `episodes` that contains it (hosts supply episodes in
/// creation order). Neighbors are ordered by the asymmetric
/// distance-decayed weight, strongest first.
#[must_use]
pub fn temporal_neighbors(
	episodes: &[Episode],
	anchor: usize,
	direction: TemporalDirection,
	k: usize,
	params: &TemporalParams,
) -> Vec<TemporalNeighbor> {
	if k == 0 {
		return Vec::new();
	}

	let Some((episode, pos)) = episodes.iter().rev().find_map(|ep| {
		ep.events
			.iter()
			.position(|&event| event == anchor)
			.map(|p| (ep, p))
	}) else {
		return Vec::new();
	};

	let (step, factor): (isize, f64) = match direction {
		TemporalDirection::After => (1, params.forward_strength),
		TemporalDirection::Before => (-1, params.backward_strength),
	};

	let mut neighbors = Vec::new();
	let mut path_strength = 1.0;

	for hop in 1.. {
		if neighbors.len() >= k {
			break;
		}
		let Some(to_pos) = pos.checked_add_signed(step * hop) else {
			break;
		};
		if to_pos >= episode.events.len() {
			break;
		}
		let from_pos = (pos as isize + step * (hop - 1)) as usize;

		path_strength *=
			transition_strength(episode, episode.events[from_pos], episode.events[to_pos]);

		let target = episode.events[to_pos];
		if target == anchor {
			continue;
		}

		#[allow(clippy::cast_possible_truncation)]
		let weight = factor * params.position_decay.powi(hop as i32 - 1) * path_strength;
		neighbors.push(TemporalNeighbor {
			index: target,
			weight,
		});
	}

	neighbors.sort_by(|a, b| {
		b.weight
			.partial_cmp(&a.weight)
			.unwrap_or(std::cmp::Ordering::Equal)
	});
	neighbors.truncate(k);
	neighbors
}
