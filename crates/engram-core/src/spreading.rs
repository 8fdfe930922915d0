//! Spreading Activation
//!
//! Memories don't exist in isolation. Activating one memory spreads
//! activation to connected memories through the association graph.
//!
//! At hop `h`, a node with contribution `c` deposits `c × w(s→t) × γ` into
//! each neighbor `t`, where `w` is the edge strength and `γ` the per-hop
//! decay. A node's freshly deposited amount becomes its contribution for
//! the next hop. Cycles need no visited set: `γ < 1` and the depth cap
//! bound the total, and contributions below a numeric floor are pruned.
//!
//! Each seed spreads independently and never deposits into itself, no
//! matter how activation loops back through the graph. Other seeds remain
//! valid targets.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Adjacency list type for graph edges: (`target_index`, weight) pairs per node.
type AdjacencyList = Vec<Vec<(usize, f64)>>;

/// A directed edge in the association graph.
///
/// Both strengths live in `[0, 1]`; backward strength is only walked when
/// spreading runs bidirectionally.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Association {
	/// Source node index
	pub source: usize,
	/// Target node index
	pub target: usize,
	/// Forward strength (source → target)
	pub forward_strength: f64,
	/// Backward strength (target → source)
	pub backward_strength: f64,
}

/// Parameters for one spreading pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpreadParams {
	/// Per-hop decay γ in `[0, 1]`
	pub decay_per_hop: f64,
	/// Maximum hop depth
	pub depth: usize,
	/// Whether backward strengths are walked
	pub bidirectional: bool,
	/// Contributions below this are pruned
	pub contribution_floor: f64,
}

impl Default for SpreadParams {
	fn default() -> Self {
		Self {
			decay_per_hop: 0.7,
			depth: 3,
			bidirectional: true,
			contribution_floor: 1e-6,
		}
	}
}

/// Build adjacency lists from associations.
///
/// Self-edges and out-of-bounds endpoints are dropped here, once.
fn build_adjacency(
	associations: &[Association],
	num_nodes: usize,
) -> (AdjacencyList, AdjacencyList) {
	let mut forward: AdjacencyList = vec![Vec::new(); num_nodes];
	let mut backward: AdjacencyList = vec![Vec::new(); num_nodes];

	for assoc in associations {
		if assoc.source == assoc.target {
			continue;
		}
		if assoc.source < num_nodes && assoc.target < num_nodes {
			forward[assoc.source].push((assoc.target, assoc.forward_strength));
			backward[assoc.target].push((assoc.source, assoc.backward_strength));
		}
	}

	(forward, backward)
}

/// Spread activation outward from seed nodes.
///
/// # Arguments
///
/// * `num_nodes` - Total number of nodes in the graph
/// * `associations` - Edges with forward/backward strengths
/// * `seeds` - (index, activation) pairs that initiate spreading
/// * `params` - Decay, depth, directionality, pruning floor
///
/// # Returns
///
/// An additive delta vector of length `num_nodes`. A seed's own spread
/// never lands back on it. Seeds are processed in the order given and
/// deposits within a hop accumulate in index order, so the result is
/// deterministic across runs.
#[must_use]
pub fn spread_activation(
	num_nodes: usize,
	associations: &[Association],
	seeds: &[(usize, f64)],
	params: &SpreadParams,
) -> Vec<f64> {
	let mut delta = vec![0.0; num_nodes];
	if num_nodes == 0 || seeds.is_empty() || params.depth == 0 {
		return delta;
	}

	let (forward_adj, backward_adj) = build_adjacency(associations, num_nodes);

	for &(seed, activation) in seeds {
		if seed >= num_nodes {
			continue;
		}

		// Contributions entering the current hop, keyed by node index so
		// floating-point accumulation order is stable.
		let mut frontier = BTreeMap::from([(seed, activation)]);

		for _ in 0..params.depth {
			let mut deposits: BTreeMap<usize, f64> = BTreeMap::new();

			for (&source, &contribution) in &frontier {
				if contribution < params.contribution_floor {
					continue;
				}

				for &(target, strength) in &forward_adj[source] {
					if target != seed {
						*deposits.entry(target).or_insert(0.0) +=
							contribution * strength * params.decay_per_hop;
					}
				}

				if params.bidirectional {
					for &(target, strength) in &backward_adj[source] {
						if target != seed {
							*deposits.entry(target).or_insert(0.0) +=
								contribution * strength * params.decay_per_hop;
						}
					}
				}
			}

			if deposits.is_empty() {
				break;
			}

			for (&idx, &amount) in &deposits {
				delta[idx] += amount;
			}

			frontier = deposits;
		}
	}

	delta
}

/// Get the top k activated node indices, strongest first.
#[must_use]
pub fn top_activated(activations: &[f64], top_k: usize) -> Vec<usize> {
	let mut indexed: Vec<(usize, f64)> = activations
		.iter()
		.enumerate()
		.filter(|(_, &a)| a > 0.0)
		.map(|(i, &a)| (i, a))
		.collect();

	indexed.sort_by(|a, b| {
		b.1
			.partial_cmp(&a.1)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then(a.0.cmp(&b.0))
	});

	indexed.into_iter().take(top_k).map(|(i, _)| i).collect()
}

/// Find the shortest forward path between two nodes using BFS.
///
/// Explainability probe: "through which associations did activation reach
/// this memory". Returns an empty vector when no path exists.
#[must_use]
pub fn activation_path(
	num_nodes: usize,
	associations: &[Association],
	source: usize,
	target: usize,
) -> Vec<usize> {
	if source >= num_nodes || target >= num_nodes {
		return Vec::new();
	}
	if source == target {
		return vec![source];
	}

	let (forward_adj, _) = build_adjacency(associations, num_nodes);

	let mut visited = vec![false; num_nodes];
	let mut parent = vec![usize::MAX; num_nodes];
	let mut queue = VecDeque::new();

	visited[source] = true;
	queue.push_back(source);

	while let Some(current) = queue.pop_front() {
		for &(neighbor, _) in &forward_adj[current] {
			if !visited[neighbor] {
				visited[neighbor] = true;
				parent[neighbor] = current;
				queue.push_back(neighbor);

				if neighbor == target {
					let mut path = Vec::new();
					let mut node = target;
					while node != usize::MAX {
						path.push(node);
						node = parent[node];
					}
					path.reverse();
					return path;
				}
			}
		}
	}

	Vec::new()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn edge(source: usize, target: usize, forward: f64, backward: f64) -> Association {
		Association {
			source,
			target,
			forward_strength: forward,
			backward_strength: backward,
		}
	}

	fn chain_params(bidirectional: bool) -> SpreadParams {
		SpreadParams {
			decay_per_hop: 0.7,
			depth: 2,
			bidirectional,
			contribution_floor: 1e-6,
		}
	}

	#[test]
	fn chain_decays_geometrically() {
		// A → B → C with full-strength edges, γ=0.7, depth 2
		let associations = vec![edge(0, 1, 1.0, 1.0), edge(1, 2, 1.0, 1.0)];

		let delta = spread_activation(3, &associations, &[(0, 0.8)], &chain_params(false));

		assert!((delta[0]).abs() < 1e-12, "seed receives nothing");
		assert!((delta[1] - 0.56).abs() < 1e-9);
		assert!((delta[2] - 0.392).abs() < 1e-9);
	}

	#[test]
	fn bidirectional_never_reactivates_seed() {
		// Same chain, backward strengths equal: hop 2 would push B's
		// deposit back into A were A not a seed.
		let associations = vec![edge(0, 1, 1.0, 1.0), edge(1, 2, 1.0, 1.0)];

		let delta = spread_activation(3, &associations, &[(0, 0.8)], &chain_params(true));

		assert!((delta[0]).abs() < 1e-12);
		assert!((delta[1] - 0.56).abs() < 1e-9);
		assert!((delta[2] - 0.392).abs() < 1e-9);
	}

	#[test]
	fn self_edges_are_ignored() {
		let associations = vec![edge(0, 0, 1.0, 1.0), edge(0, 1, 0.5, 0.0)];

		let delta = spread_activation(2, &associations, &[(0, 1.0)], &chain_params(false));

		assert!((delta[0]).abs() < 1e-12);
		assert!((delta[1] - 0.35).abs() < 1e-9);
	}

	#[test]
	fn fan_out_deposits_full_weighted_contribution() {
		// 0 → {1, 2, 3}: each target receives the full weighted deposit,
		// no division across the fan.
		let associations = vec![
			edge(0, 1, 1.0, 0.0),
			edge(0, 2, 0.5, 0.0),
			edge(0, 3, 0.25, 0.0),
		];
		let params = SpreadParams {
			depth: 1,
			bidirectional: false,
			..Default::default()
		};

		let delta = spread_activation(4, &associations, &[(0, 1.0)], &params);

		assert!((delta[1] - 0.7).abs() < 1e-9);
		assert!((delta[2] - 0.35).abs() < 1e-9);
		assert!((delta[3] - 0.175).abs() < 1e-9);
	}

	#[test]
	fn cycle_is_bounded_by_depth() {
		// 0 → 1 → 2 → 0, deep traversal: the seed still receives nothing
		// and totals stay finite.
		let associations = vec![
			edge(0, 1, 1.0, 0.0),
			edge(1, 2, 1.0, 0.0),
			edge(2, 0, 1.0, 0.0),
		];
		let params = SpreadParams {
			depth: 10,
			bidirectional: false,
			..Default::default()
		};

		let delta = spread_activation(3, &associations, &[(0, 1.0)], &params);

		assert!((delta[0]).abs() < 1e-12);
		assert!(delta[1].is_finite() && delta[2].is_finite());
		// First deposits dominate: 0.7 into node 1, 0.49 into node 2
		assert!(delta[1] >= 0.7 && delta[1] < 1.0);
		assert!(delta[2] >= 0.49 && delta[2] < 1.0);
	}

	#[test]
	fn floor_prunes_negligible_contributions() {
		let associations = vec![edge(0, 1, 1e-4, 0.0), edge(1, 2, 1e-4, 0.0)];
		let params = SpreadParams {
			depth: 2,
			bidirectional: false,
			contribution_floor: 1e-4,
			..Default::default()
		};

		let delta = spread_activation(3, &associations, &[(0, 1.0)], &params);

		// Hop 1 deposits 7e-5 into node 1, which is below the floor and
		// never spreads onward.
		assert!(delta[1] > 0.0);
		assert!((delta[2]).abs() < 1e-12);
	}

	#[test]
	fn empty_seeds_or_zero_depth_is_noop() {
		let associations = vec![edge(0, 1, 1.0, 1.0)];

		let none = spread_activation(2, &associations, &[], &SpreadParams::default());
		assert_eq!(none, vec![0.0, 0.0]);

		let zero_depth = SpreadParams {
			depth: 0,
			..Default::default()
		};
		let still_none = spread_activation(2, &associations, &[(0, 1.0)], &zero_depth);
		assert_eq!(still_none, vec![0.0, 0.0]);
	}

	#[test]
	fn top_activated_sorts_and_breaks_ties_by_index() {
		let activations = vec![0.1, 0.9, 0.9, 0.0, 0.5];
		assert_eq!(top_activated(&activations, 3), vec![1, 2, 4]);
	}

	#[test]
	fn path_follows_forward_edges() {
		let associations = vec![
			edge(0, 1, 1.0, 0.0),
			edge(1, 2, 1.0, 0.0),
			edge(2, 3, 1.0, 0.0),
		];

		assert_eq!(activation_path(4, &associations, 0, 3), vec![0, 1, 2, 3]);
		assert!(activation_path(4, &associations, 3, 0).is_empty());
	}
}
