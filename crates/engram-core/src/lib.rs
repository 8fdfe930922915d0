//! # Engram Core
//!
//! A cognitive memory retrieval engine: given a probe vector and a
//! snapshot of memories (embeddings, access histories, emotional weights,
//! associations), return the ranked, probability-weighted subset that most
//! plausibly matches — the way a mind surfaces memories, not the way a
//! database answers a query.
//!
//! ## The activation model
//!
//! Every memory gets an activation score combining four signals:
//!
//! 1. **Base-level activation** — recency and frequency of access
//!    ```text
//!    B(m) = ln[Σ(ΔT_k + ε)^(-d)]
//!    ```
//! 2. **Probe activation** — cubed cosine similarity, MINERVA 2's
//!    nonlinearity that lets strong matches dominate
//!    ```text
//!    A(i) = S(i)³
//!    ```
//! 3. **Spreading activation** — deposits propagated along weighted
//!    association edges, decaying per hop
//! 4. **Modulators** — working-memory, emotional, project and session
//!    multipliers, plus episodic spreading for narrative queries
//!
//! Scores become probabilities by softmax over the candidates that clear
//! the activation threshold; callers get a component breakdown for every
//! candidate so ranking decisions stay explainable.
//!
//! The same machinery extends to two sibling stores: visual memories
//! ([`visual`]) and file-path familiarity ([`location`]).
//!
//! ## Scope
//!
//! The engine is pure computation over host-supplied arrays. It owns no
//! storage, no embedder, no clock and no threads, emits no logs, and
//! mutates nothing persistent; every call works on the snapshot it is
//! given. All entry points are re-entrant and safe to call from multiple
//! threads over immutable inputs.
//!
//! ## Example
//!
//! ```rust
//! use engram_core::{retrieve, RetrievalConfig, RetrievalInput};
//!
//! # fn main() -> Result<(), engram_core::EngineError> {
//! // Embeddings come from any model the host runs; the engine only
//! // requires a uniform dimension.
//! let memories = vec![
//! 	vec![1.0, 0.0, 0.0],
//! 	vec![0.5, 0.5, 0.0],
//! 	vec![0.0, 1.0, 0.0],
//! ];
//! let probe = vec![0.9, 0.1, 0.0];
//! let histories = vec![vec![1_000.0], vec![500.0], vec![100.0]];
//!
//! let input = RetrievalInput {
//! 	probe: &probe,
//! 	embeddings: &memories,
//! 	access_histories_ms: &histories,
//! 	now_ms: 2_000.0,
//! 	..Default::default()
//! };
//! let config = RetrievalConfig {
//! 	noise_parameter: 0.0, // deterministic
//! 	..Default::default()
//! };
//!
//! for candidate in retrieve(&input, &config)? {
//! 	println!(
//! 		"memory {} - activation {:.3}, probability {:.3}",
//! 		candidate.index, candidate.total_activation, candidate.probability
//! 	);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## References
//!
//! - Anderson, J. R. (1983). *The Architecture of Cognition* — ACT-R theory
//! - Hintzman, D. L. (1988). *MINERVA 2: A simulation model of human memory*
//! - Kahana, M. J. (2012). *Foundations of Human Memory* — temporal context

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod activation;
pub mod error;
pub mod location;
pub mod retrieval;
pub mod similarity;
pub mod spreading;
pub mod temporal;
pub mod visual;

pub use activation::{
	base_level_activation, emotional_multiplier, normalized_recency, probe_activation, softmax,
	working_memory_boost, ConsolidationState, WorkingMemoryConfig,
};
pub use error::{CancelToken, EngineError, Result};
pub use retrieval::{
	rank_by_similarity, retrieve, surprise, triggers_lability, ActivationComponents, Candidate,
	RetrievalConfig, RetrievalInput, TemporalContext,
};
pub use similarity::{cosine_similarity, cosine_similarity_batch};
pub use spreading::{activation_path, spread_activation, Association, SpreadParams};
pub use temporal::{
	spread_temporal_activation, temporal_neighbors, Episode, LinkDirection, TemporalDirection,
	TemporalLink, TemporalNeighbor, TemporalParams,
};
pub use visual::{retrieve_visual, visual_should_prune, VisualCandidate, VisualInput};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;

	#[test]
	fn end_to_end_retrieval() {
		let memories = vec![
			vec![1.0, 0.0, 0.0],
			vec![0.0, 1.0, 0.0],
			vec![0.0, 0.0, 1.0],
		];
		let probe = vec![1.0, 0.0, 0.0];
		let now = 10_000_000.0;
		let histories = vec![
			vec![now - 1000.0],
			vec![now - 2000.0],
			vec![now - 3000.0],
		];

		let input = RetrievalInput {
			probe: &probe,
			embeddings: &memories,
			access_histories_ms: &histories,
			now_ms: now,
			..Default::default()
		};

		let config = RetrievalConfig {
			noise_parameter: 0.0,
			min_probability: 0.0,
			..Default::default()
		};

		let results = retrieve(&input, &config).unwrap();

		assert!(!results.is_empty());
		assert_eq!(results[0].index, 0);
		assert!(results[0].components.probe > results[1].components.probe);
	}
}
