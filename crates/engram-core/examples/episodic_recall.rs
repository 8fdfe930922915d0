//! Episodic Recall Example
//!
//! Demonstrates association spreading and temporal context:
//! 1. A probe activates one memory strongly
//! 2. Graph spreading lifts its associated memories
//! 3. Episode structure primes temporal neighbors asymmetrically
//!
//! Run with: `cargo run --example episodic_recall`

use engram_core::{
	retrieve, temporal_neighbors, Association, Episode, RetrievalConfig, RetrievalInput,
	TemporalContext, TemporalDirection, TemporalParams,
};

fn main() -> Result<(), engram_core::EngineError> {
	println!("=== Episodic Recall ===\n");

	// A debugging session: five memories laid down in order.
	let labels = [
		"saw the stack trace",
		"read the failing test",
		"found the off-by-one",
		"wrote the fix",
		"unrelated: lunch plans",
	];
	let memories = vec![
		vec![1.0, 0.0, 0.0, 0.0],
		vec![0.6, 0.6, 0.0, 0.0],
		vec![0.2, 0.9, 0.2, 0.0],
		vec![0.0, 0.5, 0.8, 0.0],
		vec![0.0, 0.0, 0.0, 1.0],
	];

	let now_ms = 7_200_000.0;
	let histories = vec![
		vec![now_ms - 3_600_000.0],
		vec![now_ms - 3_000_000.0],
		vec![now_ms - 2_400_000.0],
		vec![now_ms - 1_800_000.0],
		vec![now_ms - 600_000.0],
	];

	// Explicit associations: trace → test → bug → fix
	let associations = vec![
		Association {
			source: 0,
			target: 1,
			forward_strength: 0.9,
			backward_strength: 0.6,
		},
		Association {
			source: 1,
			target: 2,
			forward_strength: 0.8,
			backward_strength: 0.5,
		},
		Association {
			source: 2,
			target: 3,
			forward_strength: 0.9,
			backward_strength: 0.6,
		},
	];

	// The same session as an episode, in order
	let episodes = vec![Episode {
		events: vec![0, 1, 2, 3],
		links: vec![],
		open: false,
		encoding_strength: 0.9,
	}];

	// Probe: "that stack trace from earlier"
	let probe = vec![0.95, 0.3, 0.0, 0.0];

	let input = RetrievalInput {
		probe: &probe,
		embeddings: &memories,
		access_histories_ms: &histories,
		associations: &associations,
		temporal: Some(TemporalContext {
			session_members: &[],
			episodes: &episodes,
		}),
		now_ms,
		..Default::default()
	};

	let config = RetrievalConfig {
		min_probability: 0.0,
		noise_parameter: 0.0,
		..Default::default()
	};

	let results = retrieve(&input, &config)?;

	println!("Probe: \"that stack trace from earlier\"\n");
	for (rank, candidate) in results.iter().enumerate() {
		println!(
			"#{} - \"{}\" (p = {:.1}%, spread {:+.3})",
			rank + 1,
			labels[candidate.index],
			candidate.probability * 100.0,
			candidate.components.spread
		);
	}

	println!("\nThe lunch memory is recent but unconnected: no association,");
	println!("no episode membership, weak probe match.\n");

	// What came after finding the bug?
	let params = TemporalParams::default();
	let after = temporal_neighbors(&episodes, 2, TemporalDirection::After, 3, &params);
	let before = temporal_neighbors(&episodes, 2, TemporalDirection::Before, 3, &params);

	println!("=== Temporal neighbors of \"{}\" ===\n", labels[2]);
	for neighbor in &after {
		println!("  after:  \"{}\" (weight {:.2})", labels[neighbor.index], neighbor.weight);
	}
	for neighbor in &before {
		println!("  before: \"{}\" (weight {:.2})", labels[neighbor.index], neighbor.weight);
	}
	println!("\nForward neighbors carry full strength; backward ones are");
	println!("attenuated - recall runs forward more easily than backward.");

	Ok(())
}
