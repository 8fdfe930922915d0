//! Basic Memory Retrieval Example
//!
//! Demonstrates the core pipeline:
//! 1. Create some memories with embeddings and access histories
//! 2. Query with a probe
//! 3. Get ranked, probability-weighted results
//!
//! Run with: `cargo run --example basic_retrieval`

use engram_core::{retrieve, RetrievalConfig, RetrievalInput};

fn main() -> Result<(), engram_core::EngineError> {
	println!("=== Basic Memory Retrieval ===\n");

	// Simulate four memories about different topics. In practice these
	// would come from an embedding model.
	let memories = vec![
		vec![1.0, 0.2, 0.1, 0.0], // Memory 0: strongly about topic A
		vec![0.3, 0.9, 0.2, 0.1], // Memory 1: strongly about topic B
		vec![0.1, 0.2, 0.8, 0.3], // Memory 2: strongly about topic C
		vec![0.5, 0.4, 0.3, 0.2], // Memory 3: mixed topics
	];

	// Query embedding - looking for something about topic A
	let probe = vec![0.9, 0.1, 0.0, 0.0];

	let now_ms = 3_600_000.0;

	// When each memory was last accessed
	let histories = vec![
		vec![now_ms - 1_800_000.0], // 30 min ago
		vec![now_ms - 2_700_000.0], // 45 min ago
		vec![now_ms - 3_600_000.0], // 1 hour ago
		vec![now_ms - 900_000.0],   // 15 min ago
	];

	// Emotional weight (0-1) - higher means more emotionally significant
	let emotional_weights = vec![0.7, 0.3, 0.5, 0.4];

	let input = RetrievalInput {
		probe: &probe,
		embeddings: &memories,
		access_histories_ms: &histories,
		emotional_weights: &emotional_weights,
		now_ms,
		..Default::default()
	};

	let config = RetrievalConfig {
		min_probability: 0.0, // Show all results for the demo
		noise_parameter: 0.0, // Deterministic output
		..Default::default()
	};

	let results = retrieve(&input, &config)?;

	println!("Query: topic A (embedding: {probe:?})\n");
	println!("Results (ranked by probability):\n");

	for (rank, candidate) in results.iter().enumerate() {
		println!("#{} - Memory {}", rank + 1, candidate.index);
		println!("  Total Activation: {:.4}", candidate.total_activation);
		println!("  Components:");
		println!("    Recency (base level): {:.4}", candidate.components.base);
		println!("    Probe match (cubed):  {:.4}", candidate.components.probe);
		println!("    Spreading:            {:.4}", candidate.components.spread);
		println!(
			"  Retrieval Probability: {:.1}%",
			candidate.probability * 100.0
		);
		println!();
	}

	println!("=== Why these results? ===\n");
	println!("Memory 0 ranks first: highest probe similarity, high emotional");
	println!("weight, recent access.\n");
	println!("Memory 3 comes next: mixed similarity but the most recent access.\n");
	println!("Memories 1 and 2 trail: the cubed similarity function suppresses");
	println!("weak matches, and their accesses are older.");

	Ok(())
}
