//! Error types and cooperative cancellation for engine operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Errors that can occur during retrieval operations.
///
/// Validation happens before any computation; once validation passes the
/// engine never fails. No partial results accompany an error.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
	/// Parallel input arrays disagree in length, or an embedding's
	/// dimension differs from the probe's.
	#[error("input shape mismatch: {0}")]
	InputShape(String),

	/// A NaN or infinity was found in an input array.
	#[error("non-finite value in {0}")]
	NumericInput(String),

	/// Embeddings tagged with different models were combined in one call.
	#[error("embedding model mismatch: probe tagged '{probe}', memory tagged '{found}'")]
	ModelMismatch {
		/// Model tag the probe carries
		probe: String,
		/// Conflicting tag found in the corpus
		found: String,
	},

	/// The cancellation token fired between pipeline stages.
	#[error("retrieval cancelled")]
	Cancelled,

	/// A configuration value is outside its legal range.
	#[error("config out of range: {0}")]
	ConfigOutOfRange(String),
}

impl EngineError {
	/// Check if the error is recoverable by retrying (host policy).
	#[must_use]
	pub const fn is_recoverable(&self) -> bool {
		matches!(self, Self::Cancelled)
	}

	/// Check if the error indicates malformed caller input rather than a
	/// runtime condition.
	#[must_use]
	pub const fn is_input_error(&self) -> bool {
		matches!(
			self,
			Self::InputShape(_)
				| Self::NumericInput(_)
				| Self::ModelMismatch { .. }
				| Self::ConfigOutOfRange(_)
		)
	}
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Cooperative cancellation token.
///
/// The host keeps a clone and sets it from another thread; the engine
/// checks it between pipeline stages and returns [`EngineError::Cancelled`]
/// without partial results when it fires. Timeouts are a host concern.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
	flag: Arc<AtomicBool>,
}

impl CancelToken {
	/// Create a new, unfired token.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Fire the token. Idempotent.
	pub fn cancel(&self) {
		self.flag.store(true, Ordering::Relaxed);
	}

	/// Whether the token has fired.
	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		self.flag.load(Ordering::Relaxed)
	}

	/// Return `Err(Cancelled)` if the token has fired.
	///
	/// # Errors
	///
	/// Returns [`EngineError::Cancelled`] when the token has fired.
	pub fn check(&self) -> Result<()> {
		if self.is_cancelled() {
			Err(EngineError::Cancelled)
		} else {
			Ok(())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn token_starts_unfired() {
		let token = CancelToken::new();
		assert!(!token.is_cancelled());
		assert!(token.check().is_ok());
	}

	#[test]
	fn token_fires_across_clones() {
		let token = CancelToken::new();
		let clone = token.clone();
		clone.cancel();
		assert!(token.is_cancelled());
		assert!(matches!(token.check(), Err(EngineError::Cancelled)));
	}

	#[test]
	fn error_classification() {
		assert!(EngineError::Cancelled.is_recoverable());
		assert!(!EngineError::Cancelled.is_input_error());
		assert!(EngineError::InputShape("x".into()).is_input_error());
	}
}
