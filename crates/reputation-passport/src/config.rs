//! Verifier configuration.

use std::time::Duration;

use passport_core::DEFAULT_MAX_DEPTH;

/// Configuration for the [`Verifier`](crate::Verifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Deadline for each individual ledger query. `None` waits indefinitely.
    pub query_timeout: Option<Duration>,
    /// Maximum number of records verified concurrently in a batch.
    pub max_in_flight: usize,
    /// Nesting limit passed to the canonicalizer. Values above
    /// [`MAX_DEPTH_CEILING`](passport_core::MAX_DEPTH_CEILING) act as the ceiling.
    pub max_depth: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            query_timeout: Some(Duration::from_secs(15)),
            max_in_flight: 16,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
