//! Provider adapters.
//!
//! Each agent wraps one provider, enforces its own timeout and never fails:
//! any error is logged and replaced by the deterministic mock report for
//! that half of the analysis.

mod cultural;
mod sentiment;

pub use cultural::CulturalAgent;
pub use sentiment::SentimentAgent;

use std::time::Duration;
use thiserror::Error;

use crate::providers::ProviderError;

/// Errors from a single agent call, before fallback.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Provider call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Unusable model response: {0}")]
    Parse(#[from] locai_core::ParseError),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}
