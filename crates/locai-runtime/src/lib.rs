//! # locai-runtime
//!
//! Provider clients and concurrent orchestration for LocAI.
//!
//! The deterministic pieces (scoring, parsing, mocks, synthesis) live in
//! `locai-core`. This crate adds everything that talks to the network:
//! - IBM Watson NLU for sentiment and emotion (feature `watson`)
//! - Google Gemini for the cultural and tone-of-voice audit (feature `gemini`)
//! - agents that bound each call with a timeout and fall back to mocks
//! - the orchestrator that runs both halves concurrently per request
//!
//! Without provider features, or without credentials, every analysis is
//! served in mock mode.
//!
//! ## Example
//!
//! ```rust,ignore
//! use locai_core::AnalysisRequest;
//! use locai_runtime::{AnalysisOrchestrator, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_yaml_file("locai.yaml")?.with_env_overrides();
//! let orchestrator = AnalysisOrchestrator::from_config(config);
//!
//! let report = orchestrator
//!     .analyze(&AnalysisRequest::new("Unbeatable prices, today only!").with_market("Japan"))
//!     .await?;
//! println!("{} ({})", report.overall_score, report.risk_level);
//! ```

pub mod agents;
pub mod config;
pub mod orchestrator;
pub mod prompts;
pub mod providers;

pub use agents::{AgentError, CulturalAgent, SentimentAgent};
pub use config::{ConfigError, GeminiConfig, RuntimeConfig, ServerConfig, WatsonConfig};
pub use orchestrator::{AnalysisError, AnalysisOrchestrator, OrchestratorBuilder};
pub use providers::{
    ApiCredential, Completion, GeminiClient, GenerationConfig, LlmProvider, PromptMessage,
    PromptRole, ProviderError, SentimentProvider, TokenUsage, WatsonClient,
};
