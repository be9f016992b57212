//! # locai-cli
//!
//! HTTP API and command-line front end for LocAI.
//!
//! - `locai serve` exposes `POST /analyze` and `GET /health`
//! - `locai analyze` runs one audit and prints the report

pub mod cli;
pub mod error;
pub mod logging;
pub mod routes;

pub use error::ApiError;
pub use logging::init_logging;
pub use routes::{build_router, AppState};

use anyhow::Context;
use locai_runtime::RuntimeConfig;
use std::path::Path;

/// Load configuration: optional YAML file, then environment for unset values.
///
/// A `.env` file in the working directory is read first if present.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let config = match path {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RuntimeConfig::default(),
    };

    Ok(config.with_env_overrides())
}
