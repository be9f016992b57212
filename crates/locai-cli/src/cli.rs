//! Command-line interface definition.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// LocAI: cultural and sentiment risk audit for marketing copy.
#[derive(Debug, Parser)]
#[command(name = "locai", version, about)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides
    #[arg(long, global = true, default_value = "info", env = "LOCAI_LOG_LEVEL")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Analyze one piece of copy and print the report as JSON
    Analyze(AnalyzeArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.bind)
    #[arg(long)]
    pub bind: Option<String>,

    /// YAML configuration file
    #[arg(long, env = "LOCAI_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Copy to analyze
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the copy from a file (stdin when neither --text nor --file is given)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Target market
    #[arg(long)]
    pub market: Option<String>,

    /// Target audience
    #[arg(long)]
    pub audience: Option<String>,

    /// YAML configuration file
    #[arg(long, env = "LOCAI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip providers and return mock reports
    #[arg(long)]
    pub mock: bool,
}
