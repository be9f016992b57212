//! locai entry point.

use anyhow::{Context, Result};
use clap::Parser;
use locai_cli::cli::{AnalyzeArgs, Cli, Commands, ServeArgs};
use locai_cli::{build_router, init_logging, load_config, AppState};
use locai_core::AnalysisRequest;
use locai_runtime::{AnalysisError, AnalysisOrchestrator};
use std::io::Read;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Analyze(args) => analyze(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<ExitCode> {
    let startup_start = std::time::Instant::now();

    let config = load_config(args.config.as_deref())?;
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());

    let orchestrator = AnalysisOrchestrator::from_config(config);
    tracing::info!(mode = %orchestrator.mode(), "LocAI v{}", env!("CARGO_PKG_VERSION"));

    let app = build_router(AppState::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    tracing::info!(
        duration_ms = startup_start.elapsed().as_millis() as u64,
        "Starting HTTP server on {}",
        bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(ExitCode::SUCCESS)
}

async fn analyze(args: AnalyzeArgs) -> Result<ExitCode> {
    let mut config = load_config(args.config.as_deref())?;
    if args.mock {
        config.force_mock = true;
    }

    let text = match (args.text, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read copy from stdin")?;
            buf
        }
    };

    let request = AnalysisRequest {
        text,
        market: args.market,
        audience: args.audience,
    };

    let orchestrator = AnalysisOrchestrator::from_config(config);
    match orchestrator.analyze(&request).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(AnalysisError::InvalidInput(e)) => {
            eprintln!("error: {}", e);
            Ok(ExitCode::from(2))
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
