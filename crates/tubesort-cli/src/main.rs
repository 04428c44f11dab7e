use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tubesort_cli::config::{Cli, Command, PipelineConfig};
use tubesort_cli::page::format_probabilities;
use tubesort_cli::{AppState, PREDICTION_FAILED, build_router};
use tubesort_core::{EXTRACTION_FAILED, Prediction, Predictor, VideoLink};
use tubesort_fetch::MetadataClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tubesort=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    info!("tubesort v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Serve {
            pipeline,
            bind,
            history_capacity,
        } => {
            let predictor = build_predictor(pipeline.into_config()?)?;
            let app = build_router(AppState::new(predictor, history_capacity));

            let listener = tokio::net::TcpListener::bind(bind)
                .await
                .with_context(|| format!("binding {bind}"))?;
            info!("Listening on http://{bind}");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        Command::Predict { pipeline, link } => {
            let predictor = build_predictor(pipeline.into_config()?)?;
            match predictor.predict(&VideoLink::new(link)).await {
                Prediction::Classified {
                    title,
                    label,
                    probabilities,
                } => {
                    println!("Category: {label}");
                    println!("Title:    {title}");
                    println!("Raw:      {}", format_probabilities(&probabilities));
                }
                Prediction::ExtractionFailed(_) => anyhow::bail!(EXTRACTION_FAILED),
                Prediction::ClassificationFailed { .. } => anyhow::bail!(PREDICTION_FAILED),
            }
        }
    }
    Ok(())
}

fn build_predictor(cfg: PipelineConfig) -> anyhow::Result<Predictor> {
    let (preprocessor, classifier) =
        tubesort_ai::load_model_dir(&cfg.model_dir, cfg.sequence_length)
            .context("loading model artifacts")?;
    let source = MetadataClient::new(cfg.api_url, cfg.api_key, cfg.request_timeout)
        .context("building metadata client")?;

    Ok(Predictor::new(
        Arc::new(source),
        Arc::new(preprocessor),
        Arc::new(classifier),
        cfg.labels,
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
