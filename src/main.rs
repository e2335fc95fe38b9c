use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use placelens::application::services::{AnalysisService, SessionCounter};
use placelens::infrastructure::llm::{GeminiLocationModel, GeminiSpeechModel};
use placelens::infrastructure::observability::{init_tracing, TracingConfig};
use placelens::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing backend credential is fatal here, not at request time.
    let settings = Settings::from_env().context("loading configuration")?;

    init_tracing(
        TracingConfig {
            environment: settings.environment.to_string(),
            level: settings.logging.level.clone(),
            json_format: settings.logging.enable_json,
        },
        settings.server.port,
    );

    let location_model = Arc::new(GeminiLocationModel::new(
        &settings.gemini.base_url,
        &settings.gemini.api_key,
        settings.gemini.image_model.clone(),
        settings.gemini.video_model.clone(),
    ));
    let speech_model = Arc::new(GeminiSpeechModel::new(
        &settings.gemini.base_url,
        &settings.gemini.api_key,
        settings.gemini.tts_model.clone(),
        settings.gemini.voice.clone(),
    ));

    let analysis_service = Arc::new(AnalysisService::new(
        location_model,
        speech_model,
        SessionCounter::new(),
    ));

    let router = create_router(AppState { analysis_service });

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
