use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use placelens::application::services::{AnalysisService, PlaybackSession, SessionCounter};
use placelens::domain::{Coordinates, ResultLanguage, GEMINI_TTS_FORMAT};
use placelens::infrastructure::audio::{decode_pcm, CpalAudioSink};
use placelens::infrastructure::llm::{GeminiLocationModel, GeminiSpeechModel};
use placelens::infrastructure::media::load_media;
use placelens::presentation::Settings;

/// Describe where a photo or video was taken, in English and Russian, and
/// speak the description aloud.
#[derive(Parser)]
#[command(name = "placelens")]
struct Args {
    /// Image or video file to analyze
    media: PathBuf,

    /// Location hint latitude (requires --longitude)
    #[arg(long, requires = "longitude")]
    latitude: Option<f64>,

    /// Location hint longitude (requires --latitude)
    #[arg(long, requires = "latitude")]
    longitude: Option<f64>,

    /// Language of the spoken description: en or ru
    #[arg(long, default_value = "en")]
    language: String,

    /// Print the description without playing audio
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::from_env().context("loading configuration")?;

    let language = match args.language.as_str() {
        "ru" => ResultLanguage::Ru,
        "en" => ResultLanguage::En,
        other => anyhow::bail!("unsupported language: {} (expected en or ru)", other),
    };

    let coordinates = match (args.latitude, args.longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };

    let media = load_media(&args.media)
        .await
        .context("encoding media file")?;

    let sessions = SessionCounter::new();
    let service = AnalysisService::new(
        Arc::new(GeminiLocationModel::new(
            &settings.gemini.base_url,
            &settings.gemini.api_key,
            settings.gemini.image_model.clone(),
            settings.gemini.video_model.clone(),
        )),
        Arc::new(GeminiSpeechModel::new(
            &settings.gemini.base_url,
            &settings.gemini.api_key,
            settings.gemini.tts_model.clone(),
            settings.gemini.voice.clone(),
        )),
        sessions.clone(),
    );

    let outcome = service
        .run(&media, coordinates, language)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Analysis failed");
            anyhow::anyhow!("{}", e.user_message())
        })?;

    println!("EN: {}", outcome.result.en);
    println!("RU: {}", outcome.result.ru);
    for source in outcome.result.renderable_sources() {
        match source.title() {
            Some(title) => println!("  - {} ({})", title, source.uri().unwrap_or_default()),
            None => println!("  - {}", source.uri().unwrap_or_default()),
        }
    }

    match outcome.audio {
        Ok(payload) if !args.quiet => {
            let buffer = decode_pcm(&payload, GEMINI_TTS_FORMAT).context("decoding audio")?;
            let playback = PlaybackSession::new(Arc::new(CpalAudioSink::new()?), sessions);
            playback.play(outcome.session, &buffer)?;
            while playback.is_playing() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
        Ok(_) => {}
        // Audio trouble never invalidates the printed description.
        Err(e) => eprintln!("audio unavailable: {}", e),
    }

    Ok(())
}
