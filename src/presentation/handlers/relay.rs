use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LocationModel, LocationModelError, SpeechModel};
use crate::domain::{Coordinates, MediaKind, MediaPayload, SourceRef};
use crate::infrastructure::observability::sanitize_log_text;
use crate::presentation::state::AppState;

/// Envelope for all relay calls: `{action: "analyze"|"audio", payload: {...}}`.
#[derive(Deserialize)]
pub struct RelayRequest {
    pub action: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzePayload {
    base64_data: String,
    mime_type: String,
    coordinates: Option<CoordinatesDto>,
}

#[derive(Deserialize)]
struct CoordinatesDto {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct AudioPayloadRequest {
    text: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub en: String,
    pub ru: String,
    pub sources: Vec<SourceDto>,
}

#[derive(Serialize)]
pub struct SourceDto {
    pub kind: &'static str,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Serialize)]
pub struct AudioResponse {
    pub audio: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state, request))]
pub async fn relay_handler<L, S>(
    State(state): State<AppState<L, S>>,
    Json(request): Json<RelayRequest>,
) -> Response
where
    L: LocationModel + 'static,
    S: SpeechModel + 'static,
{
    match request.action.as_str() {
        "analyze" => handle_analyze(state, request.payload).await,
        "audio" => handle_audio(state, request.payload).await,
        other => {
            tracing::warn!(action = %sanitize_log_text(other), "Unknown relay action");
            error_response(
                StatusCode::BAD_REQUEST,
                "unknown_action",
                "Unknown action; expected \"analyze\" or \"audio\".",
            )
        }
    }
}

async fn handle_analyze<L, S>(state: AppState<L, S>, payload: serde_json::Value) -> Response
where
    L: LocationModel,
    S: SpeechModel,
{
    let payload: AnalyzePayload = match serde_json::from_value(payload) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed analyze payload");
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_payload",
                "Analyze payload must carry base64Data and mimeType.",
            );
        }
    };

    if MediaKind::from_mime(&payload.mime_type).is_none() {
        tracing::warn!(mime_type = %sanitize_log_text(&payload.mime_type), "Unsupported media type");
        return error_response(
            StatusCode::BAD_REQUEST,
            "unsupported_media",
            "Only image and video media can be analyzed.",
        );
    }

    let media = MediaPayload {
        base64_data: payload.base64_data,
        mime_type: payload.mime_type,
    };
    let coordinates = payload.coordinates.map(|c| Coordinates {
        latitude: c.latitude,
        longitude: c.longitude,
    });

    match state.analysis_service.analyze(&media, coordinates).await {
        Ok(result) => {
            let sources = result
                .renderable_sources()
                .map(|source| SourceDto {
                    kind: match source {
                        SourceRef::Web { .. } => "web",
                        SourceRef::Maps { .. } => "maps",
                    },
                    uri: source.uri().unwrap_or_default().to_string(),
                    title: source.title().map(String::from),
                })
                .collect();

            (
                StatusCode::OK,
                Json(AnalyzeResponse {
                    en: result.en,
                    ru: result.ru,
                    sources,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            let status = match e {
                LocationModelError::ApiRequestFailed(_) => StatusCode::BAD_GATEWAY,
                LocationModelError::EmptyReply | LocationModelError::UnrecognizedReply(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            };
            error_response(status, "analysis_failed", e.user_message())
        }
    }
}

async fn handle_audio<L, S>(state: AppState<L, S>, payload: serde_json::Value) -> Response
where
    L: LocationModel,
    S: SpeechModel,
{
    let payload: AudioPayloadRequest = match serde_json::from_value(payload) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed audio payload");
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_payload",
                "Audio payload must carry text.",
            );
        }
    };

    if payload.text.trim().is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_payload",
            "Cannot synthesize empty text.",
        );
    }

    match state.analysis_service.synthesize(&payload.text).await {
        Ok(audio) => (
            StatusCode::OK,
            Json(AudioResponse {
                audio: audio.base64_data,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Speech synthesis failed");
            error_response(StatusCode::BAD_GATEWAY, "synthesis_failed", e.user_message())
        }
    }
}
