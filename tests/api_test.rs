use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use placelens::application::ports::{
    LocationModel, LocationModelError, SpeechModel, SpeechModelError,
};
use placelens::application::services::{AnalysisService, SessionCounter};
use placelens::domain::{AnalysisResult, AudioPayload, Coordinates, MediaPayload, SourceRef};
use placelens::infrastructure::text_processing::parse_bilingual_reply;
use placelens::presentation::{create_router, AppState};

const EVEN_PCM_BYTES: usize = 4800;

/// Simulates the model backend replying with canned text, running the same
/// reply cleanup the real client applies.
struct CannedReplyModel {
    raw_reply: &'static str,
    sources: Vec<SourceRef>,
    seen_coordinates: Mutex<Option<Option<Coordinates>>>,
}

impl CannedReplyModel {
    fn new(raw_reply: &'static str, sources: Vec<SourceRef>) -> Self {
        Self {
            raw_reply,
            sources,
            seen_coordinates: Mutex::new(None),
        }
    }
}

#[async_trait]
impl LocationModel for CannedReplyModel {
    async fn analyze(
        &self,
        _media: &MediaPayload,
        coordinates: Option<Coordinates>,
    ) -> Result<AnalysisResult, LocationModelError> {
        *self.seen_coordinates.lock().unwrap() = Some(coordinates);

        let reply = parse_bilingual_reply(self.raw_reply)
            .map_err(|e| LocationModelError::UnrecognizedReply(e.to_string()))?;

        Ok(AnalysisResult {
            en: reply.en,
            ru: reply.ru,
            sources: self.sources.clone(),
        })
    }
}

struct FailingLocationModel {
    error: fn() -> LocationModelError,
}

#[async_trait]
impl LocationModel for FailingLocationModel {
    async fn analyze(
        &self,
        _media: &MediaPayload,
        _coordinates: Option<Coordinates>,
    ) -> Result<AnalysisResult, LocationModelError> {
        Err((self.error)())
    }
}

struct MockSpeechModel;

#[async_trait]
impl SpeechModel for MockSpeechModel {
    async fn synthesize(&self, _text: &str) -> Result<AudioPayload, SpeechModelError> {
        use base64::Engine as _;
        let pcm = vec![0u8; EVEN_PCM_BYTES];
        Ok(AudioPayload {
            base64_data: base64::engine::general_purpose::STANDARD.encode(pcm),
        })
    }
}

struct NoAudioSpeechModel;

#[async_trait]
impl SpeechModel for NoAudioSpeechModel {
    async fn synthesize(&self, _text: &str) -> Result<AudioPayload, SpeechModelError> {
        Err(SpeechModelError::NoAudioData)
    }
}

fn app_with<L, S>(location: Arc<L>, speech: Arc<S>) -> axum::Router
where
    L: LocationModel + 'static,
    S: SpeechModel + 'static,
{
    let analysis_service = Arc::new(AnalysisService::new(
        location,
        speech,
        SessionCounter::new(),
    ));
    create_router(AppState { analysis_service })
}

fn post_api(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn analyze_request(coordinates: serde_json::Value) -> serde_json::Value {
    json!({
        "action": "analyze",
        "payload": {
            "base64Data": "aGVsbG8=",
            "mimeType": "image/jpeg",
            "coordinates": coordinates,
        }
    })
}

#[tokio::test]
async fn given_fenced_json_reply_when_analyzing_then_returns_bilingual_result_with_source() {
    let location = Arc::new(CannedReplyModel::new(
        "```json\n{\"en\": \"The Eiffel Tower in Paris, France.\", \"ru\": \"Эйфелева башня в Париже, Франция.\"}\n```",
        vec![SourceRef::Web {
            uri: Some("https://example.com/eiffel".to_string()),
            title: Some("Eiffel Tower".to_string()),
        }],
    ));
    let app = app_with(Arc::clone(&location), Arc::new(MockSpeechModel));

    let response = app
        .oneshot(post_api(analyze_request(
            json!({"latitude": 48.8584, "longitude": 2.2945}),
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["en"], "The Eiffel Tower in Paris, France.");
    assert_eq!(body["ru"], "Эйфелева башня в Париже, Франция.");
    assert_eq!(body["sources"].as_array().unwrap().len(), 1);
    assert_eq!(body["sources"][0]["uri"], "https://example.com/eiffel");

    let seen = location.seen_coordinates.lock().unwrap().clone();
    let coordinates = seen.flatten().expect("coordinates forwarded to the model");
    assert!((coordinates.latitude - 48.8584).abs() < 1e-9);
    assert!((coordinates.longitude - 2.2945).abs() < 1e-9);
}

#[tokio::test]
async fn given_null_coordinates_when_analyzing_then_analysis_still_succeeds() {
    let location = Arc::new(CannedReplyModel::new(
        "{\"en\": \"Red Square in Moscow.\", \"ru\": \"Красная площадь в Москве.\"}",
        Vec::new(),
    ));
    let app = app_with(Arc::clone(&location), Arc::new(MockSpeechModel));

    let response = app
        .oneshot(post_api(analyze_request(serde_json::Value::Null)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sources"].as_array().unwrap().len(), 0);

    let seen = location.seen_coordinates.lock().unwrap().clone();
    assert_eq!(seen, Some(None));
}

#[tokio::test]
async fn given_source_without_uri_when_analyzing_then_source_is_skipped_not_errored() {
    let location = Arc::new(CannedReplyModel::new(
        "{\"en\": \"Somewhere.\", \"ru\": \"Где-то.\"}",
        vec![
            SourceRef::Maps {
                uri: None,
                title: Some("A place with no link".to_string()),
            },
            SourceRef::Web {
                uri: Some("https://example.com/a".to_string()),
                title: None,
            },
        ],
    ));
    let app = app_with(location, Arc::new(MockSpeechModel));

    let response = app
        .oneshot(post_api(analyze_request(serde_json::Value::Null)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["kind"], "web");
}

#[tokio::test]
async fn given_unparseable_model_reply_when_analyzing_then_returns_generic_analysis_error() {
    let location = Arc::new(CannedReplyModel::new(
        "I think this might be somewhere in Italy, but I am not sure.",
        Vec::new(),
    ));
    let app = app_with(location, Arc::new(MockSpeechModel));

    let response = app
        .oneshot(post_api(analyze_request(serde_json::Value::Null)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "analysis_failed");
    assert_eq!(body["message"], "The model could not identify the location.");
}

#[tokio::test]
async fn given_transport_failure_when_analyzing_then_returns_bad_gateway_without_detail() {
    let location = Arc::new(FailingLocationModel {
        error: || {
            LocationModelError::ApiRequestFailed(
                "status 500: secret backend stack trace".to_string(),
            )
        },
    });
    let app = app_with(location, Arc::new(MockSpeechModel));

    let response = app
        .oneshot(post_api(analyze_request(serde_json::Value::Null)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Failed to communicate with the analysis backend."
    );
    assert!(!body.to_string().contains("stack trace"));
}

#[tokio::test]
async fn given_unsupported_mime_type_when_analyzing_then_returns_bad_request() {
    let location = Arc::new(CannedReplyModel::new("{}", Vec::new()));
    let app = app_with(location, Arc::new(MockSpeechModel));

    let response = app
        .oneshot(post_api(json!({
            "action": "analyze",
            "payload": {
                "base64Data": "aGVsbG8=",
                "mimeType": "application/pdf",
                "coordinates": null,
            }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unsupported_media");
}

#[tokio::test]
async fn given_text_when_requesting_audio_then_returns_even_length_payload() {
    use base64::Engine as _;

    let location = Arc::new(CannedReplyModel::new("{}", Vec::new()));
    let app = app_with(location, Arc::new(MockSpeechModel));

    let response = app
        .oneshot(post_api(json!({
            "action": "audio",
            "payload": { "text": "The Eiffel Tower in Paris, France." }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let audio = body["audio"].as_str().unwrap();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(audio)
        .unwrap();
    assert_eq!(bytes.len(), EVEN_PCM_BYTES);
    assert_eq!(bytes.len() % 2, 0);
}

#[tokio::test]
async fn given_missing_audio_blob_when_requesting_audio_then_returns_synthesis_error() {
    let location = Arc::new(CannedReplyModel::new("{}", Vec::new()));
    let app = app_with(location, Arc::new(NoAudioSpeechModel));

    let response = app
        .oneshot(post_api(json!({
            "action": "audio",
            "payload": { "text": "anything" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "synthesis_failed");
    assert_eq!(body["message"], "No audio data received.");
}

#[tokio::test]
async fn given_empty_text_when_requesting_audio_then_returns_bad_request() {
    let location = Arc::new(CannedReplyModel::new("{}", Vec::new()));
    let app = app_with(location, Arc::new(MockSpeechModel));

    let response = app
        .oneshot(post_api(json!({
            "action": "audio",
            "payload": { "text": "   " }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_unknown_action_when_posting_then_returns_bad_request() {
    let location = Arc::new(CannedReplyModel::new("{}", Vec::new()));
    let app = app_with(location, Arc::new(MockSpeechModel));

    let response = app
        .oneshot(post_api(json!({
            "action": "transcribe",
            "payload": {}
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unknown_action");
}

#[tokio::test]
async fn given_health_check_when_getting_then_reports_healthy() {
    let location = Arc::new(CannedReplyModel::new("{}", Vec::new()));
    let app = app_with(location, Arc::new(MockSpeechModel));

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}
