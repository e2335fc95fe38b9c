use async_trait::async_trait;

use crate::application::ports::{LocationModel, LocationModelError};
use crate::domain::{AnalysisResult, Coordinates, MediaKind, MediaPayload, SourceRef};
use crate::infrastructure::observability::sanitize_log_text;
use crate::infrastructure::text_processing::parse_bilingual_reply;

use super::wire::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, LatLng, Part,
    RetrievalConfig, Tool, ToolConfig,
};

const PROMPT: &str = "Identify the landmark, city, and country shown in this media. \
Use the available search and maps tools to summarize what this place is known for, \
including visitor reviews. Respond with ONLY a JSON object containing exactly two \
keys, \"en\" and \"ru\": the same description in English and in Russian. Do not wrap \
the JSON in markdown code fences. Do not include bracketed numeric citations such as \
[1] in the text.";

/// Gemini-backed location inference.
///
/// Video goes to a higher-capability model than still images; frames need
/// deeper reasoning and the extra latency is acceptable there.
pub struct GeminiLocationModel {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    image_model: String,
    video_model: String,
}

impl GeminiLocationModel {
    pub fn new(
        base_url: &str,
        api_key: &str,
        image_model: String,
        video_model: String,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            image_model,
            video_model,
        }
    }

    fn model_for(&self, media: &MediaPayload) -> &str {
        match media.kind() {
            Some(MediaKind::Video) => &self.video_model,
            _ => &self.image_model,
        }
    }

    fn build_request(
        &self,
        media: &MediaPayload,
        coordinates: Option<Coordinates>,
    ) -> GenerateContentRequest {
        // A location hint for retrieval, not a hard constraint: the model may
        // still identify a different place from the visual content.
        let tool_config = coordinates.map(|c| ToolConfig {
            retrieval_config: RetrievalConfig {
                lat_lng: LatLng {
                    latitude: c.latitude,
                    longitude: c.longitude,
                },
            },
        });

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline_data(media.mime_type.clone(), media.base64_data.clone()),
                    Part::text(PROMPT),
                ],
            }],
            tools: Some(vec![Tool::google_search(), Tool::google_maps()]),
            tool_config,
            generation_config: None,
        }
    }
}

fn extract_sources(candidate: &Candidate) -> Vec<SourceRef> {
    let Some(metadata) = &candidate.grounding_metadata else {
        // Absent grounding metadata is not an error.
        return Vec::new();
    };

    metadata
        .grounding_chunks
        .iter()
        .filter_map(|chunk| {
            if let Some(web) = &chunk.web {
                Some(SourceRef::Web {
                    uri: web.uri.clone(),
                    title: web.title.clone(),
                })
            } else {
                chunk.maps.as_ref().map(|maps| SourceRef::Maps {
                    uri: maps.uri.clone(),
                    title: maps.title.clone(),
                })
            }
        })
        .collect()
}

#[async_trait]
impl LocationModel for GeminiLocationModel {
    async fn analyze(
        &self,
        media: &MediaPayload,
        coordinates: Option<Coordinates>,
    ) -> Result<AnalysisResult, LocationModelError> {
        let model = self.model_for(media);
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        tracing::debug!(
            model = model,
            mime_type = %media.mime_type,
            has_coordinates = coordinates.is_some(),
            "Sending media to Gemini for location analysis"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request(media, coordinates))
            .send()
            .await
            .map_err(|e| LocationModelError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LocationModelError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LocationModelError::ApiRequestFailed(format!("parse response: {}", e)))?;

        let candidate = reply
            .candidates
            .first()
            .ok_or(LocationModelError::EmptyReply)?;

        let text = candidate
            .content
            .as_ref()
            .and_then(|content| content.parts.iter().find_map(|p| p.text.as_deref()))
            .ok_or(LocationModelError::EmptyReply)?;

        let bilingual = parse_bilingual_reply(text).map_err(|e| {
            tracing::warn!(
                error = %e,
                reply = %sanitize_log_text(text),
                "Model reply was not parseable JSON"
            );
            LocationModelError::UnrecognizedReply(e.to_string())
        })?;

        if bilingual.en.is_empty() || bilingual.ru.is_empty() {
            return Err(LocationModelError::UnrecognizedReply(
                "empty en or ru field".to_string(),
            ));
        }

        let sources = extract_sources(candidate);

        tracing::info!(
            model = model,
            sources = sources.len(),
            "Gemini location analysis completed"
        );

        Ok(AnalysisResult {
            en: bilingual.en,
            ru: bilingual.ru,
            sources,
        })
    }
}
