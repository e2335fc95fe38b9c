use async_trait::async_trait;

use crate::application::ports::{SpeechModel, SpeechModelError};
use crate::domain::AudioPayload;

use super::wire::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
};

/// Gemini-backed text-to-speech with a fixed, preselected voice.
///
/// Returns raw PCM framed per `GEMINI_TTS_FORMAT`; the framing is a contract
/// with this backend, not something the payload describes.
pub struct GeminiSpeechModel {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    voice: String,
}

impl GeminiSpeechModel {
    pub fn new(base_url: &str, api_key: &str, model: String, voice: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model,
            voice,
        }
    }

    fn build_request(&self, text: &str) -> GenerateContentRequest {
        // The carrier instruction biases the model toward natural prosody
        // instead of a verbatim robotic reading.
        let carrier = format!("Say this naturally: {}", text);

        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(carrier)],
            }],
            tools: None,
            tool_config: None,
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                }),
            }),
        }
    }
}

#[async_trait]
impl SpeechModel for GeminiSpeechModel {
    async fn synthesize(&self, text: &str) -> Result<AudioPayload, SpeechModelError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        tracing::debug!(
            model = %self.model,
            voice = %self.voice,
            chars = text.len(),
            "Requesting speech synthesis"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request(text))
            .send()
            .await
            .map_err(|e| SpeechModelError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SpeechModelError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SpeechModelError::ApiRequestFailed(format!("parse response: {}", e)))?;

        // First audio blob of the first candidate's first content part;
        // anything less is a fault, not a silent empty result.
        let data = reply
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.inline_data.as_ref())
            .map(|blob| blob.data.clone())
            .ok_or(SpeechModelError::NoAudioData)?;

        tracing::info!(base64_chars = data.len(), "Speech synthesis completed");

        Ok(AudioPayload { base64_data: data })
    }
}
