use async_trait::async_trait;

use crate::domain::AudioPayload;

/// Text-to-speech model with a fixed, preselected voice.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<AudioPayload, SpeechModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechModelError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("no audio data received")]
    NoAudioData,
}

impl SpeechModelError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ApiRequestFailed(_) => "Failed to communicate with the speech backend.",
            Self::NoAudioData => "No audio data received.",
        }
    }
}
