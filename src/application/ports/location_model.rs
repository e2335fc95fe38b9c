use async_trait::async_trait;

use crate::domain::{AnalysisResult, Coordinates, MediaPayload};

/// Multimodal model that guesses the geographic location shown in a piece of
/// media, answering in English and Russian with grounding citations.
#[async_trait]
pub trait LocationModel: Send + Sync {
    async fn analyze(
        &self,
        media: &MediaPayload,
        coordinates: Option<Coordinates>,
    ) -> Result<AnalysisResult, LocationModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LocationModelError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("model returned no text reply")]
    EmptyReply,
    #[error("unusable model reply: {0}")]
    UnrecognizedReply(String),
}

impl LocationModelError {
    /// Short, stable message safe to show to the end user. The underlying
    /// cause goes to the logs, never into a response body.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ApiRequestFailed(_) => "Failed to communicate with the analysis backend.",
            Self::EmptyReply | Self::UnrecognizedReply(_) => {
                "The model could not identify the location."
            }
        }
    }
}
