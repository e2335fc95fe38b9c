use std::sync::Arc;

use crate::application::ports::{
    LocationModel, LocationModelError, SpeechModel, SpeechModelError,
};
use crate::application::services::SessionCounter;
use crate::domain::{
    AnalysisResult, AudioPayload, Coordinates, MediaPayload, ResultLanguage, SessionGeneration,
};

/// Sequences the two remote calls of one analysis session.
///
/// Synthesis is only attempted after inference succeeds and always uses the
/// just-produced result text, so at most one inference call and one synthesis
/// call are in flight per session. An inference failure aborts the pipeline;
/// a synthesis failure is contained and never discards the analysis result.
pub struct AnalysisService<L, S>
where
    L: LocationModel,
    S: SpeechModel,
{
    location_model: Arc<L>,
    speech_model: Arc<S>,
    sessions: SessionCounter,
}

impl<L, S> AnalysisService<L, S>
where
    L: LocationModel,
    S: SpeechModel,
{
    pub fn new(location_model: Arc<L>, speech_model: Arc<S>, sessions: SessionCounter) -> Self {
        Self {
            location_model,
            speech_model,
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionCounter {
        &self.sessions
    }

    pub async fn analyze(
        &self,
        media: &MediaPayload,
        coordinates: Option<Coordinates>,
    ) -> Result<AnalysisResult, LocationModelError> {
        let result = self.location_model.analyze(media, coordinates).await?;

        tracing::info!(
            en_chars = result.en.len(),
            ru_chars = result.ru.len(),
            sources = result.sources.len(),
            "Analysis completed"
        );

        Ok(result)
    }

    pub async fn synthesize(&self, text: &str) -> Result<AudioPayload, SpeechModelError> {
        let payload = self.speech_model.synthesize(text).await?;

        tracing::info!(
            base64_chars = payload.base64_data.len(),
            "Speech synthesis completed"
        );

        Ok(payload)
    }

    /// Full pipeline for one session: infer, then speak the result text in
    /// the selected language.
    ///
    /// The returned audio is `Err` when synthesis failed or when a newer
    /// session started while the synthesis call was still pending; in both
    /// cases the analysis result itself remains valid.
    pub async fn run(
        &self,
        media: &MediaPayload,
        coordinates: Option<Coordinates>,
        language: ResultLanguage,
    ) -> Result<AnalysisOutcome, LocationModelError> {
        let session = self.sessions.begin();
        let result = self.analyze(media, coordinates).await?;

        let audio = match self.synthesize(result.text(language)).await {
            Ok(payload) if self.sessions.is_current(session) => Ok(payload),
            Ok(_) => {
                tracing::debug!(
                    session = session.0,
                    "Dropping synthesis result from superseded session"
                );
                Err(AudioStageError::Superseded)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Speech synthesis failed, keeping analysis result");
                Err(AudioStageError::Synthesis(e))
            }
        };

        Ok(AnalysisOutcome {
            session,
            result,
            audio,
        })
    }
}

/// Outcome of one full analysis session.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub session: SessionGeneration,
    pub result: AnalysisResult,
    pub audio: Result<AudioPayload, AudioStageError>,
}

/// Why a session produced no playable audio. The analysis result is still
/// valid in every case.
#[derive(Debug, thiserror::Error)]
pub enum AudioStageError {
    #[error("synthesis failed: {0}")]
    Synthesis(#[from] SpeechModelError),
    #[error("superseded by a newer analysis session")]
    Superseded,
}
