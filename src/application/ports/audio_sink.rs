use crate::domain::DecodedAudioBuffer;

/// Audio output device abstraction.
///
/// Playback always starts from time zero; there is no seek, pause, or loop.
/// Implementations must treat `play` as a no-op while a buffer is already
/// playing, and flip back to idle when playback completes.
pub trait AudioSink: Send + Sync {
    fn play(&self, buffer: &DecodedAudioBuffer) -> Result<(), AudioSinkError>;
    fn is_playing(&self) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioSinkError {
    #[error("playback superseded by a newer analysis session")]
    StaleSession,
    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),
}
