use std::sync::Arc;

use crate::application::ports::{AudioSink, AudioSinkError};
use crate::application::services::SessionCounter;
use crate::domain::{DecodedAudioBuffer, SessionGeneration};

/// Session-aware wrapper around the audio output.
///
/// Guards against the stale-result race: if a new analysis starts before the
/// previous synthesis call resolves, the late buffer arrives tagged with a
/// superseded generation and is refused instead of played.
pub struct PlaybackSession<A>
where
    A: AudioSink,
{
    sink: Arc<A>,
    sessions: SessionCounter,
}

impl<A> PlaybackSession<A>
where
    A: AudioSink,
{
    pub fn new(sink: Arc<A>, sessions: SessionCounter) -> Self {
        Self { sink, sessions }
    }

    pub fn play(
        &self,
        generation: SessionGeneration,
        buffer: &DecodedAudioBuffer,
    ) -> Result<(), AudioSinkError> {
        if !self.sessions.is_current(generation) {
            tracing::debug!(
                generation = generation.0,
                current = self.sessions.current().0,
                "Refusing playback for superseded session"
            );
            return Err(AudioSinkError::StaleSession);
        }

        self.sink.play(buffer)
    }

    pub fn is_playing(&self) -> bool {
        self.sink.is_playing()
    }
}
