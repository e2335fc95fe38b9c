use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use placelens::application::ports::{
    AudioSink, AudioSinkError, LocationModel, LocationModelError, SpeechModel, SpeechModelError,
};
use placelens::application::services::{
    AnalysisService, AudioStageError, PlaybackSession, SessionCounter,
};
use placelens::domain::{
    AnalysisResult, AudioPayload, Coordinates, DecodedAudioBuffer, MediaPayload, ResultLanguage,
    GEMINI_TTS_FORMAT,
};

struct RecordingSink {
    played: Mutex<Vec<usize>>,
    playing: AtomicBool,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            played: Mutex::new(Vec::new()),
            playing: AtomicBool::new(false),
        }
    }
}

impl AudioSink for RecordingSink {
    fn play(&self, buffer: &DecodedAudioBuffer) -> Result<(), AudioSinkError> {
        self.played.lock().unwrap().push(buffer.samples.len());
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

fn buffer_of(samples: usize) -> DecodedAudioBuffer {
    DecodedAudioBuffer {
        samples: vec![0.0; samples],
        format: GEMINI_TTS_FORMAT,
    }
}

#[test]
fn given_current_session_when_playing_then_buffer_reaches_the_sink() {
    let sink = Arc::new(RecordingSink::new());
    let sessions = SessionCounter::new();
    let playback = PlaybackSession::new(Arc::clone(&sink), sessions.clone());

    let generation = sessions.begin();
    playback.play(generation, &buffer_of(240)).unwrap();

    assert_eq!(*sink.played.lock().unwrap(), vec![240]);
    assert!(playback.is_playing());
}

#[test]
fn given_superseded_session_when_playing_then_buffer_is_refused() {
    let sink = Arc::new(RecordingSink::new());
    let sessions = SessionCounter::new();
    let playback = PlaybackSession::new(Arc::clone(&sink), sessions.clone());

    let stale = sessions.begin();
    let _current = sessions.begin();

    let result = playback.play(stale, &buffer_of(240));

    assert!(matches!(result, Err(AudioSinkError::StaleSession)));
    assert!(sink.played.lock().unwrap().is_empty());
}

#[test]
fn given_session_counter_when_beginning_then_generations_strictly_increase() {
    let sessions = SessionCounter::new();

    let first = sessions.begin();
    let second = sessions.begin();

    assert!(second > first);
    assert!(!sessions.is_current(first));
    assert!(sessions.is_current(second));
}

struct FixedLocationModel;

#[async_trait]
impl LocationModel for FixedLocationModel {
    async fn analyze(
        &self,
        _media: &MediaPayload,
        _coordinates: Option<Coordinates>,
    ) -> Result<AnalysisResult, LocationModelError> {
        Ok(AnalysisResult {
            en: "The Eiffel Tower in Paris.".to_string(),
            ru: "Эйфелева башня в Париже.".to_string(),
            sources: Vec::new(),
        })
    }
}

struct RecordingSpeechModel {
    spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechModel for RecordingSpeechModel {
    async fn synthesize(&self, text: &str) -> Result<AudioPayload, SpeechModelError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(AudioPayload {
            base64_data: "AAAA".to_string(),
        })
    }
}

/// Starts a new analysis session while the synthesis call is in flight,
/// reproducing the stale-result race.
struct SessionStealingSpeechModel {
    sessions: SessionCounter,
}

#[async_trait]
impl SpeechModel for SessionStealingSpeechModel {
    async fn synthesize(&self, _text: &str) -> Result<AudioPayload, SpeechModelError> {
        self.sessions.begin();
        Ok(AudioPayload {
            base64_data: "AAAA".to_string(),
        })
    }
}

fn media() -> MediaPayload {
    MediaPayload {
        base64_data: "aGVsbG8=".to_string(),
        mime_type: "image/jpeg".to_string(),
    }
}

#[tokio::test]
async fn given_successful_analysis_when_running_pipeline_then_speaks_selected_language() {
    let speech = Arc::new(RecordingSpeechModel {
        spoken: Mutex::new(Vec::new()),
    });
    let service = AnalysisService::new(
        Arc::new(FixedLocationModel),
        Arc::clone(&speech),
        SessionCounter::new(),
    );

    let outcome = service
        .run(&media(), None, ResultLanguage::Ru)
        .await
        .unwrap();

    assert!(outcome.audio.is_ok());
    assert_eq!(
        *speech.spoken.lock().unwrap(),
        vec!["Эйфелева башня в Париже.".to_string()]
    );
}

#[tokio::test]
async fn given_new_session_started_mid_synthesis_when_running_then_audio_is_dropped() {
    let sessions = SessionCounter::new();
    let service = AnalysisService::new(
        Arc::new(FixedLocationModel),
        Arc::new(SessionStealingSpeechModel {
            sessions: sessions.clone(),
        }),
        sessions,
    );

    let outcome = service
        .run(&media(), None, ResultLanguage::En)
        .await
        .unwrap();

    // The analysis text survives; only the audio is discarded.
    assert_eq!(outcome.result.en, "The Eiffel Tower in Paris.");
    assert!(matches!(outcome.audio, Err(AudioStageError::Superseded)));
}

struct FailingLocationModel;

#[async_trait]
impl LocationModel for FailingLocationModel {
    async fn analyze(
        &self,
        _media: &MediaPayload,
        _coordinates: Option<Coordinates>,
    ) -> Result<AnalysisResult, LocationModelError> {
        Err(LocationModelError::EmptyReply)
    }
}

#[tokio::test]
async fn given_analysis_failure_when_running_then_no_synthesis_is_attempted() {
    let speech = Arc::new(RecordingSpeechModel {
        spoken: Mutex::new(Vec::new()),
    });
    let service = AnalysisService::new(
        Arc::new(FailingLocationModel),
        Arc::clone(&speech),
        SessionCounter::new(),
    );

    let error = service
        .run(&media(), None, ResultLanguage::En)
        .await
        .unwrap_err();

    assert!(matches!(error, LocationModelError::EmptyReply));
    assert!(speech.spoken.lock().unwrap().is_empty());
}

struct FailingSpeechModel;

#[async_trait]
impl SpeechModel for FailingSpeechModel {
    async fn synthesize(&self, _text: &str) -> Result<AudioPayload, SpeechModelError> {
        Err(SpeechModelError::NoAudioData)
    }
}

#[tokio::test]
async fn given_synthesis_failure_when_running_then_analysis_result_is_kept() {
    let service = AnalysisService::new(
        Arc::new(FixedLocationModel),
        Arc::new(FailingSpeechModel),
        SessionCounter::new(),
    );

    let outcome = service
        .run(&media(), None, ResultLanguage::En)
        .await
        .unwrap();

    assert_eq!(outcome.result.en, "The Eiffel Tower in Paris.");
    assert!(matches!(
        outcome.audio,
        Err(AudioStageError::Synthesis(SpeechModelError::NoAudioData))
    ));
}
