mod analysis_service;
mod playback_session;
mod session;

pub use analysis_service::{AnalysisOutcome, AnalysisService, AudioStageError};
pub use playback_session::PlaybackSession;
pub use session::SessionCounter;
