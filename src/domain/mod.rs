mod analysis;
mod audio;
mod coordinates;
mod media;
mod session;

pub use analysis::{AnalysisResult, ResultLanguage, SourceRef};
pub use audio::{AudioPayload, DecodedAudioBuffer, PcmFormat, GEMINI_TTS_FORMAT};
pub use coordinates::Coordinates;
pub use media::{MediaKind, MediaPayload};
pub use session::SessionGeneration;
