mod gemini_location_model;
mod gemini_speech_model;
mod wire;

pub use gemini_location_model::GeminiLocationModel;
pub use gemini_speech_model::GeminiSpeechModel;
