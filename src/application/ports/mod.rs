mod audio_sink;
mod location_model;
mod speech_model;

pub use audio_sink::{AudioSink, AudioSinkError};
pub use location_model::{LocationModel, LocationModelError};
pub use speech_model::{SpeechModel, SpeechModelError};
