mod cpal_sink;
pub mod pcm_decoder;

pub use cpal_sink::{fill_from_queue, CpalAudioSink};
pub use pcm_decoder::{decode_pcm, decode_pcm_bytes, DecodeError};
