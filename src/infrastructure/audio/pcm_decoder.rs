//! Strict PCM16 decoding.
//!
//! The payload framing is fixed by contract with the speech backend and is
//! not self-describing, so there is deliberately no format sniffing here.

use base64::engine::general_purpose;
use base64::Engine as _;

use crate::domain::{AudioPayload, DecodedAudioBuffer, PcmFormat};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("audio payload is not valid base64: {0}")]
    InvalidEncoding(String),
    #[error("byte length {len} is not a whole number of {width}-byte samples")]
    TruncatedFrame { len: usize, width: usize },
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),
}

/// Decode a base64 audio payload into float samples.
pub fn decode_pcm(payload: &AudioPayload, format: PcmFormat) -> Result<DecodedAudioBuffer, DecodeError> {
    let bytes = general_purpose::STANDARD
        .decode(&payload.base64_data)
        .map_err(|e| DecodeError::InvalidEncoding(e.to_string()))?;

    decode_pcm_bytes(&bytes, format)
}

/// Interpret raw bytes as little-endian signed PCM in the given framing,
/// normalizing each sample to [-1.0, 1.0) by dividing by 32768.
///
/// A byte length that is not a multiple of the sample width is an error; the
/// trailing partial sample is never read.
pub fn decode_pcm_bytes(bytes: &[u8], format: PcmFormat) -> Result<DecodedAudioBuffer, DecodeError> {
    if format.bits_per_sample != 16 {
        return Err(DecodeError::UnsupportedBitDepth(format.bits_per_sample));
    }

    let width = format.bytes_per_sample();
    if bytes.len() % width != 0 {
        return Err(DecodeError::TruncatedFrame {
            len: bytes.len(),
            width,
        });
    }

    let samples = bytes
        .chunks_exact(width)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32_768.0)
        .collect();

    Ok(DecodedAudioBuffer { samples, format })
}
