/// Raw synthesized audio as returned by the speech backend: a base64 blob of
/// uncompressed PCM. The framing is not self-describing; see [`PcmFormat`].
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPayload {
    pub base64_data: String,
}

/// Fixed PCM framing agreed with a specific speech backend.
///
/// The decoder takes this as a value rather than hard-coding the numbers, so
/// a backend with different framing can be substituted without touching the
/// decoding math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate_hz: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl PcmFormat {
    pub const fn bytes_per_sample(&self) -> usize {
        (self.bits_per_sample / 8) as usize
    }
}

/// Framing contract with the Gemini TTS backend: mono 16-bit LE at 24 kHz.
pub const GEMINI_TTS_FORMAT: PcmFormat = PcmFormat {
    sample_rate_hz: 24_000,
    channels: 1,
    bits_per_sample: 16,
};

/// Float samples in [-1.0, 1.0) decoded from one [`AudioPayload`].
///
/// One buffer per payload; discarded when a new analysis session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudioBuffer {
    pub samples: Vec<f32>,
    pub format: PcmFormat,
}

impl DecodedAudioBuffer {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.format.sample_rate_hz as f32
    }
}
