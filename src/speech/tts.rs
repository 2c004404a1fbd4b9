//! Text-to-speech synthesis against an OpenAI-compatible speech endpoint

use crate::audio::AudioClip;
use crate::{ReadAloudError, Result};
use std::io::Cursor;
use std::time::Duration;
use tracing::debug;

/// Turns one chunk of text into playable audio.
pub trait Synthesizer: Send + Sync {
    /// Synthesize a chunk. Blocking; must be callable from a new thread
    /// while a previous call is still completing on another one.
    fn synthesize(&self, text: &str) -> Result<AudioClip>;
}

/// Configuration for the OpenAI-compatible TTS backend
#[derive(Clone, Debug)]
pub struct TtsConfig {
    /// Base URL of the speech API, up to and including the version segment
    pub api_base: String,

    /// Bearer token for the speech API
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Voice identifier
    pub voice: String,

    /// Read-aloud delivery instructions sent with every request
    pub instructions: String,

    /// Hard cap on one synthesis round trip
    pub request_timeout: Duration,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini-tts".to_string(),
            voice: "cedar".to_string(),
            instructions: "Read clearly and naturally. Use a warm, calm tone. \
                           Pause slightly after sentences. Do not spell out punctuation."
                .to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl TtsConfig {
    /// Build a config from the environment.
    ///
    /// `OPENAI_API_KEY` is required; `OPENAI_TTS_VOICE` and
    /// `OPENAI_API_BASE` override the defaults when present.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ReadAloudError::ConfigError("OPENAI_API_KEY is not set".into()))?;

        let mut config = Self {
            api_key,
            ..Self::default()
        };

        if let Ok(voice) = std::env::var("OPENAI_TTS_VOICE") {
            if !voice.is_empty() {
                config.voice = voice;
            }
        }

        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            if !base.is_empty() {
                config.api_base = base;
            }
        }

        Ok(config)
    }

    /// Set the voice
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the delivery instructions
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Synthesizer backed by an OpenAI-compatible `/audio/speech` endpoint
pub struct OpenAiTts {
    config: TtsConfig,
    client: reqwest::blocking::Client,
}

impl OpenAiTts {
    pub fn new(config: TtsConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(ReadAloudError::ConfigError("API key is required".into()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                ReadAloudError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }
}

impl Synthesizer for OpenAiTts {
    fn synthesize(&self, text: &str) -> Result<AudioClip> {
        let url = format!("{}/audio/speech", self.config.api_base.trim_end_matches('/'));

        let body = serde_json::json!({
            "model": self.config.model,
            "voice": self.config.voice,
            "input": text,
            "instructions": self.config.instructions,
            "response_format": "wav",
        });

        debug!("Requesting synthesis ({} chars)", text.chars().count());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| ReadAloudError::SynthesisError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            let detail = truncate(detail.trim(), 200);
            return Err(ReadAloudError::SynthesisError(if detail.is_empty() {
                format!("Backend returned {}", status)
            } else {
                format!("Backend returned {}: {}", status, detail)
            }));
        }

        let bytes = response.bytes().map_err(|e| {
            ReadAloudError::SynthesisError(format!("Failed to read response body: {}", e))
        })?;

        let clip = decode_wav(&bytes)?;

        debug!(
            "Synthesized {} samples ({:.2}s)",
            clip.samples.len(),
            clip.duration_secs()
        );

        Ok(clip)
    }
}

/// Decode a WAV byte buffer into an [`AudioClip`].
fn decode_wav(bytes: &[u8]) -> Result<AudioClip> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).map_err(|e| {
        ReadAloudError::SynthesisError(format!("Failed to decode synthesized audio: {}", e))
    })?;

    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>(),
    }
    .map_err(|e| {
        ReadAloudError::SynthesisError(format!("Failed to decode synthesized audio: {}", e))
    })?;

    if samples.is_empty() {
        return Err(ReadAloudError::SynthesisError(
            "Synthesized audio is empty".into(),
        ));
    }

    Ok(AudioClip::new(samples, spec.sample_rate, spec.channels))
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(spec: hound::WavSpec, samples: &[i16]) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec).expect("writer");
            for &s in samples {
                writer.write_sample(s).expect("sample");
            }
            writer.finalize().expect("finalize");
        }
        bytes
    }

    #[test]
    fn test_decode_int_wav() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 24_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, &[0, i16::MAX, i16::MIN]);

        let clip = decode_wav(&bytes).expect("decode");
        assert_eq!(clip.sample_rate, 24_000);
        assert_eq!(clip.channels, 1);
        assert_eq!(clip.samples.len(), 3);
        assert!(clip.samples[0].abs() < f32::EPSILON);
        assert!(clip.samples[1] > 0.99);
        assert!((clip.samples[2] + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_decode_rejects_empty_audio() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 24_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, &[]);

        let err = decode_wav(&bytes).unwrap_err();
        assert!(matches!(err, ReadAloudError::SynthesisError(_)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_wav(b"not a wav file").is_err());
    }

    #[test]
    fn test_config_defaults_and_builders() {
        let config = TtsConfig::default()
            .with_voice("alloy")
            .with_model("tts-1")
            .with_api_base("http://localhost:8000/v1")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.voice, "alloy");
        assert_eq!(config.model, "tts-1");
        assert_eq!(config.api_base, "http://localhost:8000/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(!config.instructions.is_empty());
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        assert!(OpenAiTts::new(TtsConfig::default()).is_err());
    }
}
