//! Speech pipeline
//!
//! This module provides:
//! - The Synthesizer interface and an OpenAI-compatible HTTP backend
//! - The Speaker, which drives chunked synthesis and ordered playback

pub mod speaker;
pub mod tts;

pub use speaker::{Speaker, SpeakerConfig};
pub use tts::{OpenAiTts, Synthesizer, TtsConfig};
