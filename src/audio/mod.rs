//! Audio playback
//!
//! This module provides:
//! - [`AudioClip`], the in-memory synthesized audio artifact
//! - The [`Player`] interface the speech pipeline drives
//! - A cpal-backed player (behind the `audio-io` feature)

pub mod clip;
#[cfg(feature = "audio-io")]
pub mod output;
pub mod resampler;

pub use clip::AudioClip;
#[cfg(feature = "audio-io")]
pub use output::CpalPlayer;
pub use resampler::{resample_audio, AudioResampler};

use crate::Result;

/// Blocking audio playback with out-of-band abort.
pub trait Player: Send + Sync {
    /// Play one clip to completion, blocking the calling thread. A
    /// concurrent [`Player::abort`] makes the call return promptly with
    /// `Ok`. The clip is consumed and its storage released on every exit
    /// path.
    fn play(&self, clip: AudioClip) -> Result<()>;

    /// Cut short any playback in progress. Idempotent, callable from any
    /// thread, and safe to call when nothing is playing.
    fn abort(&self);
}
