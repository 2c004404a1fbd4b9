use crate::audio::resampler::resample_audio;
use crate::audio::{AudioClip, Player};
use crate::{ReadAloudError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, StreamConfig};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// How long to keep the stream alive after the buffer drains, so the device
/// can flush its final period before the stream is torn down.
const DRAIN_TAIL: Duration = Duration::from_millis(120);

/// Playback state shared with the output stream callback.
#[derive(Default)]
struct Session {
    /// Mono samples at the device rate
    samples: Vec<f32>,

    /// Next sample to hand to the device
    pos: usize,

    /// Set by [`CpalPlayer::abort`]; makes the blocked play return promptly
    aborted: bool,
}

#[derive(Default)]
struct Shared {
    session: Mutex<Session>,
    done: Condvar,
}

/// Audio player on the default cpal output device.
///
/// `play` renders one clip to completion on the calling thread; `abort`
/// (from any thread) cuts the current clip short. Overlapping `play` calls
/// are serialized, so an aborted call finishes tearing down its stream
/// before the next clip starts.
pub struct CpalPlayer {
    device: Device,
    config: StreamConfig,
    shared: Arc<Shared>,
    play_lock: Mutex<()>,
}

impl CpalPlayer {
    /// Create a player on the default output device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host.default_output_device().ok_or_else(|| {
            ReadAloudError::AudioDeviceError("No output device available".into())
        })?;

        info!(
            "Using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_output_config()
            .map_err(|e| {
                ReadAloudError::AudioDeviceError(format!("Failed to get output config: {}", e))
            })?
            .into();

        Ok(Self {
            device,
            config,
            shared: Arc::new(Shared::default()),
            play_lock: Mutex::new(()),
        })
    }

    /// Get the sample rate of the output device
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn build_stream(&self) -> Result<cpal::Stream> {
        let channels = self.config.channels as usize;
        let shared = Arc::clone(&self.shared);

        let err_fn = |err| {
            error!("Audio output stream error: {}", err);
        };

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut session = shared.session.lock();

                    if session.aborted {
                        data.fill(0.0);
                        return;
                    }

                    let frames = data.len() / channels;
                    let available = session.samples.len() - session.pos;
                    let take = frames.min(available);

                    // Duplicate the mono sample across the device channels.
                    for i in 0..take {
                        let sample = session.samples[session.pos + i];
                        for c in 0..channels {
                            data[i * channels + c] = sample;
                        }
                    }
                    session.pos += take;

                    for s in &mut data[take * channels..] {
                        *s = 0.0;
                    }

                    if session.pos >= session.samples.len() {
                        shared.done.notify_all();
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                ReadAloudError::AudioDeviceError(format!("Failed to build output stream: {}", e))
            })?;

        Ok(stream)
    }
}

impl Player for CpalPlayer {
    fn play(&self, clip: AudioClip) -> Result<()> {
        if clip.is_empty() {
            return Err(ReadAloudError::PlaybackError(
                "Synthesized audio is missing or empty".into(),
            ));
        }

        let _guard = self.play_lock.lock();

        let duration = clip.duration_secs();
        let mono = clip.into_mono();
        let samples = resample_audio(&mono.samples, mono.sample_rate, self.sample_rate())?;

        debug!("Playing clip ({} samples, {:.2}s)", samples.len(), duration);

        {
            let mut session = self.shared.session.lock();
            session.samples = samples;
            session.pos = 0;
            session.aborted = false;
        }

        let stream = self.build_stream()?;
        stream.play().map_err(|e| {
            ReadAloudError::AudioDeviceError(format!("Failed to start output stream: {}", e))
        })?;

        let aborted = {
            let mut session = self.shared.session.lock();
            while !session.aborted && session.pos < session.samples.len() {
                self.shared.done.wait(&mut session);
            }
            session.aborted
        };

        if !aborted {
            std::thread::sleep(DRAIN_TAIL);
        }

        {
            let mut session = self.shared.session.lock();
            session.samples = Vec::new();
            session.pos = 0;
        }
        drop(stream);

        debug!("Playback finished (aborted: {})", aborted);
        Ok(())
    }

    fn abort(&self) {
        let mut session = self.shared.session.lock();
        session.aborted = true;
        self.shared.done.notify_all();
    }
}
