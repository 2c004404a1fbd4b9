//! Generation-counted speech jobs with single-slot synthesis prefetch
//!
//! Every `speak` or `stop` bumps a generation counter under one lock; the
//! newest request wins. A job whose id no longer matches the counter stops
//! producing side effects (no playback, no status updates) at its next
//! check and terminates silently. In-flight synthesis is never interrupted,
//! only discarded; playback is cut immediately through [`Player::abort`].
//!
//! While chunk `i` plays, chunk `i + 1` is synthesized on a short-lived
//! prefetch thread, hiding synthesis latency behind playback. There is
//! never more than one synthesis and one playback in flight per job.

use crate::audio::Player;
use crate::speech::tts::Synthesizer;
use crate::status::StatusSink;
use crate::text::{chunk_text, normalize_text};
use crate::ReadAloudError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info};

/// Configuration for the speaker
#[derive(Clone, Debug)]
pub struct SpeakerConfig {
    /// Maximum characters per synthesis chunk
    pub max_chunk_chars: usize,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 900,
        }
    }
}

/// Drives chunked synthesis and ordered playback of one text at a time.
pub struct Speaker {
    synthesizer: Arc<dyn Synthesizer>,
    player: Arc<dyn Player>,
    status: Arc<dyn StatusSink>,

    /// Current generation. Exactly one generation is current at any time;
    /// all reads and writes go through this one lock.
    generation: Arc<Mutex<u64>>,

    config: SpeakerConfig,
}

impl Speaker {
    pub fn new(
        synthesizer: Arc<dyn Synthesizer>,
        player: Arc<dyn Player>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        Self::with_config(synthesizer, player, status, SpeakerConfig::default())
    }

    pub fn with_config(
        synthesizer: Arc<dyn Synthesizer>,
        player: Arc<dyn Player>,
        status: Arc<dyn StatusSink>,
        config: SpeakerConfig,
    ) -> Self {
        Self {
            synthesizer,
            player,
            status,
            generation: Arc::new(Mutex::new(0)),
            config,
        }
    }

    /// Cancel any active job and cut playback. Idempotent; safe to call
    /// with no job running.
    pub fn stop(&self) {
        {
            let mut generation = self.generation.lock();
            *generation += 1;
        }
        self.player.abort();
        info!("Speech stopped");
        self.status.set_status("Stopped");
    }

    /// Speak a block of text, superseding any active job.
    ///
    /// The text is normalized first; if nothing remains, the call has no
    /// effect. Otherwise the current playback is cut and a new job starts
    /// in the background. Returns immediately.
    pub fn speak(&self, text: &str) {
        let text = normalize_text(text);
        if text.is_empty() {
            debug!("Nothing to speak after normalization");
            return;
        }

        let job_id = {
            let mut generation = self.generation.lock();
            *generation += 1;
            *generation
        };
        self.player.abort();
        self.status.set_status("Speaking...");
        info!("Job {} queued ({} chars)", job_id, text.chars().count());

        let job = Job {
            id: job_id,
            synthesizer: Arc::clone(&self.synthesizer),
            player: Arc::clone(&self.player),
            status: Arc::clone(&self.status),
            generation: Arc::clone(&self.generation),
            max_chunk_chars: self.config.max_chunk_chars,
        };
        thread::spawn(move || job.run(&text));
    }
}

/// One pipeline run bound to a single generation.
struct Job {
    id: u64,
    synthesizer: Arc<dyn Synthesizer>,
    player: Arc<dyn Player>,
    status: Arc<dyn StatusSink>,
    generation: Arc<Mutex<u64>>,
    max_chunk_chars: usize,
}

impl Job {
    fn run(self, text: &str) {
        self.execute(text);

        // A stale job must not clobber a newer job's status.
        if self.is_current() {
            self.status.set_status("Ready");
        }
    }

    fn execute(&self, text: &str) {
        let chunks: Vec<String> = chunk_text(text, self.max_chunk_chars)
            .map(str::to_owned)
            .collect();
        if chunks.is_empty() {
            return;
        }
        debug!("Job {} speaking {} chunk(s)", self.id, chunks.len());

        if !self.is_current() {
            return;
        }
        let mut current = match self.synthesizer.synthesize(&chunks[0]) {
            Ok(clip) => clip,
            Err(e) => return self.report_synthesis_failure(&e),
        };
        if !self.is_current() {
            // A newer request took over while we synthesized; drop the clip.
            return;
        }

        for i in 0..chunks.len() {
            if !self.is_current() {
                return;
            }

            // Single-slot prefetch: synthesize the next chunk while this
            // one plays.
            let prefetch = chunks.get(i + 1).map(|next| {
                let synthesizer = Arc::clone(&self.synthesizer);
                let next = next.clone();
                thread::spawn(move || synthesizer.synthesize(&next))
            });

            let played = self.player.play(current);
            if !self.is_current() {
                // Aborted by a stop or a newer speak. The prefetch, if any,
                // runs to completion detached and its result is dropped.
                return;
            }
            if let Err(e) = played {
                error!("Audio playback failed: {}", e);
                self.status
                    .set_error(&format!("Audio playback failed: {}", e.detail()));
                return;
            }

            let Some(handle) = prefetch else {
                return;
            };
            let next = handle.join().unwrap_or_else(|_| {
                Err(ReadAloudError::SynthesisError(
                    "Synthesis thread panicked".into(),
                ))
            });
            if !self.is_current() {
                return;
            }
            current = match next {
                Ok(clip) => clip,
                Err(e) => return self.report_synthesis_failure(&e),
            };
        }
    }

    fn report_synthesis_failure(&self, e: &ReadAloudError) {
        // A superseded job has already lost the right to report.
        if !self.is_current() {
            return;
        }
        error!("TTS synthesis failed: {}", e);
        self.status
            .set_error(&format!("TTS failed: {}", e.detail()));
    }

    fn is_current(&self) -> bool {
        *self.generation.lock() == self.id
    }
}
