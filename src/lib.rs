pub mod audio;
pub mod speech;
pub mod status;
pub mod text;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ReadAloudError {
    #[error("Synthesis error: {0}")]
    SynthesisError(String),

    #[error("Playback error: {0}")]
    PlaybackError(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ReadAloudError {
    fn from(e: std::io::Error) -> Self {
        ReadAloudError::IoError(e.to_string())
    }
}

impl ReadAloudError {
    /// The human-readable detail carried by this error, without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            ReadAloudError::SynthesisError(d)
            | ReadAloudError::PlaybackError(d)
            | ReadAloudError::AudioDeviceError(d)
            | ReadAloudError::AudioProcessingError(d)
            | ReadAloudError::ConfigError(d)
            | ReadAloudError::IoError(d) => d,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReadAloudError>;
