use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use readaloud::audio::CpalPlayer;
use readaloud::speech::{OpenAiTts, Speaker, TtsConfig};
use readaloud::status::{ChannelStatusSink, StatusEvent, StatusSink};
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "readaloud=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting read-aloud tool");

    let config = TtsConfig::from_env().context("TTS configuration")?;
    let synthesizer = Arc::new(OpenAiTts::new(config).context("TTS initialization")?);
    let player = Arc::new(CpalPlayer::new().context("Audio output initialization")?);

    let (status_tx, status_rx) = unbounded();
    let status = Arc::new(ChannelStatusSink::new(status_tx));

    thread::spawn(move || {
        for event in status_rx {
            match event {
                StatusEvent::Status(message) => println!("* {}", message),
                StatusEvent::Error(message) => eprintln!("! {}", message),
            }
        }
    });

    status.set_status("Ready");
    let speaker = Speaker::new(synthesizer, player, status);

    // Each input line is spoken; /stop cuts playback; /test speaks a fixed
    // sentence; /quit or end of input exits.
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            "" => {}
            "/quit" => break,
            "/stop" => speaker.stop(),
            "/test" => speaker.speak("This is a test of the read aloud tool."),
            text => speaker.speak(text),
        }
    }

    speaker.stop();
    info!("Read-aloud tool exiting");
    Ok(())
}
