//! Status reporting from the speech pipeline to whoever is watching

use crossbeam_channel::Sender;

/// Where the pipeline reports its lifecycle. Both calls are fire-and-forget
/// and may arrive from any thread.
pub trait StatusSink: Send + Sync {
    fn set_status(&self, message: &str);
    fn set_error(&self, message: &str);
}

/// Event emitted by the speech pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// Lifecycle update ("Speaking...", "Stopped", "Ready")
    Status(String),

    /// A job failed; carries a human-readable detail
    Error(String),
}

/// Status sink forwarding events over a crossbeam channel.
///
/// Send failures are ignored: a dropped receiver means nobody is watching.
pub struct ChannelStatusSink {
    tx: Sender<StatusEvent>,
}

impl ChannelStatusSink {
    pub fn new(tx: Sender<StatusEvent>) -> Self {
        Self { tx }
    }
}

impl StatusSink for ChannelStatusSink {
    fn set_status(&self, message: &str) {
        let _ = self.tx.send(StatusEvent::Status(message.to_string()));
    }

    fn set_error(&self, message: &str) {
        let _ = self.tx.send(StatusEvent::Error(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_events_are_forwarded_in_order() {
        let (tx, rx) = unbounded();
        let sink = ChannelStatusSink::new(tx);

        sink.set_status("Speaking...");
        sink.set_error("TTS failed: boom");
        sink.set_status("Ready");

        assert_eq!(rx.try_recv(), Ok(StatusEvent::Status("Speaking...".into())));
        assert_eq!(rx.try_recv(), Ok(StatusEvent::Error("TTS failed: boom".into())));
        assert_eq!(rx.try_recv(), Ok(StatusEvent::Status("Ready".into())));
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (tx, rx) = unbounded();
        drop(rx);

        let sink = ChannelStatusSink::new(tx);
        sink.set_status("Ready");
    }
}
