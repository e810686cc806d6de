use tokio::sync::broadcast;

/// Buffer depth for each notification channel. A slow subscriber that falls
/// further behind than this observes a lag error, not a stalled session.
const CHANNEL_CAPACITY: usize = 64;

/// A finished, encoded recording artifact
#[derive(Debug, Clone)]
pub struct RecordedAudio {
    /// Encoded container bytes
    pub blob: Vec<u8>,

    /// Generated filename, percent-encoded for filesystem safety
    pub title: String,
}

/// Why a session ended without producing a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingFailure {
    /// The media-access request was rejected (permission denied, no input
    /// device, hardware busy). Nothing was acquired.
    Acquisition,

    /// The encoder's finalize path reported failure after capture started.
    Encoding,
}

/// Fan-out channels for session notifications
///
/// Subscribing hands back a receiver; dropping it unsubscribes. Emissions
/// with no live receivers are discarded.
pub(crate) struct SessionEvents {
    recorded: broadcast::Sender<RecordedAudio>,
    time: broadcast::Sender<String>,
    failed: broadcast::Sender<RecordingFailure>,
}

impl SessionEvents {
    pub(crate) fn new() -> Self {
        let (recorded, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (time, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (failed, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            recorded,
            time,
            failed,
        }
    }

    pub(crate) fn subscribe_recorded(&self) -> broadcast::Receiver<RecordedAudio> {
        self.recorded.subscribe()
    }

    pub(crate) fn subscribe_time(&self) -> broadcast::Receiver<String> {
        self.time.subscribe()
    }

    pub(crate) fn subscribe_failed(&self) -> broadcast::Receiver<RecordingFailure> {
        self.failed.subscribe()
    }

    pub(crate) fn emit_recorded(&self, output: RecordedAudio) {
        let _ = self.recorded.send(output);
    }

    pub(crate) fn emit_time(&self, time: String) {
        let _ = self.time.send(time);
    }

    pub(crate) fn emit_failed(&self, failure: RecordingFailure) {
        let _ = self.failed.send(failure);
    }
}
