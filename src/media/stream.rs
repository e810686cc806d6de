use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Constraints passed to the media-access request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConstraints {
    /// Request audio capture
    pub audio: bool,
    /// Request video capture (always false for this component)
    pub video: bool,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: false,
        }
    }
}

/// A single capture track on an acquired stream
pub trait AudioTrack: Send {
    /// Stop the track, releasing the underlying hardware resource
    fn stop(&mut self);

    /// Whether the track is still delivering audio
    fn is_live(&self) -> bool;
}

/// A live stream granted by the platform's media-access primitive
pub trait MediaStream: Send {
    /// The audio tracks carried by this stream
    fn audio_tracks(&mut self) -> &mut [Box<dyn AudioTrack>];
}

/// Platform primitive that turns a permission grant into a live audio stream
///
/// Implementations wrap whatever the platform offers (a capture API, a
/// permission dialog, a virtual device). The request suspends until the
/// grant resolves and fails on permission denial, missing device, or busy
/// hardware.
#[async_trait::async_trait]
pub trait MediaAccess: Send + Sync {
    /// Request a stream matching the given constraints
    async fn request_audio_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn MediaStream>>;
}
