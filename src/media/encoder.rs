use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::graph::SourceNode;

/// Output container format produced by the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Ogg,
    Mp3,
}

impl AudioFormat {
    /// File extension used in generated output titles
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
        }
    }
}

/// Encoder configuration, fixed for the lifetime of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSettings {
    /// Output container format
    pub format: AudioFormat,

    /// Number of capture channels (mp3 encoding supports only 2)
    pub channels: u16,

    /// Hard cap on recording duration
    pub time_limit: Duration,

    /// Encode after capture finishes instead of streaming into the codec
    pub encode_after_record: bool,

    /// Ogg quality, 0.0 to 1.0
    pub ogg_quality: f32,

    /// Mp3 bit rate in kbit/s
    pub mp3_bit_rate: u32,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            format: AudioFormat::Ogg,
            channels: 2,
            time_limit: Duration::from_secs(120),
            encode_after_record: true,
            ogg_quality: 0.5,
            mp3_bit_rate: 160,
        }
    }
}

type HookFn = Arc<dyn Fn(AudioFormat) + Send + Sync>;

/// Codec loading notifications surfaced by encoder implementations
///
/// Some codecs load lazily (worker scripts, shared libraries); the hooks
/// let a caller show progress. The defaults log through `tracing`.
#[derive(Clone)]
pub struct EncoderHooks {
    pub on_loading: HookFn,
    pub on_loaded: HookFn,
}

impl Default for EncoderHooks {
    fn default() -> Self {
        Self {
            on_loading: Arc::new(|format| info!("Loading {:?} encoder", format)),
            on_loaded: Arc::new(|format| info!("{:?} encoder loaded", format)),
        }
    }
}

impl fmt::Debug for EncoderHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderHooks").finish_non_exhaustive()
    }
}

/// A live encoder bound to a source node for one capture session
#[async_trait::async_trait]
pub trait AudioEncoder: Send {
    /// Begin pulling frames from the source node
    fn start(&mut self) -> Result<()>;

    /// Finalize the capture and return the encoded container bytes
    ///
    /// Consumes the encoder: a session never reuses one across captures.
    async fn finish(self: Box<Self>) -> Result<Vec<u8>>;
}

/// Constructs encoders bound to a source node
pub trait EncoderFactory: Send + Sync {
    fn create(
        &self,
        source: &mut dyn SourceNode,
        settings: &EncoderSettings,
        hooks: &EncoderHooks,
    ) -> Result<Box<dyn AudioEncoder>>;
}
