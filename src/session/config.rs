use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::media::{EncoderSettings, StreamConstraints};

/// Configuration for a recording session component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "capture-2026-08-30-standup")
    pub session_id: String,

    /// Constraints passed to the media-access request (audio-only by default)
    pub constraints: StreamConstraints,

    /// Encoder configuration applied to every capture of this component
    pub encoder: EncoderSettings,

    /// Interval between elapsed-time notifications
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("capture-{}", uuid::Uuid::new_v4()),
            constraints: StreamConstraints::default(),
            encoder: EncoderSettings::default(),
            tick_interval: Duration::from_secs(1),
        }
    }
}
