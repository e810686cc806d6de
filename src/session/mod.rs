//! Recording session management
//!
//! This module provides the `RecordingSession` abstraction that manages:
//! - Microphone stream acquisition and guaranteed release
//! - Encoder lifecycle for a single capture
//! - Elapsed-time notifications while a capture is active
//! - Result and failure publication

mod clock;
mod config;
mod events;
mod session;

pub use clock::format_elapsed;
pub use config::SessionConfig;
pub use events::{RecordedAudio, RecordingFailure};
pub use session::{Platform, RecordingSession};
