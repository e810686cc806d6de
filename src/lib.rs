pub mod media;
pub mod session;

pub use media::{
    AudioContext, AudioEncoder, AudioFormat, AudioGraph, AudioTrack, EncoderFactory, EncoderHooks,
    EncoderSettings, MediaAccess, MediaStream, SourceNode, StreamConstraints,
};
pub use session::{
    format_elapsed, Platform, RecordedAudio, RecordingFailure, RecordingSession, SessionConfig,
};
