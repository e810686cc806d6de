pub mod encoder;
pub mod graph;
pub mod stream;

pub use encoder::{AudioEncoder, AudioFormat, EncoderFactory, EncoderHooks, EncoderSettings};
pub use graph::{AudioContext, AudioGraph, SourceNode};
pub use stream::{AudioTrack, MediaAccess, MediaStream, StreamConstraints};
