use anyhow::Result;

use super::stream::MediaStream;

/// Source node wrapping a live stream inside an audio graph
///
/// The node keeps its owning context alive. The session holds it for the
/// duration of the capture and drops it during teardown.
pub trait SourceNode: Send {}

/// An audio graph context able to wrap a stream as a source node
pub trait AudioContext: Send {
    /// Wrap the stream as a source node, consuming the context
    ///
    /// A context produces exactly one source node per session.
    fn create_source_node(
        self: Box<Self>,
        stream: &mut dyn MediaStream,
    ) -> Result<Box<dyn SourceNode>>;
}

/// Factory for audio graph contexts
///
/// A fresh context is created after each stream grant: the device sample
/// rate is not known until capture is allowed to start.
pub trait AudioGraph: Send + Sync {
    fn create_context(&self) -> Result<Box<dyn AudioContext>>;
}
