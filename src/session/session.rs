use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info, warn};

use super::clock::format_elapsed;
use super::config::SessionConfig;
use super::events::{RecordedAudio, RecordingFailure, SessionEvents};
use crate::media::{
    AudioEncoder, AudioGraph, EncoderFactory, EncoderHooks, EncoderSettings, MediaAccess,
    MediaStream, SourceNode,
};

/// Characters kept verbatim in generated titles: the unreserved set of
/// `encodeURIComponent`, so titles are safe as filenames and URL segments.
const TITLE_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Platform collaborators injected at session construction
#[derive(Clone)]
pub struct Platform {
    /// Turns a permission grant into a live audio stream
    pub media: Arc<dyn MediaAccess>,

    /// Builds audio graph contexts and source nodes
    pub graph: Arc<dyn AudioGraph>,

    /// Constructs encoders bound to a source node
    pub encoders: Arc<dyn EncoderFactory>,

    /// Codec loading notifications passed through to each encoder
    pub encoder_hooks: EncoderHooks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Acquisition request in flight. Reserves the session so a second
    /// start cannot issue a duplicate request.
    Starting,
    Active,
}

/// Mutable session state. The lock is never held across an await point.
struct Inner {
    phase: Phase,
    started_at: Option<Instant>,
    stream: Option<Box<dyn MediaStream>>,
    source_node: Option<Box<dyn SourceNode>>,
    encoder: Option<Box<dyn AudioEncoder>>,
    ticker: Option<JoinHandle<()>>,
}

/// A recording session component that manages microphone capture, elapsed
/// time notifications, and result publication
///
/// At most one capture is active per component instance. Commands return
/// immediately; outcomes arrive on the subscribed channels.
pub struct RecordingSession {
    config: SessionConfig,
    platform: Platform,
    events: Arc<SessionEvents>,
    inner: Arc<Mutex<Inner>>,
}

impl RecordingSession {
    /// Create a new recording session component
    pub fn new(config: SessionConfig, platform: Platform) -> Self {
        info!("Creating recording session: {}", config.session_id);

        Self {
            config,
            platform,
            events: Arc::new(SessionEvents::new()),
            inner: Arc::new(Mutex::new(Inner {
                phase: Phase::Idle,
                started_at: None,
                stream: None,
                source_node: None,
                encoder: None,
                ticker: None,
            })),
        }
    }

    /// Subscribe to finished recordings (one emission per successful capture)
    pub fn subscribe_recorded(&self) -> broadcast::Receiver<RecordedAudio> {
        self.events.subscribe_recorded()
    }

    /// Subscribe to `mm:ss` elapsed-time notifications
    pub fn subscribe_time(&self) -> broadcast::Receiver<String> {
        self.events.subscribe_time()
    }

    /// Subscribe to capture/encoding failure notifications
    pub fn subscribe_failed(&self) -> broadcast::Receiver<RecordingFailure> {
        self.events.subscribe_failed()
    }

    /// Whether a capture is currently active
    pub fn is_active(&self) -> bool {
        self.inner.lock().unwrap().phase == Phase::Active
    }

    /// Start a capture
    ///
    /// Ignored if a capture is already starting or active; a double-click
    /// must not corrupt an in-flight session. Emits an initial `00:00`
    /// before the stream request is issued, then acquires the stream,
    /// builds the encoder pipeline, and starts the ticker. Acquisition
    /// failure is reported on the failure channel, never raised.
    pub fn start_recording(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.phase != Phase::Idle {
                warn!("Recording already started");
                return;
            }
            inner.phase = Phase::Starting;
        }

        info!("Starting recording session: {}", self.config.session_id);
        self.events.emit_time(format_elapsed(Duration::ZERO));

        let platform = self.platform.clone();
        let constraints = self.config.constraints.clone();
        let settings = self.config.encoder.clone();
        let tick_interval = self.config.tick_interval;
        let events = Arc::clone(&self.events);
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let stream = match platform.media.request_audio_stream(&constraints).await {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("Audio stream acquisition failed: {:#}", e);
                    inner.lock().unwrap().phase = Phase::Idle;
                    events.emit_failed(RecordingFailure::Acquisition);
                    return;
                }
            };

            info!("Audio stream acquired, initializing encoder");

            match Self::activate(stream, &platform, &settings, tick_interval, &events, &inner) {
                Ok(()) => info!("Recording started"),
                Err(e) => {
                    warn!("Encoder pipeline initialization failed: {:#}", e);
                    events.emit_failed(RecordingFailure::Acquisition);
                }
            }
        });
    }

    /// Stop the capture and publish the encoded result
    ///
    /// No-op if no capture is active. Finalizes the encoder in the
    /// background; on success the blob is published with a generated
    /// `audio_<epoch-millis>` title, on failure the failure channel fires.
    /// Either way every acquired resource is released.
    pub fn stop_recording(&self) {
        let encoder = self.inner.lock().unwrap().encoder.take();
        let encoder = match encoder {
            Some(encoder) => encoder,
            None => return,
        };

        info!("Stopping recording session: {}", self.config.session_id);

        let extension = self.config.encoder.format.extension();
        let events = Arc::clone(&self.events);
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            match encoder.finish().await {
                Ok(blob) => {
                    let started = {
                        let mut inner = inner.lock().unwrap();
                        let started = inner.started_at.is_some();
                        Self::release(&mut inner);
                        started
                    };

                    // A stop that raced ahead of start completion has no
                    // recording to publish.
                    if started {
                        let title = output_title(extension);
                        info!("Recording finished: {}", title);
                        events.emit_recorded(RecordedAudio { blob, title });
                    }
                }
                Err(e) => {
                    error!("Encoder finalize failed: {:#}", e);
                    Self::release(&mut inner.lock().unwrap());
                    events.emit_failed(RecordingFailure::Encoding);
                }
            }
        });
    }

    /// Discard an in-progress capture
    ///
    /// Releases every acquired resource without finalizing the encoder and
    /// publishes nothing on any channel.
    pub fn abort_recording(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.phase != Phase::Active {
            return;
        }

        info!("Aborting recording session: {}", self.config.session_id);
        Self::release(&mut inner);
    }

    /// Build the encoder pipeline for an acquired stream and go Active
    ///
    /// Any error past this point counts as an acquisition failure: the
    /// stream was already granted, so its tracks are stopped before the
    /// failure is reported.
    fn activate(
        mut stream: Box<dyn MediaStream>,
        platform: &Platform,
        settings: &EncoderSettings,
        tick_interval: Duration,
        events: &Arc<SessionEvents>,
        inner: &Arc<Mutex<Inner>>,
    ) -> Result<()> {
        match Self::build_pipeline(stream.as_mut(), platform, settings) {
            Ok((source_node, encoder)) => {
                let started_at = Instant::now();
                let ticker = Self::spawn_ticker(started_at, tick_interval, Arc::clone(events));

                let mut inner = inner.lock().unwrap();
                inner.phase = Phase::Active;
                inner.started_at = Some(started_at);
                inner.stream = Some(stream);
                inner.source_node = Some(source_node);
                inner.encoder = Some(encoder);
                inner.ticker = Some(ticker);
                Ok(())
            }
            Err(e) => {
                for track in stream.audio_tracks() {
                    track.stop();
                }
                inner.lock().unwrap().phase = Phase::Idle;
                Err(e)
            }
        }
    }

    fn build_pipeline(
        stream: &mut dyn MediaStream,
        platform: &Platform,
        settings: &EncoderSettings,
    ) -> Result<(Box<dyn SourceNode>, Box<dyn AudioEncoder>)> {
        let context = platform
            .graph
            .create_context()
            .context("Failed to create audio graph context")?;

        let mut source_node = context
            .create_source_node(stream)
            .context("Failed to wrap stream as source node")?;

        let mut encoder = platform
            .encoders
            .create(source_node.as_mut(), settings, &platform.encoder_hooks)
            .context("Failed to construct encoder")?;

        encoder.start().context("Failed to start encoder")?;

        Ok((source_node, encoder))
    }

    /// Publish `mm:ss` once per tick interval until aborted
    fn spawn_ticker(
        started_at: Instant,
        period: Duration,
        events: Arc<SessionEvents>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(started_at + period, period);
            loop {
                interval.tick().await;
                events.emit_time(format_elapsed(started_at.elapsed()));
            }
        })
    }

    /// Shared teardown for every exit path
    ///
    /// Idempotent: a second call finds every field already cleared. The
    /// ticker is aborted while the state lock is held, so no tick lands
    /// after teardown.
    fn release(inner: &mut Inner) {
        inner.phase = Phase::Idle;
        inner.encoder = None;
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
        inner.started_at = None;
        inner.source_node = None;
        if let Some(mut stream) = inner.stream.take() {
            for track in stream.audio_tracks() {
                track.stop();
            }
            info!("Capture stream released");
        }
    }
}

/// Generated filename for a finished recording, unique via epoch millis
fn output_title(extension: &str) -> String {
    let name = format!("audio_{}.{}", Utc::now().timestamp_millis(), extension);
    utf8_percent_encode(&name, TITLE_SAFE).to_string()
}
