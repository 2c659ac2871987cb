//! Camera session lifecycle
//!
//! The session manager owns at most one live stream at a time. Acquisition
//! walks a three-level constraint fallback chain, then waits (bounded) for
//! the video sink to report readiness. A release or a newer acquisition
//! abandons any in-flight attempt via a generation counter; the abandoned
//! attempt stops whatever stream it obtained and reports
//! [`AcquireError::Cancelled`] without touching session state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use wayfinder_core::{AcquireError, CameraError, Facing};

use super::backend::{
    AcquisitionError, CameraBackend, MediaStream, Resolution, SimulatedCamera, StreamConstraints,
};
use super::sink::{SimulatedSink, SinkError, VideoSink};

/// Observable camera session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraState {
    /// No stream held, nothing in flight
    Idle,
    /// Acquisition in progress
    Requesting,
    /// Stream live and rendering
    Active,
    /// Permission denied by the user; never retried automatically
    Denied,
    /// No capture device present; never retried automatically
    Unavailable,
    /// Any other classified failure
    Error(CameraError),
}

impl CameraState {
    fn for_error(err: &CameraError) -> Self {
        match err {
            CameraError::PermissionDenied => Self::Denied,
            CameraError::NoCameraFound => Self::Unavailable,
            other => Self::Error(other.clone()),
        }
    }

    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, Self::Denied | Self::Unavailable | Self::Error(_))
    }
}

/// Acquisition parameters
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub preferred_facing: Facing,
    pub ideal: Resolution,
    pub min: Resolution,
    /// Bound on the wait for sink readiness after a stream is granted
    pub ready_timeout: Duration,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            preferred_facing: Facing::Environment,
            ideal: Resolution::new(1280, 720),
            min: Resolution::new(640, 480),
            ready_timeout: Duration::from_millis(5_000),
        }
    }
}

/// Exclusive owner of the camera stream
pub struct CameraSessionManager {
    backend: Arc<dyn CameraBackend>,
    sink: Arc<dyn VideoSink>,
    config: CameraConfig,
    state: RwLock<CameraState>,
    stream: Mutex<Option<MediaStream>>,
    facing: RwLock<Facing>,
    generation: AtomicU64,
}

impl CameraSessionManager {
    pub fn new(
        backend: Arc<dyn CameraBackend>,
        sink: Arc<dyn VideoSink>,
        config: CameraConfig,
    ) -> Self {
        let facing = config.preferred_facing;
        Self {
            backend,
            sink,
            config,
            state: RwLock::new(CameraState::Idle),
            stream: Mutex::new(None),
            facing: RwLock::new(facing),
            generation: AtomicU64::new(0),
        }
    }

    /// Manager backed by an always-granting simulated camera and an
    /// immediately-ready sink
    pub fn simple(config: CameraConfig) -> Self {
        Self::new(
            Arc::new(SimulatedCamera::granting()),
            Arc::new(SimulatedSink::ready()),
            config,
        )
    }

    pub fn state(&self) -> CameraState {
        self.state.read().clone()
    }

    pub fn facing(&self) -> Facing {
        *self.facing.read()
    }

    pub fn is_active(&self) -> bool {
        matches!(*self.state.read(), CameraState::Active)
    }

    /// Whether the rendered frame should be mirrored for the current facing
    pub fn is_mirrored(&self) -> bool {
        self.facing().is_mirrored()
    }

    pub fn stream_id(&self) -> Option<u64> {
        self.stream.lock().as_ref().map(|s| s.id())
    }

    /// Acquire a stream with the given facing preference
    ///
    /// Any previously held stream is stopped first; the manager never holds
    /// two streams. Constraint levels are tried strictest-first and every
    /// level is attempted before a failure is surfaced.
    pub async fn acquire(&self, facing: Facing) -> Result<(), AcquireError> {
        // Taking a new generation abandons any in-flight acquisition
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.teardown();
        *self.facing.write() = facing;

        if !self.backend.api_supported() {
            return Err(self.fail(generation, CameraError::ApiUnsupported));
        }
        if !self.backend.secure_context() {
            return Err(self.fail(generation, CameraError::InsecureContext));
        }

        self.set_state(generation, CameraState::Requesting);
        tracing::debug!(?facing, "requesting camera stream");

        let levels = [
            StreamConstraints::full(facing, self.config.ideal, self.config.min),
            StreamConstraints::facing_only(facing),
            StreamConstraints::any(),
        ];

        let mut last_err = None;
        let mut stream = None;
        for constraints in levels {
            match self.backend.open(constraints).await {
                Ok(granted) => {
                    stream = Some(granted);
                    break;
                }
                Err(err) => {
                    tracing::warn!(?constraints, %err, "camera constraint level failed");
                    last_err = Some(err);
                }
            }
            if self.abandoned(generation) {
                return Err(AcquireError::Cancelled);
            }
        }

        let stream = match stream {
            Some(stream) => stream,
            None => {
                // The chain always records an error before exhausting
                let raw = last_err.unwrap_or(AcquisitionError::NotSupported);
                return Err(self.fail(generation, raw.classify()));
            }
        };

        if self.abandoned(generation) {
            stream.stop_all();
            return Err(AcquireError::Cancelled);
        }

        match tokio::time::timeout(self.config.ready_timeout, self.sink.attach(&stream)).await {
            Err(_elapsed) => {
                stream.stop_all();
                return Err(self.fail(
                    generation,
                    CameraError::Unknown("video sink never reported readiness".to_string()),
                ));
            }
            Ok(Err(SinkError::PlaybackFailed(reason))) => {
                stream.stop_all();
                return Err(self.fail(generation, CameraError::Unknown(reason)));
            }
            Ok(Ok(())) => {}
        }

        if self.abandoned(generation) {
            stream.stop_all();
            self.sink.detach();
            return Err(AcquireError::Cancelled);
        }

        if let Some(granted_facing) = stream.facing() {
            *self.facing.write() = granted_facing;
        }
        *self.stream.lock() = Some(stream);
        self.set_state(generation, CameraState::Active);
        tracing::info!(?facing, "camera session active");
        Ok(())
    }

    /// Stop the held stream, detach the sink, and abandon anything in flight
    pub fn release(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.teardown();
        *self.state.write() = CameraState::Idle;
        tracing::debug!("camera session released");
    }

    /// Tear down the current stream and acquire with a different facing
    pub async fn switch_facing(&self, facing: Facing) -> Result<(), AcquireError> {
        self.acquire(facing).await
    }

    /// Manually retry acquisition with the current facing preference
    pub async fn retry(&self) -> Result<(), AcquireError> {
        let facing = self.facing();
        self.acquire(facing).await
    }

    fn teardown(&self) {
        if let Some(stream) = self.stream.lock().take() {
            let stopped = stream.stop_all();
            tracing::debug!(stopped, "stopped camera tracks");
        }
        self.sink.detach();
    }

    fn abandoned(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    fn set_state(&self, generation: u64, state: CameraState) {
        if !self.abandoned(generation) {
            *self.state.write() = state;
        }
    }

    fn fail(&self, generation: u64, err: CameraError) -> AcquireError {
        tracing::warn!(%err, retriable = err.is_retriable(), "camera acquisition failed");
        self.set_state(generation, CameraState::for_error(&err));
        AcquireError::Camera(err)
    }
}
