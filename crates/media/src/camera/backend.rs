//! Camera backend abstraction
//!
//! A [`CameraBackend`] hands out exclusive [`MediaStream`]s in response to
//! constraint requests. Failures come back as raw [`AcquisitionError`]s named
//! after the platform error classes; [`AcquisitionError::classify`] folds them
//! into the engine-level [`CameraError`] taxonomy exactly once, at this
//! boundary.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;

use wayfinder_core::{CameraError, Facing};

/// Capture resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One level of the acquisition fallback chain
///
/// The session manager relaxes constraints in three steps: ideal facing plus
/// resolution bounds, facing only, then any camera at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    /// Requested facing mode; `None` accepts any camera
    pub facing: Option<Facing>,

    /// Ideal resolution, if this level constrains it
    pub ideal: Option<Resolution>,

    /// Minimum acceptable resolution, if this level constrains it
    pub min: Option<Resolution>,
}

impl StreamConstraints {
    /// Strictest level: facing plus resolution bounds
    pub fn full(facing: Facing, ideal: Resolution, min: Resolution) -> Self {
        Self {
            facing: Some(facing),
            ideal: Some(ideal),
            min: Some(min),
        }
    }

    /// Middle level: facing only
    pub fn facing_only(facing: Facing) -> Self {
        Self {
            facing: Some(facing),
            ideal: None,
            min: None,
        }
    }

    /// Loosest level: any camera
    pub fn any() -> Self {
        Self {
            facing: None,
            ideal: None,
            min: None,
        }
    }
}

/// Raw platform-level acquisition failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("permission not granted")]
    NotAllowed,

    #[error("no capture device found")]
    NotFound,

    #[error("device is not readable")]
    NotReadable,

    #[error("constraints cannot be satisfied")]
    Overconstrained,

    #[error("capture is not supported")]
    NotSupported,

    #[error("acquisition failed: {0}")]
    Other(String),
}

impl AcquisitionError {
    /// Fold a raw platform failure into the engine-level error taxonomy
    pub fn classify(&self) -> CameraError {
        match self {
            Self::NotAllowed => CameraError::PermissionDenied,
            Self::NotFound => CameraError::NoCameraFound,
            Self::NotReadable => CameraError::CameraInUse,
            Self::Overconstrained => CameraError::ConstraintsUnsupported,
            Self::NotSupported => CameraError::ApiUnsupported,
            Self::Other(reason) => CameraError::Unknown(reason.clone()),
        }
    }
}

/// A single video track within a stream
///
/// Stopping is idempotent; the shared flag lets the backend that issued the
/// track observe teardown.
#[derive(Debug, Clone)]
pub struct VideoTrack {
    id: u64,
    stopped: Arc<AtomicBool>,
}

impl VideoTrack {
    fn new(id: u64) -> Self {
        Self {
            id,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop the track. Returns true if this call did the stopping.
    pub fn stop(&self) -> bool {
        !self.stopped.swap(true, Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// An exclusive live video stream
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: u64,
    facing: Option<Facing>,
    tracks: Vec<VideoTrack>,
}

impl MediaStream {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Facing mode of the camera actually granted, when known
    pub fn facing(&self) -> Option<Facing> {
        self.facing
    }

    pub fn tracks(&self) -> &[VideoTrack] {
        &self.tracks
    }

    /// Stop every track. Returns how many tracks this call stopped.
    pub fn stop_all(&self) -> usize {
        self.tracks.iter().filter(|t| t.stop()).count()
    }
}

/// Source of exclusive camera streams
#[async_trait]
pub trait CameraBackend: Send + Sync {
    /// Whether the platform exposes a capture API at all
    fn api_supported(&self) -> bool {
        true
    }

    /// Whether the execution context is secure enough for capture
    fn secure_context(&self) -> bool {
        true
    }

    /// Request a stream satisfying the given constraint level
    async fn open(&self, constraints: StreamConstraints) -> Result<MediaStream, AcquisitionError>;
}

/// In-memory camera backend with a scriptable response sequence
///
/// Each `open` call consumes the next scripted response; once the script is
/// exhausted every call is granted. The backend records the constraint level
/// of every attempt and keeps handles to every track it has issued, so tests
/// can verify both the fallback order and exclusive-stream teardown.
pub struct SimulatedCamera {
    script: Mutex<Vec<Result<(), AcquisitionError>>>,
    open_log: Mutex<Vec<StreamConstraints>>,
    issued: Mutex<Vec<VideoTrack>>,
    next_id: AtomicU64,
    api_supported: bool,
    secure_context: bool,
}

impl SimulatedCamera {
    /// A backend that grants every request
    pub fn granting() -> Self {
        Self::with_script(Vec::new())
    }

    /// A backend that replies with the given responses in order, then grants
    pub fn with_script(script: Vec<Result<(), AcquisitionError>>) -> Self {
        Self {
            // Popped from the back, so store in reverse
            script: Mutex::new(script.into_iter().rev().collect()),
            open_log: Mutex::new(Vec::new()),
            issued: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            api_supported: true,
            secure_context: true,
        }
    }

    /// A backend on a platform without a capture API
    pub fn unsupported() -> Self {
        Self {
            api_supported: false,
            ..Self::granting()
        }
    }

    /// A backend in an insecure execution context
    pub fn insecure() -> Self {
        Self {
            secure_context: false,
            ..Self::granting()
        }
    }

    /// Constraint levels of every `open` attempt so far
    pub fn open_log(&self) -> Vec<StreamConstraints> {
        self.open_log.lock().clone()
    }

    /// Total number of tracks handed out
    pub fn issued_track_count(&self) -> usize {
        self.issued.lock().len()
    }

    /// Number of handed-out tracks that have since been stopped
    pub fn stopped_track_count(&self) -> usize {
        self.issued.lock().iter().filter(|t| t.is_stopped()).count()
    }
}

#[async_trait]
impl CameraBackend for SimulatedCamera {
    fn api_supported(&self) -> bool {
        self.api_supported
    }

    fn secure_context(&self) -> bool {
        self.secure_context
    }

    async fn open(&self, constraints: StreamConstraints) -> Result<MediaStream, AcquisitionError> {
        self.open_log.lock().push(constraints);

        if let Some(response) = self.script.lock().pop() {
            response?;
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let track = VideoTrack::new(id);
        self.issued.lock().push(track.clone());

        Ok(MediaStream {
            id,
            facing: constraints.facing,
            tracks: vec![track],
        })
    }
}
