//! Device media layer: camera session lifecycle and speech I/O
//!
//! This crate owns the two contended device resources of the navigation
//! engine:
//! - the camera video stream (exclusive, non-reentrant, torn down on every
//!   facing switch and session end), and
//! - the speech-synthesis output (last-write-wins; a new utterance always
//!   interrupts the one in progress).
//!
//! All platform-level failures are classified here, at the boundary; nothing
//! downstream ever inspects a raw device error.

pub mod camera;
pub mod speech;

pub use camera::{
    AcquisitionError, CameraBackend, CameraConfig, CameraSessionManager, CameraState,
    MediaStream, Resolution, SimulatedCamera, SimulatedSink, SinkError, StreamConstraints,
    VideoSink, VideoTrack,
};
pub use speech::{
    MemorySynthesizer, SpeechEvent, SpeechSynthesizer, TextSubmission, Utterance,
};
