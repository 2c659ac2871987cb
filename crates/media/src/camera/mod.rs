//! Camera acquisition and session lifecycle

mod backend;
mod session;
mod sink;

pub use backend::{
    AcquisitionError, CameraBackend, MediaStream, Resolution, SimulatedCamera,
    StreamConstraints, VideoTrack,
};
pub use session::{CameraConfig, CameraSessionManager, CameraState};
pub use sink::{SimulatedSink, SinkError, VideoSink};
