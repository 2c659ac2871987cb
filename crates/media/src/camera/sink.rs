//! Video sink readiness
//!
//! Acquisition is not complete when a stream is granted: the session only
//! counts as live once the sink consuming the stream reports that playback
//! actually started. The session manager bounds that wait with a timeout.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;

use super::backend::MediaStream;

/// Sink-side playback failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("playback failed: {0}")]
    PlaybackFailed(String),
}

/// Consumer of a live camera stream
#[async_trait]
pub trait VideoSink: Send + Sync {
    /// Attach the stream and resolve once the first frame has rendered
    async fn attach(&self, stream: &MediaStream) -> Result<(), SinkError>;

    /// Drop the attached stream, if any
    fn detach(&self);

    /// Stream currently attached, if any
    fn attached_stream(&self) -> Option<u64>;
}

/// In-memory sink with a configurable readiness delay
pub struct SimulatedSink {
    ready_delay: Duration,
    fail: Option<String>,
    attached: Mutex<Option<u64>>,
}

impl SimulatedSink {
    /// A sink that reports readiness immediately
    pub fn ready() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    /// A sink that reports readiness after the given delay
    pub fn with_delay(ready_delay: Duration) -> Self {
        Self {
            ready_delay,
            fail: None,
            attached: Mutex::new(None),
        }
    }

    /// A sink that never becomes ready, for exercising the readiness timeout
    pub fn never_ready() -> Self {
        // Far beyond any configured timeout
        Self::with_delay(Duration::from_secs(24 * 60 * 60))
    }

    /// A sink whose playback fails outright
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            ready_delay: Duration::ZERO,
            fail: Some(reason.into()),
            attached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl VideoSink for SimulatedSink {
    async fn attach(&self, stream: &MediaStream) -> Result<(), SinkError> {
        if let Some(reason) = &self.fail {
            return Err(SinkError::PlaybackFailed(reason.clone()));
        }

        if !self.ready_delay.is_zero() {
            tokio::time::sleep(self.ready_delay).await;
        }

        *self.attached.lock() = Some(stream.id());
        Ok(())
    }

    fn detach(&self) {
        *self.attached.lock() = None;
    }

    fn attached_stream(&self) -> Option<u64> {
        *self.attached.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::backend::{CameraBackend, SimulatedCamera, StreamConstraints};

    #[tokio::test]
    async fn test_attach_and_detach() {
        let camera = SimulatedCamera::granting();
        let stream = camera.open(StreamConstraints::any()).await.unwrap();

        let sink = SimulatedSink::ready();
        sink.attach(&stream).await.unwrap();
        assert_eq!(sink.attached_stream(), Some(stream.id()));

        sink.detach();
        assert_eq!(sink.attached_stream(), None);
    }

    #[tokio::test]
    async fn test_failing_sink_surfaces_reason() {
        let camera = SimulatedCamera::granting();
        let stream = camera.open(StreamConstraints::any()).await.unwrap();

        let sink = SimulatedSink::failing("decoder gave up");
        let err = sink.attach(&stream).await.unwrap_err();
        assert_eq!(err, SinkError::PlaybackFailed("decoder gave up".to_string()));
    }
}
