//! Error types for the navigation engine

use thiserror::Error;

/// Classified camera failure taxonomy.
///
/// Every platform-level acquisition failure is converted into exactly one of
/// these kinds at the session-manager boundary. Downstream code never
/// inspects raw platform error names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// User declined camera access; recoverable only outside the app.
    #[error("camera permission denied")]
    PermissionDenied,

    /// No camera hardware present on the device.
    #[error("no camera found")]
    NoCameraFound,

    /// Camera is claimed by another process.
    #[error("camera in use by another application")]
    CameraInUse,

    /// Requested facing mode or resolution unsupported at every fallback level.
    #[error("camera constraints unsupported")]
    ConstraintsUnsupported,

    /// The media API itself is missing from the environment.
    #[error("camera API unsupported")]
    ApiUnsupported,

    /// The environment is not a secure context, so the media API is blocked.
    #[error("insecure context")]
    InsecureContext,

    /// Anything that does not classify into a known kind.
    #[error("camera error: {0}")]
    Unknown(String),
}

impl CameraError {
    /// Whether an immediate in-app retry makes sense.
    ///
    /// Permission denial and missing hardware can only be fixed outside the
    /// app (browser settings, plugging in a camera), so they are not
    /// retriable; the remaining kinds allow a manual retry.
    pub fn is_retriable(&self) -> bool {
        !matches!(self, CameraError::PermissionDenied | CameraError::NoCameraFound)
    }

    /// Short user-facing message for this failure class.
    pub fn user_message(&self) -> &'static str {
        match self {
            CameraError::PermissionDenied => {
                "Camera permission denied. Please allow camera access in your browser settings and try again."
            }
            CameraError::NoCameraFound => {
                "No camera found. Please ensure your device has a working camera."
            }
            CameraError::CameraInUse => {
                "Camera is being used by another application. Please close other apps using the camera."
            }
            CameraError::ConstraintsUnsupported => {
                "Camera constraints not supported. Please try a different device or browser."
            }
            CameraError::ApiUnsupported => "Camera not supported in this browser.",
            CameraError::InsecureContext => "Camera requires a secure (HTTPS) context.",
            CameraError::Unknown(_) => {
                "Failed to access camera. Please check your permissions and try again."
            }
        }
    }
}

/// Outcome of an acquisition attempt at the session-manager level.
///
/// `Cancelled` is deliberately kept outside [`CameraError`]: an abandoned
/// acquisition is not a user-facing failure class, it is the caller tearing
/// the session down while a request was still pending.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquireError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    /// Teardown was requested while the acquisition was in flight; its
    /// eventual resolution was ignored and any obtained stream stopped.
    #[error("acquisition cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_not_retriable() {
        assert!(!CameraError::PermissionDenied.is_retriable());
        assert!(!CameraError::NoCameraFound.is_retriable());
    }

    #[test]
    fn test_transient_failures_retriable() {
        assert!(CameraError::CameraInUse.is_retriable());
        assert!(CameraError::ConstraintsUnsupported.is_retriable());
        assert!(CameraError::InsecureContext.is_retriable());
        assert!(CameraError::Unknown("boom".into()).is_retriable());
    }

    #[test]
    fn test_every_class_has_a_distinct_message() {
        let kinds = [
            CameraError::PermissionDenied,
            CameraError::NoCameraFound,
            CameraError::CameraInUse,
            CameraError::ConstraintsUnsupported,
            CameraError::ApiUnsupported,
            CameraError::InsecureContext,
            CameraError::Unknown("x".into()),
        ];
        let mut messages: Vec<&str> = kinds.iter().map(|k| k.user_message()).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), kinds.len());
    }

    #[test]
    fn test_cancelled_is_not_a_camera_error() {
        let err = AcquireError::Cancelled;
        assert!(!matches!(err, AcquireError::Camera(_)));
    }
}
