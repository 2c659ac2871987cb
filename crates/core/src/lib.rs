//! Core types for the indoor navigation engine
//!
//! This crate provides foundational types used across all other crates:
//! - Waypoint and route graph types
//! - Navigation intents
//! - Camera facing modes
//! - Error types

pub mod error;
pub mod geometry;
pub mod intent;
pub mod route;

pub use error::{AcquireError, CameraError};
pub use geometry::{euclidean_distance, unit_direction, Vec3, EPSILON};
pub use intent::{IntentConfidence, NavigationIntent};
pub use route::{RouteGraph, RouteKey, StepCursor, WaypointKind, WaypointNode};

use serde::{Deserialize, Serialize};

/// Camera facing mode selection.
///
/// `Environment` is the outward-facing sensor used for AR passthrough;
/// `User` is the front-facing sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Environment,
    User,
}

impl Facing {
    /// The other sensor, used when flipping the camera.
    pub fn flipped(self) -> Self {
        match self {
            Facing::Environment => Facing::User,
            Facing::User => Facing::Environment,
        }
    }

    /// Front-facing streams are rendered mirrored.
    pub fn is_mirrored(self) -> bool {
        matches!(self, Facing::User)
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facing::Environment => write!(f, "environment"),
            Facing::User => write!(f, "user"),
        }
    }
}
