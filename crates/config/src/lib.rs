//! Configuration for the navigation engine
//!
//! Layered loading: `config/default.yaml`, an optional environment-specific
//! file, then `WAYFINDER__` environment variables.

mod settings;

pub use settings::{
    load_settings, CameraSettings, FeatureFlags, NavigationSettings, ObservabilityConfig,
    Settings, SpeechSettings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),
}
