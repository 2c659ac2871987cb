//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Camera acquisition configuration
    #[serde(default)]
    pub camera: CameraSettings,

    /// Route progression and handoff configuration
    #[serde(default)]
    pub navigation: NavigationSettings,

    /// Speech synthesis configuration
    #[serde(default)]
    pub speech: SpeechSettings,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.navigation.tick_interval_ms < 500 {
            return Err(ConfigError::InvalidValue {
                field: "navigation.tick_interval_ms".to_string(),
                message: "Tick interval too short (minimum 500ms)".to_string(),
            });
        }

        if self.navigation.handoff_delay_ms > 10_000 {
            return Err(ConfigError::InvalidValue {
                field: "navigation.handoff_delay_ms".to_string(),
                message: "Handoff delay too long (maximum 10s)".to_string(),
            });
        }

        if self.camera.ready_timeout_ms < 1_000 {
            return Err(ConfigError::InvalidValue {
                field: "camera.ready_timeout_ms".to_string(),
                message: "Sink readiness timeout too short (minimum 1s)".to_string(),
            });
        }

        if !(0.1..=4.0).contains(&self.speech.rate) {
            return Err(ConfigError::InvalidValue {
                field: "speech.rate".to_string(),
                message: "Speaking rate must be between 0.1 and 4.0".to_string(),
            });
        }

        Ok(())
    }
}

/// Camera acquisition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Preferred facing mode ("environment" or "user")
    #[serde(default = "default_facing")]
    pub preferred_facing: String,

    /// Ideal capture width for the strictest constraint level
    #[serde(default = "default_ideal_width")]
    pub ideal_width: u32,

    /// Ideal capture height for the strictest constraint level
    #[serde(default = "default_ideal_height")]
    pub ideal_height: u32,

    /// Minimum acceptable width at the strictest constraint level
    #[serde(default = "default_min_width")]
    pub min_width: u32,

    /// Minimum acceptable height at the strictest constraint level
    #[serde(default = "default_min_height")]
    pub min_height: u32,

    /// How long to wait for the video sink to report readiness before
    /// forcing the session into an error state
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_ms: u64,
}

fn default_facing() -> String {
    "environment".to_string()
}
fn default_ideal_width() -> u32 {
    1280
}
fn default_ideal_height() -> u32 {
    720
}
fn default_min_width() -> u32 {
    640
}
fn default_min_height() -> u32 {
    480
}
fn default_ready_timeout() -> u64 {
    5_000
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            preferred_facing: default_facing(),
            ideal_width: default_ideal_width(),
            ideal_height: default_ideal_height(),
            min_width: default_min_width(),
            min_height: default_min_height(),
            ready_timeout_ms: default_ready_timeout(),
        }
    }
}

/// Route progression and handoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationSettings {
    /// Fixed cadence of simulated step advancement
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Delay between the spoken confirmation and the AR handoff, chosen to
    /// let the confirmation finish speaking
    #[serde(default = "default_handoff_delay")]
    pub handoff_delay_ms: u64,
}

fn default_tick_interval() -> u64 {
    3_000
}
fn default_handoff_delay() -> u64 {
    2_000
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            handoff_delay_ms: default_handoff_delay(),
        }
    }
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// Speaking rate (1.0 = normal)
    #[serde(default = "default_rate")]
    pub rate: f32,

    /// Pitch adjustment (1.0 = normal)
    #[serde(default = "default_pitch")]
    pub pitch: f32,
}

fn default_rate() -> f32 {
    0.9
}
fn default_pitch() -> f32 {
    1.0
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            pitch: default_pitch(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Feature flags for experimentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Enable voice-triggered navigation
    #[serde(default = "default_true")]
    pub voice_navigation: bool,

    /// Enable the looser misrecognition-tolerant trigger layer
    #[serde(default = "default_true")]
    pub loose_triggers: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            voice_navigation: true,
            loose_triggers: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (WAYFINDER_ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("WAYFINDER")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;
    tracing::debug!(env = env.unwrap_or("default"), "configuration loaded");

    Ok(settings)
}
