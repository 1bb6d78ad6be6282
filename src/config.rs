//! Configuration loading for ViconShuttle

use crate::error::{Result, ShuttleError};
use crate::vicon::DecodeMode;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct ShuttleConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub startup: StartupConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Vicon UDP stream settings
#[derive(Clone, Debug, Deserialize)]
pub struct NetworkConfig {
    /// Local address to bind (default: 0.0.0.0)
    #[serde(default = "default_bind_ip")]
    pub bind_ip: String,

    /// UDP port the Vicon Tracker streams to (default: 51001)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Readiness wait per poll in milliseconds (default: 1)
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_ms: u64,
}

/// Rigid body tracking settings
#[derive(Clone, Debug, Deserialize)]
pub struct TrackingConfig {
    /// Vicon object name to follow. Empty follows the first item of every
    /// frame (default: "")
    #[serde(default)]
    pub body_name: String,

    /// Validate item headers (default: true). `false` accepts any
    /// correctly sized datagram.
    #[serde(default = "default_strict")]
    pub strict: bool,
}

/// Shuttle controller settings
#[derive(Clone, Debug, Deserialize)]
pub struct ControllerConfig {
    /// Half-width of the shuttle box in actuator units, meters (default: 0.5)
    #[serde(default = "default_box_limit")]
    pub box_limit: f64,

    /// Factor from actuator units to relative-pose units (centimeters).
    ///
    /// 1.0 compares the raw limit against the centimeter pose (0.5 m box
    /// acts as a 0.5 cm box); 100.0 makes the box really `box_limit` meters.
    #[serde(default = "default_limit_to_pose_units")]
    pub limit_to_pose_units: f64,

    /// Control loop period in milliseconds (default: 100)
    #[serde(default = "default_loop_interval")]
    pub loop_interval_ms: u64,
}

/// Pre-flight checks
#[derive(Clone, Debug, Deserialize)]
pub struct StartupConfig {
    /// How long to wait for the actuator readiness signal (default: 5000)
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_ms: u64,

    /// How long to wait for the first tracked pose; 0 waits forever
    /// (default: 0)
    #[serde(default)]
    pub home_timeout_ms: u64,
}

/// Logging configuration
#[derive(Clone, Debug, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_bind_ip() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    51001
}
fn default_poll_timeout() -> u64 {
    1
}
fn default_strict() -> bool {
    true
}
fn default_box_limit() -> f64 {
    0.5
}
fn default_limit_to_pose_units() -> f64 {
    1.0
}
fn default_loop_interval() -> u64 {
    100
}
fn default_ready_timeout() -> u64 {
    5000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_ip: default_bind_ip(),
            port: default_port(),
            poll_timeout_ms: default_poll_timeout(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            body_name: String::new(),
            strict: default_strict(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            box_limit: default_box_limit(),
            limit_to_pose_units: default_limit_to_pose_units(),
            loop_interval_ms: default_loop_interval(),
        }
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            ready_timeout_ms: default_ready_timeout(),
            home_timeout_ms: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ShuttleConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            tracking: TrackingConfig::default(),
            controller: ControllerConfig::default(),
            startup: StartupConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ShuttleConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ShuttleError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ShuttleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.controller.box_limit.is_nan() || self.controller.box_limit <= 0.0 {
            return Err(ShuttleError::Config(format!(
                "box_limit must be positive, got {}",
                self.controller.box_limit
            )));
        }
        let factor = self.controller.limit_to_pose_units;
        if factor.is_nan() || factor <= 0.0 {
            return Err(ShuttleError::Config(format!(
                "limit_to_pose_units must be positive, got {}",
                factor
            )));
        }
        if self.controller.loop_interval_ms == 0 {
            return Err(ShuttleError::Config(
                "loop_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Socket bind address string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.network.bind_ip, self.network.port)
    }

    pub fn decode_mode(&self) -> DecodeMode {
        if self.tracking.strict {
            DecodeMode::Strict
        } else {
            DecodeMode::Lenient
        }
    }

    /// Shuttle limit in relative-pose units
    pub fn pose_limit(&self) -> f64 {
        self.controller.box_limit * self.controller.limit_to_pose_units
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.network.poll_timeout_ms)
    }

    pub fn loop_interval(&self) -> Duration {
        Duration::from_millis(self.controller.loop_interval_ms)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.startup.ready_timeout_ms)
    }

    /// `None` means wait forever
    pub fn home_timeout(&self) -> Option<Duration> {
        match self.startup.home_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}
