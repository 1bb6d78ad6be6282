//! Error types for ViconShuttle

use std::time::Duration;

use thiserror::Error;

/// ViconShuttle error type
#[derive(Error, Debug)]
pub enum ShuttleError {
    /// OS-level socket failure. Fatal to the ingest loop.
    #[error("Socket error: {0}")]
    Socket(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Actuator not ready")]
    ActuatorNotReady,

    #[error("No pose for tracked body within {0:?}")]
    HomeTimeout(Duration),
}

impl From<toml::de::Error> for ShuttleError {
    fn from(e: toml::de::Error) -> Self {
        ShuttleError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShuttleError>;
