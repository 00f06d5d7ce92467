//! Shared domain primitives and configuration for FoodSpot.

pub mod app_config;
pub mod candidate;
pub mod config;
pub mod geo;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use candidate::RawCandidate;
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{format_distance, format_time, haversine_distance, Coordinate, GridKey};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid coordinates format")]
    InvalidCoordinateFormat,

    #[error("Latitude must be between -90 and 90")]
    LatitudeOutOfRange,

    #[error("Longitude must be between -180 and 180")]
    LongitudeOutOfRange,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
