mod app_config;
mod config;
pub mod geo;
mod outlets;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, load_offline_app_config};
pub use geo::{
    all_intersections, catchment_of, distance_km, distances_from, nearby, CatchmentRadius,
    Coordinates, GeoError, OutletWithDistance, OutletWithIntersections,
};
pub use outlets::Outlet;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
