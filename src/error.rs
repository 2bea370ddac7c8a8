//! Configuration errors
//!
//! Raised once, when a session is built. The per-tick path never fails.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("{field} must be non-zero")]
    ZeroDistance { field: &'static str },

    #[error("field of view must be within (0, 180) degrees, got {0}")]
    FieldOfView(f32),

    #[error("{field} ({value}) must be positive")]
    NotPositive { field: &'static str, value: f32 },

    #[error("field limit {limit} leaves no travel room for half size {half_size}")]
    FieldTooSmall { limit: f32, half_size: f32 },

    #[error("hit-play margin {margin} must be smaller than the player half size {half_size}")]
    MarginTooLarge { margin: f32, half_size: f32 },

    #[error("spawn probability must be within [0, 1], got {0}")]
    SpawnProbability(f32),

    #[error("obstacle pool must have at least one slot")]
    EmptyPool,

    #[error("obstacle pool of {size} slots exceeds the limit of {max}")]
    PoolTooLarge { size: usize, max: usize },

    #[error(
        "depths must run spawn ({spawn_z}) < player ({player_z}) < camera ({camera_z}) with room for both boxes"
    )]
    DepthOrder {
        spawn_z: f32,
        player_z: f32,
        camera_z: f32,
    },

    #[error("calibration produced an unusable magnification ({0})")]
    DegenerateCalibration(f32),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
