//! Box Dodge - A first-person "dodge the approaching boxes" arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacles, collisions, session state)
//! - `input`: Pointer bridging between async events and the tick
//! - `presentation`: Snapshot-driven presenter seam
//! - `renderer`: WebGPU rendering of the snapshot
//! - `config`: Data-driven game tuning

pub mod config;
pub mod error;
pub mod input;
pub mod presentation;
pub mod renderer;
pub mod sim;

pub use config::{AfterGameOver, GameConfig};
pub use error::ConfigError;

/// Game configuration constants
pub mod consts {
    /// Logical render surface size (pointer coordinates are normalized to this)
    pub const DISPLAY_WIDTH: f32 = 960.0;
    pub const DISPLAY_HEIGHT: f32 = 540.0;

    /// Maximum vertical displacement for player and obstacles
    pub const FIELD_LIMIT: f32 = 500.0;

    /// Obstacle cube half extent
    pub const BOX_HALF_SIZE: f32 = 100.0;
    /// Depth at which obstacles (re)spawn
    pub const BOX_START_Z: f32 = -2000.0;
    /// Obstacle travel per movement unit
    pub const BOX_SPEED: f32 = 10.0;
    /// Number of obstacle slots
    pub const POOL_SIZE: usize = 10;
    /// Per-tick launch probability for an idle obstacle
    pub const SPAWN_PROBABILITY: f32 = 0.006;

    /// Camera placement (looks at the origin)
    pub const CAMERA_FOV_DEGREES: f32 = 90.0;
    pub const CAMERA_X: f32 = 500.0;
    pub const CAMERA_Z: f32 = 1000.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 2000.0;

    /// Player sphere
    pub const PLAYER_HALF_SIZE: f32 = 35.0;
    pub const PLAYER_Z: f32 = 500.0;

    /// Inward shrink of the player hitbox (hit forgiveness)
    pub const HIT_PLAY: f32 = 15.0;

    /// Wall time (ms) that corresponds to one movement unit
    pub const MOVEMENT_REFERENCE_MS: f64 = 10.0;
    /// Longest frame gap fed to the simulation (tab switch, debugger pause)
    pub const MAX_FRAME_MS: f64 = 100.0;
}
