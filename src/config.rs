//! Game configuration
//!
//! Every tunable the simulation and presenter read. Read from LocalStorage
//! on the web so a page can be tuned without rebuilding.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::obstacle::SpawnPolicy;
use crate::sim::projection::CalibrationMode;

/// Upper bound on obstacle slots accepted from stored JSON
pub const MAX_POOL_SIZE: usize = 1024;

/// What the frame loop does once a session has ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AfterGameOver {
    /// Keep scheduling frames and drawing the frozen scene
    #[default]
    KeepRendering,
    /// Stop scheduling frames; restart resumes the loop
    Freeze,
}

impl AfterGameOver {
    pub fn as_str(&self) -> &'static str {
        match self {
            AfterGameOver::KeepRendering => "keep-rendering",
            AfterGameOver::Freeze => "freeze",
        }
    }

    /// Whether another frame should be requested for a session in this state
    pub fn reschedule(&self, ended: bool) -> bool {
        match self {
            AfterGameOver::KeepRendering => true,
            AfterGameOver::Freeze => !ended,
        }
    }
}

/// Full game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Surface ===
    pub display_width: f32,
    pub display_height: f32,

    // === Field ===
    pub field_limit: f32,

    // === Player ===
    pub player_half_size: f32,
    pub player_z: f32,
    /// Inward shrink of the player hitbox on both axes
    pub hit_play_margin: f32,

    // === Obstacles ===
    pub pool_size: usize,
    pub obstacle_half_size: f32,
    pub obstacle_speed: f32,
    pub obstacle_start_z: f32,
    pub spawn: SpawnPolicy,

    // === Camera ===
    pub camera_fov_degrees: f32,
    pub camera_x: f32,
    pub camera_z: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub calibration: CalibrationMode,

    // === Clock ===
    pub movement_reference_ms: f64,
    pub max_frame_ms: f64,
    pub after_game_over: AfterGameOver,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            display_width: DISPLAY_WIDTH,
            display_height: DISPLAY_HEIGHT,

            field_limit: FIELD_LIMIT,

            player_half_size: PLAYER_HALF_SIZE,
            player_z: PLAYER_Z,
            hit_play_margin: HIT_PLAY,

            pool_size: POOL_SIZE,
            obstacle_half_size: BOX_HALF_SIZE,
            obstacle_speed: BOX_SPEED,
            obstacle_start_z: BOX_START_Z,
            spawn: SpawnPolicy::default(),

            camera_fov_degrees: CAMERA_FOV_DEGREES,
            camera_x: CAMERA_X,
            camera_z: CAMERA_Z,
            camera_near: CAMERA_NEAR,
            camera_far: CAMERA_FAR,
            calibration: CalibrationMode::default(),

            movement_reference_ms: MOVEMENT_REFERENCE_MS,
            max_frame_ms: MAX_FRAME_MS,
            after_game_over: AfterGameOver::default(),
        }
    }
}

fn finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if finite(field, value)? > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

impl GameConfig {
    /// Reject configurations that would put NaN or an empty range into the tick
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("display_width", self.display_width)?;
        positive("display_height", self.display_height)?;
        positive("field_limit", self.field_limit)?;
        positive("player_half_size", self.player_half_size)?;
        positive("obstacle_half_size", self.obstacle_half_size)?;
        finite("player_z", self.player_z)?;
        finite("obstacle_start_z", self.obstacle_start_z)?;
        positive("obstacle_speed", self.obstacle_speed)?;
        finite("camera_z", self.camera_z)?;
        positive("camera_near", self.camera_near)?;
        positive("camera_far", self.camera_far)?;
        positive("movement_reference_ms", self.movement_reference_ms as f32)?;
        positive("max_frame_ms", self.max_frame_ms as f32)?;

        if finite("camera_x", self.camera_x)? == 0.0 {
            return Err(ConfigError::ZeroDistance { field: "camera_x" });
        }
        let fov = finite("camera_fov_degrees", self.camera_fov_degrees)?;
        if fov <= 0.0 || fov >= 180.0 {
            return Err(ConfigError::FieldOfView(fov));
        }

        for half_size in [self.player_half_size, self.obstacle_half_size] {
            if self.field_limit <= half_size {
                return Err(ConfigError::FieldTooSmall {
                    limit: self.field_limit,
                    half_size,
                });
            }
        }

        let margin = finite("hit_play_margin", self.hit_play_margin)?;
        if margin < 0.0 || margin >= self.player_half_size {
            return Err(ConfigError::MarginTooLarge {
                margin,
                half_size: self.player_half_size,
            });
        }

        // Launched boxes start clear of the player and must reach camera_z
        let clearance = self.obstacle_half_size + self.player_half_size;
        if self.obstacle_start_z >= self.player_z - clearance || self.player_z >= self.camera_z {
            return Err(ConfigError::DepthOrder {
                spawn_z: self.obstacle_start_z,
                player_z: self.player_z,
                camera_z: self.camera_z,
            });
        }

        if self.pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if self.pool_size > MAX_POOL_SIZE {
            return Err(ConfigError::PoolTooLarge {
                size: self.pool_size,
                max: MAX_POOL_SIZE,
            });
        }
        self.spawn.validate()
    }

    /// Legal player offset range is ±this value
    pub fn player_travel(&self) -> f32 {
        self.field_limit - self.player_half_size
    }

    /// Legal obstacle spawn height range is ±this value
    pub fn obstacle_travel(&self) -> f32 {
        self.field_limit - self.obstacle_half_size
    }

    /// Parse and validate a JSON config (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "box_dodge_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Load config from a JSON file, falling back to defaults when absent
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(json) => Self::from_json(&json),
                Err(e) => {
                    log::warn!("Cannot read {}: {}, using defaults", path.display(), e);
                    Ok(Self::default())
                }
            },
            None => Ok(Self::default()),
        }
    }
}
