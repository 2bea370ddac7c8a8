//! Session state and core simulation types
//!
//! Everything a running game mutates lives in one `Session`. A new game is a
//! new `Session`; nothing carries over.

use std::fmt;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::FrameClock;
use super::obstacle::ObstaclePool;
use super::projection::calibrate;
use crate::config::GameConfig;
use crate::error::ConfigError;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Built, waiting for start
    NotStarted,
    /// Active gameplay
    Running,
    /// Stopped by the player, can resume
    Paused,
    /// Hit by a box (terminal)
    Ended,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::NotStarted => "not started",
            SessionPhase::Running => "running",
            SessionPhase::Paused => "paused",
            SessionPhase::Ended => "ended",
        }
    }
}

/// Survival time, truncated to tenths of a second
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SurvivalTime {
    tenths: u64,
}

impl SurvivalTime {
    /// `floor(ms / 100) / 10` seconds
    pub fn from_elapsed_ms(elapsed_ms: f64) -> Self {
        let tenths = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            (elapsed_ms / 100.0).floor() as u64
        } else {
            0
        };
        Self { tenths }
    }

    pub fn tenths(&self) -> u64 {
        self.tenths
    }

    pub fn seconds(&self) -> f64 {
        self.tenths as f64 / 10.0
    }
}

impl fmt::Display for SurvivalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
    }
}

/// The player's sphere
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Vertical offset, always within ±travel
    pub y: f32,
    pub z: f32,
    pub half_size: f32,
    travel: f32,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            y: 0.0,
            z: config.player_z,
            half_size: config.player_half_size,
            travel: config.player_travel(),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        Vec3::new(0.0, self.y, self.z)
    }

    pub fn travel(&self) -> f32 {
        self.travel
    }

    /// Follow a pointer-derived world offset, scaled and clamped to the field
    pub fn track(&mut self, pointer_offset: f32, magnification: f32) {
        let target = pointer_offset * magnification;
        if target.is_nan() {
            return;
        }
        self.y = target.clamp(-self.travel, self.travel);
    }
}

/// One game, from construction to teardown
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) config: GameConfig,
    pub(crate) magnification: f32,
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) player: Player,
    pub(crate) obstacles: ObstaclePool,
    pub(crate) phase: SessionPhase,
    pub(crate) clock: FrameClock,
    pub(crate) ticks: u64,
    started_at_ms: f64,
    paused_at_ms: Option<f64>,
    paused_total_ms: f64,
    survival: Option<SurvivalTime>,
}

impl Session {
    /// Validate the config, calibrate, and lay out the pool
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let magnification = calibrate(
            config.camera_x,
            config.camera_z,
            config.player_z,
            config.camera_fov_degrees,
            config.calibration,
        )?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let obstacles = ObstaclePool::new(&config, &mut rng);
        let player = Player::new(&config);
        let clock = FrameClock::new(config.movement_reference_ms, config.max_frame_ms);

        log::debug!(
            "Session built: seed {}, {} obstacles, magnification {:.4} ({:?})",
            seed,
            obstacles.len(),
            magnification,
            config.calibration
        );

        Ok(Self {
            config,
            magnification,
            seed,
            rng,
            player,
            obstacles,
            phase: SessionPhase::NotStarted,
            clock,
            ticks: 0,
            started_at_ms: 0.0,
            paused_at_ms: None,
            paused_total_ms: 0.0,
            survival: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn magnification(&self) -> f32 {
        self.magnification
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &ObstaclePool {
        &self.obstacles
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Survival time captured when the session ended
    pub fn survival(&self) -> Option<SurvivalTime> {
        self.survival
    }

    /// Begin the session; only valid from NotStarted
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.phase != SessionPhase::NotStarted {
            return false;
        }
        self.started_at_ms = now_ms;
        self.clock.rebase(now_ms);
        self.phase = SessionPhase::Running;
        log::info!("Session started (seed {})", self.seed);
        true
    }

    pub fn pause(&mut self, now_ms: f64) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.paused_at_ms = Some(now_ms);
        self.phase = SessionPhase::Paused;
        log::info!("Session paused");
        true
    }

    /// Resume; paused time is excluded from survival and movement
    pub fn resume(&mut self, now_ms: f64) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        if let Some(paused_at) = self.paused_at_ms.take() {
            self.paused_total_ms += (now_ms - paused_at).max(0.0);
        }
        self.clock.rebase(now_ms);
        self.phase = SessionPhase::Running;
        log::info!("Session resumed");
        true
    }

    /// Start from NotStarted, or flip between Running and Paused
    pub fn toggle_running(&mut self, now_ms: f64) -> bool {
        match self.phase {
            SessionPhase::NotStarted => self.start(now_ms),
            SessionPhase::Running => self.pause(now_ms),
            SessionPhase::Paused => self.resume(now_ms),
            SessionPhase::Ended => false,
        }
    }

    /// Active play time so far (excludes pauses)
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        match self.phase {
            SessionPhase::NotStarted => 0.0,
            _ => {
                let until = self.paused_at_ms.unwrap_or(now_ms);
                (until - self.started_at_ms - self.paused_total_ms).max(0.0)
            }
        }
    }

    /// Transition to Ended and capture the survival time (first call wins)
    pub(crate) fn end(&mut self, now_ms: f64) -> SurvivalTime {
        if let Some(survival) = self.survival {
            return survival;
        }
        let survival = SurvivalTime::from_elapsed_ms(self.elapsed_ms(now_ms));
        self.survival = Some(survival);
        self.phase = SessionPhase::Ended;
        survival
    }
}
