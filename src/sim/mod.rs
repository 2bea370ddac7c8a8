//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay headless:
//! - Time comes in through `TickInput`, never read from the host
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod obstacle;
pub mod projection;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use collision::{axis_overlap, check_hit};
pub use obstacle::{Obstacle, ObstaclePhase, ObstaclePool, SpawnPolicy};
pub use projection::{CalibrationMode, calibrate, map_pointer_to_world_y, surface_coordinate};
pub use state::{Player, Session, SessionPhase, SurvivalTime};
pub use tick::{TickInput, TickOutcome, tick};
