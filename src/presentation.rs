//! Presentation seam
//!
//! The simulation never touches render objects. Each frame it is reduced to a
//! `FrameSnapshot` of plain positions and state, and a `Presenter` applies
//! that snapshot to whatever draws it.

use std::convert::Infallible;

use glam::Vec3;

use crate::sim::{Session, SessionPhase, SurvivalTime};

/// One obstacle as the presenter sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleView {
    pub slot: usize,
    pub pos: Vec3,
    pub half_size: f32,
    /// Only moving obstacles are drawn
    pub visible: bool,
}

/// Everything needed to draw and annotate a frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub player_pos: Vec3,
    pub player_half_size: f32,
    pub obstacles: Vec<ObstacleView>,
    pub phase: SessionPhase,
    /// Play time so far, or the captured survival time once ended
    pub elapsed: SurvivalTime,
    pub survival: Option<SurvivalTime>,
}

impl FrameSnapshot {
    pub fn capture(session: &Session, now_ms: f64) -> Self {
        let obstacles = session
            .obstacles()
            .iter()
            .map(|o| ObstacleView {
                slot: o.slot,
                pos: o.pos,
                half_size: o.half_size,
                visible: o.is_moving(),
            })
            .collect();

        let survival = session.survival();
        let elapsed =
            survival.unwrap_or_else(|| SurvivalTime::from_elapsed_ms(session.elapsed_ms(now_ms)));

        Self {
            player_pos: session.player().pos(),
            player_half_size: session.player().half_size,
            obstacles,
            phase: session.phase(),
            elapsed,
            survival,
        }
    }

    pub fn visible_obstacles(&self) -> impl Iterator<Item = &ObstacleView> {
        self.obstacles.iter().filter(|o| o.visible)
    }
}

/// Something that can draw a frame
pub trait Presenter {
    type Error;

    fn present(&mut self, frame: &FrameSnapshot) -> Result<(), Self::Error>;
}

/// Headless presenter that reports frames through the log
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_phase: Option<SessionPhase>,
    frames: u64,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Presenter for LogPresenter {
    type Error = Infallible;

    fn present(&mut self, frame: &FrameSnapshot) -> Result<(), Self::Error> {
        self.frames += 1;

        if self.last_phase != Some(frame.phase) {
            match frame.survival {
                Some(survival) => log::info!("Phase {}: survived {}s", frame.phase.as_str(), survival),
                None => log::info!("Phase {}", frame.phase.as_str()),
            }
            self.last_phase = Some(frame.phase);
        }

        log::debug!(
            "frame {}: player y {:.1}, {} boxes in flight, t {}s",
            self.frames,
            frame.player_pos.y,
            frame.visible_obstacles().count(),
            frame.elapsed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::*;

    #[test]
    fn test_snapshot_of_fresh_session() {
        let session = Session::new(GameConfig::default(), 4).expect("valid config");
        let frame = FrameSnapshot::capture(&session, 0.0);
        assert_eq!(frame.phase, SessionPhase::NotStarted);
        assert_eq!(frame.obstacles.len(), POOL_SIZE);
        assert_eq!(frame.visible_obstacles().count(), 0);
        assert_eq!(frame.player_pos, Vec3::new(0.0, 0.0, PLAYER_Z));
        assert_eq!(frame.survival, None);
    }

    #[test]
    fn test_snapshot_elapsed_tracks_play_time() {
        let mut session = Session::new(GameConfig::default(), 4).expect("valid config");
        session.start(500.0);
        let frame = FrameSnapshot::capture(&session, 3_260.0);
        assert_eq!(frame.elapsed.to_string(), "2.7");
    }

    #[test]
    fn test_log_presenter_counts_frames() {
        let session = Session::new(GameConfig::default(), 4).expect("valid config");
        let frame = FrameSnapshot::capture(&session, 0.0);
        let mut presenter = LogPresenter::new();
        for _ in 0..3 {
            assert!(presenter.present(&frame).is_ok());
        }
        assert_eq!(presenter.frames(), 3);
    }
}
