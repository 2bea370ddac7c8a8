//! Per-frame simulation tick
//!
//! Core game loop step: move the player to the pointer, advance the pool,
//! check hits, end the session on the first one.

use super::collision::check_hit;
use super::state::{Session, SessionPhase, SurvivalTime};

/// Inputs for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Frame timestamp (ms, monotonic host clock)
    pub now_ms: f64,
    /// Latest pointer-derived world offset (before magnification)
    pub pointer_offset: f32,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Session not running; nothing changed
    Idle,
    /// Simulation advanced by `movement_scale` movement units
    Advanced { movement_scale: f32 },
    /// The obstacle in `slot` hit the player; session is now Ended
    Ended { slot: usize, survival: SurvivalTime },
}

/// Advance the session by one frame
///
/// Total over every input: a session that is not Running is left untouched.
pub fn tick(session: &mut Session, input: &TickInput) -> TickOutcome {
    if session.phase != SessionPhase::Running {
        return TickOutcome::Idle;
    }

    session.ticks += 1;
    let movement_scale = session.clock.advance(input.now_ms);

    session
        .player
        .track(input.pointer_offset, session.magnification);

    let player_pos = session.player.pos();
    let player_half = session.player.half_size;
    let margin = session.config.hit_play_margin;
    let far_z = session.config.camera_z;

    let hit = session.obstacles.advance(
        &mut session.rng,
        movement_scale,
        far_z,
        |obstacle, moved| {
            check_hit(
                player_pos,
                player_half,
                obstacle.pos,
                obstacle.half_size,
                moved,
                margin,
            )
        },
    );

    match hit {
        Some(slot) => {
            let survival = session.end(input.now_ms);
            log::info!(
                "Hit by obstacle {} after {} ticks, survived {}s",
                slot,
                session.ticks,
                survival
            );
            TickOutcome::Ended { slot, survival }
        }
        None => TickOutcome::Advanced { movement_scale },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::*;
    use crate::sim::obstacle::{ObstaclePhase, SpawnPolicy};

    const FRAME_MS: f64 = 16.0;

    fn launched_session(seed: u64) -> Session {
        let config = GameConfig {
            spawn: SpawnPolicy::PerTick { probability: 1.0 },
            ..Default::default()
        };
        let mut session = Session::new(config, seed).expect("valid config");
        session.start(1000.0);
        // Launch tick: every slot goes Moving, nothing moves yet
        tick(
            &mut session,
            &TickInput {
                now_ms: 1000.0,
                pointer_offset: 0.0,
            },
        );
        session
    }

    fn set_heights(session: &mut Session, heights: &[(usize, f32)], rest: f32) {
        for slot in 0..session.obstacles.len() {
            let y = heights
                .iter()
                .find(|(s, _)| *s == slot)
                .map(|(_, y)| *y)
                .unwrap_or(rest);
            if let Some(obstacle) = session.obstacles.obstacle_mut(slot) {
                obstacle.pos.y = y;
            }
        }
    }

    /// Tick at 16ms frames until something other than Advanced happens
    fn run_until_event(session: &mut Session, pointer_offset: f32, max_ticks: usize) -> (TickOutcome, f64) {
        let mut now = 1000.0;
        for _ in 0..max_ticks {
            now += FRAME_MS;
            let outcome = tick(session, &TickInput { now_ms: now, pointer_offset });
            if !matches!(outcome, TickOutcome::Advanced { .. }) {
                return (outcome, now);
            }
        }
        (TickOutcome::Idle, now)
    }

    #[test]
    fn test_not_running_is_idle() {
        let mut session = Session::new(GameConfig::default(), 5).expect("valid config");
        let before = session.obstacles().iter().cloned().collect::<Vec<_>>();
        let outcome = tick(
            &mut session,
            &TickInput {
                now_ms: 50.0,
                pointer_offset: 200.0,
            },
        );
        assert_eq!(outcome, TickOutcome::Idle);
        assert_eq!(session.ticks(), 0);
        assert_eq!(session.player().y, 0.0);
        assert!(session.obstacles().iter().eq(before.iter()));
    }

    #[test]
    fn test_head_on_collision_ends_session() {
        let mut session = launched_session(11);
        set_heights(&mut session, &[(0, 0.0)], 400.0);

        let (outcome, now) = run_until_event(&mut session, 0.0, 1000);
        let TickOutcome::Ended { slot, survival } = outcome else {
            panic!("expected a hit, got {outcome:?}");
        };
        assert_eq!(slot, 0);
        assert_eq!(session.phase(), SessionPhase::Ended);
        assert_eq!(survival.tenths(), ((now - 1000.0) / 100.0).floor() as u64);
        assert_eq!(session.survival(), Some(survival));
    }

    #[test]
    fn test_ended_session_is_frozen() {
        let mut session = launched_session(11);
        set_heights(&mut session, &[(0, 0.0)], 400.0);
        let (_, now) = run_until_event(&mut session, 0.0, 1000);

        let player_y = session.player().y;
        let obstacles = session.obstacles().iter().cloned().collect::<Vec<_>>();
        let ticks = session.ticks();
        for i in 1..50 {
            let outcome = tick(
                &mut session,
                &TickInput {
                    now_ms: now + i as f64 * FRAME_MS,
                    pointer_offset: 300.0,
                },
            );
            assert_eq!(outcome, TickOutcome::Idle);
        }
        assert_eq!(session.player().y, player_y);
        assert!(session.obstacles().iter().eq(obstacles.iter()));
        assert_eq!(session.ticks(), ticks);
    }

    #[test]
    fn test_miss_respawns_and_keeps_running() {
        let mut session = launched_session(23);
        set_heights(&mut session, &[], -400.0);
        let before = session.obstacles().get(0).map(|o| o.pos.y);

        // Player pinned to the top of the field, boxes skim the floor
        let mut now = 1000.0;
        let mut respawned = false;
        for _ in 0..1000 {
            now += FRAME_MS;
            let outcome = tick(
                &mut session,
                &TickInput {
                    now_ms: now,
                    pointer_offset: 10_000.0,
                },
            );
            assert!(matches!(outcome, TickOutcome::Advanced { .. }));
            if session
                .obstacles()
                .get(0)
                .is_some_and(|o| o.phase == ObstaclePhase::Idle)
            {
                respawned = true;
                break;
            }
        }

        assert!(respawned);
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.player().y, FIELD_LIMIT - PLAYER_HALF_SIZE);
        let obstacle = session.obstacles().get(0).expect("slot 0");
        assert_eq!(obstacle.pos.z, BOX_START_Z);
        assert_ne!(Some(obstacle.pos.y), before);
    }

    #[test]
    fn test_simultaneous_hits_end_once() {
        let mut session = launched_session(31);
        set_heights(&mut session, &[(0, 0.0), (1, 0.0)], 400.0);

        let (outcome, now) = run_until_event(&mut session, 0.0, 1000);
        let TickOutcome::Ended { slot, survival } = outcome else {
            panic!("expected a hit, got {outcome:?}");
        };
        assert_eq!(slot, 0);
        // Slot 1 was level with slot 0 and left unadvanced on the hit tick
        let z0 = session.obstacles().get(0).map(|o| o.pos.z);
        let z1 = session.obstacles().get(1).map(|o| o.pos.z);
        assert!(z0 > z1);

        let later = tick(
            &mut session,
            &TickInput {
                now_ms: now + 5000.0,
                pointer_offset: 0.0,
            },
        );
        assert_eq!(later, TickOutcome::Idle);
        assert_eq!(session.survival(), Some(survival));
    }

    #[test]
    fn test_zero_probability_session_never_moves() {
        let config = GameConfig {
            spawn: SpawnPolicy::PerTick { probability: 0.0 },
            ..Default::default()
        };
        let mut session = Session::new(config, 99).expect("valid config");
        session.start(0.0);
        for i in 1..5000 {
            let outcome = tick(
                &mut session,
                &TickInput {
                    now_ms: i as f64 * FRAME_MS,
                    pointer_offset: 0.0,
                },
            );
            assert!(matches!(outcome, TickOutcome::Advanced { .. }));
        }
        assert_eq!(session.obstacles().moving_count(), 0);
        assert!(session.obstacles().iter().all(|o| o.pos.z == BOX_START_Z));
    }

    #[test]
    fn test_paused_time_does_not_move_obstacles() {
        let mut session = launched_session(8);
        set_heights(&mut session, &[], 400.0);
        tick(
            &mut session,
            &TickInput {
                now_ms: 1016.0,
                pointer_offset: -10_000.0,
            },
        );
        let z = session.obstacles().get(0).map(|o| o.pos.z);

        session.pause(1016.0);
        session.resume(61_016.0);
        let outcome = tick(
            &mut session,
            &TickInput {
                now_ms: 61_032.0,
                pointer_offset: -10_000.0,
            },
        );
        let TickOutcome::Advanced { movement_scale } = outcome else {
            panic!("expected advance, got {outcome:?}");
        };
        assert!((movement_scale - 1.6).abs() < 1e-6);
        assert_eq!(
            session.obstacles().get(0).map(|o| o.pos.z),
            z.map(|z| z + BOX_SPEED * 1.6)
        );
        assert_eq!(session.elapsed_ms(61_032.0), 32.0);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs stay identical
        let mut a = Session::new(GameConfig::default(), 99_999).expect("valid config");
        let mut b = Session::new(GameConfig::default(), 99_999).expect("valid config");
        a.start(0.0);
        b.start(0.0);

        for i in 1..2000 {
            let input = TickInput {
                now_ms: i as f64 * 17.0,
                pointer_offset: ((i as f32) * 0.05).sin() * 500.0,
            };
            let oa = tick(&mut a, &input);
            let ob = tick(&mut b, &input);
            assert_eq!(oa, ob);
        }

        assert_eq!(a.ticks(), b.ticks());
        assert_eq!(a.player(), b.player());
        assert!(a.obstacles().iter().eq(b.obstacles().iter()));
    }
}
