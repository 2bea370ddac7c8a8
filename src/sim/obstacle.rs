//! Obstacle pool
//!
//! A fixed set of boxes, one per slot. Each slot cycles forever:
//! Idle at the spawn depth → launched by a random roll → travels toward the
//! camera → respawned at a fresh height once it passes the camera plane.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::SPAWN_PROBABILITY;
use crate::error::ConfigError;

/// How an idle obstacle decides to launch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnPolicy {
    /// Launch when a uniform [0, 1) sample falls below `probability`
    PerTick { probability: f32 },
    /// Launch when `sample * scale >= threshold` (rare bursts)
    Burst { scale: f32, threshold: f32 },
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        SpawnPolicy::PerTick {
            probability: SPAWN_PROBABILITY,
        }
    }
}

impl SpawnPolicy {
    /// Decide from a uniform sample in [0, 1)
    #[inline]
    pub fn triggers(&self, sample: f32) -> bool {
        match *self {
            SpawnPolicy::PerTick { probability } => sample < probability,
            SpawnPolicy::Burst { scale, threshold } => sample * scale >= threshold,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            SpawnPolicy::PerTick { probability } => {
                if (0.0..=1.0).contains(&probability) {
                    Ok(())
                } else {
                    Err(ConfigError::SpawnProbability(probability))
                }
            }
            SpawnPolicy::Burst { scale, threshold } => {
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(ConfigError::NotPositive {
                        field: "spawn.scale",
                        value: scale,
                    });
                }
                if !threshold.is_finite() {
                    return Err(ConfigError::NonFinite {
                        field: "spawn.threshold",
                        value: threshold,
                    });
                }
                Ok(())
            }
        }
    }
}

/// Movement phase of a single obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstaclePhase {
    Idle,
    Moving,
}

/// A box in flight (or waiting to be)
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Pool slot, stable for the session
    pub slot: usize,
    pub pos: Vec3,
    pub half_size: f32,
    pub phase: ObstaclePhase,
}

impl Obstacle {
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.phase == ObstaclePhase::Moving
    }
}

/// Uniform spawn height within ±travel
fn spawn_height<R: Rng>(rng: &mut R, travel: f32) -> f32 {
    rng.random_range(-travel..=travel)
}

/// Fixed-size collection of obstacles
#[derive(Debug, Clone)]
pub struct ObstaclePool {
    obstacles: Vec<Obstacle>,
    spawn: SpawnPolicy,
    speed: f32,
    start_z: f32,
    /// Spawn heights stay within ±travel
    travel: f32,
}

impl ObstaclePool {
    /// Build one idle obstacle per slot, each at a freshly drawn height
    pub fn new<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        let travel = config.obstacle_travel();
        let obstacles = (0..config.pool_size)
            .map(|slot| Obstacle {
                slot,
                pos: Vec3::new(0.0, spawn_height(rng, travel), config.obstacle_start_z),
                half_size: config.obstacle_half_size,
                phase: ObstaclePhase::Idle,
            })
            .collect();

        Self {
            obstacles,
            spawn: config.spawn,
            speed: config.obstacle_speed,
            start_z: config.obstacle_start_z,
            travel,
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn get(&self, slot: usize) -> Option<&Obstacle> {
        self.obstacles.get(slot)
    }

    pub fn moving_count(&self) -> usize {
        self.obstacles.iter().filter(|o| o.is_moving()).count()
    }

    #[cfg(test)]
    pub(crate) fn obstacle_mut(&mut self, slot: usize) -> Option<&mut Obstacle> {
        self.obstacles.get_mut(slot)
    }

    /// Put an obstacle back at the spawn depth with a fresh height
    fn respawn<R: Rng>(&mut self, slot: usize, rng: &mut R) {
        let y = spawn_height(rng, self.travel);
        let start_z = self.start_z;
        if let Some(obstacle) = self.obstacles.get_mut(slot) {
            obstacle.pos = Vec3::new(0.0, y, start_z);
            obstacle.phase = ObstaclePhase::Idle;
        }
    }

    /// Advance every obstacle by one tick
    ///
    /// `hits` is asked about each obstacle that moved, with the distance it
    /// moved. The first obstacle it reports returns immediately (later slots
    /// are left untouched); moving obstacles past `far_z` are respawned.
    pub fn advance<R, F>(
        &mut self,
        rng: &mut R,
        movement_scale: f32,
        far_z: f32,
        mut hits: F,
    ) -> Option<usize>
    where
        R: Rng,
        F: FnMut(&Obstacle, f32) -> bool,
    {
        let distance = self.speed * movement_scale;

        for slot in 0..self.obstacles.len() {
            let obstacle = &mut self.obstacles[slot];
            match obstacle.phase {
                ObstaclePhase::Idle => {
                    let sample: f32 = rng.random();
                    if self.spawn.triggers(sample) {
                        obstacle.phase = ObstaclePhase::Moving;
                    }
                }
                ObstaclePhase::Moving => {
                    obstacle.pos.z += distance;
                    if hits(obstacle, distance) {
                        return Some(slot);
                    }
                    if obstacle.pos.z > far_z {
                        self.respawn(slot, rng);
                    }
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pool_with(spawn: SpawnPolicy, seed: u64) -> (ObstaclePool, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let config = GameConfig {
            spawn,
            ..Default::default()
        };
        (ObstaclePool::new(&config, &mut rng), rng)
    }

    #[test]
    fn test_pool_starts_idle_at_spawn_depth() {
        let (pool, _) = pool_with(SpawnPolicy::default(), 1);
        assert_eq!(pool.len(), POOL_SIZE);
        for (slot, obstacle) in pool.iter().enumerate() {
            assert_eq!(obstacle.slot, slot);
            assert_eq!(obstacle.phase, ObstaclePhase::Idle);
            assert_eq!(obstacle.pos.z, BOX_START_Z);
            assert_eq!(obstacle.pos.x, 0.0);
        }
    }

    #[test]
    fn test_zero_probability_never_launches() {
        let (mut pool, mut rng) = pool_with(SpawnPolicy::PerTick { probability: 0.0 }, 7);
        for _ in 0..10_000 {
            let hit = pool.advance(&mut rng, 1.6, CAMERA_Z, |_, _| true);
            assert_eq!(hit, None);
        }
        assert_eq!(pool.moving_count(), 0);
    }

    #[test]
    fn test_certain_probability_launches_then_moves() {
        let (mut pool, mut rng) = pool_with(SpawnPolicy::PerTick { probability: 1.0 }, 7);
        pool.advance(&mut rng, 1.0, CAMERA_Z, |_, _| false);
        assert_eq!(pool.moving_count(), POOL_SIZE);
        // Launch tick does not move
        assert!(pool.iter().all(|o| o.pos.z == BOX_START_Z));

        pool.advance(&mut rng, 2.0, CAMERA_Z, |_, _| false);
        assert!(pool.iter().all(|o| o.pos.z == BOX_START_Z + BOX_SPEED * 2.0));
    }

    #[test]
    fn test_passing_camera_respawns_with_fresh_height() {
        let (mut pool, mut rng) = pool_with(SpawnPolicy::PerTick { probability: 1.0 }, 42);
        pool.advance(&mut rng, 1.0, CAMERA_Z, |_, _| false);
        let before = pool.get(0).map(|o| o.pos.y).unwrap_or_default();

        // 3000 units to the camera plane at 100 units per tick
        let mut respawned = false;
        for _ in 0..31 {
            pool.advance(&mut rng, 10.0, CAMERA_Z, |_, _| false);
            if pool.get(0).is_some_and(|o| o.phase == ObstaclePhase::Idle) {
                respawned = true;
                break;
            }
        }
        assert!(respawned);
        let obstacle = pool.get(0).expect("slot 0");
        assert_eq!(obstacle.pos.z, BOX_START_Z);
        assert_ne!(obstacle.pos.y, before);
        assert!(pool.iter().all(|o| o.pos.z <= CAMERA_Z));
    }

    #[test]
    fn test_first_hit_short_circuits() {
        let (mut pool, mut rng) = pool_with(SpawnPolicy::PerTick { probability: 1.0 }, 3);
        pool.advance(&mut rng, 1.0, CAMERA_Z, |_, _| false);

        let mut asked = Vec::new();
        let hit = pool.advance(&mut rng, 1.0, CAMERA_Z, |o, _| {
            asked.push(o.slot);
            o.slot >= 2
        });
        assert_eq!(hit, Some(2));
        assert_eq!(asked, vec![0, 1, 2]);
        // Slots after the hit were not advanced
        assert_eq!(pool.get(3).map(|o| o.pos.z), Some(BOX_START_Z));
    }

    #[test]
    fn test_burst_policy_threshold() {
        let burst = SpawnPolicy::Burst {
            scale: 10.0,
            threshold: 9.95,
        };
        assert!(!burst.triggers(0.5));
        assert!(!burst.triggers(0.994));
        assert!(burst.triggers(0.996));
        assert!(burst.validate().is_ok());
    }

    #[test]
    fn test_spawn_policy_validation() {
        assert!(SpawnPolicy::PerTick { probability: 1.5 }.validate().is_err());
        assert!(SpawnPolicy::PerTick { probability: -0.1 }.validate().is_err());
        assert!(
            SpawnPolicy::Burst {
                scale: 0.0,
                threshold: 1.0
            }
            .validate()
            .is_err()
        );
    }

    proptest! {
        #[test]
        fn prop_respawn_height_within_travel(seed in any::<u64>(), ticks in 1usize..400) {
            let (mut pool, mut rng) = pool_with(SpawnPolicy::PerTick { probability: 0.2 }, seed);
            let travel = FIELD_LIMIT - BOX_HALF_SIZE;
            for _ in 0..ticks {
                pool.advance(&mut rng, 8.0, CAMERA_Z, |_, _| false);
                for obstacle in pool.iter() {
                    prop_assert!(obstacle.pos.y >= -travel && obstacle.pos.y <= travel);
                    prop_assert!(obstacle.pos.z <= CAMERA_Z);
                }
            }
        }
    }
}
