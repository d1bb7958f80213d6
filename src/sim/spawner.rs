//! Distance-driven obstacle spawning
//!
//! A single accumulator tracks distance since the last obstacle. Once it
//! passes a threshold drawn from the tuning range, one obstacle group is
//! placed just past the right edge: the obstacle, up to five coins above it,
//! and occasionally a powerup.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::pool::{Pool, SlotId};
use super::powerups::PowerupCoordinator;
use super::state::{Coin, ObstacleVariant, PowerupKind, World};
use crate::consts::*;
use crate::tuning::Tuning;

/// Gap between the obstacle top and the coins above it
const COIN_CLEARANCE: f32 = 20.0;
/// Gap between the obstacle top and a powerup above it
const POWERUP_CLEARANCE: f32 = 40.0;

#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    since_last_spawn: f32,
    next_threshold: f32,
}

impl ObstacleSpawner {
    pub fn new(tuning: &Tuning, rng: &mut Pcg32) -> Self {
        let mut spawner = Self {
            since_last_spawn: 0.0,
            next_threshold: 0.0,
        };
        spawner.reset(tuning, rng);
        spawner
    }

    pub fn reset(&mut self, tuning: &Tuning, rng: &mut Pcg32) {
        self.since_last_spawn = 0.0;
        self.redraw_threshold(tuning, rng);
    }

    pub fn since_last_spawn(&self) -> f32 {
        self.since_last_spawn
    }

    pub fn next_threshold(&self) -> f32 {
        self.next_threshold
    }

    fn redraw_threshold(&mut self, tuning: &Tuning, rng: &mut Pcg32) {
        let (lo, hi) = ordered(tuning.obstacle_min_distance, tuning.obstacle_max_distance);
        self.next_threshold = rng.random_range(lo..=hi) as f32;
    }

    /// Accumulate `travelled` distance-units and spawn a group when due.
    ///
    /// Returns the obstacle slot when one was placed. A full obstacle pool
    /// keeps the accumulator so the next tick tries again.
    pub fn advance(
        &mut self,
        travelled: f32,
        tuning: &Tuning,
        rng: &mut Pcg32,
        world: &mut World,
        powerups: &PowerupCoordinator,
    ) -> Option<SlotId> {
        self.since_last_spawn += travelled.max(0.0);
        if self.since_last_spawn < self.next_threshold {
            return None;
        }

        let spawned = spawn_group(tuning, rng, world, powerups);
        if spawned.is_some() {
            self.since_last_spawn = 0.0;
            self.redraw_threshold(tuning, rng);
        } else {
            log::trace!("Obstacle pool exhausted, spawn deferred");
        }
        spawned
    }
}

/// Bounds as `(low, high)` so an unvalidated tuning never yields an empty range
fn ordered(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

/// Width and height for an obstacle variant
pub fn obstacle_size(variant: ObstacleVariant, tuning: &Tuning, rng: &mut Pcg32) -> Vec2 {
    let (w, h) = match variant {
        ObstacleVariant::Standard => {
            let (lo, hi) = ordered(tuning.obstacle_min_height, tuning.obstacle_max_height);
            (40.0, rng.random_range(lo..=hi) as f32)
        }
        ObstacleVariant::Tall => (30.0, tuning.obstacle_max_height as f32 + 20.0),
        ObstacleVariant::Wide => (80.0, tuning.obstacle_min_height as f32),
    };
    Vec2::new(w, h)
}

/// Coin centers for a group of `count` coins above an obstacle.
///
/// Up to three coins form an evenly spaced row across the obstacle width;
/// more form a semicircle of radius `width / 2` centered just above the
/// obstacle, dipping down toward it.
pub fn coin_formation(count: u32, obstacle_pos: Vec2, obstacle_size: Vec2) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }
    let top = obstacle_pos.y - obstacle_size.y / 2.0;

    if count <= 3 {
        let y = top - COIN_SIZE - COIN_CLEARANCE;
        let spacing = obstacle_size.x / count as f32;
        (0..count)
            .map(|i| {
                let x = obstacle_pos.x - obstacle_size.x / 2.0 + (i as f32 + 0.5) * spacing;
                Vec2::new(x, y)
            })
            .collect()
    } else {
        let radius = obstacle_size.x / 2.0;
        let center = Vec2::new(obstacle_pos.x, top - COIN_CLEARANCE);
        let step = std::f32::consts::PI / (count - 1) as f32;
        (0..count)
            .map(|i| {
                let angle = std::f32::consts::PI - i as f32 * step;
                center + Vec2::new(angle.cos() * radius, angle.sin() * radius)
            })
            .collect()
    }
}

fn spawn_group(
    tuning: &Tuning,
    rng: &mut Pcg32,
    world: &mut World,
    powerups: &PowerupCoordinator,
) -> Option<SlotId> {
    if world.obstacles.is_full() {
        return None;
    }

    let variant = ObstacleVariant::from_index(rng.random_range(0..OBSTACLE_VARIATIONS));
    let size = obstacle_size(variant, tuning, rng);
    // Bottom edge rests on the ground line
    let pos = Vec2::new(tuning.spawn_x(), tuning.ground_y() - size.y / 2.0);

    let (id, obstacle) = world.obstacles.acquire()?;
    obstacle.variant = variant;
    obstacle.body.pos = pos;
    obstacle.body.size = size;
    log::debug!("Spawned {:?} obstacle {}x{} at x={}", variant, size.x, size.y, pos.x);

    let coin_count = rng.random_range(0..=MAX_COINS_PER_GROUP);
    for coin_pos in coin_formation(coin_count, pos, size) {
        spawn_coin(&mut world.coins, coin_pos);
    }

    let chance = if (0.0..=1.0).contains(&tuning.powerup_chance) {
        tuning.powerup_chance
    } else {
        0.0
    };
    if rng.random_bool(chance) {
        let kind = PowerupKind::ALL[rng.random_range(0..PowerupKind::ALL.len())];
        let jitter = rng.random_range(-POWERUP_JITTER..=POWERUP_JITTER) as f32;
        let pickup_pos = Vec2::new(pos.x + jitter, pos.y - size.y - POWERUP_CLEARANCE);
        powerups.spawn_pickup(&mut world.pickups, pickup_pos, kind);
    }

    Some(id)
}

/// Place one coin; silently skipped when the coin pool is full
pub fn spawn_coin(coins: &mut Pool<Coin>, pos: Vec2) -> Option<SlotId> {
    let (id, coin) = coins.acquire()?;
    coin.body.pos = pos;
    Some(id)
}
