//! Game state and core simulation types
//!
//! Everything a run mutates lives in [`GameState`] and is owned by the tick.

use std::str::FromStr;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::Aabb;
use super::pool::{Body, Pool, Poolable};
use super::powerups::PowerupCoordinator;
use super::spawner::ObstacleSpawner;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start command
    Idle,
    /// Active gameplay
    Running,
    /// Frozen by a pause command
    Paused,
    /// Run ended (terminal until restart)
    GameOver,
}

/// Powerup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerupKind {
    Magnet,
    DoubleCoins,
    Speed,
    Shield,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Magnet,
        PowerupKind::DoubleCoins,
        PowerupKind::Speed,
        PowerupKind::Shield,
    ];

    /// Name used on the UI boundary
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Magnet => "magnet",
            PowerupKind::DoubleCoins => "doubleCoins",
            PowerupKind::Speed => "speed",
            PowerupKind::Shield => "shield",
        }
    }

    /// Kinds that toggle a player flag while active
    pub fn has_player_flag(&self) -> bool {
        matches!(self, PowerupKind::Speed | PowerupKind::Shield)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown powerup kind: {0}")]
pub struct UnknownPowerup(pub String);

impl FromStr for PowerupKind {
    type Err = UnknownPowerup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "magnet" => Ok(PowerupKind::Magnet),
            "doubleCoins" | "double_coins" => Ok(PowerupKind::DoubleCoins),
            "speed" => Ok(PowerupKind::Speed),
            "shield" => Ok(PowerupKind::Shield),
            _ => Err(UnknownPowerup(s.to_string())),
        }
    }
}

/// Obstacle size profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleVariant {
    /// 40 wide, random height
    #[default]
    Standard,
    /// 30 wide, taller than the max random height
    Tall,
    /// 80 wide, minimum height
    Wide,
}

impl ObstacleVariant {
    pub fn from_index(index: u32) -> Self {
        match index {
            1 => ObstacleVariant::Tall,
            2 => ObstacleVariant::Wide,
            _ => ObstacleVariant::Standard,
        }
    }
}

/// An obstacle the player must jump over
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: Body,
    pub variant: ObstacleVariant,
}

impl Poolable for Obstacle {
    fn dormant() -> Self {
        Self {
            body: Body::dormant(Vec2::ZERO),
            variant: ObstacleVariant::Standard,
        }
    }
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub body: Body,
    /// Velocity while pulled by the magnet
    pub vel: Vec2,
    /// Currently pulled toward the player
    pub attracted: bool,
}

impl Poolable for Coin {
    fn dormant() -> Self {
        Self {
            body: Body::dormant(Vec2::splat(COIN_SIZE)),
            vel: Vec2::ZERO,
            attracted: false,
        }
    }
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
    fn clear_transient(&mut self) {
        self.vel = Vec2::ZERO;
        self.attracted = false;
    }
}

/// A powerup pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub body: Body,
    pub kind: PowerupKind,
}

impl Poolable for Pickup {
    fn dormant() -> Self {
        Self {
            body: Body::dormant(Vec2::splat(POWERUP_SIZE)),
            kind: PowerupKind::Magnet,
        }
    }
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub has_speed_boost: bool,
    pub has_shield: bool,
}

impl Player {
    /// Player standing on the ground line
    pub fn new(ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_INITIAL_X, Self::rest_y(ground_y)),
            vertical_velocity: 0.0,
            grounded: true,
            has_speed_boost: false,
            has_shield: false,
        }
    }

    fn rest_y(ground_y: f32) -> f32 {
        ground_y - PLAYER_HEIGHT / 2.0
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(PLAYER_HITBOX_WIDTH, PLAYER_HEIGHT))
    }

    /// Start a jump. Only possible from the ground.
    pub fn jump(&mut self) -> bool {
        if !self.grounded {
            return false;
        }
        self.vertical_velocity = PLAYER_JUMP_VELOCITY;
        self.grounded = false;
        true
    }

    /// Integrate gravity and land on the ground line
    pub fn update(&mut self, dt_secs: f32, ground_y: f32) {
        if self.grounded {
            return;
        }
        self.vertical_velocity += GRAVITY * dt_secs;
        self.pos.y += self.vertical_velocity * dt_secs;

        let rest = Self::rest_y(ground_y);
        if self.pos.y >= rest {
            self.pos.y = rest;
            self.vertical_velocity = 0.0;
            self.grounded = true;
        }
    }

    pub fn set_speed_boost(&mut self, active: bool) {
        self.has_speed_boost = active;
    }

    pub fn set_shield(&mut self, active: bool) {
        self.has_shield = active;
    }

    /// Movement factor including any boost
    pub fn speed_factor(&self) -> f32 {
        if self.has_speed_boost {
            SPEED_BOOST_MULTIPLIER
        } else {
            1.0
        }
    }
}

/// The three entity pools
#[derive(Debug, Clone)]
pub struct World {
    pub obstacles: Pool<Obstacle>,
    pub coins: Pool<Coin>,
    pub pickups: Pool<Pickup>,
}

impl Default for World {
    fn default() -> Self {
        Self {
            obstacles: Pool::new(MAX_OBSTACLES),
            coins: Pool::new(MAX_COINS),
            pickups: Pool::new(MAX_PICKUPS),
        }
    }
}

impl World {
    pub fn release_all(&mut self) {
        self.obstacles.release_all();
        self.coins.release_all();
        self.pickups.release_all();
    }
}

/// Notifications produced during a tick, drained by the bridge afterwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Paused,
    Resumed,
    GameOver { final_score: u64 },
    ScoreChanged { score: u64 },
    CoinCollected { value: u32 },
    PowerupActivated { kind: PowerupKind, duration_secs: f32 },
    PowerupDeactivated { kind: PowerupKind },
}

/// Remaining time of one active powerup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePowerup {
    pub kind: PowerupKind,
    pub remaining_secs: f32,
}

/// Read-only view of a run for UI polling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    pub phase: GamePhase,
    pub distance: f32,
    pub game_speed: f32,
    pub score: u64,
    pub coins: u64,
    pub coins_collected: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
    pub active_powerups: Vec<ActivePowerup>,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Distance-units travelled this run
    pub distance: f32,
    /// Scroll speed (units/s)
    pub game_speed: f32,
    pub score: u64,
    /// Coin value collected this run (double-coin pickups count twice)
    pub coins: u64,
    /// Number of coins picked up
    pub coins_collected: u32,
    /// Simulated milliseconds spent running
    pub elapsed_ms: f64,
    pub player: Player,
    pub world: World,
    pub spawner: ObstacleSpawner,
    pub powerups: PowerupCoordinator,
    /// Pending notifications for the UI layer
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle run with the given balance and seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawner = ObstacleSpawner::new(&tuning, &mut rng);
        let powerups = PowerupCoordinator::new(tuning.powerup_duration);
        Self {
            seed,
            rng,
            phase: GamePhase::Idle,
            distance: 0.0,
            game_speed: tuning.base_speed,
            score: 0,
            coins: 0,
            coins_collected: 0,
            elapsed_ms: 0.0,
            player: Player::new(tuning.ground_y()),
            world: World::default(),
            spawner,
            powerups,
            events: Vec::new(),
            tuning,
        }
    }

    /// Re-initialize every run variable. The RNG stream continues.
    pub fn reset(&mut self) {
        self.distance = 0.0;
        self.game_speed = self.tuning.base_speed;
        self.score = 0;
        self.coins = 0;
        self.coins_collected = 0;
        self.elapsed_ms = 0.0;
        self.player = Player::new(self.tuning.ground_y());
        self.world.release_all();
        self.powerups.clear();
        self.spawner.reset(&self.tuning, &mut self.rng);
        self.events.clear();
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Score implied by the current distance and coin tally
    pub fn computed_score(&self) -> u64 {
        let distance_score = (self.distance * self.tuning.distance_multiplier).floor();
        distance_score.max(0.0) as u64 + self.coins
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            phase: self.phase,
            distance: self.distance,
            game_speed: self.game_speed,
            score: self.score,
            coins: self.coins,
            coins_collected: self.coins_collected,
            is_game_over: self.is_game_over(),
            is_paused: self.is_paused(),
            active_powerups: self.powerups.active().collect(),
        }
    }
}
