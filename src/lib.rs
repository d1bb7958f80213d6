//! Dash Runner - An endless-runner arcade game
//!
//! Core modules:
//! - `sim`: Gameplay simulation (pools, spawning, powerups, collisions, run loop)
//! - `bridge`: Notifications to the UI layer and commands coming back from it
//! - `game`: Per-frame driver tying the simulation to the bridge
//! - `tuning`: Data-driven game balance
//! - `highscores`: Local best scores for signed-out players
//! - `server`: Leaderboard persistence API

pub mod bridge;
pub mod game;
pub mod highscores;
pub mod server;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use bridge::{Command, CommandQueue, UiNotifier};
pub use game::Game;
pub use highscores::HighScores;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Viewport dimensions
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Player physics (units/s² and units/s)
    pub const GRAVITY: f32 = 1000.0;
    pub const PLAYER_JUMP_VELOCITY: f32 = -600.0;

    /// Base scroll speed (units/s)
    pub const GAME_SPEED: f32 = 300.0;
    /// Documented top speed. Only applied when `Tuning::speed_cap` is set.
    pub const MAX_GAME_SPEED: f32 = 800.0;
    /// Speed gained per elapsed millisecond
    pub const GAME_ACCELERATION: f32 = 0.001;

    /// Ground strip height at the bottom of the viewport
    pub const GROUND_HEIGHT: f32 = 64.0;
    pub const PLAYER_INITIAL_X: f32 = 150.0;
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 64.0;
    /// Hitbox is slightly narrower than the sprite
    pub const PLAYER_HITBOX_WIDTH: f32 = 28.0;

    /// Scoring
    pub const COIN_VALUE: u32 = 10;
    pub const DISTANCE_SCORE_MULTIPLIER: f32 = 0.1;

    /// Collectibles
    pub const COIN_SIZE: f32 = 24.0;
    pub const POWERUP_SIZE: f32 = 32.0;
    /// Chance per obstacle group
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.05;
    /// Seconds
    pub const POWERUP_DURATION: f32 = 15.0;

    /// Powerup effects
    pub const MAGNET_RADIUS: f32 = 200.0;
    pub const MAGNET_MIN_PULL: f32 = 100.0;
    pub const MAGNET_MAX_PULL: f32 = 400.0;
    pub const DOUBLE_COINS_MULTIPLIER: u32 = 2;
    pub const SPEED_BOOST_MULTIPLIER: f32 = 1.5;

    /// Obstacles
    pub const OBSTACLE_MIN_DISTANCE: u32 = 400;
    pub const OBSTACLE_MAX_DISTANCE: u32 = 800;
    pub const OBSTACLE_MIN_HEIGHT: u32 = 30;
    pub const OBSTACLE_MAX_HEIGHT: u32 = 80;
    pub const OBSTACLE_VARIATIONS: u32 = 3;
    /// Spawn this far past the right edge of the viewport
    pub const SPAWN_MARGIN: f32 = 100.0;
    /// Horizontal jitter of a powerup spawned with an obstacle
    pub const POWERUP_JITTER: i32 = 50;

    /// Pool capacities
    pub const MAX_OBSTACLES: usize = 10;
    pub const MAX_COINS: usize = 20;
    pub const MAX_PICKUPS: usize = 5;

    /// Upper bound for a coin group spawned with one obstacle
    pub const MAX_COINS_PER_GROUP: u32 = 5;
}

/// Y coordinate of the ground line for a viewport of the given height
#[inline]
pub fn ground_line(viewport_height: f32) -> f32 {
    viewport_height - consts::GROUND_HEIGHT
}

/// Unit vector and distance from `from` to `to` (zero vector when coincident)
#[inline]
pub fn direction_and_distance(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    (delta.normalize_or_zero(), delta.length())
}
