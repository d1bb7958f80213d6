//! Gameplay simulation
//!
//! All run logic lives here. One call to [`tick`] advances everything:
//! - Deterministic given the seed and the sequence of inputs and deltas
//! - Entities come from fixed pools, nothing is allocated mid-run
//! - No rendering or platform dependencies

pub mod collision;
pub mod pool;
pub mod powerups;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Contact, Resolution, magnet_pull_speed};
pub use pool::{Body, Pool, Poolable, SlotId};
pub use powerups::PowerupCoordinator;
pub use spawner::ObstacleSpawner;
pub use state::{
    ActivePowerup, Coin, GameEvent, GamePhase, GameState, Obstacle, ObstacleVariant, Pickup,
    Player, PowerupKind, RunSnapshot, UnknownPowerup, World,
};
pub use tick::{TickInput, tick};
