//! Overlap detection and pickup resolution
//!
//! Everything in a run is an axis-aligned box. Each tick the player box is
//! tested against every active obstacle, coin and pickup, and each contact
//! is resolved into an outcome the run loop applies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::{Pool, Poolable, SlotId};
use super::powerups::PowerupCoordinator;
use super::state::{Coin, GameEvent, Player, PowerupKind, World};
use crate::consts::*;
use crate::direction_and_distance;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// A player overlap found this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Obstacle(SlotId),
    Coin(SlotId),
    Pickup(SlotId),
}

/// What a resolved contact means for the run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Obstacle hit absorbed by the shield
    Shielded,
    /// Obstacle hit without a shield
    Fatal,
    /// Coin collected, worth `value`
    Coin { value: u32 },
    /// Pickup collected and handed to the coordinator
    Powerup(PowerupKind),
    /// Entity was already gone
    Stale,
}

/// All player overlaps: obstacles first, then coins, then pickups
pub fn find_contacts(player: &Player, world: &World) -> Vec<Contact> {
    let player_box = player.aabb();
    let hits = |body: &super::pool::Body| body.aabb().overlaps(&player_box);

    let mut contacts = Vec::new();
    contacts.extend(
        world
            .obstacles
            .iter_active()
            .filter(|(_, o)| hits(o.body()))
            .map(|(id, _)| Contact::Obstacle(id)),
    );
    contacts.extend(
        world
            .coins
            .iter_active()
            .filter(|(_, c)| hits(c.body()))
            .map(|(id, _)| Contact::Coin(id)),
    );
    contacts.extend(
        world
            .pickups
            .iter_active()
            .filter(|(_, p)| hits(p.body()))
            .map(|(id, _)| Contact::Pickup(id)),
    );
    contacts
}

/// Value of one coin given the double-coins state
pub fn coin_value(base: u32, double_coins: bool) -> u32 {
    if double_coins {
        base * DOUBLE_COINS_MULTIPLIER
    } else {
        base
    }
}

/// Resolve one contact.
///
/// Coins and pickups are released back to their pools here, so a collected
/// entity can never be collected twice. Obstacles are never released: a
/// shielded hit leaves the obstacle in play.
pub fn resolve_contact(
    contact: Contact,
    world: &mut World,
    powerups: &mut PowerupCoordinator,
    player: &mut Player,
    base_coin_value: u32,
    events: &mut Vec<GameEvent>,
) -> Resolution {
    match contact {
        Contact::Obstacle(id) => {
            if world.obstacles.get(id).is_none() {
                return Resolution::Stale;
            }
            if powerups.is_active(PowerupKind::Shield) {
                Resolution::Shielded
            } else {
                Resolution::Fatal
            }
        }
        Contact::Coin(id) => {
            if !world.coins.release(id) {
                return Resolution::Stale;
            }
            let value = coin_value(base_coin_value, powerups.is_active(PowerupKind::DoubleCoins));
            Resolution::Coin { value }
        }
        Contact::Pickup(id) => {
            let Some(kind) = world.pickups.get(id).map(|p| p.kind) else {
                return Resolution::Stale;
            };
            world.pickups.release(id);
            powerups.on_collected(kind, player, events);
            Resolution::Powerup(kind)
        }
    }
}

/// Magnet pull speed at `distance` from the player.
///
/// Weak at the edge of the radius, strongest right next to the player.
pub fn magnet_pull_speed(distance: f32, radius: f32) -> f32 {
    (MAGNET_MAX_PULL * (1.0 - distance / radius)).max(MAGNET_MIN_PULL)
}

/// Move every active coin for one tick.
///
/// With the magnet active, coins inside `radius` head for the player;
/// everything else drifts left with the scroll speed. Coins that leave the
/// screen are released.
pub fn update_coins(
    coins: &mut Pool<Coin>,
    player_pos: Vec2,
    magnet: Option<f32>,
    game_speed: f32,
    dt_secs: f32,
) {
    let mut offscreen = Vec::new();
    for (id, coin) in coins.iter_active_mut() {
        let (dir, distance) = direction_and_distance(coin.body.pos, player_pos);
        match magnet {
            Some(radius) if distance < radius => {
                coin.attracted = true;
                coin.vel = dir * magnet_pull_speed(distance, radius);
                coin.body.pos += coin.vel * dt_secs;
            }
            _ => {
                coin.attracted = false;
                coin.vel = Vec2::ZERO;
                coin.body.pos.x -= game_speed * dt_secs;
            }
        }
        if coin.body.is_offscreen_left() {
            offscreen.push(id);
        }
    }
    for id in offscreen {
        coins.release(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn place_coin(world: &mut World, pos: Vec2) -> SlotId {
        let (id, coin) = world.coins.acquire().unwrap();
        coin.body.pos = pos;
        id
    }

    fn place_obstacle(world: &mut World, pos: Vec2) -> SlotId {
        let (id, obstacle) = world.obstacles.acquire().unwrap();
        obstacle.body.pos = pos;
        obstacle.body.size = Vec2::new(40.0, 40.0);
        id
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_center(Vec2::new(9.0, 0.0), Vec2::splat(10.0));
        let c = Aabb::from_center(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c), "touching edges are not an overlap");
    }

    #[test]
    fn test_find_contacts_order() {
        let player = Player::new(536.0);
        let mut world = World::default();
        let coin = place_coin(&mut world, player.pos);
        let obstacle = place_obstacle(&mut world, player.pos);
        place_coin(&mut world, Vec2::new(700.0, 100.0));

        assert_eq!(
            find_contacts(&player, &world),
            vec![Contact::Obstacle(obstacle), Contact::Coin(coin)]
        );
    }

    #[test]
    fn test_shield_absorbs_obstacle() {
        let mut player = Player::new(536.0);
        let mut world = World::default();
        let mut powerups = PowerupCoordinator::new(15.0);
        let mut events = Vec::new();
        let id = place_obstacle(&mut world, player.pos);

        let outcome = resolve_contact(
            Contact::Obstacle(id),
            &mut world,
            &mut powerups,
            &mut player,
            COIN_VALUE,
            &mut events,
        );
        assert_eq!(outcome, Resolution::Fatal);

        powerups.on_collected(PowerupKind::Shield, &mut player, &mut events);
        let outcome = resolve_contact(
            Contact::Obstacle(id),
            &mut world,
            &mut powerups,
            &mut player,
            COIN_VALUE,
            &mut events,
        );
        assert_eq!(outcome, Resolution::Shielded);
        assert!(world.obstacles.get(id).is_some(), "shield does not destroy");
    }

    #[test]
    fn test_coin_value_doubles() {
        let mut player = Player::new(536.0);
        let mut world = World::default();
        let mut powerups = PowerupCoordinator::new(15.0);
        let mut events = Vec::new();

        let id = place_coin(&mut world, player.pos);
        let outcome = resolve_contact(
            Contact::Coin(id),
            &mut world,
            &mut powerups,
            &mut player,
            COIN_VALUE,
            &mut events,
        );
        assert_eq!(outcome, Resolution::Coin { value: 10 });
        assert!(world.coins.get(id).is_none());

        // Same coin cannot be collected again
        let outcome = resolve_contact(
            Contact::Coin(id),
            &mut world,
            &mut powerups,
            &mut player,
            COIN_VALUE,
            &mut events,
        );
        assert_eq!(outcome, Resolution::Stale);

        powerups.on_collected(PowerupKind::DoubleCoins, &mut player, &mut events);
        let id = place_coin(&mut world, player.pos);
        let outcome = resolve_contact(
            Contact::Coin(id),
            &mut world,
            &mut powerups,
            &mut player,
            COIN_VALUE,
            &mut events,
        );
        assert_eq!(outcome, Resolution::Coin { value: 20 });
    }

    #[test]
    fn test_pickup_hands_off_to_coordinator() {
        let mut player = Player::new(536.0);
        let mut world = World::default();
        let mut powerups = PowerupCoordinator::new(15.0);
        let mut events = Vec::new();
        let id = powerups
            .spawn_pickup(&mut world.pickups, player.pos, PowerupKind::Speed)
            .unwrap();

        let outcome = resolve_contact(
            Contact::Pickup(id),
            &mut world,
            &mut powerups,
            &mut player,
            COIN_VALUE,
            &mut events,
        );
        assert_eq!(outcome, Resolution::Powerup(PowerupKind::Speed));
        assert!(player.has_speed_boost);
        assert_eq!(world.pickups.active_count(), 0);
    }

    #[test]
    fn test_magnet_speed_endpoints() {
        assert_eq!(magnet_pull_speed(200.0, 200.0), 100.0);
        assert_eq!(magnet_pull_speed(0.0, 200.0), 400.0);
        assert_eq!(magnet_pull_speed(100.0, 200.0), 200.0);
        // Clamped to the minimum over the outer quarter
        assert_eq!(magnet_pull_speed(180.0, 200.0), 100.0);
    }

    #[test]
    fn test_coins_drift_without_magnet() {
        let mut world = World::default();
        let id = place_coin(&mut world, Vec2::new(300.0, 400.0));
        update_coins(&mut world.coins, Vec2::new(150.0, 504.0), None, 300.0, 0.5);
        let coin = world.coins.get(id).unwrap();
        assert_eq!(coin.body.pos, Vec2::new(150.0, 400.0));
        assert!(!coin.attracted);
    }

    #[test]
    fn test_magnet_pulls_coins_in_range() {
        let mut world = World::default();
        let player_pos = Vec2::new(150.0, 504.0);
        let near = place_coin(&mut world, player_pos + Vec2::new(100.0, 0.0));
        let far = place_coin(&mut world, player_pos + Vec2::new(300.0, 0.0));

        update_coins(&mut world.coins, player_pos, Some(200.0), 300.0, 0.1);

        let near_coin = world.coins.get(near).unwrap();
        assert!(near_coin.attracted);
        // 200 u/s toward the player for 0.1 s
        assert!((near_coin.body.pos.x - 230.0).abs() < 1e-3);

        let far_coin = world.coins.get(far).unwrap();
        assert!(!far_coin.attracted);
        assert!((far_coin.body.pos.x - 420.0).abs() < 1e-3);
    }

    #[test]
    fn test_offscreen_coins_released() {
        let mut world = World::default();
        place_coin(&mut world, Vec2::new(-20.0, 300.0));
        update_coins(&mut world.coins, Vec2::new(150.0, 504.0), None, 300.0, 0.1);
        assert_eq!(world.coins.active_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_magnet_pull_monotonic(a in 0.0f32..200.0, b in 0.0f32..200.0) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            let near_speed = magnet_pull_speed(near, MAGNET_RADIUS);
            let far_speed = magnet_pull_speed(far, MAGNET_RADIUS);
            prop_assert!(near_speed >= far_speed);
            prop_assert!((MAGNET_MIN_PULL..=MAGNET_MAX_PULL).contains(&near_speed));
        }
    }
}
