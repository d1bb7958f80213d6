//! Powerup pickups and active-effect timers
//!
//! Each kind has at most one timer. Collecting a kind that is already
//! active restarts its timer at the full duration; durations never stack.

use std::collections::BTreeMap;

use glam::Vec2;

use super::pool::{Pool, SlotId};
use super::state::{ActivePowerup, GameEvent, Pickup, Player, PowerupKind};

#[derive(Debug, Clone)]
pub struct PowerupCoordinator {
    /// Seconds granted per collection
    duration: f32,
    /// Remaining seconds per active kind (ordered for stable iteration)
    active: BTreeMap<PowerupKind, f32>,
}

impl PowerupCoordinator {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration: duration_secs,
            active: BTreeMap::new(),
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Place a pickup of `kind` at `pos`; skipped when the pool is full
    pub fn spawn_pickup(
        &self,
        pickups: &mut Pool<Pickup>,
        pos: Vec2,
        kind: PowerupKind,
    ) -> Option<SlotId> {
        let (id, pickup) = pickups.acquire()?;
        pickup.kind = kind;
        pickup.body.pos = pos;
        log::debug!("Spawned {} pickup at ({:.0}, {:.0})", kind.as_str(), pos.x, pos.y);
        Some(id)
    }

    /// Activate `kind`, or restart its timer if already active
    pub fn on_collected(&mut self, kind: PowerupKind, player: &mut Player, events: &mut Vec<GameEvent>) {
        self.active.insert(kind, self.duration);
        apply_flag(kind, player, true);
        log::debug!("Powerup {} active for {}s", kind.as_str(), self.duration);
        events.push(GameEvent::PowerupActivated {
            kind,
            duration_secs: self.duration,
        });
    }

    /// Count every timer down by `dt_secs` and expire the ones that run out
    pub fn advance(&mut self, dt_secs: f32, player: &mut Player, events: &mut Vec<GameEvent>) {
        let dt = dt_secs.max(0.0);
        self.active.retain(|&kind, remaining| {
            *remaining = (*remaining - dt).max(0.0);
            if *remaining > 0.0 {
                return true;
            }
            apply_flag(kind, player, false);
            log::debug!("Powerup {} expired", kind.as_str());
            events.push(GameEvent::PowerupDeactivated { kind });
            false
        });
    }

    pub fn is_active(&self, kind: PowerupKind) -> bool {
        self.active.contains_key(&kind)
    }

    /// Seconds left for `kind`, if active
    pub fn remaining(&self, kind: PowerupKind) -> Option<f32> {
        self.active.get(&kind).copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn active(&self) -> impl Iterator<Item = ActivePowerup> + '_ {
        self.active.iter().map(|(&kind, &remaining_secs)| ActivePowerup {
            kind,
            remaining_secs,
        })
    }

    /// Drop every timer without side effects (run restart)
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

fn apply_flag(kind: PowerupKind, player: &mut Player, on: bool) {
    match kind {
        PowerupKind::Speed => player.set_speed_boost(on),
        PowerupKind::Shield => player.set_shield(on),
        // Consulted by the collision pass while active
        PowerupKind::Magnet | PowerupKind::DoubleCoins => {}
    }
}
