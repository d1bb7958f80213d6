//! Fixed-capacity entity pools
//!
//! Every entity a run will ever use is built when the pool is created.
//! Spawning acquires a dormant slot, despawning releases it back; nothing
//! is allocated or dropped while a run is in progress.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Off-stage parking spot for released entities
pub const DORMANT_POS: Vec2 = Vec2::new(-1000.0, -1000.0);

/// Index of a slot inside a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub usize);

/// Spatial and lifecycle fields shared by every pooled entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    /// Inactive bodies are skipped by updates and collisions
    pub active: bool,
    pub visible: bool,
}

impl Body {
    pub fn dormant(size: Vec2) -> Self {
        Self {
            pos: DORMANT_POS,
            size,
            active: false,
            visible: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// True once the body has scrolled fully past the left edge
    pub fn is_offscreen_left(&self) -> bool {
        self.pos.x < -self.size.x
    }
}

/// An entity that can live in a [`Pool`]
pub trait Poolable {
    /// Inactive entity created at pool-initialization time
    fn dormant() -> Self;
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
    /// Clear per-use flags left over from the previous occupant
    fn clear_transient(&mut self) {}
}

/// Arena of pre-allocated slots with a free list
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
    /// Free slot indices, popped from the back (lowest index first)
    free: Vec<usize>,
}

impl<T: Poolable> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| T::dormant()).collect(),
            free: (0..capacity).rev().collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Take a dormant slot and mark it active.
    ///
    /// Returns `None` when every slot is in use; callers treat that as a
    /// skipped spawn.
    pub fn acquire(&mut self) -> Option<(SlotId, &mut T)> {
        let idx = self.free.pop()?;
        let entity = &mut self.slots[idx];
        entity.clear_transient();
        let body = entity.body_mut();
        body.active = true;
        body.visible = true;
        Some((SlotId(idx), entity))
    }

    /// Return a slot to the pool. Releasing an inactive slot is a no-op.
    pub fn release(&mut self, id: SlotId) -> bool {
        match self.slots.get_mut(id.0) {
            Some(entity) if entity.body().active => {
                let body = entity.body_mut();
                body.active = false;
                body.visible = false;
                body.pos = DORMANT_POS;
                self.free.push(id.0);
                true
            }
            _ => false,
        }
    }

    /// Release every active slot
    pub fn release_all(&mut self) {
        for idx in 0..self.slots.len() {
            self.release(SlotId(idx));
        }
        // Restore lowest-index-first ordering
        self.free.sort_unstable_by(|a, b| b.cmp(a));
    }

    /// Active entity in `id`, if any
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).filter(|e| e.body().active)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).filter(|e| e.body().active)
    }

    /// Active entities in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, e)| e.body().active)
            .map(|(i, e)| (SlotId(i), e))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, e)| e.body().active)
            .map(|(i, e)| (SlotId(i), e))
    }

    /// Snapshot of active slot ids (lets callers release while iterating)
    pub fn active_ids(&self) -> Vec<SlotId> {
        self.iter_active().map(|(id, _)| id).collect()
    }
}
