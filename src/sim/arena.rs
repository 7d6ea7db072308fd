//! Index-stable entity storage
//!
//! Slots are reused through a free list and tagged with a generation so a
//! stale `EntityId` never aliases a newer entity. Dead entities keep their
//! slot until `sweep_dead` runs once at the end of a tick, so slot indices
//! stay valid during pairwise collision passes.

use super::entity::Entity;

/// Stable handle to an entity. The generation field invalidates stale references.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EntityId {
    pub index: u32,
    pub generation: u32,
}

/// Arena-based entity storage with generational indices and free list.
#[derive(Debug, Clone, Default)]
pub struct EntityArena {
    slots: Vec<Option<Entity>>,
    generations: Vec<u32>,
    free_list: Vec<u32>,
    count: usize,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            count: 0,
        }
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.count += 1;
        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            self.slots[idx] = Some(entity);
            EntityId {
                index,
                generation: self.generations[idx],
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Some(entity));
            self.generations.push(0);
            EntityId {
                index,
                generation: 0,
            }
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let idx = id.index as usize;
        if self.generations.get(idx) == Some(&id.generation) {
            self.slots[idx].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let idx = id.index as usize;
        if self.generations.get(idx) == Some(&id.generation) {
            self.slots[idx].as_mut()
        } else {
            None
        }
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Entity> {
        self.slots.get(index).and_then(|e| e.as_ref())
    }

    pub fn get_mut_by_index(&mut self, index: usize) -> Option<&mut Entity> {
        self.slots.get_mut(index).and_then(|e| e.as_mut())
    }

    /// Mutable access to two distinct occupied slots at once
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut Entity, &mut Entity)> {
        if a == b || a.max(b) >= self.slots.len() {
            return None;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo].as_mut()?;
        let second = tail[0].as_mut()?;
        if a < b {
            Some((first, second))
        } else {
            Some((second, first))
        }
    }

    /// Slot indices of entities not yet tombstoned, in slot order
    pub fn live_indices(&self) -> Vec<usize> {
        self.iter_alive().map(|(i, _)| i).collect()
    }

    /// Remove tombstoned entities and reclaim their slots.
    /// Returns the number of entities reaped.
    pub fn sweep_dead(&mut self) -> usize {
        let mut reaped = 0;
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.as_ref().is_some_and(|e| e.is_dead) {
                *slot = None;
                self.generations[idx] = self.generations[idx].wrapping_add(1);
                self.free_list.push(idx as u32);
                reaped += 1;
            }
        }
        self.count -= reaped;
        reaped
    }

    /// Iterate over (index, &Entity) for all entities not yet tombstoned.
    pub fn iter_alive(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().filter(|e| !e.is_dead).map(|e| (i, e)))
    }

    /// Iterate mutably over every occupied slot, tombstoned or not.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.slots.iter_mut().filter_map(|slot| slot.as_mut())
    }

    /// Number of occupied slots (includes tombstones until the next sweep)
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of entities not yet tombstoned
    pub fn live_count(&self) -> usize {
        self.iter_alive().count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
