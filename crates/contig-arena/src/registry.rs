//! Fixed-capacity slot+generation registry.
//!
//! Associates each live rank 2..=4 array with a [`GridHandle`], so the
//! backing storage can be recovered at release time from the handle alone.
//! Lookup is O(1) by slot index. Freed slots go on a free list and are
//! reused with a bumped generation, so stale handles resolve to nothing.
//! Every registry carries a unique [`ArenaId`], so handles issued by
//! another registry resolve to nothing as well.

use crate::handle::{ArenaId, GridHandle};

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A bounded slot+generation table mapping [`GridHandle`]s to owned values.
///
/// At most `capacity` values are live at once. Removing a value bumps its
/// slot's generation and returns the slot to the free list. A slot whose
/// generation would wrap back to 0 is retired instead of reused, so a
/// handle from the slot's first epoch can never match again.
pub struct Registry<T> {
    id: ArenaId,
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    live: usize,
    capacity: usize,
    total_registered: u64,
}

impl<T> Registry<T> {
    /// Create an empty registry holding at most `capacity` live values.
    pub fn new(capacity: usize) -> Self {
        Self {
            id: ArenaId::next(),
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
            capacity,
            total_registered: 0,
        }
    }

    /// Identity stamped into every handle this registry issues.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Whether another value can be registered.
    pub fn has_capacity(&self) -> bool {
        self.live < self.capacity
    }

    /// Register a value and return its handle.
    ///
    /// Hands the value back when `capacity` values are already live or
    /// no slot index is left.
    pub fn register(&mut self, value: T) -> Result<GridHandle, T> {
        if !self.has_capacity() {
            return Err(value);
        }
        let handle = if let Some(slot_idx) = self.free_list.pop() {
            let slot = &mut self.slots[slot_idx as usize];
            slot.value = Some(value);
            GridHandle::new(self.id, slot_idx, slot.generation)
        } else {
            let Ok(slot_idx) = u32::try_from(self.slots.len()) else {
                return Err(value);
            };
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            GridHandle::new(self.id, slot_idx, 0)
        };
        self.live += 1;
        self.total_registered += 1;
        Ok(handle)
    }

    /// Look up the value behind a handle.
    ///
    /// Returns `None` for stale or foreign handles.
    pub fn get(&self, handle: GridHandle) -> Option<&T> {
        self.slot(handle)?.value.as_ref()
    }

    /// Mutable lookup of the value behind a handle.
    pub fn get_mut(&mut self, handle: GridHandle) -> Option<&mut T> {
        self.slot_mut(handle)?.value.as_mut()
    }

    /// Whether the handle currently names a live value.
    pub fn contains(&self, handle: GridHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Take the value behind a handle out of the registry.
    ///
    /// Vacates the slot, bumps its generation, and makes it available for
    /// reuse. Returns `None` if the handle is stale or foreign, so a
    /// repeated call is detectable and harmless.
    pub fn find_and_release(&mut self, handle: GridHandle) -> Option<T> {
        let slot = self.slot_mut(handle)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free_list.push(handle.slot);
        }
        self.live -= 1;
        Some(value)
    }

    /// Number of live values.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Maximum number of live values.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of values ever registered. Never decreases.
    pub fn total_registered(&self) -> u64 {
        self.total_registered
    }

    /// Iterate over live handles and their values, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (GridHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.value
                .as_ref()
                .map(|v| (GridHandle::new(self.id, idx as u32, slot.generation), v))
        })
    }

    /// Remove every live value, in slot order.
    pub fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.live);
        for idx in 0..self.slots.len() {
            let handle = GridHandle::new(self.id, idx as u32, self.slots[idx].generation);
            if let Some(value) = self.find_and_release(handle) {
                out.push(value);
            }
        }
        out
    }

    /// The slot a handle names, if the handle is current and ours.
    fn slot(&self, handle: GridHandle) -> Option<&Slot<T>> {
        if handle.arena != self.id {
            return None;
        }
        let slot = self.slots.get(handle.slot as usize)?;
        (slot.generation == handle.generation).then_some(slot)
    }

    fn slot_mut(&mut self, handle: GridHandle) -> Option<&mut Slot<T>> {
        if handle.arena != self.id {
            return None;
        }
        let slot = self.slots.get_mut(handle.slot as usize)?;
        (slot.generation == handle.generation).then_some(slot)
    }
}
