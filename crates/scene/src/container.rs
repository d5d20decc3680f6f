use shimmer_common::SlotId;

use crate::lifecycle::SceneError;

/// Slot-owned attachment of scene resources.
///
/// The container owns each slot; attached resources hold no reference back
/// to their parent. Freed slots are reused, so long-running scenes do not
/// grow the slot table per rebuild.
#[derive(Debug)]
pub struct Container<R> {
    slots: Vec<Option<R>>,
}

impl<R> Container<R> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Attach a resource, returning the slot that now owns it.
    pub fn add(&mut self, resource: R) -> SlotId {
        if let Some(free) = self.slots.iter().position(|s| s.is_none()) {
            self.slots[free] = Some(resource);
            return SlotId(free as u32);
        }
        self.slots.push(Some(resource));
        SlotId((self.slots.len() - 1) as u32)
    }

    /// Detach and return the resource in `slot`.
    pub fn remove(&mut self, slot: SlotId) -> Result<R, SceneError> {
        self.slots
            .get_mut(slot.0 as usize)
            .and_then(Option::take)
            .ok_or(SceneError::EmptySlot(slot))
    }

    pub fn get(&self, slot: SlotId) -> Option<&R> {
        self.slots.get(slot.0 as usize).and_then(Option::as_ref)
    }

    /// Number of attached resources.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R> Default for Container<R> {
    fn default() -> Self {
        Self::new()
    }
}
