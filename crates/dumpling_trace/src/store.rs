//! Growable per-dump slot storage.

use crate::block::MAX_SLOTS;
use dumpling_core::MISSING;

/// Argument or register values carried from block to block.
///
/// The store only grows. Slots past the current frame's count keep their
/// values so a later frame that grows back sees them again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackingStore {
    slots: Vec<String>,
}

impl BackingStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of slots ever introduced
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot was ever introduced
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current value of a slot
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(String::as_str)
    }

    /// Grow to at least `len` slots, filling new ones with [`MISSING`]
    pub fn grow_to(&mut self, len: usize) {
        if self.slots.len() < len {
            self.slots.resize(len, MISSING.to_string());
        }
    }

    /// Overwrite a slot, growing the store if needed.
    ///
    /// Returns `false` and leaves the store untouched if `index` is past
    /// [`MAX_SLOTS`].
    pub fn write(&mut self, index: usize, value: String) -> bool {
        if index > MAX_SLOTS {
            return false;
        }
        self.grow_to(index + 1);
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// The first `count` slots, growing the store to `count` first
    #[must_use]
    pub fn expose(&mut self, count: usize) -> Vec<String> {
        self.grow_to(count);
        self.slots[..count].to_vec()
    }
}
