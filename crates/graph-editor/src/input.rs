//! Keyboard state provider.
//!
//! Hit testing and drag handlers ask an [`InputState`] which modifier keys
//! are held instead of reading a process-wide table. Hosts implement the
//! trait over their own event loop; [`KeyStates`] is a plain implementation
//! the host (or a test) updates by hand.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Keys the graph editor reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Space,
    Z,
    Alt,
    Shift,
    Escape,
    Delete,
    Backspace,
}

/// Source of "is this key held" answers.
pub trait InputState {
    fn is_key_down(&self, key: Key) -> bool;
}

impl<T: InputState + ?Sized> InputState for &T {
    fn is_key_down(&self, key: Key) -> bool {
        (**self).is_key_down(key)
    }
}

/// A set of held keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyStates {
    down: HashSet<Key>,
}

impl KeyStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper: the given keys held.
    pub fn with(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            down: keys.into_iter().collect(),
        }
    }

    pub fn press(&mut self, key: Key) {
        self.down.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.down.remove(&key);
    }

    pub fn release_all(&mut self) {
        self.down.clear();
    }
}

impl InputState for KeyStates {
    fn is_key_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }
}
