//! Nullable clock: deterministic network time for testing.

use dpos_blocks::Clock;
use std::cell::Cell;

/// A deterministic clock counting seconds since the network epoch.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: Cell<u32>,
}

impl NullClock {
    pub fn new(initial_secs: u32) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u32) {
        self.current.set(self.current.get().saturating_add(secs));
    }

    /// Set the time to a specific value.
    pub fn set(&self, secs: u32) {
        self.current.set(secs);
    }
}

impl Clock for NullClock {
    fn now(&self) -> u32 {
        self.current.get()
    }
}
