//! Nullable event sink: records every dispatched event.

use dpos_handlers::{EventDispatcher, TransactionEvent};
use std::sync::{Mutex, PoisonError};

#[derive(Default)]
pub struct RecordingDispatcher {
    events: Mutex<Vec<TransactionEvent>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything dispatched so far, oldest first.
    pub fn events(&self) -> Vec<TransactionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<TransactionEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventDispatcher for RecordingDispatcher {
    fn dispatch(&self, event: TransactionEvent) {
        tracing::trace!(?event, "event recorded");
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
