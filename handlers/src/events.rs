//! Events handlers emit after a transaction is applied.

use dpos_types::{Address, BigNumber, PublicKey, TransactionId};

#[derive(Clone, Debug, PartialEq)]
pub enum TransactionEvent {
    DelegateRegistered {
        address: Address,
        username: String,
    },
    DelegateResigned {
        address: Address,
        username: String,
    },
    Vote {
        voter: Address,
        delegate: PublicKey,
    },
    Unvote {
        voter: Address,
        delegate: PublicKey,
    },
    SecondSignatureRegistered {
        sender: PublicKey,
    },
    MultiSignatureRegistered {
        address: Address,
        min: u8,
    },
    IpfsRegistered {
        sender: PublicKey,
        hash: String,
    },
    HtlcLocked {
        lock_id: TransactionId,
        sender: PublicKey,
        recipient: Address,
        amount: BigNumber,
    },
    HtlcClaimed {
        lock_id: TransactionId,
        claimer: PublicKey,
    },
    HtlcRefunded {
        lock_id: TransactionId,
        sender: PublicKey,
    },
}

/// Sink for [`TransactionEvent`]s.
pub trait EventDispatcher {
    fn dispatch(&self, event: TransactionEvent);
}

/// Synchronous fan-out of transaction events.
///
/// Listeners run inline on the dispatching thread.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&TransactionEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&TransactionEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &TransactionEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDispatcher for EventBus {
    fn dispatch(&self, event: TransactionEvent) {
        self.emit(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn voter() -> Address {
        Address::new("D61mfSggzbvQgTUe6JhYKH2doHaqJ3Dyib")
    }

    #[test]
    fn dispatch_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.dispatch(TransactionEvent::Vote {
            voter: voter(),
            delegate: PublicKey([2; 33]),
        });
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn listener_sees_the_variant() {
        let unvotes = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::default();
        let seen = Arc::clone(&unvotes);
        bus.subscribe(Box::new(move |event| {
            if matches!(event, TransactionEvent::Unvote { .. }) {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        }));

        bus.dispatch(TransactionEvent::Vote {
            voter: voter(),
            delegate: PublicKey([2; 33]),
        });
        bus.dispatch(TransactionEvent::Unvote {
            voter: voter(),
            delegate: PublicKey([2; 33]),
        });
        assert_eq!(unvotes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_bus_is_a_noop() {
        let bus = EventBus::default();
        assert!(bus.listeners.is_empty());
        bus.emit(&TransactionEvent::SecondSignatureRegistered {
            sender: PublicKey([3; 33]),
        });
    }
}
