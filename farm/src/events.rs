//! Notifications emitted by the farms.

use svote_types::{BallotId, Principal, Timestamp, Wei};

/// Farm-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FarmEvent {
    BallotCreated { id: BallotId, owner: Principal },
    VoteCast { id: BallotId, index: u64, voter: Principal },
    Sponsored { id: BallotId, sponsor: Principal, amount: Wei },
    SeckeyRevealed { id: BallotId },
    OwnerChanged { id: BallotId, owner: Principal },
    Deprecated { id: BallotId },
    EndTimeChanged { id: BallotId, end: Timestamp },
}

/// Synchronous fan-out event bus.
///
/// Listeners run inline on the emitting call, after its state change is
/// committed.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&FarmEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&FarmEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: FarmEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
