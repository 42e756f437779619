//! Fan-out and polling for treasury events.

use std::collections::VecDeque;

use coffer_types::TreasuryEvent;

/// Synchronous fan-out event bus for treasury events.
///
/// Listeners are invoked inline while the treasury lock is held; keep
/// handlers fast and never call back into the treasury from one.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&TreasuryEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&TreasuryEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &TreasuryEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded queue of events for collaborators that poll instead of subscribing.
///
/// When full, the oldest event is dropped.
#[derive(Debug)]
pub struct EventLog {
    events: VecDeque<TreasuryEvent>,
    capacity: usize,
    dropped: u64,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: TreasuryEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Remove and return every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<TreasuryEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events discarded because the log was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_types::{Address, Amount, VoteChoice};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn deposit(n: u128) -> TreasuryEvent {
        TreasuryEvent::Deposited {
            member: Address::new([1; 20]),
            amount: Amount::new(n),
        }
    }

    #[test]
    fn emit_calls_all_listeners() {
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

        bus.emit(&deposit(1));
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn listener_receives_correct_event_variant() {
        let votes = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let v = Arc::clone(&votes);
        bus.subscribe(Box::new(move |event| {
            if let TreasuryEvent::VoteCast { .. } = event {
                v.fetch_add(1, Ordering::SeqCst);
            }
        }));

        bus.emit(&deposit(1));
        bus.emit(&TreasuryEvent::VoteCast {
            id: 1,
            voter: Address::new([2; 20]),
            choice: VoteChoice::For,
        });
        assert_eq!(votes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn log_drains_in_order() {
        let mut log = EventLog::new(8);
        log.push(deposit(1));
        log.push(deposit(2));
        assert_eq!(log.drain(), vec![deposit(1), deposit(2)]);
        assert!(log.is_empty());
    }

    #[test]
    fn full_log_drops_oldest() {
        let mut log = EventLog::new(2);
        for n in 1..=3 {
            log.push(deposit(n));
        }
        assert_eq!(log.dropped(), 1);
        assert_eq!(log.drain(), vec![deposit(2), deposit(3)]);
    }
}
