//! Scheduler: a time-ordered one-shot event queue for level/wave timelines.
//!
//! The counter accumulates `speed` once per tick; whenever it crosses a
//! registered timeout, every event at that timeout fires (in registration
//! order) exactly once for the current `start()` cycle. Timeouts fire in
//! strictly ascending order; once the pending list drains the scheduler
//! stops until the next `start()`.

use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    speed: i64,
    counter: i64,
    running: bool,
    events: BTreeMap<i64, Vec<E>>,
    /// Pending timeouts for the current cycle, ascending; index 0 is next.
    pending: Vec<i64>,
}

impl<E: Clone> Scheduler<E> {
    /// `speed` is the signed counter increment per `update()`. A speed of
    /// zero yields a scheduler that is inert after `start()` (a paused
    /// timeline), which is intentional rather than an error.
    pub fn new(speed: i64) -> Self {
        Self {
            speed,
            counter: 0,
            running: false,
            events: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    /// Register an event at a time threshold. Multiple events may share a
    /// threshold; they fire in registration order.
    pub fn add_event(&mut self, time: i64, event: E) {
        self.events.entry(time).or_default().push(event);
    }

    /// Reset the counter and recompute the pending timeout list, ascending.
    pub fn start(&mut self) {
        self.counter = 0;
        self.running = true;
        self.pending = self.events.keys().copied().collect();
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    pub fn speed(&self) -> i64 {
        self.speed
    }

    /// Advance one tick and return every event whose threshold was crossed.
    ///
    /// No-op when not running. Sets `running = false` the moment the pending
    /// list drains.
    pub fn update(&mut self) -> Vec<E> {
        if !self.running {
            return Vec::new();
        }
        self.counter += self.speed;

        let mut fired = Vec::new();
        let mut drained = 0;
        for &timeout in &self.pending {
            if timeout > self.counter {
                break;
            }
            if let Some(bucket) = self.events.get(&timeout) {
                fired.extend(bucket.iter().cloned());
            }
            drained += 1;
        }
        self.pending.drain(..drained);

        if self.pending.is_empty() {
            self.running = false;
        }
        fired
    }
}
