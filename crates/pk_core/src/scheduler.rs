//! Deferred-emission scheduling
//!
//! The core resolves attempts synchronously; what it defers is the delivery
//! of follow-up work - publishing a transition after the round pause, or
//! letting the opponent "think" before its shot. Each queued item carries
//! the session generation it belongs to, so work scheduled by a superseded
//! session is dropped instead of firing into the new one.

use crate::models::SessionEvent;

/// Work the controller queues behind a delay.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Publish an event to the bus
    Emit(SessionEvent),
    /// Resolve the simulated opponent's shot
    OpponentShot,
}

/// A task stamped with the session generation that scheduled it.
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduled {
    pub generation: u64,
    pub task: Task,
}

/// Timer queue abstraction. Production uses `ManualScheduler` pumped by the
/// host's frame loop; tests use `ImmediateScheduler` to collapse all delays.
pub trait Scheduler {
    /// Queue `item` to come due after `delay_seconds`.
    fn schedule(&mut self, delay_seconds: f32, item: Scheduled);

    /// Move time forward and return everything that came due, in schedule
    /// order for equal deadlines.
    fn advance(&mut self, dt_seconds: f32) -> Vec<Scheduled>;

    /// Queued items not yet due.
    fn pending(&self) -> usize;

    /// Drop everything queued.
    fn clear(&mut self);
}

/// Real-time queue driven by the host: call `advance` with the frame delta.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: f64,
    seq: u64,
    queue: Vec<(f64, u64, Scheduled)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay_seconds: f32, item: Scheduled) {
        let fire_at = self.now + delay_seconds.max(0.0) as f64;
        self.queue.push((fire_at, self.seq, item));
        self.seq += 1;
    }

    fn advance(&mut self, dt_seconds: f32) -> Vec<Scheduled> {
        self.now += dt_seconds.max(0.0) as f64;
        let now = self.now;

        let mut due: Vec<(f64, u64, Scheduled)> = Vec::new();
        let mut rest = Vec::with_capacity(self.queue.len());
        for entry in self.queue.drain(..) {
            if entry.0 <= now {
                due.push(entry);
            } else {
                rest.push(entry);
            }
        }
        self.queue = rest;

        due.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap().then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, _, item)| item).collect()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Treats every delay as zero: items come due on the next `advance`,
/// whatever the delta. Substituted in tests and scripted sessions.
#[derive(Debug, Default)]
pub struct ImmediateScheduler {
    queue: Vec<Scheduled>,
}

impl ImmediateScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for ImmediateScheduler {
    fn schedule(&mut self, _delay_seconds: f32, item: Scheduled) {
        self.queue.push(item);
    }

    fn advance(&mut self, _dt_seconds: f32) -> Vec<Scheduled> {
        std::mem::take(&mut self.queue)
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(generation: u64) -> Scheduled {
        Scheduled {
            generation,
            task: Task::OpponentShot,
        }
    }

    #[test]
    fn test_manual_scheduler_fires_on_deadline() {
        let mut s = ManualScheduler::new();
        s.schedule(1.5, item(1));
        s.schedule(0.5, item(2));

        assert!(s.advance(0.0).is_empty());
        assert_eq!(s.pending(), 2);

        let due = s.advance(1.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].generation, 2);

        let due = s.advance(1.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].generation, 1);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_manual_scheduler_preserves_order_for_equal_deadlines() {
        let mut s = ManualScheduler::new();
        for gen in 0..4 {
            s.schedule(1.0, item(gen));
        }
        let due = s.advance(1.0);
        let gens: Vec<u64> = due.into_iter().map(|i| i.generation).collect();
        assert_eq!(gens, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_manual_scheduler_clear_drops_queue() {
        let mut s = ManualScheduler::new();
        s.schedule(0.1, item(1));
        s.clear();
        assert!(s.advance(10.0).is_empty());
    }

    #[test]
    fn test_immediate_scheduler_collapses_delay() {
        let mut s = ImmediateScheduler::new();
        s.schedule(99.0, item(1));
        assert_eq!(s.pending(), 1);
        let due = s.advance(0.0);
        assert_eq!(due.len(), 1);
        assert_eq!(s.pending(), 0);
    }
}
