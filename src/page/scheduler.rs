//! Deterministic one-shot timer scheduling
//!
//! The original page script leans on fire-and-forget browser timers for
//! alert dismissal and submit-button restore. Here those become explicit
//! scheduled actions against a virtual clock: the host (or a test)
//! advances time manually and applies whatever came due. Every timer is
//! one-shot and individually cancellable.

use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque handle to a scheduled timer, usable for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// What a timer does when it fires.
///
/// Actions are plain data applied to page state by the caller, which
/// keeps the scheduler itself free of any borrow entanglement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Trigger the dismiss control of the alert at this index.
    DismissAlert(usize),
    /// Re-enable the submit button of the form at this index.
    RestoreSubmit(usize),
}

#[derive(Debug)]
struct ScheduledTimer {
    handle: TimerHandle,
    due_ms: u64,
    action: TimerAction,
}

/// A virtual-time scheduler for one-shot timers.
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    timers: Vec<ScheduledTimer>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Implementation
// ─────────────────────────────────────────────────────────────────────────────

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers still pending.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Schedule `action` to fire `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, action: TimerAction) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        let due_ms = self.now_ms.saturating_add(delay_ms);
        debug!("Scheduling {:?} at t={}ms", action, due_ms);
        self.timers.push(ScheduledTimer {
            handle,
            due_ms,
            action,
        });
        handle
    }

    /// Cancel a pending timer.
    ///
    /// Returns `true` if the timer was still pending. Cancelling an
    /// already-fired or unknown handle is a no-op.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        before != self.timers.len()
    }

    /// Advance virtual time by `dt_ms` and collect every action that
    /// came due, ordered by due time (ties in scheduling order).
    pub fn advance(&mut self, dt_ms: u64) -> Vec<TimerAction> {
        self.now_ms = self.now_ms.saturating_add(dt_ms);
        let now = self.now_ms;

        let mut due: Vec<ScheduledTimer> = Vec::new();
        let mut i = 0;
        while i < self.timers.len() {
            if self.timers[i].due_ms <= now {
                due.push(self.timers.remove(i));
            } else {
                i += 1;
            }
        }

        due.sort_by_key(|t| (t.due_ms, t.handle.0));
        due.into_iter().map(|t| t.action).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_only_after_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(5000, TimerAction::DismissAlert(0));

        assert!(scheduler.advance(4999).is_empty());
        assert_eq!(scheduler.advance(1), vec![TimerAction::DismissAlert(0)]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_timers_are_one_shot() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(100, TimerAction::RestoreSubmit(0));

        assert_eq!(scheduler.advance(100).len(), 1);
        assert!(scheduler.advance(100).is_empty());
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(100, TimerAction::DismissAlert(3));

        assert!(scheduler.cancel(handle));
        assert!(scheduler.advance(1000).is_empty());
        // Cancelling again is a no-op
        assert!(!scheduler.cancel(handle));
    }

    #[test]
    fn test_due_order_over_scheduling_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(200, TimerAction::RestoreSubmit(1));
        scheduler.schedule(100, TimerAction::DismissAlert(2));

        let fired = scheduler.advance(300);
        assert_eq!(
            fired,
            vec![TimerAction::DismissAlert(2), TimerAction::RestoreSubmit(1)]
        );
    }

    #[test]
    fn test_ties_fire_in_scheduling_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(100, TimerAction::DismissAlert(0));
        scheduler.schedule(100, TimerAction::DismissAlert(1));

        let fired = scheduler.advance(100);
        assert_eq!(
            fired,
            vec![TimerAction::DismissAlert(0), TimerAction::DismissAlert(1)]
        );
    }

    #[test]
    fn test_advance_accumulates_time() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(300, TimerAction::DismissAlert(0));

        assert!(scheduler.advance(100).is_empty());
        assert!(scheduler.advance(100).is_empty());
        assert_eq!(scheduler.advance(100).len(), 1);
        assert_eq!(scheduler.now_ms(), 300);
    }
}
