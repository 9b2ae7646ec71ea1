//! Virtual-time timer queue.
//!
//! The session engine never touches wall time. Every timer is an entry in
//! this queue, and whoever owns the engine decides how virtual time moves:
//! tests advance it directly, the tokio runtime feeds it wall-clock deltas.

/// A timer firing inside the session engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One-second countdown tick.
    Tick,
    /// The post-feedback display delay ran out.
    AdvanceDue,
    /// The current show/memorize recall phase ran out.
    RecallDue,
}

/// Handle for cancelling a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CancelToken(u64);

#[derive(Debug, Clone)]
struct Entry {
    due_ms: u64,
    seq: u64,
    event: TimerEvent,
}

/// Deadline-ordered queue of pending timers over virtual milliseconds.
///
/// Events with equal deadlines fire in scheduling order. The queue is tiny
/// (a session holds at most three pending timers), so a plain vector is
/// enough.
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    pending: Vec<Entry>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers still pending.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Schedule `event` to fire `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, event: TimerEvent) -> CancelToken {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Entry {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            event,
        });
        CancelToken(seq)
    }

    /// Drop a pending timer. Idempotent; a token that already fired or was
    /// cancelled is ignored.
    pub fn cancel(&mut self, token: CancelToken) {
        self.pending.retain(|entry| entry.seq != token.0);
    }

    /// Pop the earliest timer due at or before `target_ms`, moving virtual
    /// time to its deadline. Returns `None` once nothing is due by then.
    ///
    /// Callers re-schedule follow-up timers between pops, so deadlines stay
    /// chronological even across chains of one-second ticks.
    pub fn pop_due(&mut self, target_ms: u64) -> Option<TimerEvent> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due_ms <= target_ms)
            .min_by_key(|(_, entry)| (entry.due_ms, entry.seq))
            .map(|(index, _)| index)?;

        let entry = self.pending.swap_remove(index);
        self.now_ms = self.now_ms.max(entry.due_ms);
        Some(entry.event)
    }

    /// Move virtual time forward to `target_ms`. Never moves backwards.
    pub fn advance_to(&mut self, target_ms: u64) {
        self.now_ms = self.now_ms.max(target_ms);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
