//! Deferred effects scheduled on the simulation clock
//!
//! Temporary power-up effects revert through this queue rather than through
//! wall-clock callbacks, so pausing the simulation pauses them and a session
//! reset discards them.

use serde::{Deserialize, Serialize};

/// Handle for a scheduled effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u32);

/// Work to perform when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeferredEffect {
    /// Give back fire interval (ms) that a weapon pickup took away
    RestoreFireRate { amount_ms: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scheduled {
    id: TimerId,
    due_ms: f64,
    effect: DeferredEffect,
}

/// Pending deferred effects, ordered by due time then scheduling order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectTimers {
    pending: Vec<Scheduled>,
    next_id: u32,
}

impl EffectTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `effect` to fire once the clock reaches `now_ms + delay_ms`
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f32, effect: DeferredEffect) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due_ms = now_ms + delay_ms.max(0.0) as f64;
        // Insert after every entry due at or before us to keep FIFO among ties
        let at = self.pending.partition_point(|s| s.due_ms <= due_ms);
        self.pending.insert(at, Scheduled { id, due_ms, effect });
        id
    }

    /// Drop a pending effect; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    /// Discard everything still pending
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Remove and return every effect due at `now_ms`, oldest first
    pub fn take_due(&mut self, now_ms: f64) -> Vec<DeferredEffect> {
        let due = self.pending.partition_point(|s| s.due_ms <= now_ms);
        self.pending.drain(..due).map(|s| s.effect).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
