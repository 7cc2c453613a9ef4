//! Deferred one-shot actions on the simulation clock
//!
//! Every timer records the mode that scheduled it. Leaving that mode cancels
//! it, so nothing scheduled for one mode can fire in another.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, Screen, SoundCue};

/// Work a timer performs when it comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedAction {
    SpawnBoss,
    PlaySound(SoundCue),
    Navigate(Screen),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    /// Simulation time at which the timer fires
    pub due: f64,
    pub owner: GamePhase,
    pub action: TimedAction,
}

/// Timers sorted by due time (FIFO among equal times)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self { timers: Vec::new() }
    }

    pub fn schedule(&mut self, due: f64, owner: GamePhase, action: TimedAction) {
        let idx = self.timers.partition_point(|t| t.due <= due);
        self.timers.insert(idx, Timer { due, owner, action });
    }

    /// Remove the earliest timer if it is due at `now`
    pub fn pop_due(&mut self, now: f64) -> Option<Timer> {
        match self.timers.first() {
            Some(t) if t.due <= now => Some(self.timers.remove(0)),
            _ => None,
        }
    }

    /// Drop every timer scheduled by `owner`; returns how many were dropped
    pub fn cancel_owned_by(&mut self, owner: GamePhase) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.owner != owner);
        before - self.timers.len()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn is_pending(&self, action: TimedAction) -> bool {
        self.timers.iter().any(|t| t.action == action)
    }
}
