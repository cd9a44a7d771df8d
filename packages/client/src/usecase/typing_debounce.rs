//! Typing-notice debounce timer.
//!
//! One owned deadline per session. Arming replaces any previous deadline, so
//! at most one "stopped typing" notice is ever pending, and dropping or
//! cancelling the timer guarantees it never fires. The session loop waits on
//! [`sleep_until_deadline`] and then calls [`TypingDebounce::fire`].

use std::{future, time::Duration};

use tokio::time::{Instant, sleep_until};

/// Scoped debounce timer for typing notices
#[derive(Debug, Clone)]
pub struct TypingDebounce {
    idle_after: Duration,
    deadline: Option<Instant>,
}

impl TypingDebounce {
    /// Create a disarmed timer that fires `idle_after` past the last arm
    pub fn new(idle_after: Duration) -> Self {
        Self {
            idle_after,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the timer from now. The previous deadline is released.
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.idle_after);
    }

    /// Disarm the timer. Returns whether a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Pending deadline, if armed
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a deadline is pending
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the deadline if it has passed at `now`.
    ///
    /// Returns true exactly once per arm, and only after the full quiet period.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Sleep until `deadline`; never resolves for `None`.
pub async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending::<()>().await,
    }
}
