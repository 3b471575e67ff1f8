// ============================
// crates/backend-lib/src/auth/throttle.rs
// ============================
//! Per-account failed-login throttle.
//!
//! Each email with at least one recent failure owns a [`ThrottleEntry`].
//! Five consecutive failures inside a 30 minute sliding window (measured
//! from the most recent failure) lock the account until the window elapses.
//! A successful login removes the entry outright.
//!
//! Emails are used verbatim as keys; `A@x.com` and `a@x.com` are tracked
//! separately.

use crate::auth::clock::Clock;
use crate::metrics::{LOGIN_LOCKED, THROTTLE_TRACKED};
use crate::validation::mask_email;
use dashmap::DashMap;
use metrics::{counter, gauge};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Consecutive failures that lock an account
pub const LOCKOUT_THRESHOLD: u32 = 5;

/// Sliding window measured from the most recent failure (30 minutes)
pub const THROTTLE_WINDOW: Duration = Duration::from_secs(30 * 60);

/// Failure bookkeeping for one email
#[derive(Debug, Clone, Copy)]
struct ThrottleEntry {
    /// Consecutive failures since the last reset
    attempts: u32,
    /// Time of the most recent failure
    last_attempt: Instant,
}

impl ThrottleEntry {
    /// A `now` earlier than `last_attempt` counts as zero elapsed time.
    fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_attempt) >= THROTTLE_WINDOW
    }

    fn status(&self, now: Instant) -> LockStatus {
        if self.attempts >= LOCKOUT_THRESHOLD && !self.expired(now) {
            LockStatus::locked(retry_after_secs(self.last_attempt, now))
        } else {
            LockStatus::OPEN
        }
    }
}

/// Whether an account is locked, and for how long
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockStatus {
    pub locked: bool,
    /// Whole seconds until the lock lifts, rounded up; zero when unlocked
    pub retry_after_secs: u64,
}

impl LockStatus {
    pub const OPEN: LockStatus = LockStatus {
        locked: false,
        retry_after_secs: 0,
    };

    fn locked(retry_after_secs: u64) -> Self {
        Self {
            locked: true,
            retry_after_secs,
        }
    }
}

fn retry_after_secs(last_attempt: Instant, now: Instant) -> u64 {
    let remaining = (last_attempt + THROTTLE_WINDOW).saturating_duration_since(now);
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

/// Failed-attempt counters keyed by email.
///
/// Every operation runs under the map's per-key entry lock, so the
/// read-check-write on a single email is one critical section while other
/// emails proceed in parallel. No hashing or I/O happens under the lock.
#[derive(Debug, Clone, Default)]
pub struct LoginThrottle {
    entries: Arc<DashMap<String, ThrottleEntry>>,
}

impl LoginThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the entry for `email` if its window has elapsed.
    ///
    /// Returns `true` when an entry was removed.
    pub fn check_and_maybe_reset(&self, email: &str, now: Instant) -> bool {
        let removed = self
            .entries
            .remove_if(email, |_, entry| entry.expired(now))
            .is_some();
        if removed {
            debug!(email = %mask_email(email), "throttle window elapsed, counter cleared");
            self.publish_tracked();
        }
        removed
    }

    /// Record a failed attempt and return the resulting lock status.
    ///
    /// A failure arriving after the window has elapsed starts a fresh count
    /// of one instead of extending the old one.
    pub fn record_failure(&self, email: &str, now: Instant) -> LockStatus {
        let status = {
            let mut entry = self
                .entries
                .entry(email.to_owned())
                .or_insert(ThrottleEntry {
                    attempts: 0,
                    last_attempt: now,
                });

            if entry.expired(now) {
                entry.attempts = 0;
            }
            entry.attempts = entry.attempts.saturating_add(1);
            // never move the window start backwards on a skewed `now`
            entry.last_attempt = entry.last_attempt.max(now);
            entry.status(now)
        };
        self.publish_tracked();

        if status.locked {
            counter!(LOGIN_LOCKED).increment(1);
            info!(
                email = %mask_email(email),
                retry_after_secs = status.retry_after_secs,
                "account locked after repeated login failures"
            );
        }
        status
    }

    /// Forget every failure recorded for `email`.
    pub fn record_success(&self, email: &str) {
        if self.entries.remove(email).is_some() {
            self.publish_tracked();
        }
    }

    /// Lock status of `email` at `now`.
    pub fn is_locked(&self, email: &str, now: Instant) -> LockStatus {
        self.entries
            .get(email)
            .map_or(LockStatus::OPEN, |entry| entry.status(now))
    }

    /// Consecutive failures currently on record for `email`
    pub fn attempts(&self, email: &str) -> u32 {
        self.entries.get(email).map_or(0, |entry| entry.attempts)
    }

    /// Number of emails with a live entry
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }

    /// Drop every entry whose window has elapsed. Returns how many went.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        self.publish_tracked();
        removed
    }

    fn publish_tracked(&self) {
        gauge!(THROTTLE_TRACKED).set(self.entries.len() as f64);
    }

    /// Run [`sweep`](Self::sweep) every `every` on the tokio runtime.
    ///
    /// A zero interval disables sweeping and returns `None`.
    pub fn spawn_sweeper(&self, every: Duration, clock: Arc<dyn Clock>) -> Option<JoinHandle<()>> {
        if every.is_zero() {
            return None;
        }

        let throttle = self.clone();
        Some(tokio::spawn(async move {
            let start = tokio::time::Instant::now() + every;
            let mut ticker = tokio::time::interval_at(start, every);
            loop {
                ticker.tick().await;
                let removed = throttle.sweep(clock.now());
                if removed > 0 {
                    debug!(removed, remaining = throttle.tracked(), "swept expired throttle entries");
                }
            }
        }))
    }
}
