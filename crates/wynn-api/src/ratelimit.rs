//! Shared rate-limit state driven by server-reported counters
//!
//! The Wynncraft API reports its per-minute budget on every response via the
//! `RateLimit-Reset`, `RateLimit-Limit`, and `RateLimit-Remaining` headers.
//! [`RateLimiter`] holds the latest reported values behind a mutex so that
//! concurrent requests sharing one client can self-throttle before touching
//! the network.
//!
//! The limiter is a gate, not a scheduler: [`RateLimiter::is_rate_limited`]
//! answers "may I send now?" without blocking, and nothing in this module
//! ever waits on the reset timestamp.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use tracing::debug;

/// The per-minute request budget the API advertises for unauthenticated use.
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 180;

/// A read-only copy of the current rate-limit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    /// Absolute time (epoch milliseconds) at which the budget refills
    pub reset_at: i64,
    /// Requests left in the current window
    pub remaining: u32,
    /// Window size as last reported by the server
    pub max: u32,
}

#[derive(Debug)]
struct RateLimitState {
    reset_at: i64,
    remaining: u32,
    max: u32,
}

/// Thread-safe holder of the latest server-reported rate-limit counters.
///
/// Updates are last-write-wins: two concurrent exchanges may race on the
/// update, and the gate check is not linearized against it. The server is
/// the source of truth and re-reports on every response, so a stale write is
/// corrected one exchange later at worst.
///
/// Shared by `Arc` between every request a client issues; an embedding
/// application can also construct one and inject it into several clients so
/// they draw from a single budget.
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<RateLimitState>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_LIMIT_MAX)
    }
}

impl RateLimiter {
    /// Create a limiter with a full budget of `max` requests.
    ///
    /// The reset timestamp starts in the past, so the gate is open until the
    /// first exchange reports real counters.
    pub fn new(max: u32) -> Self {
        Self {
            state: Mutex::new(RateLimitState {
                reset_at: 0,
                remaining: max,
                max,
            }),
        }
    }

    /// True when the budget is exhausted and the reset time has not passed.
    ///
    /// Cheap and non-blocking; called before every network exchange.
    pub fn is_rate_limited(&self) -> bool {
        let state = self.lock();
        state.remaining == 0 && now_ms() < state.reset_at
    }

    /// The absolute time (epoch milliseconds) after which a retry is
    /// expected to succeed. Surfaced to callers; never awaited internally.
    pub fn reset_timestamp(&self) -> i64 {
        self.lock().reset_at
    }

    /// Overwrite the state with the latest server-reported values.
    ///
    /// Last-write-wins; no ordering guarantee beyond "the most recent
    /// completed exchange's headers win".
    pub fn update(&self, reset_at: i64, remaining: u32, max: u32) {
        let mut state = self.lock();
        state.reset_at = reset_at;
        state.remaining = remaining;
        state.max = max;
        debug!(reset_at, remaining, max, "rate limit state updated");
    }

    /// Zero the remaining budget until `reset_at`, keeping the window size.
    ///
    /// Applied when the server answers 429 with a parsable reset header, so
    /// the proactive gate agrees with what the server just said.
    pub(crate) fn exhaust_until(&self, reset_at: i64) {
        let mut state = self.lock();
        state.remaining = 0;
        state.reset_at = reset_at;
        debug!(reset_at, "rate limit budget exhausted by server response");
    }

    /// A coherent copy of the current state.
    pub fn snapshot(&self) -> RateLimitSnapshot {
        let state = self.lock();
        RateLimitSnapshot {
            reset_at: state.reset_at,
            remaining: state.remaining,
            max: state.max,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RateLimitState> {
        // State is three plain integers; a poisoned guard is still coherent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_gate_open_on_fresh_limiter() {
        let limiter = RateLimiter::default();
        assert!(!limiter.is_rate_limited());
    }

    #[test]
    fn test_gate_closed_when_exhausted_with_future_reset() {
        let limiter = RateLimiter::default();
        limiter.update(now_ms() + 60_000, 0, 180);
        assert!(limiter.is_rate_limited());
    }

    #[test]
    fn test_gate_open_when_exhausted_but_reset_passed() {
        let limiter = RateLimiter::default();
        limiter.update(now_ms() - 1_000, 0, 180);
        assert!(!limiter.is_rate_limited());
    }

    #[test]
    fn test_gate_open_with_remaining_budget() {
        let limiter = RateLimiter::default();
        limiter.update(now_ms() + 60_000, 1, 180);
        assert!(!limiter.is_rate_limited());
    }

    #[test]
    fn test_update_is_last_write_wins() {
        let limiter = RateLimiter::default();
        limiter.update(1_000, 10, 180);
        limiter.update(2_000, 5, 120);

        let snapshot = limiter.snapshot();
        assert_eq!(snapshot.reset_at, 2_000);
        assert_eq!(snapshot.remaining, 5);
        assert_eq!(snapshot.max, 120);
    }

    #[test]
    fn test_exhaust_until_keeps_window_size() {
        let limiter = RateLimiter::default();
        limiter.update(1_000, 42, 180);
        limiter.exhaust_until(now_ms() + 5_000);

        let snapshot = limiter.snapshot();
        assert_eq!(snapshot.remaining, 0);
        assert_eq!(snapshot.max, 180);
        assert!(limiter.is_rate_limited());
    }

    #[test]
    fn test_reset_timestamp_reflects_latest_update() {
        let limiter = RateLimiter::default();
        limiter.update(123_456, 3, 60);
        assert_eq!(limiter.reset_timestamp(), 123_456);
    }

    #[test]
    fn test_concurrent_updates_leave_one_writers_state() {
        let limiter = Arc::new(RateLimiter::default());

        let handles: Vec<_> = (0u32..8)
            .map(|i| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        limiter.update(i64::from(i) * 1_000, i, 180);
                        let _ = limiter.is_rate_limited();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("updater thread panicked");
        }

        // Whatever write landed last, the triple must be one writer's.
        let snapshot = limiter.snapshot();
        assert_eq!(snapshot.reset_at, i64::from(snapshot.remaining) * 1_000);
        assert_eq!(snapshot.max, 180);
    }
}
