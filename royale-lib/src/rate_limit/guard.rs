//! Header-driven rate limit guard.

use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use log::trace;
use log::warn;

use crate::error::Error;
use crate::transport::ResponseEnvelope;

/// Header carrying the request quota for the current window.
pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
/// Header carrying the requests left in the current window.
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
/// Header carrying the time the window resets, in epoch milliseconds.
pub const RESET_HEADER: &str = "x-ratelimit-reset";

// Epoch values above this are milliseconds; below, seconds.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

/// The last quota reported by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitState {
    /// Requests allowed per window.
    pub limit: Option<u32>,
    /// Requests left in the current window.
    pub remaining: Option<u32>,
    /// When the current window ends.
    pub reset_at: Option<DateTime<Utc>>,
}

impl RateLimitState {
    /// Returns the status at `now`.
    pub fn status(&self, now: DateTime<Utc>) -> RateLimitStatus {
        match (self.remaining, self.reset_at) {
            (Some(0), Some(reset_at)) if reset_at > now => RateLimitStatus::Exhausted {
                retry_after: (reset_at - now).to_std().unwrap_or(Duration::ZERO),
            },
            _ => RateLimitStatus::Available,
        }
    }
}

/// Whether the guard lets requests through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitStatus {
    /// Requests are sent.
    Available,
    /// The quota is used up; requests fail locally until the reset.
    Exhausted {
        /// Time left until the reset.
        retry_after: Duration,
    },
}

/// Refuses to send requests while the server-reported quota is exhausted.
///
/// The guard never counts requests itself. It only remembers the counters from the
/// last response and short-circuits with [`Error::RatelimitDetected`] while they say
/// nothing is left. Once the reset time passes, the next check lets requests through
/// again.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use royale_lib::rate_limit::{RateLimitGuard, RateLimitStatus};
/// use royale_lib::transport::ResponseEnvelope;
///
/// let guard = RateLimitGuard::new();
/// let now = Utc::now();
/// let reset = now + chrono::Duration::seconds(30);
/// let response = ResponseEnvelope::json_body(200, &serde_json::json!({}))
///     .with_header("x-ratelimit-remaining", "0")
///     .with_header("x-ratelimit-reset", reset.timestamp_millis().to_string());
///
/// guard.observe(&response, now);
/// assert!(matches!(guard.status(now), RateLimitStatus::Exhausted { .. }));
/// assert!(guard.check(now).is_err());
/// ```
#[derive(Debug, Default)]
pub struct RateLimitGuard {
    state: Mutex<RateLimitState>,
}

impl RateLimitGuard {
    /// Creates a guard that has not seen any quota yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails with [`Error::RatelimitDetected`] if the quota is exhausted at `now`.
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match state.status(now) {
            RateLimitStatus::Exhausted { retry_after } => {
                warn!("rate limit exhausted, {:?} until reset", retry_after);
                Err(Error::RatelimitDetected { retry_after })
            }
            RateLimitStatus::Available => {
                if state.remaining == Some(0) {
                    trace!("rate limit window reset");
                    state.remaining = state.limit;
                    state.reset_at = None;
                }
                Ok(())
            }
        }
    }

    /// Records the quota headers of a response.
    ///
    /// Headers that are missing or unparsable leave the corresponding field unchanged.
    pub fn observe(&self, response: &ResponseEnvelope, now: DateTime<Utc>) {
        let limit = parse_header::<u32>(response, LIMIT_HEADER);
        let remaining = parse_header::<u32>(response, REMAINING_HEADER);
        let reset_at = parse_header::<i64>(response, RESET_HEADER).and_then(parse_reset);
        if limit.is_none() && remaining.is_none() && reset_at.is_none() {
            return;
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if limit.is_some() {
            state.limit = limit;
        }
        if remaining.is_some() {
            state.remaining = remaining;
        }
        if reset_at.is_some() {
            state.reset_at = reset_at;
        }
        trace!(
            "rate limit: {:?}/{:?} remaining, resets at {:?} (now {})",
            state.remaining, state.limit, state.reset_at, now
        );
    }

    /// Returns the status at `now` without changing state.
    pub fn status(&self, now: DateTime<Utc>) -> RateLimitStatus {
        self.snapshot().status(now)
    }

    /// Returns a copy of the last observed quota.
    pub fn snapshot(&self) -> RateLimitState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_header<T: std::str::FromStr>(response: &ResponseEnvelope, name: &str) -> Option<T> {
    response.header(name).and_then(|v| v.trim().parse().ok())
}

fn parse_reset(value: i64) -> Option<DateTime<Utc>> {
    if value >= MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(remaining: &str, reset: DateTime<Utc>) -> ResponseEnvelope {
        ResponseEnvelope::json_body(200, &serde_json::json!({}))
            .with_header("X-Ratelimit-Limit", "5")
            .with_header("X-Ratelimit-Remaining", remaining)
            .with_header("X-Ratelimit-Reset", reset.timestamp_millis().to_string())
    }

    #[test]
    fn test_starts_available() {
        let guard = RateLimitGuard::new();
        assert_eq!(guard.status(Utc::now()), RateLimitStatus::Available);
        assert!(guard.check(Utc::now()).is_ok());
    }

    #[test]
    fn test_exhausted_until_reset() {
        let guard = RateLimitGuard::new();
        let now = Utc::now();
        let reset = now + chrono::Duration::seconds(5);
        guard.observe(&response("0", reset), now);

        match guard.check(now + chrono::Duration::seconds(1)) {
            Err(Error::RatelimitDetected { retry_after }) => {
                assert!(retry_after <= Duration::from_secs(4));
                assert!(retry_after > Duration::from_secs(3));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let after = reset + chrono::Duration::milliseconds(1);
        assert!(guard.check(after).is_ok());
        let state = guard.snapshot();
        assert_eq!(state.remaining, Some(5));
        assert_eq!(state.reset_at, None);
    }

    #[test]
    fn test_remaining_quota_is_available() {
        let guard = RateLimitGuard::new();
        let now = Utc::now();
        guard.observe(&response("3", now + chrono::Duration::seconds(5)), now);
        assert!(guard.check(now).is_ok());
        assert_eq!(guard.snapshot().limit, Some(5));
    }

    #[test]
    fn test_zero_remaining_with_past_reset_is_available() {
        let guard = RateLimitGuard::new();
        let now = Utc::now();
        guard.observe(&response("0", now - chrono::Duration::seconds(1)), now);
        assert!(guard.check(now).is_ok());
    }

    #[test]
    fn test_responses_without_headers_keep_state() {
        let guard = RateLimitGuard::new();
        let now = Utc::now();
        guard.observe(&response("0", now + chrono::Duration::seconds(5)), now);
        guard.observe(&ResponseEnvelope::json_body(200, &serde_json::json!({})), now);
        assert!(guard.check(now).is_err());
    }

    #[test]
    fn test_reset_accepts_seconds_and_millis() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(parse_reset(1_700_000_000), Some(at));
        assert_eq!(parse_reset(1_700_000_000_000), Some(at));
    }
}
