//! Fixed-window per-identity rate limiting.
//!
//! A coarse abuse deterrent, not a billing-grade quota: up to twice the
//! capacity can slip through across a window boundary. State is in-memory
//! and volatile; expired identities are reclaimed by a probabilistic sweep
//! instead of a timer.

use crate::config::RateLimitSettings;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Fraction of calls that trigger a sweep of expired windows.
const SWEEP_PROBABILITY: f64 = 0.1;

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_in: Duration,
}

impl RateDecision {
    /// Seconds until the window resets, rounded up for display.
    pub fn reset_in_secs(&self) -> u64 {
        self.reset_in.as_millis().div_ceil(1000) as u64
    }
}

#[derive(Debug)]
struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Process-wide fixed-window limiter keyed by caller identity.
///
/// The whole check-and-increment runs under one lock acquisition so two
/// concurrent requests cannot both observe spare capacity and both pass.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl RateLimiter {
    /// Create a limiter with the default policy (10 requests per minute).
    pub fn new() -> Self {
        Self::with_config(&RateLimitSettings::default())
    }

    pub fn with_config(settings: &RateLimitSettings) -> Self {
        Self::with_window(settings.max_requests, Duration::from_secs(settings.window_secs))
    }

    /// Create a limiter with an explicit capacity and window length.
    pub fn with_window(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Admit or reject one unit of work for the given identity.
    ///
    /// Rejections do not consume capacity.
    pub fn check(&self, identity: &str) -> RateDecision {
        // A zero-capacity limiter admits nothing; without this guard the
        // fresh-window branch would both admit and underflow `remaining`.
        if self.max_requests == 0 {
            return RateDecision {
                allowed: false,
                remaining: 0,
                reset_in: self.window,
            };
        }

        let now = Instant::now();
        let mut entries = self.entries.lock().expect("rate limiter lock poisoned");

        // Opportunistic cleanup so abandoned identities do not accumulate.
        if rand::random::<f64>() < SWEEP_PROBABILITY {
            entries.retain(|_, entry| now < entry.reset_at);
        }

        match entries.get_mut(identity) {
            Some(entry) if now < entry.reset_at => {
                if entry.count >= self.max_requests {
                    return RateDecision {
                        allowed: false,
                        remaining: 0,
                        reset_in: entry.reset_at - now,
                    };
                }
                entry.count += 1;
                RateDecision {
                    allowed: true,
                    remaining: self.max_requests - entry.count,
                    reset_in: entry.reset_at - now,
                }
            }
            _ => {
                // No window yet, or the previous one expired.
                entries.insert(
                    identity.to_string(),
                    WindowEntry {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                RateDecision {
                    allowed: true,
                    remaining: self.max_requests - 1,
                    reset_in: self.window,
                }
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_up_to_capacity_then_rejects() {
        let limiter = RateLimiter::with_window(3, Duration::from_secs(60));

        for expected_remaining in [2, 1, 0] {
            let decision = limiter.check("1.2.3.4");
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
        }

        let rejected = limiter.check("1.2.3.4");
        assert!(!rejected.allowed);
        assert_eq!(rejected.remaining, 0);
        assert!(rejected.reset_in > Duration::ZERO);
    }

    #[test]
    fn test_rejections_do_not_consume_capacity() {
        let limiter = RateLimiter::with_window(1, Duration::from_millis(80));
        assert!(limiter.check("ip").allowed);

        // Hammering while rejected must not extend or refill the window.
        for _ in 0..5 {
            assert!(!limiter.check("ip").allowed);
        }

        std::thread::sleep(Duration::from_millis(100));
        let decision = limiter.check("ip");
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[test]
    fn test_window_expiry_starts_fresh() {
        let limiter = RateLimiter::with_window(2, Duration::from_millis(50));
        limiter.check("ip");
        limiter.check("ip");
        assert!(!limiter.check("ip").allowed);

        std::thread::sleep(Duration::from_millis(70));
        let decision = limiter.check("ip");
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 1);
    }

    #[test]
    fn test_identities_are_independent() {
        let limiter = RateLimiter::with_window(1, Duration::from_secs(60));
        assert!(limiter.check("a").allowed);
        assert!(!limiter.check("a").allowed);
        assert!(limiter.check("b").allowed);
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let limiter = RateLimiter::with_window(0, Duration::from_secs(60));

        for _ in 0..3 {
            let decision = limiter.check("ip");
            assert!(!decision.allowed);
            assert_eq!(decision.remaining, 0);
            assert!(decision.reset_in > Duration::ZERO);
        }
    }

    #[test]
    fn test_reset_in_secs_rounds_up() {
        let decision = RateDecision {
            allowed: false,
            remaining: 0,
            reset_in: Duration::from_millis(1200),
        };
        assert_eq!(decision.reset_in_secs(), 2);
    }
}
