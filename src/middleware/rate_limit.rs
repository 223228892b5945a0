// middleware/rate_limit.rs
use governor::{DefaultKeyedRateLimiter, Quota};
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Stale keys are swept once per this many checks.
const PRUNE_EVERY: u64 = 1024;

type KeyedLimiter = DefaultKeyedRateLimiter<Option<IpAddr>>;

/// Per-client GCRA limiter: a burst of `max_requests`, refilled evenly
/// over `window`. Clients without a known peer address share the `None` key.
pub struct ClientRateLimiter {
    limiter: Option<KeyedLimiter>,
    checks: AtomicU64,
}

impl ClientRateLimiter {
    /// A zero `max_requests` or `window` disables limiting.
    pub fn new(window: Duration, max_requests: u32) -> Self {
        let limiter = NonZeroU32::new(max_requests)
            .filter(|_| !window.is_zero())
            .and_then(|burst| {
                let period = (window / burst.get()).max(Duration::from_nanos(1));
                Quota::with_period(period).map(|quota| quota.allow_burst(burst))
            })
            .map(KeyedLimiter::keyed);

        Self {
            limiter,
            checks: AtomicU64::new(0),
        }
    }

    /// Takes one cell from `ip`'s budget; false when it is exhausted.
    pub fn check(&self, ip: Option<IpAddr>) -> bool {
        let Some(limiter) = &self.limiter else {
            return true;
        };

        if self.checks.fetch_add(1, Ordering::Relaxed) % PRUNE_EVERY == PRUNE_EVERY - 1 {
            limiter.retain_recent();
        }
        limiter.check_key(&ip).is_ok()
    }
}
