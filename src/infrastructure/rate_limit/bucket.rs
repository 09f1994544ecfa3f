//! Token bucket for a single client.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Per-client token bucket with continuous refill.
///
/// The bucket starts full. Each admitted request consumes one token, and
/// tokens are earned back at a fixed rate of one per `refill_interval`.
/// Refill happens lazily on the next admission check rather than on a timer.
#[derive(Debug)]
pub struct ClientLimiter {
    max_tokens: u32,
    refill_interval: Duration,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: u32,
    last_refill: Instant,
}

impl ClientLimiter {
    pub fn new(max_tokens: u32, refill_interval: Duration) -> Self {
        Self {
            max_tokens,
            refill_interval,
            state: Mutex::new(BucketState {
                tokens: max_tokens,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Try to admit one request. Returns `false` when the bucket is empty.
    pub fn allow(&self) -> bool {
        self.allow_at(Instant::now())
    }

    /// Admission check against an explicit clock reading.
    pub fn allow_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if self.refill_interval > Duration::ZERO {
            let elapsed = now.saturating_duration_since(state.last_refill);
            let earned = (elapsed.as_nanos() / self.refill_interval.as_nanos()) as u64;
            if earned > 0 {
                state.tokens = state
                    .tokens
                    .saturating_add(earned.min(u64::from(self.max_tokens)) as u32)
                    .min(self.max_tokens);
                // Intentionally reset to `now` rather than advancing by whole
                // intervals; fractional progress toward the next token is
                // forfeited on each refill.
                state.last_refill = now;
            }
        }

        if state.tokens > 0 {
            state.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Instant of the last refill (or creation, if none has happened yet).
    /// Used by the registry sweep to measure idleness.
    pub fn last_refill(&self) -> Instant {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last_refill
    }

    #[cfg(test)]
    pub(crate) fn tokens(&self) -> u32 {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_exactly_capacity_without_refill() {
        let limiter = ClientLimiter::new(5, Duration::from_secs(3600));
        let now = Instant::now();
        for _ in 0..5 {
            assert!(limiter.allow_at(now));
        }
        assert!(!limiter.allow_at(now));
        assert!(!limiter.allow_at(now));
    }

    #[test]
    fn refill_earns_one_token_per_interval() {
        let limiter = ClientLimiter::new(3, Duration::from_secs(1));
        let start = Instant::now();
        for _ in 0..3 {
            assert!(limiter.allow_at(start));
        }
        assert!(!limiter.allow_at(start));

        // 2.5 intervals elapsed: two tokens earned, fraction forfeited.
        let later = start + Duration::from_millis(2500);
        assert!(limiter.allow_at(later));
        assert!(limiter.allow_at(later));
        assert!(!limiter.allow_at(later));

        // The fractional 500ms did not carry over; a full interval from
        // `later` is required for the next token.
        assert!(!limiter.allow_at(later + Duration::from_millis(999)));
        assert!(limiter.allow_at(later + Duration::from_secs(1)));
    }

    #[test]
    fn tokens_never_exceed_capacity() {
        let limiter = ClientLimiter::new(4, Duration::from_secs(1));
        let start = Instant::now();
        assert!(limiter.allow_at(start));

        // A long idle stretch refills to capacity, never beyond.
        let later = start + Duration::from_secs(1000);
        assert!(limiter.allow_at(later));
        assert_eq!(limiter.tokens(), 3);
    }

    #[test]
    fn clock_going_backwards_is_treated_as_no_elapsed_time() {
        let limiter = ClientLimiter::new(2, Duration::from_secs(1));
        let start = Instant::now();
        assert!(limiter.allow_at(start + Duration::from_secs(5)));
        assert!(limiter.allow_at(start));
        assert!(!limiter.allow_at(start));
    }

    #[test]
    fn concurrent_admissions_never_exceed_capacity() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let limiter = Arc::new(ClientLimiter::new(50, Duration::from_secs(3600)));
        let admitted = Arc::new(AtomicU32::new(0));
        let now = Instant::now();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                let admitted = admitted.clone();
                std::thread::spawn(move || {
                    for _ in 0..20 {
                        if limiter.allow_at(now) {
                            admitted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(admitted.load(Ordering::Relaxed), 50);
    }
}
