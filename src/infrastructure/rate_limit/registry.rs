//! Registry of per-client token buckets.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use super::bucket::ClientLimiter;

/// Shared map from client key (usually an IP address) to its limiter.
///
/// Lookups take the read lock; the write lock is only taken to insert a
/// limiter for a new client or to sweep idle entries. The per-client
/// `Mutex` inside [`ClientLimiter`] means admission checks on existing
/// clients never contend on the map lock.
#[derive(Debug)]
pub struct LimiterRegistry {
    max_tokens: u32,
    refill_interval: Duration,
    window: Duration,
    clients: RwLock<HashMap<String, Arc<ClientLimiter>>>,
}

impl LimiterRegistry {
    /// `max_tokens` requests are allowed per `window`; refill is spread
    /// evenly across the window, one token per `window / max_tokens`.
    pub fn new(max_tokens: u32, window: Duration) -> Self {
        let refill_interval = if max_tokens > 0 {
            window / max_tokens
        } else {
            window
        };
        Self {
            max_tokens,
            refill_interval,
            window,
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Full window duration, reported to throttled clients as `retry_after`.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Fetch the limiter for `client_key`, creating it (full) on first sight.
    pub fn get_or_create(&self, client_key: &str) -> Arc<ClientLimiter> {
        {
            let clients = self.clients.read().unwrap_or_else(|e| e.into_inner());
            if let Some(limiter) = clients.get(client_key) {
                return limiter.clone();
            }
        }

        let mut clients = self.clients.write().unwrap_or_else(|e| e.into_inner());
        // Re-check under the write lock: another task may have inserted
        // between our read and write acquisitions.
        clients
            .entry(client_key.to_string())
            .or_insert_with(|| {
                Arc::new(ClientLimiter::new(self.max_tokens, self.refill_interval))
            })
            .clone()
    }

    /// Drop limiters idle for longer than `retention`. Returns the number of
    /// entries removed.
    pub fn sweep(&self, retention: Duration) -> usize {
        self.sweep_at(Instant::now(), retention)
    }

    /// Sweep against an explicit clock reading.
    pub fn sweep_at(&self, now: Instant, retention: Duration) -> usize {
        let mut clients = self.clients.write().unwrap_or_else(|e| e.into_inner());
        let before = clients.len();
        clients.retain(|_, limiter| {
            now.saturating_duration_since(limiter.last_refill()) <= retention
        });
        before - clients.len()
    }

    pub fn len(&self) -> usize {
        self.clients.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clients_are_rate_limited_independently() {
        let registry = LimiterRegistry::new(2, Duration::from_secs(3600));
        let now = Instant::now();

        let a = registry.get_or_create("10.0.0.1");
        let b = registry.get_or_create("10.0.0.2");

        assert!(a.allow_at(now));
        assert!(a.allow_at(now));
        assert!(!a.allow_at(now));

        // Exhausting one client leaves the other untouched.
        assert!(b.allow_at(now));
    }

    #[test]
    fn get_or_create_returns_the_same_limiter() {
        let registry = LimiterRegistry::new(5, Duration::from_secs(60));
        let first = registry.get_or_create("10.0.0.1");
        let second = registry.get_or_create("10.0.0.1");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn refill_interval_divides_the_window_evenly() {
        let registry = LimiterRegistry::new(100, Duration::from_secs(60));
        let limiter = registry.get_or_create("10.0.0.1");
        let start = Instant::now();

        for _ in 0..100 {
            assert!(limiter.allow_at(start));
        }
        assert!(!limiter.allow_at(start));

        // 60s / 100 = 600ms per token.
        assert!(!limiter.allow_at(start + Duration::from_millis(599)));
        assert!(limiter.allow_at(start + Duration::from_millis(600)));
    }

    #[test]
    fn sweep_removes_only_idle_entries() {
        let registry = LimiterRegistry::new(5, Duration::from_secs(60));
        let now = Instant::now();

        let idle = registry.get_or_create("10.0.0.1");
        let active = registry.get_or_create("10.0.0.2");
        assert!(idle.allow_at(now));
        // Keep the second client fresh well past the retention horizon.
        assert!(active.allow_at(now + Duration::from_secs(7200) + Duration::from_secs(60)));

        let removed = registry.sweep_at(
            now + Duration::from_secs(7201),
            Duration::from_secs(7200),
        );
        assert_eq!(removed, 1);
        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.get_or_create("10.0.0.2"), &active));
    }

    #[test]
    fn swept_client_comes_back_with_a_full_bucket() {
        let registry = LimiterRegistry::new(1, Duration::from_secs(3600));
        let now = Instant::now();

        let limiter = registry.get_or_create("10.0.0.1");
        assert!(limiter.allow_at(now));
        assert!(!limiter.allow_at(now));

        registry.sweep_at(now + Duration::from_secs(7201), Duration::from_secs(7200));
        assert!(registry.is_empty());

        let fresh = registry.get_or_create("10.0.0.1");
        assert!(fresh.allow_at(now + Duration::from_secs(7202)));
    }

    #[test]
    fn concurrent_get_or_create_yields_a_single_entry() {
        let registry = Arc::new(LimiterRegistry::new(10, Duration::from_secs(60)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.get_or_create("10.0.0.1"))
            })
            .collect();
        let limiters: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(registry.len(), 1);
        for limiter in &limiters[1..] {
            assert!(Arc::ptr_eq(&limiters[0], limiter));
        }
    }
}
