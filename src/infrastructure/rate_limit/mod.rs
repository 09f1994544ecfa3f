//! Request-admission rate limiting
//!
//! Per-client token buckets behind a shared registry, with a periodic
//! background sweep that evicts idle clients. This is the only subsystem with
//! cross-request shared mutable state: each client gets an integer budget that
//! refills continuously (one token every `window / max_requests`), so a burst
//! regains capacity gradually rather than all at once at a window boundary.
//!
//! Limiter state is in-memory only; a process restart resets every budget to
//! full. That is an accepted tradeoff, not a bug.

mod bucket;
mod registry;

pub use bucket::ClientLimiter;
pub use registry::LimiterRegistry;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Spawns the background sweep worker that periodically evicts limiters idle
/// longer than `idle_retention`. Respects the cancellation token for graceful
/// shutdown. A missed or delayed sweep only delays memory reclamation.
pub fn spawn_sweeper(
    registry: Arc<LimiterRegistry>,
    sweep_interval: Duration,
    idle_retention: Duration,
    shutdown_token: CancellationToken,
) {
    tokio::spawn(async move {
        let mut interval_timer = tokio::time::interval(sweep_interval);
        // The first tick fires immediately; nothing is idle yet, skip it.
        interval_timer.tick().await;

        loop {
            tokio::select! {
                _ = interval_timer.tick() => {
                    let removed = registry.sweep(idle_retention);
                    if removed > 0 {
                        tracing::debug!(
                            removed = removed,
                            remaining = registry.len(),
                            "Rate limiter sweep evicted idle clients"
                        );
                    }
                }
                _ = shutdown_token.cancelled() => {
                    tracing::info!("Rate limiter sweep worker shutting down gracefully");
                    return;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sweeper_stops_on_cancellation() {
        let registry = Arc::new(LimiterRegistry::new(10, Duration::from_secs(60)));
        let token = CancellationToken::new();
        spawn_sweeper(
            registry.clone(),
            Duration::from_secs(3600),
            Duration::from_secs(7200),
            token.clone(),
        );

        token.cancel();
        // Yield so the worker observes the cancellation and exits.
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_evicts_idle_clients_on_tick() {
        let registry = Arc::new(LimiterRegistry::new(10, Duration::from_secs(60)));
        let token = CancellationToken::new();

        registry.get_or_create("1.2.3.4");
        assert_eq!(registry.len(), 1);

        // Zero retention: any non-zero idle time qualifies for eviction.
        spawn_sweeper(
            registry.clone(),
            Duration::from_millis(10),
            Duration::ZERO,
            token.clone(),
        );

        // Let the worker start and pass its initial immediate tick, then fire
        // one sweep.
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(25)).await;
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        assert_eq!(registry.len(), 0);
        token.cancel();
    }
}
