//! Counters for fog-of-war work and structured logging setup.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::EnvFilter;

/// Running totals of fog-of-war work, shared by every map a tracker owns.
#[derive(Debug, Default)]
pub struct FogMetrics {
    visits: AtomicU64,
    repaints: AtomicU64,
    fills: AtomicU64,
}

impl FogMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one visit and whether it caused a block repaint.
    pub fn record_visit(&self, repainted: bool) {
        let visits = self.visits.fetch_add(1, Ordering::Relaxed) + 1;
        if repainted {
            self.repaints.fetch_add(1, Ordering::Relaxed);
        }
        if visits.is_multiple_of(10_000) {
            tracing::info!(
                visits = visits,
                repaints = self.repaints.load(Ordering::Relaxed),
                "Fog of war progress"
            );
        }
    }

    pub fn record_fill(&self) {
        self.fills.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn visits(&self) -> u64 {
        self.visits.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn repaints(&self) -> u64 {
        self.repaints.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn fills(&self) -> u64 {
        self.fills.load(Ordering::Relaxed)
    }
}

/// Installs a global fmt subscriber filtered by `level` (an `EnvFilter`
/// directive). `RUST_LOG` wins when set. Calling it twice is harmless.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .finish(),
    )
    .ok();
}
