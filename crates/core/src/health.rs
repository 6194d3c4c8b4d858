use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

/// Read-only health counters the poller publishes (spec §4.9): last
/// processed block, blocks processed this session, blocks behind, a
/// catching-up flag, error count, uptime, and blocks/sec. Exported to the
/// Prometheus metrics server the same way `trusted-sync`'s driver loop
/// exports its sync-distance gauge.
pub struct HealthCounters {
    started_at: Instant,
    last_processed_block: AtomicU64,
    blocks_processed: AtomicU64,
    blocks_behind: AtomicU64,
    catching_up: AtomicBool,
    error_count: AtomicU64,
}

impl Default for HealthCounters {
    fn default() -> Self {
        Self {
            started_at: Instant::now(),
            last_processed_block: AtomicU64::new(0),
            blocks_processed: AtomicU64::new(0),
            blocks_behind: AtomicU64::new(0),
            catching_up: AtomicBool::new(false),
            error_count: AtomicU64::new(0),
        }
    }
}

impl HealthCounters {
    pub fn record_block_processed(&self, number: u64) {
        self.last_processed_block.store(number, Ordering::Relaxed);
        self.blocks_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_blocks_behind(&self, behind: u64) {
        self.blocks_behind.store(behind, Ordering::Relaxed);
        // Catchup pseudostate threshold (spec §4.9): behind by more than 5.
        self.catching_up.store(behind > 5, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        let uptime_seconds = self.started_at.elapsed().as_secs_f64();
        let blocks_processed = self.blocks_processed.load(Ordering::Relaxed);
        HealthSnapshot {
            last_processed_block: self.last_processed_block.load(Ordering::Relaxed),
            blocks_processed,
            blocks_behind: self.blocks_behind.load(Ordering::Relaxed),
            catching_up: self.catching_up.load(Ordering::Relaxed),
            error_count: self.error_count.load(Ordering::Relaxed),
            uptime_seconds,
            blocks_per_second: if uptime_seconds > 0.0 { blocks_processed as f64 / uptime_seconds } else { 0.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthSnapshot {
    pub last_processed_block: u64,
    pub blocks_processed: u64,
    pub blocks_behind: u64,
    pub catching_up: bool,
    pub error_count: u64,
    pub uptime_seconds: f64,
    pub blocks_per_second: f64,
}
