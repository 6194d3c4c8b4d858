use std::sync::Arc;
use std::time::Duration;

use indexer_rpc::ChainFetcher;
use indexer_store::StoreGateway;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::health::HealthCounters;
use crate::reducer::BlockEnricher;
use crate::reorg;

/// Spec §6 configuration table, restricted to the fields the poller itself
/// consumes (`STATS_WINDOW_BLOCKS` and `DB_PATH` are consumed elsewhere).
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    pub poll_interval: Duration,
    pub safety_buffer_blocks: u64,
    pub reorg_rewind_depth: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2_000),
            safety_buffer_blocks: 3,
            reorg_rewind_depth: 10,
        }
    }
}

/// The outer cooperative loop (spec §4.9): a single logical worker that
/// never runs two blocks concurrently. Mirrors the shape of
/// `kona_driver::Driver::advance_to_target`'s head-tracking loop, adapted to
/// an indefinite poll instead of a bounded sync-to-target run.
pub struct Poller {
    fetcher: Arc<dyn ChainFetcher>,
    store: StoreGateway,
    enricher: BlockEnricher,
    health: Arc<HealthCounters>,
    config: PollerConfig,
    shutdown: watch::Receiver<bool>,
}

/// How many consecutive blocks behind the head counts as "catching up"
/// (spec §4.9 `Catchup`).
const CATCHUP_THRESHOLD: u64 = 5;

/// How often (in processed blocks) the catch-up state logs rate/ETA.
const CATCHUP_LOG_EVERY: u64 = 50;

impl Poller {
    pub fn new(
        fetcher: Arc<dyn ChainFetcher>,
        store: StoreGateway,
        enricher: BlockEnricher,
        health: Arc<HealthCounters>,
        config: PollerConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self { fetcher, store, enricher, health, config, shutdown }
    }

    /// Runs until a shutdown signal is observed between blocks, or a fatal
    /// error occurs. Transient per-block errors are logged, counted, and
    /// retried against the same block number rather than propagated.
    pub async fn run(mut self) -> Result<(), CoreError> {
        let mut checkpoint = match self.store.checkpoint()? {
            Some(n) => n,
            None => {
                let head = self.fetcher.latest_head().await?;
                let seeded = head.saturating_sub(self.config.safety_buffer_blocks);
                info!(seeded, "no checkpoint found, seeding from head minus safety buffer");
                self.store.set_checkpoint(seeded)?;
                seeded
            }
        };

        let mut processed_since_catchup_log = 0u64;

        loop {
            if *self.shutdown.borrow() {
                info!("shutdown requested, exiting poller loop");
                return Ok(());
            }

            let head = match self.fetcher.latest_head().await {
                Ok(head) => head,
                Err(err) => {
                    self.health.record_error();
                    warn!(%err, "failed to fetch latest head, backing off");
                    self.sleep_for_error().await;
                    continue;
                }
            };

            let next = checkpoint + 1;
            let behind = head.saturating_sub(next);
            self.health.set_blocks_behind(behind);

            if next + self.config.safety_buffer_blocks > head {
                self.sleep_for_idle().await;
                continue;
            }

            match self.process_one(next, self.config.reorg_rewind_depth).await {
                Ok(processed) => {
                    checkpoint = processed;
                    self.health.record_block_processed(processed);
                    processed_since_catchup_log += 1;
                    if behind > CATCHUP_THRESHOLD && processed_since_catchup_log >= CATCHUP_LOG_EVERY {
                        let snapshot = self.health.snapshot();
                        info!(
                            blocks_behind = behind,
                            blocks_per_second = snapshot.blocks_per_second,
                            "catching up"
                        );
                        processed_since_catchup_log = 0;
                    }
                    // Catchup (spec §4.9): no sleep between contiguous blocks.
                }
                Err(err) if !err.is_retryable() => {
                    self.health.record_error();
                    error!(%err, next, "non-retryable pipeline error, halting ingestion");
                    return Err(err);
                }
                Err(err) => {
                    self.health.record_error();
                    warn!(%err, next, "per-block pipeline error, retrying same block");
                    self.sleep_for_error().await;
                }
            }
        }
    }

    async fn process_one(&self, next: u64, rewind_depth: u64) -> Result<u64, CoreError> {
        let outcome = reorg::resolve(&self.store, self.fetcher.as_ref(), next, rewind_depth).await?;
        let target = outcome.proceed_with;

        let (block, transactions) = self.fetcher.block_with_transactions(target).await?;
        let tx_hashes: Vec<_> = transactions.iter().map(|t| t.hash).collect();
        let (receipts, logs) = self.fetcher.receipts_for_block(target, &tx_hashes).await?;

        let snapshot = self.enricher.enrich(block, transactions, receipts, logs);
        self.store.commit_block(&snapshot)?;
        self.store.set_checkpoint(target)?;
        Ok(target)
    }

    async fn sleep_for_idle(&self) {
        tokio::time::sleep(self.config.poll_interval).await;
    }

    async fn sleep_for_error(&self) {
        tokio::time::sleep(self.config.poll_interval * 2).await;
    }
}
