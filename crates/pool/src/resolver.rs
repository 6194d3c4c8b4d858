use alloy_primitives::{Address, B256};
use indexer_types::PoolDexCacheEntry;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{DurableDexCache, InMemoryDexCache, PendingLookups};
use crate::probe::{dex_for_factory, dex_from_swap_signature, FactoryProbe};
use crate::singletons::lookup_static;

/// The Pool/DEX Resolver (spec §4.4): combines the static singleton/Curve
/// tables, the in-memory cache, the durable cache, and an on-chain factory
/// probe behind a single hot-path-safe interface.
///
/// The block enricher only ever calls [`Self::lookup`]; a miss is handed to
/// [`Self::queue_probe`], which resolves off the write path and backfills
/// both caches so later swaps from the same pool hit.
pub struct PoolResolver {
    in_memory: InMemoryDexCache,
    pending: PendingLookups,
    durable: Arc<dyn DurableDexCache>,
    probe: Arc<dyn FactoryProbe>,
}

impl PoolResolver {
    pub fn new(durable: Arc<dyn DurableDexCache>, probe: Arc<dyn FactoryProbe>) -> Arc<Self> {
        Arc::new(Self { in_memory: InMemoryDexCache::default(), pending: PendingLookups::default(), durable, probe })
    }

    /// Bulk-loads the in-memory cache from the durable table once at
    /// startup (spec §4.4 step 3, "lazy-loaded once from the store").
    pub fn warm_from(&self, entries: impl IntoIterator<Item = PoolDexCacheEntry>) {
        for entry in entries {
            self.in_memory.put(entry.pool_address, entry.dex_name);
        }
    }

    /// Synchronous, RPC-free lookup (spec §4.4 "hot-path contract"). Checks
    /// the static tables then the in-memory cache; never touches the
    /// durable store or the network. `None` means "not cached" — the caller
    /// should fall back to a signature-based placeholder name and call
    /// [`Self::queue_probe`].
    pub fn lookup(&self, pool: Address) -> Option<String> {
        if let Some(name) = lookup_static(pool) {
            return Some(name.to_string());
        }
        self.in_memory.get(pool)
    }

    /// Fire-and-forget async probe (spec §4.4 "hot-path contract"). Safe to
    /// call on every miss: concurrent probes for the same pool are
    /// deduplicated via [`PendingLookups`], and the eventual write to both
    /// caches is insert-or-replace (spec §9, idempotent under races).
    ///
    /// Consults the durable cache (step 4) before ever reaching for the
    /// factory probe (step 5): a pool resolved on a prior run should never
    /// re-probe just because the in-memory cache was cold.
    pub fn queue_probe(self: &Arc<Self>, pool: Address, swap_topic0: B256) {
        if !self.pending.try_claim(pool) {
            return;
        }
        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Some(entry) = this.durable.get(pool).await {
                debug!(?pool, dex = %entry.dex_name, "resolved pool via durable cache");
                this.in_memory.put(pool, entry.dex_name);
                this.pending.release(pool);
                return;
            }

            let dex_name = match this.probe.factory_of(pool).await {
                Ok(factory) => {
                    debug!(?pool, ?factory, "resolved pool via factory probe");
                    dex_for_factory(factory)
                }
                Err(err) => {
                    warn!(?pool, %err, "factory probe failed, falling back to swap signature");
                    dex_from_swap_signature(swap_topic0)
                }
            };
            this.in_memory.put(pool, dex_name.clone());
            this.durable.put(PoolDexCacheEntry { pool_address: pool, dex_name, factory_address: None }).await;
            this.pending.release(pool);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PoolError;
    use alloy_primitives::address;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct FakeDurableCache {
        preloaded: StdMutex<HashMap<Address, PoolDexCacheEntry>>,
        written: StdMutex<Vec<PoolDexCacheEntry>>,
    }

    #[async_trait]
    impl DurableDexCache for FakeDurableCache {
        async fn get(&self, pool: Address) -> Option<PoolDexCacheEntry> {
            self.preloaded.lock().unwrap().get(&pool).cloned()
        }
        async fn put(&self, entry: PoolDexCacheEntry) {
            self.written.lock().unwrap().push(entry);
        }
    }

    struct FakeProbe {
        result: Result<Address, ()>,
    }

    #[async_trait]
    impl FactoryProbe for FakeProbe {
        async fn factory_of(&self, pool: Address) -> Result<Address, PoolError> {
            self.result.map_err(|_| PoolError::ProbeFailed(pool))
        }
    }

    struct NeverCalledProbe;

    #[async_trait]
    impl FactoryProbe for NeverCalledProbe {
        async fn factory_of(&self, pool: Address) -> Result<Address, PoolError> {
            panic!("factory probe must not be called when the durable cache already has {pool}");
        }
    }

    #[tokio::test]
    async fn miss_then_probe_populates_in_memory_cache() {
        let durable = Arc::new(FakeDurableCache::default());
        let uniswap_v3_factory = address!("33128a8fC17869897dcE68Ed026d694621f6FDfD");
        let probe = Arc::new(FakeProbe { result: Ok(uniswap_v3_factory) });
        let resolver = PoolResolver::new(durable.clone(), probe);

        let pool = Address::repeat_byte(0x42);
        assert_eq!(resolver.lookup(pool), None);

        resolver.queue_probe(pool, B256::ZERO);
        // allow the spawned task to run
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(resolver.lookup(pool), Some("Uniswap V3".to_string()));
        assert_eq!(durable.written.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn durable_cache_hit_short_circuits_the_factory_probe() {
        let durable = Arc::new(FakeDurableCache::default());
        let pool = Address::repeat_byte(0x77);
        durable.preloaded.lock().unwrap().insert(
            pool,
            PoolDexCacheEntry { pool_address: pool, dex_name: "Aerodrome".to_string(), factory_address: None },
        );
        let resolver = PoolResolver::new(durable, Arc::new(NeverCalledProbe));

        assert_eq!(resolver.lookup(pool), None);
        resolver.queue_probe(pool, B256::ZERO);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(resolver.lookup(pool), Some("Aerodrome".to_string()));
    }

    #[tokio::test]
    async fn warm_from_populates_lookup_without_a_probe() {
        let durable = Arc::new(FakeDurableCache::default());
        let resolver = PoolResolver::new(durable, Arc::new(NeverCalledProbe));
        let pool = Address::repeat_byte(0x88);

        resolver.warm_from([PoolDexCacheEntry {
            pool_address: pool,
            dex_name: "Curve".to_string(),
            factory_address: None,
        }]);

        assert_eq!(resolver.lookup(pool), Some("Curve".to_string()));
    }

    #[tokio::test]
    async fn concurrent_probes_for_same_pool_only_claim_once() {
        let durable = Arc::new(FakeDurableCache::default());
        let probe = Arc::new(FakeProbe { result: Err(()) });
        let resolver = PoolResolver::new(durable, probe);
        let pool = Address::repeat_byte(0x99);

        assert!(resolver.pending.try_claim(pool));
        // a second caller observing the pool mid-flight must not re-claim
        assert!(!resolver.pending.try_claim(pool));
        resolver.pending.release(pool);
    }
}
