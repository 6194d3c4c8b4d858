use alloy_primitives::Address;
use indexer_types::PoolDexCacheEntry;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use async_trait::async_trait;
use lru::LruCache;

const IN_MEMORY_CACHE_SIZE: usize = 4096;

/// The durable half of `PoolDexCache` (spec §4.4 step 4): a store-backed
/// table the resolver reads on a miss and writes after a successful probe.
/// Implemented by `indexer-store`; kept as a trait here so this crate never
/// depends on the store crate (the dependency runs the other way: core wires
/// a concrete implementation into the resolver at startup).
#[async_trait]
pub trait DurableDexCache: Send + Sync {
    async fn get(&self, pool: Address) -> Option<PoolDexCacheEntry>;
    /// Insert-or-replace: duplicate inserts for the same pool must be
    /// idempotent (spec §9, "Pool resolution race").
    async fn put(&self, entry: PoolDexCacheEntry);
}

/// The in-memory half of `PoolDexCache` (spec §4.4 step 3), lazily populated
/// from the durable cache and from fresh probe results. `Mutex`-guarded
/// rather than sharded: lookups are cheap pointer-sized comparisons and the
/// hot path never holds the lock across an await.
#[derive(Debug)]
pub struct InMemoryDexCache {
    inner: Mutex<LruCache<Address, String>>,
}

impl Default for InMemoryDexCache {
    fn default() -> Self {
        Self { inner: Mutex::new(LruCache::new(NonZeroUsize::new(IN_MEMORY_CACHE_SIZE).unwrap())) }
    }
}

impl InMemoryDexCache {
    pub fn get(&self, pool: Address) -> Option<String> {
        self.inner.lock().unwrap().get(&pool).cloned()
    }

    pub fn put(&self, pool: Address, dex_name: String) {
        self.inner.lock().unwrap().put(pool, dex_name);
    }
}

/// Deduplicates concurrent factory probes for the same pool (spec §9, "Pool
/// resolution race"): two swaps from the same unresolved pool in the same
/// block must not both fire an `eth_call`.
#[derive(Debug, Default)]
pub struct PendingLookups {
    inner: Mutex<HashMap<Address, ()>>,
}

impl PendingLookups {
    /// Returns `true` if this call claimed the lookup (no probe was already
    /// in flight for `pool`). The caller must release with [`Self::release`]
    /// once the probe completes, success or failure.
    pub fn try_claim(&self, pool: Address) -> bool {
        let mut guard = self.inner.lock().unwrap();
        if guard.contains_key(&pool) {
            false
        } else {
            guard.insert(pool, ());
            true
        }
    }

    pub fn release(&self, pool: Address) {
        self.inner.lock().unwrap().remove(&pool);
    }
}
