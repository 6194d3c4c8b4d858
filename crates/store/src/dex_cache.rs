use std::sync::{Arc, Mutex};

use alloy_primitives::Address;
use async_trait::async_trait;
use indexer_pool::DurableDexCache;
use indexer_types::PoolDexCacheEntry;
use indexer_types::quantity::lower_hex_address;
use rusqlite::{params, Connection, OptionalExtension};

use crate::gateway::StoreGateway;

/// [`DurableDexCache`] backed by the `pool_dex_cache` table (spec §4.4 step
/// 4). Shares the gateway's connection rather than opening a second handle,
/// consistent with the store being a single writer (spec §5).
pub struct SqliteDurableDexCache {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDurableDexCache {
    pub fn from_gateway(gateway: &StoreGateway) -> Self {
        Self { conn: gateway.shared_connection() }
    }

    /// Bulk-reads every row in `pool_dex_cache` (spec §4.4 step 3, "lazily
    /// loaded once from the store"). Called once at startup to warm the
    /// resolver's in-memory cache so a process restart doesn't lose every
    /// previously resolved pool back to step 5's factory probe.
    pub fn list_all(&self) -> Result<Vec<PoolDexCacheEntry>, rusqlite::Error> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT pool_address, dex_name, factory_address FROM pool_dex_cache")?;
        let rows = stmt.query_map([], |row| {
            let pool_address: String = row.get(0)?;
            let dex_name: String = row.get(1)?;
            let factory_address: Option<String> = row.get(2)?;
            Ok((pool_address, dex_name, factory_address))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (pool_address, dex_name, factory_address) = row?;
            entries.push(PoolDexCacheEntry {
                pool_address: pool_address.parse().expect("stored pool_address is valid hex"),
                dex_name,
                factory_address: factory_address.and_then(|s| s.parse().ok()),
            });
        }
        Ok(entries)
    }
}

#[async_trait]
impl DurableDexCache for SqliteDurableDexCache {
    async fn get(&self, pool: Address) -> Option<PoolDexCacheEntry> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT dex_name, factory_address FROM pool_dex_cache WHERE pool_address = ?1",
            params![lower_hex_address(pool)],
            |row| {
                let dex_name: String = row.get(0)?;
                let factory_address: Option<String> = row.get(1)?;
                Ok(PoolDexCacheEntry {
                    pool_address: pool,
                    dex_name,
                    factory_address: factory_address.and_then(|s| s.parse().ok()),
                })
            },
        )
        .optional()
        .ok()
        .flatten()
    }

    async fn put(&self, entry: PoolDexCacheEntry) {
        let conn = self.conn.lock().unwrap();
        // Insert-or-replace: concurrent probes for the same pool racing to
        // write must be idempotent (spec §9 "Pool resolution race").
        let _ = conn.execute(
            "INSERT INTO pool_dex_cache (pool_address, dex_name, factory_address) VALUES (?1, ?2, ?3)
             ON CONFLICT(pool_address) DO UPDATE SET dex_name=excluded.dex_name, factory_address=excluded.factory_address",
            params![
                lower_hex_address(entry.pool_address),
                entry.dex_name,
                entry.factory_address.map(lower_hex_address),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = StoreGateway::open_in_memory().unwrap();
        let cache = SqliteDurableDexCache::from_gateway(&store);
        let pool = Address::repeat_byte(7);
        assert!(cache.get(pool).await.is_none());

        cache.put(PoolDexCacheEntry { pool_address: pool, dex_name: "Uniswap V3".to_string(), factory_address: None }).await;
        let entry = cache.get(pool).await.unwrap();
        assert_eq!(entry.dex_name, "Uniswap V3");
    }

    #[tokio::test]
    async fn duplicate_put_is_idempotent() {
        let store = StoreGateway::open_in_memory().unwrap();
        let cache = SqliteDurableDexCache::from_gateway(&store);
        let pool = Address::repeat_byte(8);
        cache.put(PoolDexCacheEntry { pool_address: pool, dex_name: "Curve".to_string(), factory_address: None }).await;
        cache.put(PoolDexCacheEntry { pool_address: pool, dex_name: "Curve".to_string(), factory_address: None }).await;
        let conn = store.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM pool_dex_cache WHERE pool_address = ?1", params![lower_hex_address(pool)], |r| r.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn list_all_returns_every_cached_pool() {
        let store = StoreGateway::open_in_memory().unwrap();
        let cache = SqliteDurableDexCache::from_gateway(&store);
        let pool_a = Address::repeat_byte(1);
        let pool_b = Address::repeat_byte(2);
        cache.put(PoolDexCacheEntry { pool_address: pool_a, dex_name: "Uniswap V3".to_string(), factory_address: None }).await;
        cache.put(PoolDexCacheEntry { pool_address: pool_b, dex_name: "Aerodrome".to_string(), factory_address: None }).await;

        let mut entries = cache.list_all().unwrap();
        entries.sort_by_key(|e| e.pool_address);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].dex_name, "Uniswap V3");
        assert_eq!(entries[1].dex_name, "Aerodrome");
    }
}
