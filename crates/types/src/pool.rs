use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A resolved `(pool_address -> dex_name)` mapping, with the factory address
/// that resolved it (spec §3, §4.4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDexCacheEntry {
    pub pool_address: Address,
    pub dex_name: String,
    pub factory_address: Option<Address>,
}
