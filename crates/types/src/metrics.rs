use serde::{Deserialize, Serialize};

/// One row per block (spec §3): the aggregates the block enricher computes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMetrics {
    pub block_number: u64,
    pub tx_count: u32,
    pub log_count: u32,
    pub total_gas_used: u64,
    pub avg_gas_per_tx: u64,
    /// JSON-encoded top-K `(address, count)` pairs, by log emissions in this
    /// block, ties broken by deterministic address order (spec §4.6).
    pub top_contracts_json: String,
    pub unique_senders: u32,
    pub unique_recipients: u32,
    /// Decimal-string `U256` average (spec §9: amounts/gas/prices exceed
    /// native 64-bit ranges; big-integer division throughout).
    pub avg_gas_price: String,
    pub avg_priority_fee: String,
}
