use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// 1:1 with a transaction hash (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub status: bool,
    pub gas_used: u64,
    pub log_count: u32,
    pub contract_address: Option<Address>,
    pub effective_gas_price: U256,
}
