use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// An append-only, surrogate-keyed log row (spec §3). `id` is only a storage
/// handle — callers must key on `(transaction_hash, log_index)` since the
/// surrogate renumbers across a rewind/replay (spec §9).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub log_index: u32,
    pub address: Address,
    pub topics: [Option<B256>; 4],
    pub data: Bytes,
}

impl Log {
    /// Non-null topics, in order. Topic 0 (when present) is the event
    /// signature.
    pub fn topic_count(&self) -> usize {
        self.topics.iter().take_while(|t| t.is_some()).count()
    }

    pub fn topic0(&self) -> Option<B256> {
        self.topics[0]
    }
}
