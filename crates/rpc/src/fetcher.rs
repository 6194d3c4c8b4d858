use alloy_primitives::B256;
use async_trait::async_trait;
use indexer_types::{Block, Log, Receipt, Transaction};

use crate::error::FetchError;

/// The RPC Fetcher (spec §4.5): the sole suspension point in the pipeline
/// (spec §5). Implementations own retry/backoff and the batch-receipts
/// unsupported latch; callers never see a raw transport error.
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    /// `eth_blockNumber`.
    async fn latest_head(&self) -> Result<u64, FetchError>;

    /// `eth_getBlockByNumber(number, true)`, normalized into the domain
    /// [`Block`]/[`Transaction`] records (spec §9: "explicit decoders that
    /// normalize hex-quantity and hex-address forms").
    async fn block_with_transactions(&self, number: u64) -> Result<(Block, Vec<Transaction>), FetchError>;

    /// `eth_getBlockReceipts(number)`, falling back to per-hash
    /// `eth_getTransactionReceipt` fan-out (bounded by `CONCURRENCY_LIMIT`)
    /// once the batch method has been observed as unsupported (spec §4.5,
    /// §7 `RpcMethodUnsupported`). Each receipt's inlined `logs` are
    /// flattened into the second return value.
    async fn receipts_for_block(&self, number: u64, tx_hashes: &[B256]) -> Result<(Vec<Receipt>, Vec<Log>), FetchError>;
}
