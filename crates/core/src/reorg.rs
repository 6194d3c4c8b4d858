use indexer_rpc::ChainFetcher;
use indexer_store::StoreGateway;
use tracing::warn;

use crate::error::CoreError;

const REORG_REWIND_DEPTH: u64 = 10;

/// Outcome of running the Reorg Controller state machine (spec §4.8) ahead
/// of processing `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorgOutcome {
    /// The block number the poller should actually fetch and enrich next.
    /// Equal to the `next` passed in unless a rewind occurred.
    pub proceed_with: u64,
    pub rewound: bool,
}

/// Walks `Check → Probe → Rewind? → Proceed` (spec §4.8) for the given
/// `next` block number, using `rewind_depth` blocks as the bound on any
/// single rewind (spec §6 `REORG_REWIND_DEPTH`, default 10).
pub async fn resolve(
    store: &StoreGateway,
    fetcher: &dyn ChainFetcher,
    next: u64,
    rewind_depth: u64,
) -> Result<ReorgOutcome, CoreError> {
    // Check: nothing stored at next-1 means there is nothing to compare
    // against (first block of the run, or right after a prior rewind).
    let Some(prev) = (if next == 0 { None } else { store.non_reorged_block_by_number(next - 1)? }) else {
        return Ok(ReorgOutcome { proceed_with: next, rewound: false });
    };

    // Probe: fetch just enough of the remote block to compare parent hashes.
    let (remote_block, _txs) = fetcher.block_with_transactions(next).await?;
    if remote_block.parent_hash == prev.hash {
        return Ok(ReorgOutcome { proceed_with: next, rewound: false });
    }

    // Rewind: bounded by rewind_depth; deeper reorgs are a continuity
    // violation the poller surfaces rather than silently retrying forever
    // (spec §9 open question).
    let rewind_to = next.saturating_sub(rewind_depth);
    warn!(next, rewind_to, "parent hash mismatch, rewinding store");
    store.mark_reorged(rewind_to)?;
    store.rewind(rewind_to)?;
    store.set_checkpoint(rewind_to.saturating_sub(1))?;

    if rewind_to == 0 {
        return Ok(ReorgOutcome { proceed_with: 0, rewound: true });
    }

    // One bounded rewind is all this state machine performs per poll tick;
    // if the chain still mismatches at the new depth the next tick's Check
    // will detect it again and the poller decides whether to treat repeated
    // rewinds at the same depth as a continuity violation.
    if let Some(new_prev) = store.non_reorged_block_by_number(rewind_to - 1)? {
        let (remote_at_rewind, _) = fetcher.block_with_transactions(rewind_to).await?;
        if remote_at_rewind.parent_hash != new_prev.hash {
            return Err(CoreError::ChainContinuityViolation(rewind_to));
        }
    }

    Ok(ReorgOutcome { proceed_with: rewind_to, rewound: true })
}

pub const DEFAULT_REWIND_DEPTH: u64 = REORG_REWIND_DEPTH;

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use async_trait::async_trait;
    use indexer_store::BlockSnapshot;
    use indexer_types::{Block, Log, Receipt, Transaction};
    use std::sync::Mutex;

    struct FakeFetcher {
        blocks: Mutex<std::collections::HashMap<u64, Block>>,
    }

    #[async_trait]
    impl ChainFetcher for FakeFetcher {
        async fn latest_head(&self) -> Result<u64, indexer_rpc::FetchError> {
            Ok(0)
        }
        async fn block_with_transactions(&self, number: u64) -> Result<(Block, Vec<Transaction>), indexer_rpc::FetchError> {
            let block = self.blocks.lock().unwrap().get(&number).cloned().expect("test block present");
            Ok((block, vec![]))
        }
        async fn receipts_for_block(&self, _number: u64, _tx_hashes: &[B256]) -> Result<(Vec<Receipt>, Vec<Log>), indexer_rpc::FetchError> {
            Ok((vec![], vec![]))
        }
    }

    fn block(number: u64, hash: u8, parent_hash: u8) -> Block {
        Block {
            number,
            hash: B256::repeat_byte(hash),
            parent_hash: B256::repeat_byte(parent_hash),
            timestamp: 1_700_000_000,
            gas_used: 0,
            gas_limit: 30_000_000,
            base_fee_per_gas: None,
            reorged: false,
        }
    }

    #[tokio::test]
    async fn no_prior_block_proceeds_without_probing() {
        let store = StoreGateway::open_in_memory().unwrap();
        let fetcher = FakeFetcher { blocks: Mutex::new(Default::default()) };
        let outcome = resolve(&store, &fetcher, 10, 10).await.unwrap();
        assert_eq!(outcome, ReorgOutcome { proceed_with: 10, rewound: false });
    }

    #[tokio::test]
    async fn matching_parent_hash_proceeds() {
        let store = StoreGateway::open_in_memory().unwrap();
        store.commit_block(&BlockSnapshot::new(block(99, 1, 0))).unwrap();

        let mut blocks = std::collections::HashMap::new();
        blocks.insert(100, block(100, 2, 1));
        let fetcher = FakeFetcher { blocks: Mutex::new(blocks) };

        let outcome = resolve(&store, &fetcher, 100, 10).await.unwrap();
        assert_eq!(outcome, ReorgOutcome { proceed_with: 100, rewound: false });
    }

    #[tokio::test]
    async fn mismatched_parent_hash_rewinds_and_marks_reorged() {
        let store = StoreGateway::open_in_memory().unwrap();
        for n in 90..=99 {
            store.commit_block(&BlockSnapshot::new(block(n, n as u8, (n - 1) as u8))).unwrap();
        }
        store.set_checkpoint(99).unwrap();

        let mut blocks = std::collections::HashMap::new();
        // remote's parent hash at 100 doesn't match stored block 99's hash
        blocks.insert(100, block(100, 200, 77));
        // at the rewound depth (90) the remote chain matches what's stored at 89... but 89 isn't stored, so Check short-circuits
        blocks.insert(90, block(90, 90, 89));
        let fetcher = FakeFetcher { blocks: Mutex::new(blocks) };

        let outcome = resolve(&store, &fetcher, 100, 10).await.unwrap();
        assert!(outcome.rewound);
        assert_eq!(outcome.proceed_with, 90);
        assert_eq!(store.checkpoint().unwrap(), Some(89));
        assert!(store.block_by_number(95).unwrap().unwrap().reorged);
    }
}
