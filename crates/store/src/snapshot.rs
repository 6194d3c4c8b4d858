use indexer_types::{
    Block, BlockMetrics, ContractDeployment, DexSwap, EventKind, NftTransfer, Receipt, Transaction, TokenTransfer,
};

/// Everything the block enricher produces for one block (spec §4.7): the
/// unit the gateway commits under a single local transaction.
#[derive(Debug, Clone, Default)]
pub struct BlockSnapshot {
    pub block: Option<Block>,
    pub transactions: Vec<Transaction>,
    pub receipts: Vec<Receipt>,
    pub logs: Vec<indexer_types::Log>,
    pub metrics: Option<BlockMetrics>,
    pub event_counts: Vec<(EventKind, u32)>,
    pub token_transfers: Vec<TokenTransfer>,
    pub nft_transfers: Vec<NftTransfer>,
    pub dex_swaps: Vec<DexSwap>,
    pub contract_deployments: Vec<ContractDeployment>,
}

impl BlockSnapshot {
    pub fn new(block: Block) -> Self {
        Self { block: Some(block), ..Default::default() }
    }

    pub fn block_number(&self) -> u64 {
        self.block.as_ref().expect("snapshot must carry a block").number
    }
}
