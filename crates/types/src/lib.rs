//! Domain records shared by every stage of the ingestion pipeline: blocks,
//! transactions, receipts, logs, and the enriched/derived rows the block
//! enricher produces from them.

pub mod block;
pub use block::Block;

pub mod transaction;
pub use transaction::{Transaction, TxKind, TxTypeTag};

pub mod receipt;
pub use receipt::Receipt;

pub mod log;
pub use log::Log;

pub mod event_kind;
pub use event_kind::EventKind;

pub mod metrics;
pub use metrics::BlockMetrics;

pub mod enriched;
pub use enriched::{ContractDeployment, DexSwap, NftStandard, NftTransfer, SignedAmounts, TokenTransfer};

pub mod pool;
pub use pool::PoolDexCacheEntry;

pub mod label;
pub use label::ContractLabel;

pub mod quantity;
