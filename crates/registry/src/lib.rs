//! The event signature registry (spec §4.1) and the log/transaction
//! classifier built on top of it (spec §4.2).

pub mod signatures;
pub use signatures::{CURVE_TOKEN_EXCHANGE_TOPIC0, TOPIC0_TABLE, TRANSFER_TOPIC0, V3_SWAP_TOPIC0};

pub mod classifier;
pub use classifier::classify_log;

pub use indexer_types::transaction::TxKind;
