//! Log and transaction classification (spec §4.2).

use crate::signatures::{TOPIC0_TABLE, TRANSFER_TOPIC0};
use alloy_primitives::B256;
use indexer_types::EventKind;

/// Classifies a log by `(topic0, topic_count)`, where `topic_count` counts
/// non-null topics (spec §4.2).
///
/// Tie-break rule: the ERC-20 and ERC-721 `Transfer` events share topic0;
/// exactly four non-null topics means ERC-721, anything else means ERC-20.
/// Any unrecognized topic0 classifies as [`EventKind::Other`].
pub fn classify_log(topic0: Option<B256>, topic_count: usize) -> EventKind {
    let Some(topic0) = topic0 else {
        return EventKind::Other;
    };

    if topic0 == *TRANSFER_TOPIC0 {
        return if topic_count == 4 { EventKind::Erc721Transfer } else { EventKind::Erc20Transfer };
    }

    TOPIC0_TABLE.get(&topic0).copied().unwrap_or(EventKind::Other)
}
