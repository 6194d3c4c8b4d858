use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

/// The anchor entity of the data model (spec §3). Every other table is
/// scoped to a block number.
///
/// Invariant: for every persisted non-reorged block `B` with
/// `B.number > first`, a non-reorged block `P` exists at `B.number - 1` with
/// `P.hash == B.parent_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub number: u64,
    pub hash: B256,
    pub parent_hash: B256,
    pub timestamp: u64,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub base_fee_per_gas: Option<U256>,
    pub reorged: bool,
}

impl Block {
    /// True if `self` is the direct canonical successor of `parent`.
    pub fn is_child_of(&self, parent: &Block) -> bool {
        self.parent_hash == parent.hash && self.number == parent.number + 1
    }
}
