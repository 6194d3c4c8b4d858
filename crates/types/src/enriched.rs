use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// ERC-20 or ERC-721 transfer, decoded from a `Transfer` log (spec §3, §4.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub log_index: u32,
    pub token_address: Address,
    pub from: Address,
    pub to: Address,
    /// Decimal string; for ERC-721 this is always `1`.
    pub amount: String,
}

/// The ERC-721/1155 standard a decoded NFT movement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NftStandard {
    Erc721,
    Erc1155,
}

impl NftStandard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Erc721 => "ERC721",
            Self::Erc1155 => "ERC1155",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftTransfer {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub log_index: u32,
    pub token_address: Address,
    pub from: Address,
    pub to: Address,
    pub token_id: String,
    pub amount: String,
    pub standard: NftStandard,
}

/// A decoded DEX swap (spec §3): `dex_name`, pool address, sender/recipient,
/// and the four packed/signed amount fields normalized to decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexSwap {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub log_index: u32,
    pub pool_address: Address,
    pub dex_name: String,
    pub sender: Address,
    pub recipient: Address,
    pub amount0_in: String,
    pub amount1_in: String,
    pub amount0_out: String,
    pub amount1_out: String,
}

impl DexSwap {
    /// Builds the four packed V2-style amount fields from a pair of signed
    /// V3-style deltas, where a negative delta means "out of the pool" (the
    /// pool's token left to the swapper) and a positive delta means "in".
    pub fn from_signed_deltas(amount0: alloy_primitives::I256, amount1: alloy_primitives::I256) -> SignedAmounts {
        SignedAmounts {
            amount0_in: if amount0.is_negative() { U256::ZERO } else { amount0.unsigned_abs() },
            amount1_in: if amount1.is_negative() { U256::ZERO } else { amount1.unsigned_abs() },
            amount0_out: if amount0.is_negative() { amount0.unsigned_abs() } else { U256::ZERO },
            amount1_out: if amount1.is_negative() { amount1.unsigned_abs() } else { U256::ZERO },
        }
    }
}

/// Intermediate representation used to normalize V3's signed `(amount0,
/// amount1)` pair into the same in/out shape as V2's packed amounts.
pub struct SignedAmounts {
    pub amount0_in: U256,
    pub amount1_in: U256,
    pub amount0_out: U256,
    pub amount1_out: U256,
}

/// Emitted for every creation transaction whose receipt carries a non-null
/// `contract_address` (spec §4.6). Scoped to the transaction, not a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDeployment {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub deployer: Address,
    pub contract_address: Address,
}
