use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Textual transaction-type tag persisted alongside each transaction (spec
/// §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxTypeTag {
    Legacy,
    Eip2930,
    Eip1559,
}

impl TxTypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Eip2930 => "eip2930",
            Self::Eip1559 => "eip1559",
        }
    }

    /// Maps the EIP-2718 envelope type byte returned by `eth_getBlockByNumber`
    /// onto the tag the store persists.
    pub fn from_type_byte(ty: Option<u8>) -> Self {
        match ty {
            Some(1) => Self::Eip2930,
            Some(2) => Self::Eip1559,
            _ => Self::Legacy,
        }
    }
}

/// A transaction row, keyed by hash (spec §3).
///
/// Invariant: every transaction references an existing block; creations have
/// a `None` recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: B256,
    pub block_number: u64,
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub input: Bytes,
    pub gas_price: Option<U256>,
    pub max_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub gas: u64,
    pub tx_type: TxTypeTag,
}

/// The three-way partition of spec §4.2's transaction classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxKind {
    ContractCreation,
    EthTransfer,
    ContractCall,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContractCreation => "contract_creation",
            Self::EthTransfer => "eth_transfer",
            Self::ContractCall => "contract_call",
        }
    }
}

impl Transaction {
    /// Classifies the transaction per spec §4.2: exactly one of
    /// `contract_creation` (recipient is null), `eth_transfer` (value>0 and
    /// empty input), or `contract_call` (otherwise).
    pub fn classify(&self) -> TxKind {
        if self.to.is_none() {
            return TxKind::ContractCreation;
        }
        if self.value > U256::ZERO && self.input.is_empty() {
            return TxKind::EthTransfer;
        }
        TxKind::ContractCall
    }
}
