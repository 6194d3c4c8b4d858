//! Raw JSON shapes returned by the node, and the decoders that normalize
//! them into domain records (spec §9: "a systems implementation must define
//! concrete tagged records for blocks, transactions, and receipts, with
//! explicit decoders that normalize hex-quantity and hex-address forms").

use alloy_primitives::{Address, Bytes, B256};
use indexer_types::quantity::{parse_hex_u256, parse_hex_u64};
use indexer_types::{Block, Log, Receipt, Transaction, TxTypeTag};
use serde::Deserialize;

use crate::error::FetchError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBlock {
    number: String,
    hash: B256,
    parent_hash: B256,
    timestamp: String,
    gas_used: String,
    gas_limit: String,
    base_fee_per_gas: Option<String>,
    #[serde(default)]
    transactions: Vec<RawTransaction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTransaction {
    hash: B256,
    from: Address,
    to: Option<Address>,
    value: String,
    input: Bytes,
    gas_price: Option<String>,
    max_fee_per_gas: Option<String>,
    max_priority_fee_per_gas: Option<String>,
    gas: String,
    #[serde(rename = "type", default)]
    ty: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawLog {
    transaction_hash: B256,
    block_number: String,
    log_index: String,
    address: Address,
    topics: Vec<B256>,
    data: Bytes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawReceipt {
    transaction_hash: B256,
    block_number: String,
    status: Option<String>,
    gas_used: String,
    logs: Vec<RawLog>,
    contract_address: Option<Address>,
    effective_gas_price: Option<String>,
}

fn required_u64(field: &'static str, raw: &str) -> Result<u64, FetchError> {
    parse_hex_u64(raw).ok_or_else(|| FetchError::Transient(format!("malformed {field}: {raw}")))
}

fn required_u256(field: &'static str, raw: &str) -> Result<alloy_primitives::U256, FetchError> {
    parse_hex_u256(raw).ok_or_else(|| FetchError::Transient(format!("malformed {field}: {raw}")))
}

pub(crate) fn decode_block(raw: RawBlock) -> Result<(Block, Vec<Transaction>), FetchError> {
    let number = required_u64("block.number", &raw.number)?;
    let base_fee_per_gas =
        raw.base_fee_per_gas.as_deref().map(|s| required_u256("block.baseFeePerGas", s)).transpose()?;

    let block = Block {
        number,
        hash: raw.hash,
        parent_hash: raw.parent_hash,
        timestamp: required_u64("block.timestamp", &raw.timestamp)?,
        gas_used: required_u64("block.gasUsed", &raw.gas_used)?,
        gas_limit: required_u64("block.gasLimit", &raw.gas_limit)?,
        base_fee_per_gas,
        reorged: false,
    };

    let transactions =
        raw.transactions.into_iter().map(|tx| decode_transaction(tx, number)).collect::<Result<Vec<_>, _>>()?;

    Ok((block, transactions))
}

fn decode_transaction(raw: RawTransaction, block_number: u64) -> Result<Transaction, FetchError> {
    let ty_byte = raw
        .ty
        .as_deref()
        .map(|s| required_u64("transaction.type", s))
        .transpose()?
        .map(|v| v as u8);

    Ok(Transaction {
        hash: raw.hash,
        block_number,
        from: raw.from,
        to: raw.to,
        value: required_u256("transaction.value", &raw.value)?,
        input: raw.input,
        gas_price: raw.gas_price.as_deref().map(|s| required_u256("transaction.gasPrice", s)).transpose()?,
        max_fee_per_gas: raw
            .max_fee_per_gas
            .as_deref()
            .map(|s| required_u256("transaction.maxFeePerGas", s))
            .transpose()?,
        max_priority_fee_per_gas: raw
            .max_priority_fee_per_gas
            .as_deref()
            .map(|s| required_u256("transaction.maxPriorityFeePerGas", s))
            .transpose()?,
        gas: required_u64("transaction.gas", &raw.gas)?,
        tx_type: TxTypeTag::from_type_byte(ty_byte),
    })
}

fn decode_log(raw: RawLog) -> Result<Log, FetchError> {
    let mut topics: [Option<B256>; 4] = [None; 4];
    for (slot, topic) in topics.iter_mut().zip(raw.topics.into_iter()) {
        *slot = Some(topic);
    }
    Ok(Log {
        transaction_hash: raw.transaction_hash,
        block_number: required_u64("log.blockNumber", &raw.block_number)?,
        log_index: required_u64("log.logIndex", &raw.log_index)? as u32,
        address: raw.address,
        topics,
        data: raw.data,
    })
}

/// Decodes a receipt and its inlined `logs` array together (spec §3: logs
/// are 1:N with a transaction, delivered by the node as part of the
/// transaction's receipt).
pub(crate) fn decode_receipt(raw: RawReceipt) -> Result<(Receipt, Vec<Log>), FetchError> {
    let status = match raw.status.as_deref() {
        Some(s) => required_u64("receipt.status", s)? == 1,
        // Pre-Byzantium receipts have no status field; treat as success.
        None => true,
    };
    let log_count = raw.logs.len() as u32;
    let logs = raw.logs.into_iter().map(decode_log).collect::<Result<Vec<_>, _>>()?;
    let receipt = Receipt {
        transaction_hash: raw.transaction_hash,
        block_number: required_u64("receipt.blockNumber", &raw.block_number)?,
        status,
        gas_used: required_u64("receipt.gasUsed", &raw.gas_used)?,
        log_count,
        contract_address: raw.contract_address,
        effective_gas_price: raw
            .effective_gas_price
            .as_deref()
            .map(|s| required_u256("receipt.effectiveGasPrice", s))
            .transpose()?
            .unwrap_or_default(),
    };
    Ok((receipt, logs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_block_with_transactions() {
        let raw = RawBlock {
            number: "0x64".into(),
            hash: B256::repeat_byte(1),
            parent_hash: B256::repeat_byte(2),
            timestamp: "0x5f5e100".into(),
            gas_used: "0x5208".into(),
            gas_limit: "0x1c9c380".into(),
            base_fee_per_gas: Some("0x3b9aca00".into()),
            transactions: vec![RawTransaction {
                hash: B256::repeat_byte(3),
                from: Address::repeat_byte(4),
                to: Some(Address::repeat_byte(5)),
                value: "0xde0b6b3a7640000".into(),
                input: Bytes::new(),
                gas_price: None,
                max_fee_per_gas: Some("0x77359400".into()),
                max_priority_fee_per_gas: Some("0x3b9aca00".into()),
                gas: "0x5208".into(),
                ty: Some("0x2".into()),
            }],
        };
        let (block, txs) = decode_block(raw).unwrap();
        assert_eq!(block.number, 100);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].tx_type, TxTypeTag::Eip1559);
    }

    #[test]
    fn decodes_receipt_without_legacy_status_as_success() {
        let raw = RawReceipt {
            transaction_hash: B256::repeat_byte(9),
            block_number: "0x1".into(),
            status: None,
            gas_used: "0x5208".into(),
            logs: vec![RawLog {
                transaction_hash: B256::repeat_byte(9),
                block_number: "0x1".into(),
                log_index: "0x0".into(),
                address: Address::repeat_byte(6),
                topics: vec![B256::repeat_byte(7)],
                data: Bytes::new(),
            }],
            contract_address: None,
            effective_gas_price: None,
        };
        let (receipt, logs) = decode_receipt(raw).unwrap();
        assert!(receipt.status);
        assert_eq!(receipt.log_count, 1);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].topics[0], Some(B256::repeat_byte(7)));
        assert_eq!(logs[0].topics[1], None);
    }

    #[test]
    fn malformed_quantity_is_transient_error() {
        let raw = RawReceipt {
            transaction_hash: B256::ZERO,
            block_number: "not-hex".into(),
            status: None,
            gas_used: "0x0".into(),
            logs: vec![],
            contract_address: None,
            effective_gas_price: None,
        };
        assert!(matches!(decode_receipt(raw).map(|_| ()), Err(FetchError::Transient(_))));
    }
}
