use crate::{address_from_topic, error::DecodeError, u256_from_slot};
use indexer_types::{Log, TokenTransfer};

/// Decodes an ERC-20 `Transfer(address indexed from, address indexed to,
/// uint256 value)` log (spec §4.3).
///
/// `from = topics[1][-20:]`, `to = topics[2][-20:]`, `amount =
/// uint256(data[0:32])`.
pub fn decode_erc20_transfer(log: &Log) -> Result<TokenTransfer, DecodeError> {
    let from = log.topics[1].ok_or(DecodeError::MissingTopic(1))?;
    let to = log.topics[2].ok_or(DecodeError::MissingTopic(2))?;
    let amount_slot = log
        .data
        .get(0..32)
        .ok_or(DecodeError::ShortData { needed: 32, got: log.data.len() })?;

    Ok(TokenTransfer {
        transaction_hash: log.transaction_hash,
        block_number: log.block_number,
        log_index: log.log_index,
        token_address: log.address,
        from: address_from_topic(from),
        to: address_from_topic(to),
        amount: u256_from_slot(amount_slot).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes, B256, U256};

    fn transfer_log(from: Address, to: Address, amount: U256) -> Log {
        let mut data = vec![0u8; 32];
        data.copy_from_slice(&amount.to_be_bytes::<32>());
        Log {
            transaction_hash: B256::ZERO,
            block_number: 10,
            log_index: 0,
            address: Address::repeat_byte(0xAA),
            topics: [
                Some(B256::ZERO),
                Some(B256::left_padding_from(from.as_slice())),
                Some(B256::left_padding_from(to.as_slice())),
                None,
            ],
            data: Bytes::from(data),
        }
    }

    #[test]
    fn decodes_round_trip() {
        let from = Address::repeat_byte(1);
        let to = Address::repeat_byte(2);
        let amount = U256::from(123_456_789u64);
        let log = transfer_log(from, to, amount);
        let decoded = decode_erc20_transfer(&log).unwrap();
        assert_eq!(decoded.from, from);
        assert_eq!(decoded.to, to);
        assert_eq!(decoded.amount, amount.to_string());
    }

    #[test]
    fn short_data_is_decode_failure() {
        let mut log = transfer_log(Address::ZERO, Address::ZERO, U256::ZERO);
        log.data = Bytes::from(vec![0u8; 10]);
        assert!(matches!(decode_erc20_transfer(&log), Err(DecodeError::ShortData { .. })));
    }

    #[test]
    fn preserves_full_256_bit_precision() {
        let log = transfer_log(Address::repeat_byte(1), Address::repeat_byte(2), U256::MAX);
        let decoded = decode_erc20_transfer(&log).unwrap();
        assert_eq!(decoded.amount, U256::MAX.to_string());
    }
}
