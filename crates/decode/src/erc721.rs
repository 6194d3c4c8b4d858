use crate::{address_from_topic, error::DecodeError, u256_from_slot};
use indexer_types::{NftStandard, NftTransfer};

/// Decodes an ERC-721 `Transfer(address indexed from, address indexed to,
/// uint256 indexed tokenId)` log (spec §4.3). `from`/`to` come from topics;
/// `tokenId = uint256(topics[3])`; `amount` is always `1`.
pub fn decode_erc721_transfer(log: &indexer_types::Log) -> Result<NftTransfer, DecodeError> {
    let from = log.topics[1].ok_or(DecodeError::MissingTopic(1))?;
    let to = log.topics[2].ok_or(DecodeError::MissingTopic(2))?;
    let token_id = log.topics[3].ok_or(DecodeError::MissingTopic(3))?;

    Ok(NftTransfer {
        transaction_hash: log.transaction_hash,
        block_number: log.block_number,
        log_index: log.log_index,
        token_address: log.address,
        from: address_from_topic(from),
        to: address_from_topic(to),
        token_id: u256_from_slot(token_id.as_slice()).to_string(),
        amount: "1".to_string(),
        standard: NftStandard::Erc721,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes, B256, U256};
    use indexer_types::Log;

    fn erc721_log(from: Address, to: Address, token_id: U256) -> Log {
        Log {
            transaction_hash: B256::ZERO,
            block_number: 10,
            log_index: 0,
            address: Address::repeat_byte(0xAA),
            topics: [
                Some(B256::ZERO),
                Some(B256::left_padding_from(from.as_slice())),
                Some(B256::left_padding_from(to.as_slice())),
                Some(B256::from(token_id.to_be_bytes::<32>())),
            ],
            data: Bytes::new(),
        }
    }

    #[test]
    fn decodes_round_trip() {
        let from = Address::repeat_byte(3);
        let to = Address::repeat_byte(4);
        let token_id = U256::from(42u64);
        let log = erc721_log(from, to, token_id);
        let decoded = decode_erc721_transfer(&log).unwrap();
        assert_eq!(decoded.from, from);
        assert_eq!(decoded.to, to);
        assert_eq!(decoded.token_id, "42");
        assert_eq!(decoded.amount, "1");
    }

    #[test]
    fn missing_token_id_topic_is_decode_failure() {
        let mut log = erc721_log(Address::ZERO, Address::ZERO, U256::ZERO);
        log.topics[3] = None;
        assert!(matches!(decode_erc721_transfer(&log), Err(DecodeError::MissingTopic(3))));
    }
}
