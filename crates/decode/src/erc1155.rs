use crate::{address_from_topic, error::DecodeError, slot, u256_from_slot};
use indexer_types::{Log, NftStandard, NftTransfer};

/// Decodes an ERC-1155 `TransferSingle(address indexed operator, address
/// indexed from, address indexed to, uint256 id, uint256 value)` log (spec
/// §4.3). `from = topics[2][-20:]`, `to = topics[3][-20:]`; `(tokenId,
/// amount) = (uint256(data[0:32]), uint256(data[32:64]))`.
pub fn decode_erc1155_transfer_single(log: &Log) -> Result<NftTransfer, DecodeError> {
    let from = log.topics[2].ok_or(DecodeError::MissingTopic(2))?;
    let to = log.topics[3].ok_or(DecodeError::MissingTopic(3))?;
    let token_id = u256_from_slot(slot(&log.data, 0)?);
    let amount = u256_from_slot(slot(&log.data, 1)?);

    Ok(NftTransfer {
        transaction_hash: log.transaction_hash,
        block_number: log.block_number,
        log_index: log.log_index,
        token_address: log.address,
        from: address_from_topic(from),
        to: address_from_topic(to),
        token_id: token_id.to_string(),
        amount: amount.to_string(),
        standard: NftStandard::Erc1155,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes, B256, U256};

    fn transfer_single_log(from: Address, to: Address, id: U256, amount: U256) -> Log {
        let mut data = Vec::with_capacity(64);
        data.extend_from_slice(&id.to_be_bytes::<32>());
        data.extend_from_slice(&amount.to_be_bytes::<32>());
        Log {
            transaction_hash: B256::ZERO,
            block_number: 5,
            log_index: 2,
            address: Address::repeat_byte(0xBB),
            topics: [
                Some(B256::ZERO),
                Some(B256::left_padding_from(Address::repeat_byte(9).as_slice())),
                Some(B256::left_padding_from(from.as_slice())),
                Some(B256::left_padding_from(to.as_slice())),
            ],
            data: Bytes::from(data),
        }
    }

    #[test]
    fn decodes_round_trip() {
        let from = Address::repeat_byte(5);
        let to = Address::repeat_byte(6);
        let log = transfer_single_log(from, to, U256::from(7u64), U256::from(3u64));
        let decoded = decode_erc1155_transfer_single(&log).unwrap();
        assert_eq!(decoded.from, from);
        assert_eq!(decoded.to, to);
        assert_eq!(decoded.token_id, "7");
        assert_eq!(decoded.amount, "3");
    }

    #[test]
    fn short_data_is_decode_failure() {
        let mut log = transfer_single_log(Address::ZERO, Address::ZERO, U256::ZERO, U256::ZERO);
        log.data = Bytes::from(vec![0u8; 40]);
        assert!(matches!(decode_erc1155_transfer_single(&log), Err(DecodeError::ShortData { .. })));
    }
}
