use crate::{address_from_topic, error::DecodeError, slot, u256_from_slot};
use alloy_primitives::{Address, I256, U256};
use indexer_types::{Log, SignedAmounts};

/// A decoded swap, prior to DEX-name resolution (spec §4.4 keeps pool/DEX
/// resolution out of the decoder's hands — the block enricher calls it
/// separately).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSwap {
    pub pool_address: Address,
    pub sender: Address,
    pub recipient: Address,
    pub amount0_in: U256,
    pub amount1_in: U256,
    pub amount0_out: U256,
    pub amount1_out: U256,
}

/// Decodes a Uniswap-V2-shaped `Swap(address indexed sender, uint256
/// amount0In, uint256 amount1In, uint256 amount0Out, uint256 amount1Out,
/// address indexed to)` log (spec §4.3): topics[1]=sender, topics[2]=
/// recipient; data is four packed `uint256`s.
pub fn decode_v2_swap(log: &Log) -> Result<DecodedSwap, DecodeError> {
    let sender = log.topics[1].ok_or(DecodeError::MissingTopic(1))?;
    let recipient = log.topics[2].ok_or(DecodeError::MissingTopic(2))?;

    Ok(DecodedSwap {
        pool_address: log.address,
        sender: address_from_topic(sender),
        recipient: address_from_topic(recipient),
        amount0_in: u256_from_slot(slot(&log.data, 0)?),
        amount1_in: u256_from_slot(slot(&log.data, 1)?),
        amount0_out: u256_from_slot(slot(&log.data, 2)?),
        amount1_out: u256_from_slot(slot(&log.data, 3)?),
    })
}

/// Decodes a Uniswap-V3-shaped `Swap(address indexed sender, address
/// indexed recipient, int256 amount0, int256 amount1, uint160 sqrtPriceX96,
/// uint128 liquidity, int24 tick)` log (spec §4.3). Only the two signed
/// amounts are semantically required for [`DecodedSwap`]; `sqrtPriceX96`,
/// `liquidity`, and `tick` are validated for presence (bounds-checked) but
/// not otherwise surfaced.
pub fn decode_v3_swap(log: &Log) -> Result<DecodedSwap, DecodeError> {
    let sender = log.topics[1].ok_or(DecodeError::MissingTopic(1))?;
    let recipient = log.topics[2].ok_or(DecodeError::MissingTopic(2))?;

    let amount0 = decode_signed_256(slot(&log.data, 0)?)?;
    let amount1 = decode_signed_256(slot(&log.data, 1)?)?;
    // sqrtPriceX96 (uint160), liquidity (uint128), tick (int24) are packed
    // into the third data word; only presence is validated here.
    slot(&log.data, 2)?;

    let SignedAmounts { amount0_in, amount1_in, amount0_out, amount1_out } =
        indexer_types::DexSwap::from_signed_deltas(amount0, amount1);

    Ok(DecodedSwap {
        pool_address: log.address,
        sender: address_from_topic(sender),
        recipient: address_from_topic(recipient),
        amount0_in,
        amount1_in,
        amount0_out,
        amount1_out,
    })
}

/// Reinterprets a 32-byte big-endian slot as a two's-complement `int256`,
/// rejecting magnitudes beyond `2^255` (spec §8). A full 256-bit two's
/// complement value can never actually exceed that bound — the check exists
/// to document the invariant and to guard any future caller that hands in a
/// narrower, sign-extended width.
fn decode_signed_256(data: &[u8]) -> Result<I256, DecodeError> {
    let raw = U256::from_be_slice(data);
    let value = I256::from_raw(raw);
    if value.unsigned_abs() > U256::from(1) << 255 {
        return Err(DecodeError::SignedOverflow);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, B256};

    fn topic_addr(addr: Address) -> B256 {
        B256::left_padding_from(addr.as_slice())
    }

    #[test]
    fn decodes_v2_swap() {
        let sender = Address::repeat_byte(1);
        let recipient = Address::repeat_byte(2);
        let mut data = Vec::new();
        for v in [10u64, 0, 0, 20] {
            data.extend_from_slice(&U256::from(v).to_be_bytes::<32>());
        }
        let log = Log {
            transaction_hash: B256::ZERO,
            block_number: 1,
            log_index: 0,
            address: Address::repeat_byte(9),
            topics: [Some(B256::ZERO), Some(topic_addr(sender)), Some(topic_addr(recipient)), None],
            data: Bytes::from(data),
        };
        let swap = decode_v2_swap(&log).unwrap();
        assert_eq!(swap.sender, sender);
        assert_eq!(swap.recipient, recipient);
        assert_eq!(swap.amount0_in, U256::from(10));
        assert_eq!(swap.amount1_out, U256::from(20));
    }

    #[test]
    fn decodes_v3_swap_with_negative_amount() {
        let sender = Address::repeat_byte(3);
        let recipient = Address::repeat_byte(4);
        let amount0 = I256::try_from(-1000i64).unwrap();
        let amount1 = I256::try_from(500i64).unwrap();
        let mut data = Vec::new();
        data.extend_from_slice(&amount0.to_be_bytes::<32>());
        data.extend_from_slice(&amount1.to_be_bytes::<32>());
        data.extend_from_slice(&[0u8; 32]); // sqrtPrice/liquidity/tick word
        let log = Log {
            transaction_hash: B256::ZERO,
            block_number: 1,
            log_index: 0,
            address: Address::repeat_byte(9),
            topics: [Some(B256::ZERO), Some(topic_addr(sender)), Some(topic_addr(recipient)), None],
            data: Bytes::from(data),
        };
        let swap = decode_v3_swap(&log).unwrap();
        // amount0 negative => token0 left the pool => amount0_out
        assert_eq!(swap.amount0_out, U256::from(1000));
        assert_eq!(swap.amount0_in, U256::ZERO);
        assert_eq!(swap.amount1_in, U256::from(500));
    }

    #[test]
    fn most_negative_int256_has_magnitude_two_pow_255() {
        let min_bytes = I256::MIN.to_be_bytes::<32>();
        let decoded = decode_signed_256(&min_bytes).unwrap();
        assert_eq!(decoded.unsigned_abs(), U256::from(1) << 255);
    }

    #[test]
    fn short_v2_data_is_decode_failure() {
        let log = Log {
            transaction_hash: B256::ZERO,
            block_number: 1,
            log_index: 0,
            address: Address::ZERO,
            topics: [Some(B256::ZERO), Some(B256::ZERO), Some(B256::ZERO), None],
            data: Bytes::from(vec![0u8; 16]),
        };
        assert!(matches!(decode_v2_swap(&log), Err(DecodeError::ShortData { .. })));
    }
}
