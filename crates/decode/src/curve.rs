use crate::{address_from_topic, error::DecodeError, slot, u256_from_slot};
use crate::swap::DecodedSwap;
use indexer_types::Log;

/// Decodes a Curve `TokenExchange(address indexed buyer, int128 sold_id,
/// uint256 tokens_sold, int128 bought_id, uint256 tokens_bought)` log (spec
/// §4.3). Curve pools trade between an arbitrary pair of `N` tokens chosen
/// by index rather than a fixed `token0`/`token1`, which doesn't fit
/// [`DecodedSwap`]'s two-column shape exactly: the sold leg is recorded as
/// `amount0`, the bought leg as `amount1`, regardless of which coin indices
/// were actually involved. `buyer` fills both `sender` and `recipient`,
/// since `TokenExchange` carries only one actor address.
pub fn decode_curve_swap(log: &Log) -> Result<DecodedSwap, DecodeError> {
    let buyer = log.topics[1].ok_or(DecodeError::MissingTopic(1))?;
    let tokens_sold = u256_from_slot(slot(&log.data, 1)?);
    let tokens_bought = u256_from_slot(slot(&log.data, 3)?);

    let buyer = address_from_topic(buyer);
    Ok(DecodedSwap {
        pool_address: log.address,
        sender: buyer,
        recipient: buyer,
        amount0_in: tokens_sold,
        amount1_in: alloy_primitives::U256::ZERO,
        amount0_out: alloy_primitives::U256::ZERO,
        amount1_out: tokens_bought,
    })
}
