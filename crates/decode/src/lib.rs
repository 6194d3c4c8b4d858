//! Per-kind decoding of `(topics, data)` into typed, semantic records (spec
//! §4.3). Every decoder here bounds-checks its input; malformed or
//! unexpectedly short data is a [`DecodeError`], never a panic — the raw log
//! is always persisted regardless of whether it decodes (spec §7:
//! `DecodeFailure` policy).

pub mod error;
pub use error::DecodeError;

pub mod erc20;
pub mod erc721;
pub mod erc1155;
pub mod swap;
pub mod curve;

pub use erc20::decode_erc20_transfer;
pub use erc721::decode_erc721_transfer;
pub use erc1155::decode_erc1155_transfer_single;
pub use swap::{decode_v2_swap, decode_v3_swap, DecodedSwap};
pub use curve::decode_curve_swap;

use alloy_primitives::{Address, B256, U256};

/// Extracts the low 20 bytes of a 32-byte topic as an address (spec §4.3:
/// `from = topics[1][-20:]`). Solidity left-pads indexed `address` topics
/// with zeros.
pub(crate) fn address_from_topic(topic: B256) -> Address {
    Address::from_slice(&topic.as_slice()[12..])
}

/// Decodes a big-endian `uint256` from a 32-byte data slot.
pub(crate) fn u256_from_slot(slot: &[u8]) -> U256 {
    U256::from_be_slice(slot)
}

/// Reads a fixed 32-byte slot at `index * 32` out of `data`, bounds-checking
/// first (spec §4.3: "decoders bounds-check `data` length; short data ⇒
/// decode failure").
pub(crate) fn slot(data: &[u8], index: usize) -> Result<&[u8], DecodeError> {
    let start = index * 32;
    let end = start + 32;
    data.get(start..end).ok_or(DecodeError::ShortData { needed: end, got: data.len() })
}
