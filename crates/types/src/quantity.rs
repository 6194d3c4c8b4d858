//! Normalization helpers for the hex-quantity and hex-address forms the
//! JSON-RPC interface hands back (spec §9: "a systems implementation must
//! define concrete tagged records... with explicit decoders that normalize
//! hex-quantity and hex-address forms").

use alloy_primitives::{Address, U256};

/// Parses a `0x`-prefixed hex quantity into a `u64`, saturating silently is
/// never acceptable here — an overflow means the upstream node returned
/// something we can't represent and callers should treat it as malformed.
pub fn parse_hex_u64(s: &str) -> Option<u64> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() {
        return Some(0);
    }
    u64::from_str_radix(s, 16).ok()
}

/// Parses a `0x`-prefixed hex quantity into a [`U256`], preserving full
/// 256-bit precision (spec §9).
pub fn parse_hex_u256(s: &str) -> Option<U256> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() {
        return Some(U256::ZERO);
    }
    U256::from_str_radix(s, 16).ok()
}

/// Lower-cases a 20-byte address for storage (spec §3, §4.3: "All address
/// values are lower-cased before storage").
pub fn lower_hex_address(address: Address) -> String {
    format!("{address:#x}").to_lowercase()
}

/// Renders a [`U256`] as a decimal string, the storage representation the
/// spec mandates for 256-bit amounts (spec §9).
pub fn u256_to_decimal(value: U256) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_u64() {
        assert_eq!(parse_hex_u64("0x64"), Some(100));
        assert_eq!(parse_hex_u64("0x0"), Some(0));
        assert_eq!(parse_hex_u64("0x"), Some(0));
        assert_eq!(parse_hex_u64("not-hex"), None);
    }

    #[test]
    fn parses_hex_u256_preserving_precision() {
        let max = "0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
        let parsed = parse_hex_u256(max).unwrap();
        assert_eq!(u256_to_decimal(parsed), U256::MAX.to_string());
    }

    #[test]
    fn lower_cases_addresses() {
        let addr: Address = "0xAbCd000000000000000000000000000000dEaD".parse().unwrap();
        assert_eq!(lower_hex_address(addr), "0xabcd000000000000000000000000000000dead");
    }
}
