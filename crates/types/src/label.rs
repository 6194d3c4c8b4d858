use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Static `(address -> {name, category, protocol})` row, read-only at
/// runtime and seeded at startup (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractLabel {
    pub address: Address,
    pub name: String,
    pub category: String,
    pub protocol: String,
}
