use alloy_primitives::Address;

/// Errors from the on-chain factory probe (spec §4.4 step 5).
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The `factory()` call reverted, timed out, or the node is unreachable.
    #[error("factory() probe failed for pool {0}")]
    ProbeFailed(Address),
    /// The call succeeded but returned fewer than 32 bytes.
    #[error("factory() returned malformed data for pool {0}")]
    MalformedReturn(Address),
}
