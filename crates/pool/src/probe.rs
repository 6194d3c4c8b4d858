use alloy_primitives::{address, Address, B256};
use async_trait::async_trait;
use lazy_static::lazy_static;

use crate::error::PoolError;

/// The 4-byte selector for the parameterless `factory()` view function
/// implemented by Uniswap-V3-shaped pools.
const FACTORY_SELECTOR: [u8; 4] = [0xc4, 0x5a, 0x01, 0x55];

lazy_static! {
    /// Step 5 of spec §4.4: a curated map from known factory addresses to
    /// the DEX family name they mint pools for.
    static ref FACTORY_TO_DEX: Vec<(Address, &'static str)> = vec![
        (address!("33128a8fC17869897dcE68Ed026d694621f6FDfD"), "Uniswap V3"),
        (address!("8909Dc15e40173Ff4699343b6eB8132c65e18eC6"), "Uniswap V2"),
        (address!("420DD381b31aEf6683db6B902084cB0FFECe40Da"), "Aerodrome V2"),
        (address!("5e7BB104d84c7CB9B682AaC2F3d509f5F406809A"), "Aerodrome CL"),
    ];
}

/// Resolves a factory address through the curated table, falling back to an
/// `Unknown(<prefix>)` label that still surfaces something queryable rather
/// than discarding the probe result (spec §4.4 step 5).
pub fn dex_for_factory(factory: Address) -> String {
    if let Some((_, name)) = FACTORY_TO_DEX.iter().find(|(addr, _)| *addr == factory) {
        return name.to_string();
    }
    format!("Unknown({:#x})", &factory.as_slice()[0..4].iter().fold(0u32, |acc, b| (acc << 8) | *b as u32))
}

/// Signature-based fallback used when the pool has no `factory()` method at
/// all (spec §4.4 step 5): the swap's own topic0 hints at the DEX family.
pub fn dex_from_swap_signature(swap_topic0: B256) -> String {
    if swap_topic0 == *indexer_registry::signatures::CURVE_TOKEN_EXCHANGE_TOPIC0 {
        "Curve".to_string()
    } else if swap_topic0 == *indexer_registry::signatures::V3_SWAP_TOPIC0 {
        // Aerodrome CL reuses the Uniswap V3 Swap ABI verbatim; without a
        // working factory() call there is no way to tell them apart, so the
        // fallback names the more common case on Base.
        "Aerodrome CL".to_string()
    } else {
        "Unknown DEX".to_string()
    }
}

/// Abstraction over the read-only `factory()` call so the resolver can be
/// tested without a live RPC endpoint (mirrors the `ChainProvider`-style
/// seams used throughout the providers-alloy crate this is grounded on).
#[async_trait]
pub trait FactoryProbe: Send + Sync {
    async fn factory_of(&self, pool: Address) -> Result<Address, PoolError>;
}

/// [`FactoryProbe`] backed by a live `eth_call` against `factory()`.
#[derive(Debug, Clone)]
pub struct AlloyFactoryProbe<P> {
    provider: P,
}

impl<P> AlloyFactoryProbe<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> FactoryProbe for AlloyFactoryProbe<P>
where
    P: alloy_provider::Provider + Send + Sync,
{
    async fn factory_of(&self, pool: Address) -> Result<Address, PoolError> {
        use alloy_rpc_types::TransactionRequest;

        let request = TransactionRequest::default().to(pool).input(FACTORY_SELECTOR.to_vec().into());
        let result =
            self.provider.call(&request).await.map_err(|_| PoolError::ProbeFailed(pool))?;
        if result.len() < 32 {
            return Err(PoolError::MalformedReturn(pool));
        }
        Ok(Address::from_slice(&result[12..32]))
    }
}
