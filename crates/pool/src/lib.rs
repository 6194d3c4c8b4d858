//! The Pool/DEX Resolver (spec §4.4): classifies a swap's pool address into
//! a DEX family name without ever blocking the per-block write path on RPC.

pub mod error;
pub use error::PoolError;

pub mod singletons;

pub mod probe;
pub use probe::{dex_for_factory, dex_from_swap_signature, AlloyFactoryProbe, FactoryProbe};

pub mod cache;
pub use cache::{DurableDexCache, InMemoryDexCache, PendingLookups};

pub mod resolver;
pub use resolver::PoolResolver;
