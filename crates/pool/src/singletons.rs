use alloy_primitives::{address, Address};
use std::collections::HashSet;

use lazy_static::lazy_static;

/// Step 1 of spec §4.4: non-factory singletons that resolve directly without
/// ever reaching a factory probe. Uniswap V4's pool manager holds every V4
/// pool behind one contract, so the "pool address" seen on a swap log is the
/// manager itself.
lazy_static! {
    pub static ref SINGLETON_DEX: Vec<(Address, &'static str)> =
        vec![(address!("498581fF718922c3f8e6A244956aF099B2652b2b"), "Uniswap V4")];
}

/// Step 2 of spec §4.4: a curated set of known Curve pools on Base. Curve
/// factories are numerous and inconsistently deployed, so well-known pools
/// are special-cased ahead of the factory probe rather than grown into a
/// `FactoryToDex` table entry per factory.
lazy_static! {
    pub static ref CURATED_CURVE_POOLS: HashSet<Address> = {
        let mut set = HashSet::new();
        set.insert(address!("d6F3768E62Ef92a9798E5A8cEdD2b78907cEceDd"));
        set.insert(address!("f6C5F01C7F3148891ad0e5DfF4F2c44Aa4e4de7e"));
        set
    };
}

/// Resolves a pool address against the singleton and curated-Curve tables
/// only (spec §4.4 steps 1-2). Returns `None` if neither matches, meaning
/// the caller should fall through to the cache and, eventually, the probe.
pub fn lookup_static(pool: Address) -> Option<&'static str> {
    if let Some((_, name)) = SINGLETON_DEX.iter().find(|(addr, _)| *addr == pool) {
        return Some(name);
    }
    if CURATED_CURVE_POOLS.contains(&pool) {
        return Some("Curve");
    }
    None
}
