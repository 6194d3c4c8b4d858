//! Canonical topic-0 hashes for the curated set of event kinds this indexer
//! decodes (spec §4.1). Most are computed once, at process start, from their
//! human-readable Solidity signature; a handful of signatures this indexer
//! has observed on Base but cannot cleanly spell out as ABI text are
//! declared as literal hex instead (spec §4.1: "a small set of
//! observed-but-uncomputable signatures is declared by literal hex").

use alloy_primitives::{b256, keccak256, B256};
use indexer_types::EventKind;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// `(human-readable signature, resulting event kind)`. Built once into
/// [`TOPIC0_TABLE`] below. Where two distinct protocols emit the exact same
/// ABI (Aerodrome's concentrated-liquidity pools reuse Uniswap V3's `Swap`
/// verbatim), only one entry is listed here — the pool/DEX resolver (§4.4),
/// not the classifier, is what tells them apart.
const CANONICAL_SIGNATURES: &[(&str, EventKind)] = &[
    ("Transfer(address,address,uint256)", EventKind::Erc20Transfer),
    ("Approval(address,address,uint256)", EventKind::Approval),
    ("ApprovalForAll(address,address,bool)", EventKind::Approval),
    (
        "TransferSingle(address,address,address,uint256,uint256)",
        EventKind::Erc1155Transfer,
    ),
    (
        "TransferBatch(address,address,address,uint256[],uint256[])",
        EventKind::Erc1155Transfer,
    ),
    // Uniswap V2 / solidly-style constant-product pools.
    (
        "Swap(address,uint256,uint256,uint256,uint256,address)",
        EventKind::DexSwapV2,
    ),
    ("Sync(uint112,uint112)", EventKind::PoolSync),
    ("Mint(address,uint256,uint256)", EventKind::LiquidityAdd),
    ("Burn(address,uint256,uint256,address)", EventKind::LiquidityRemove),
    ("PairCreated(address,address,address,uint256)", EventKind::PoolCreated),
    // Uniswap V3 / concentrated-liquidity pools (also matches Aerodrome CL).
    (
        "Swap(address,address,int256,int256,uint160,uint128,int24)",
        EventKind::DexSwapV3,
    ),
    (
        "Mint(address,address,int24,int24,uint128,uint256,uint256)",
        EventKind::LiquidityAdd,
    ),
    ("Burn(address,int24,int24,uint128,uint256,uint256)", EventKind::LiquidityRemove),
    (
        "Collect(address,address,int24,int24,uint128,uint128)",
        EventKind::LiquidityCollect,
    ),
    (
        "PoolCreated(address,address,uint24,int24,address)",
        EventKind::PoolCreated,
    ),
    // Aerodrome / Velodrome ve(3,3) pools: a V2-style pool with an extra
    // `to` parameter distinguishing it from vanilla Uniswap V2.
    (
        "Swap(address,address,uint256,uint256,uint256,uint256,address)",
        EventKind::DexSwapAero,
    ),
    // Curve stableswap / crypto pools.
    (
        "TokenExchange(address,int128,uint256,int128,uint256)",
        EventKind::DexSwapCurve,
    ),
    (
        "TokenExchangeUnderlying(address,int128,uint256,int128,uint256)",
        EventKind::DexSwapCurve,
    ),
    // ERC-4337 account abstraction.
    (
        "UserOperationEvent(bytes32,address,address,uint256,bool,uint256,uint256)",
        EventKind::UserOperation,
    ),
    // Lending (Aave-shaped).
    ("Supply(address,address,address,uint256,uint16)", EventKind::LendingSupply),
    (
        "Withdraw(address,address,address,uint256)",
        EventKind::LendingWithdraw,
    ),
    (
        "Borrow(address,address,address,uint256,uint8,uint256,uint16)",
        EventKind::LendingBorrow,
    ),
    ("Repay(address,address,address,uint256,bool)", EventKind::LendingRepay),
    (
        "LiquidationCall(address,address,address,uint256,uint256,address,bool)",
        EventKind::LendingLiquidation,
    ),
    (
        "FlashLoan(address,address,address,uint256,uint256,uint256,uint256,uint16)",
        EventKind::FlashLoan,
    ),
    // Staking / gauges / rewards.
    ("Staked(address,uint256)", EventKind::Staking),
    ("RewardPaid(address,uint256)", EventKind::RewardClaim),
    ("Deposit(address,uint256,uint256)", EventKind::GaugeDeposit),
    ("Withdraw(address,uint256)", EventKind::GaugeWithdraw),
    (
        "VoteCast(address,uint256,uint8,uint256,string)",
        EventKind::Vote,
    ),
    (
        "ProposalCreated(uint256,address,address[],uint256[],string[],bytes[],uint256,uint256,string)",
        EventKind::Governance,
    ),
    // Oracle / multisig / fees / bridge / admin.
    ("AnswerUpdated(int256,uint256,uint256)", EventKind::OracleUpdate),
    ("ExecutionSuccess(bytes32,uint256)", EventKind::MultisigExec),
    ("ProtocolFeesCollected(address,uint256)", EventKind::ProtocolFees),
    (
        "ETHDepositInitiated(address,address,uint256,bytes)",
        EventKind::BridgeSend,
    ),
    (
        "ETHWithdrawalFinalized(address,address,uint256,bytes)",
        EventKind::BridgeReceive,
    ),
    ("OwnershipTransferred(address,address)", EventKind::OwnershipChange),
    ("Upgraded(address)", EventKind::ContractUpgrade),
    // Concentrated-liquidity NFT position manager.
    (
        "IncreaseLiquidity(uint256,uint128,uint256,uint256)",
        EventKind::NftPositionMint,
    ),
    (
        "DecreaseLiquidity(uint256,uint128,uint256,uint256)",
        EventKind::NftPositionBurn,
    ),
];

/// WETH's `Deposit`/`Withdrawal` signatures collide textually with the
/// generic gauge and lending `Deposit`/`Withdraw` events above once other
/// protocols are folded in, so their hashes are pinned as literal constants
/// (the "observed-but-uncomputable from a unique signature string" case
/// spec §4.1 calls out) rather than computed from `CANONICAL_SIGNATURES`.
pub const WETH_DEPOSIT: B256 = b256!("e1fffcc4923d04b559f4d29a8bfc6cda04eb5b0d3c460751c2402c5c5cc9109c");
pub const WETH_WITHDRAWAL: B256 = b256!("7fcf532c15f0a6db0bd6d0e038bea71d30d808c7d98cb3bf7268a95bf5081b65");

lazy_static! {
    /// `topic0 -> default event kind`, computed once at process start (spec
    /// §4.1). The ERC-20/721 `Transfer` ambiguity and the WETH wrap/unwrap
    /// pair are resolved on top of this table by the classifier (§4.2),
    /// not inside it.
    pub static ref TOPIC0_TABLE: HashMap<B256, EventKind> = {
        let mut map = HashMap::with_capacity(CANONICAL_SIGNATURES.len() + 2);
        for (signature, kind) in CANONICAL_SIGNATURES {
            map.insert(keccak256(signature.as_bytes()), *kind);
        }
        map.insert(WETH_DEPOSIT, EventKind::WethWrap);
        map.insert(WETH_WITHDRAWAL, EventKind::WethUnwrap);
        map
    };

    /// The `Transfer(address,address,uint256)` topic0, shared by ERC-20 and
    /// ERC-721 (spec §4.2's tie-break case).
    pub static ref TRANSFER_TOPIC0: B256 = keccak256("Transfer(address,address,uint256)".as_bytes());

    /// The V3-shaped `Swap` topic0. Reused verbatim by Aerodrome's
    /// concentrated-liquidity pools (spec §4.4).
    pub static ref V3_SWAP_TOPIC0: B256 = keccak256(
        "Swap(address,address,int256,int256,uint160,uint128,int24)".as_bytes(),
    );

    /// The Curve `TokenExchange` topic0, used by the pool resolver's
    /// signature-based fallback (spec §4.4).
    pub static ref CURVE_TOKEN_EXCHANGE_TOPIC0: B256 =
        keccak256("TokenExchange(address,int128,uint256,int128,uint256)".as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_case_insensitive_by_construction() {
        // B256 equality is exact-byte; topic0 values arriving from RPC are
        // normalized to lowercase hex before parsing into B256, so there's
        // no separate case-folding step needed here.
        assert!(TOPIC0_TABLE.contains_key(&TRANSFER_TOPIC0));
    }

    #[test]
    fn weth_hashes_are_distinct_from_gauge_deposit() {
        assert_ne!(WETH_DEPOSIT, keccak256("Deposit(address,uint256,uint256)".as_bytes()));
    }
}
