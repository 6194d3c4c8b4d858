use serde::{Deserialize, Serialize};

/// The fixed, enumerated log-kind set the classifier maps `(topic0,
/// topic_count)` onto (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Erc20Transfer,
    Erc721Transfer,
    Erc1155Transfer,
    DexSwapV2,
    DexSwapV3,
    DexSwapAero,
    DexSwapCurve,
    LiquidityAdd,
    LiquidityRemove,
    LiquidityCollect,
    PoolSync,
    PoolCreated,
    Approval,
    WethWrap,
    WethUnwrap,
    UserOperation,
    FlashLoan,
    RewardClaim,
    GaugeDeposit,
    GaugeWithdraw,
    Vote,
    OwnershipChange,
    ContractUpgrade,
    BridgeSend,
    BridgeReceive,
    LendingSupply,
    LendingWithdraw,
    LendingBorrow,
    LendingRepay,
    LendingLiquidation,
    OracleUpdate,
    MultisigExec,
    ProtocolFees,
    Governance,
    Staking,
    NftPositionMint,
    NftPositionBurn,
    Other,
}

impl EventKind {
    /// The identifier persisted in `event_counts.event_kind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Erc20Transfer => "erc20_transfer",
            Self::Erc721Transfer => "erc721_transfer",
            Self::Erc1155Transfer => "erc1155_transfer",
            Self::DexSwapV2 => "dex_swap_v2",
            Self::DexSwapV3 => "dex_swap_v3",
            Self::DexSwapAero => "dex_swap_aero",
            Self::DexSwapCurve => "dex_swap_curve",
            Self::LiquidityAdd => "liquidity_add",
            Self::LiquidityRemove => "liquidity_remove",
            Self::LiquidityCollect => "liquidity_collect",
            Self::PoolSync => "pool_sync",
            Self::PoolCreated => "pool_created",
            Self::Approval => "approval",
            Self::WethWrap => "weth_wrap",
            Self::WethUnwrap => "weth_unwrap",
            Self::UserOperation => "user_operation",
            Self::FlashLoan => "flash_loan",
            Self::RewardClaim => "reward_claim",
            Self::GaugeDeposit => "gauge_deposit",
            Self::GaugeWithdraw => "gauge_withdraw",
            Self::Vote => "vote",
            Self::OwnershipChange => "ownership_change",
            Self::ContractUpgrade => "contract_upgrade",
            Self::BridgeSend => "bridge_send",
            Self::BridgeReceive => "bridge_receive",
            Self::LendingSupply => "lending_supply",
            Self::LendingWithdraw => "lending_withdraw",
            Self::LendingBorrow => "lending_borrow",
            Self::LendingRepay => "lending_repay",
            Self::LendingLiquidation => "lending_liquidation",
            Self::OracleUpdate => "oracle_update",
            Self::MultisigExec => "multisig_exec",
            Self::ProtocolFees => "protocol_fees",
            Self::Governance => "governance",
            Self::Staking => "staking",
            Self::NftPositionMint => "nft_position_mint",
            Self::NftPositionBurn => "nft_position_burn",
            Self::Other => "other",
        }
    }

    /// All variants, for seeding `event_counts` templates or iterating in
    /// tests.
    pub const ALL: &'static [EventKind] = &[
        Self::Erc20Transfer,
        Self::Erc721Transfer,
        Self::Erc1155Transfer,
        Self::DexSwapV2,
        Self::DexSwapV3,
        Self::DexSwapAero,
        Self::DexSwapCurve,
        Self::LiquidityAdd,
        Self::LiquidityRemove,
        Self::LiquidityCollect,
        Self::PoolSync,
        Self::PoolCreated,
        Self::Approval,
        Self::WethWrap,
        Self::WethUnwrap,
        Self::UserOperation,
        Self::FlashLoan,
        Self::RewardClaim,
        Self::GaugeDeposit,
        Self::GaugeWithdraw,
        Self::Vote,
        Self::OwnershipChange,
        Self::ContractUpgrade,
        Self::BridgeSend,
        Self::BridgeReceive,
        Self::LendingSupply,
        Self::LendingWithdraw,
        Self::LendingBorrow,
        Self::LendingRepay,
        Self::LendingLiquidation,
        Self::OracleUpdate,
        Self::MultisigExec,
        Self::ProtocolFees,
        Self::Governance,
        Self::Staking,
        Self::NftPositionMint,
        Self::NftPositionBurn,
        Self::Other,
    ];
}
