//! A small seed list of well-known Base mainnet contract addresses (spec
//! §3: `contract_labels` is "seeded at startup"). Not exhaustive; callers
//! needing full coverage should extend this table or load one externally.

use alloy_primitives::address;
use indexer_types::ContractLabel;

pub fn seed_labels() -> Vec<ContractLabel> {
    vec![
        ContractLabel {
            address: address!("4200000000000000000000000000000000000006"),
            name: "WETH".to_string(),
            category: "token".to_string(),
            protocol: "base".to_string(),
        },
        ContractLabel {
            address: address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
            name: "USDC".to_string(),
            category: "token".to_string(),
            protocol: "circle".to_string(),
        },
        ContractLabel {
            address: address!("33128a8fC17869897dcE68Ed026d694621f6FDfD"),
            name: "UniswapV3Factory".to_string(),
            category: "factory".to_string(),
            protocol: "uniswap_v3".to_string(),
        },
        ContractLabel {
            address: address!("8909Dc15e40173Ff4699343b6eB8132c65e18eC6"),
            name: "AerodromeV2Factory".to_string(),
            category: "factory".to_string(),
            protocol: "aerodrome".to_string(),
        },
    ]
}
