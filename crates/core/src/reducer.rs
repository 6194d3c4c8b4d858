use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{B256, U256};
use indexer_pool::PoolResolver;
use indexer_registry::classify_log;
use indexer_store::BlockSnapshot;
use indexer_types::quantity::{lower_hex_address, u256_to_decimal};
use indexer_types::{
    Block, DexSwap, EventKind, Log, NftStandard, Receipt, Transaction, TxKind,
};
use tracing::debug;

const TOP_CONTRACTS_LIMIT: usize = 10;

/// Divides two `U256`s and renders the quotient as a decimal string,
/// avoiding the precision loss a pre-sum truncation to `u64` would cause
/// (spec §9: "big-integer division" for receipt-derived averages).
fn u256_average(sum: U256, count: u64) -> String {
    if count == 0 {
        return "0".to_string();
    }
    u256_to_decimal(sum / U256::from(count))
}

/// The Block Enricher (spec §4.6): a pure reducer over `(Block, [Tx],
/// [Receipt], [Log])` apart from its one side effect, the DEX resolver's
/// synchronous cache lookup and fire-and-forget probe queue (spec §4.4
/// "hot-path contract").
pub struct BlockEnricher {
    resolver: Arc<PoolResolver>,
}

impl BlockEnricher {
    pub fn new(resolver: Arc<PoolResolver>) -> Self {
        Self { resolver }
    }

    pub fn enrich(
        &self,
        block: Block,
        transactions: Vec<Transaction>,
        receipts: Vec<Receipt>,
        logs: Vec<Log>,
    ) -> BlockSnapshot {
        let number = block.number;
        let mut snapshot = BlockSnapshot::new(block);

        let receipts_by_hash: HashMap<B256, &Receipt> =
            receipts.iter().map(|r| (r.transaction_hash, r)).collect();

        let mut senders = std::collections::HashSet::new();
        let mut recipients = std::collections::HashSet::new();
        let mut total_gas_used: u128 = 0;
        let mut gas_price_sum = U256::ZERO;
        let mut gas_price_count: u64 = 0;
        let mut priority_fee_sum = U256::ZERO;
        let mut priority_fee_count: u64 = 0;

        for tx in &transactions {
            senders.insert(lower_hex_address(tx.from));
            if let Some(to) = tx.to {
                recipients.insert(lower_hex_address(to));
            }
            if let Some(receipt) = receipts_by_hash.get(&tx.hash) {
                total_gas_used += receipt.gas_used as u128;
                gas_price_sum += receipt.effective_gas_price;
                gas_price_count += 1;
            }
            if let Some(priority_fee) = tx.max_priority_fee_per_gas {
                priority_fee_sum += priority_fee;
                priority_fee_count += 1;
            }

            if tx.classify() == TxKind::ContractCreation {
                if let Some(receipt) = receipts_by_hash.get(&tx.hash) {
                    if let Some(contract_address) = receipt.contract_address {
                        snapshot.contract_deployments.push(indexer_types::ContractDeployment {
                            transaction_hash: tx.hash,
                            block_number: number,
                            deployer: tx.from,
                            contract_address,
                        });
                    }
                }
            }
        }

        let mut per_address_log_counts: HashMap<String, u32> = HashMap::new();
        let mut event_counts: HashMap<EventKind, u32> = HashMap::new();

        for log in &logs {
            *per_address_log_counts.entry(lower_hex_address(log.address)).or_insert(0) += 1;

            let kind = classify_log(log.topic0(), log.topic_count());
            *event_counts.entry(kind).or_insert(0) += 1;

            self.decode_and_push(kind, log, &mut snapshot);
        }

        let mut top_contracts: Vec<(String, u32)> = per_address_log_counts.into_iter().collect();
        top_contracts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_contracts.truncate(TOP_CONTRACTS_LIMIT);

        let tx_count = transactions.len() as u32;
        snapshot.metrics = Some(indexer_types::BlockMetrics {
            block_number: number,
            tx_count,
            log_count: logs.len() as u32,
            total_gas_used: total_gas_used as u64,
            avg_gas_per_tx: if tx_count == 0 { 0 } else { (total_gas_used / tx_count as u128) as u64 },
            top_contracts_json: serde_json::to_string(&top_contracts).unwrap_or_else(|_| "[]".to_string()),
            unique_senders: senders.len() as u32,
            unique_recipients: recipients.len() as u32,
            avg_gas_price: u256_average(gas_price_sum, gas_price_count),
            avg_priority_fee: u256_average(priority_fee_sum, priority_fee_count),
        });

        snapshot.event_counts = event_counts.into_iter().collect();
        snapshot.transactions = transactions;
        snapshot.receipts = receipts;
        snapshot.logs = logs;
        snapshot
    }

    fn decode_and_push(&self, kind: EventKind, log: &Log, snapshot: &mut BlockSnapshot) {
        match kind {
            EventKind::Erc20Transfer => match indexer_decode::decode_erc20_transfer(log) {
                Ok(transfer) => snapshot.token_transfers.push(transfer),
                Err(err) => debug!(?err, tx = %log.transaction_hash, "erc20 transfer decode failure"),
            },
            EventKind::Erc721Transfer => match indexer_decode::decode_erc721_transfer(log) {
                Ok(transfer) => snapshot.nft_transfers.push(transfer),
                Err(err) => debug!(?err, tx = %log.transaction_hash, "erc721 transfer decode failure"),
            },
            EventKind::Erc1155Transfer => match indexer_decode::decode_erc1155_transfer_single(log) {
                Ok(mut transfer) => {
                    transfer.standard = NftStandard::Erc1155;
                    snapshot.nft_transfers.push(transfer);
                }
                Err(err) => debug!(?err, tx = %log.transaction_hash, "erc1155 transfer decode failure"),
            },
            EventKind::DexSwapV2 | EventKind::DexSwapAero => self.push_swap(log, indexer_decode::decode_v2_swap(log), snapshot),
            EventKind::DexSwapV3 => self.push_swap(log, indexer_decode::decode_v3_swap(log), snapshot),
            EventKind::DexSwapCurve => self.push_swap(log, indexer_decode::decode_curve_swap(log), snapshot),
            _ => {}
        }
    }

    fn push_swap(
        &self,
        log: &Log,
        decoded: Result<indexer_decode::DecodedSwap, indexer_decode::DecodeError>,
        snapshot: &mut BlockSnapshot,
    ) {
        let swap = match decoded {
            Ok(swap) => swap,
            Err(err) => {
                debug!(?err, tx = %log.transaction_hash, "swap decode failure");
                return;
            }
        };

        // Hot-path contract (spec §4.4): synchronous lookup only, with a
        // signature-based placeholder and an async probe on a miss.
        let topic0 = log.topic0().unwrap_or(B256::ZERO);
        let dex_name = match self.resolver.lookup(swap.pool_address) {
            Some(name) => name,
            None => {
                self.resolver.queue_probe(swap.pool_address, topic0);
                indexer_pool::dex_from_swap_signature(topic0)
            }
        };

        snapshot.dex_swaps.push(DexSwap {
            transaction_hash: log.transaction_hash,
            block_number: log.block_number,
            log_index: log.log_index,
            pool_address: swap.pool_address,
            dex_name,
            sender: swap.sender,
            recipient: swap.recipient,
            amount0_in: swap.amount0_in.to_string(),
            amount1_in: swap.amount1_in.to_string(),
            amount0_out: swap.amount0_out.to_string(),
            amount1_out: swap.amount1_out.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes};
    use indexer_pool::{DurableDexCache, PoolResolver};

    #[derive(Default)]
    struct NoopDurableCache;
    #[async_trait::async_trait]
    impl DurableDexCache for NoopDurableCache {
        async fn get(&self, _pool: Address) -> Option<indexer_types::PoolDexCacheEntry> {
            None
        }
        async fn put(&self, _entry: indexer_types::PoolDexCacheEntry) {}
    }

    struct NeverCalledProbe;
    #[async_trait::async_trait]
    impl indexer_pool::FactoryProbe for NeverCalledProbe {
        async fn factory_of(&self, pool: Address) -> Result<Address, indexer_pool::PoolError> {
            Err(indexer_pool::PoolError::ProbeFailed(pool))
        }
    }

    fn test_resolver() -> Arc<PoolResolver> {
        PoolResolver::new(Arc::new(NoopDurableCache), Arc::new(NeverCalledProbe))
    }

    fn sample_block(number: u64) -> Block {
        Block {
            number,
            hash: B256::repeat_byte(1),
            parent_hash: B256::repeat_byte(0),
            timestamp: 1_700_000_000,
            gas_used: 21_000,
            gas_limit: 30_000_000,
            base_fee_per_gas: None,
            reorged: false,
        }
    }

    #[test]
    fn empty_block_produces_zeroed_metrics() {
        let enricher = BlockEnricher::new(test_resolver());
        let snapshot = enricher.enrich(sample_block(1), vec![], vec![], vec![]);
        let metrics = snapshot.metrics.unwrap();
        assert_eq!(metrics.tx_count, 0);
        assert_eq!(metrics.avg_gas_per_tx, 0);
        assert_eq!(metrics.avg_gas_price, "0");
        assert_eq!(metrics.avg_priority_fee, "0");
    }

    #[test]
    fn huge_priority_fee_is_averaged_without_truncation() {
        let enricher = BlockEnricher::new(test_resolver());
        let huge_fee = U256::MAX - U256::from(1u64);
        let tx = indexer_types::Transaction {
            hash: B256::repeat_byte(3),
            block_number: 1,
            from: Address::repeat_byte(1),
            to: Some(Address::repeat_byte(2)),
            value: U256::ZERO,
            input: Bytes::new(),
            gas_price: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: Some(huge_fee),
            gas: 21_000,
            tx_type: indexer_types::TxTypeTag::Eip1559,
        };
        let receipt = Receipt {
            transaction_hash: tx.hash,
            block_number: 1,
            status: true,
            gas_used: 21_000,
            log_count: 0,
            contract_address: None,
            effective_gas_price: huge_fee,
        };

        let snapshot = enricher.enrich(sample_block(1), vec![tx], vec![receipt], vec![]);
        let metrics = snapshot.metrics.unwrap();
        // a single sample's average is the value itself; no 64-bit saturation.
        assert_eq!(metrics.avg_gas_price, huge_fee.to_string());
        assert_eq!(metrics.avg_priority_fee, huge_fee.to_string());
    }

    #[test]
    fn erc20_transfer_log_produces_token_transfer_and_event_count() {
        let enricher = BlockEnricher::new(test_resolver());
        let from = Address::repeat_byte(1);
        let to = Address::repeat_byte(2);
        let mut data = vec![0u8; 32];
        data[31] = 5;
        let log = Log {
            transaction_hash: B256::repeat_byte(9),
            block_number: 1,
            log_index: 0,
            address: Address::repeat_byte(0xAA),
            topics: [
                Some(*indexer_registry::TRANSFER_TOPIC0),
                Some(B256::left_padding_from(from.as_slice())),
                Some(B256::left_padding_from(to.as_slice())),
                None,
            ],
            data: Bytes::from(data),
        };
        let snapshot = enricher.enrich(sample_block(1), vec![], vec![], vec![log]);
        assert_eq!(snapshot.token_transfers.len(), 1);
        assert_eq!(snapshot.token_transfers[0].amount, "5");
        assert_eq!(
            snapshot.event_counts.iter().find(|(k, _)| *k == EventKind::Erc20Transfer).map(|(_, c)| *c),
            Some(1)
        );
    }
}
