use std::path::Path;
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, B256};
use indexer_types::quantity::{lower_hex_address, u256_to_decimal};
use indexer_types::{Block, ContractLabel};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::schema;
use crate::snapshot::BlockSnapshot;

fn hex256(hash: B256) -> String {
    format!("{hash:#x}")
}

/// The Store Gateway (spec §4.7): schema, prepared statements, and the one
/// public write operation `commit_block`. Holds its connection behind a
/// `Mutex` rather than requiring `&mut self` everywhere, since the resolver's
/// [`crate::dex_cache::SqliteDurableDexCache`] shares the same handle from a
/// detached probe task (spec §5: "the local store is a single writer").
#[derive(Clone)]
pub struct StoreGateway {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for StoreGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreGateway").finish_non_exhaustive()
    }
}

impl StoreGateway {
    /// Opens (creating if absent) the store at `path` and applies the
    /// schema (spec §6: `DB_PATH`, default `./data/base.db`).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|_| StoreError::OpenFailed(parent.to_path_buf()))?;
            }
        }
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        info!(path = %path.display(), "store opened");
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// An in-memory store, used by tests and by nothing else.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// Writes an entire block's enriched state under one local transaction
    /// (spec §4.7). Insert-or-replace on primary-keyed tables gives
    /// idempotent replay for `blocks`/`transactions`/`receipts`/
    /// `block_metrics`; the append-only tables (`logs` and the enriched
    /// rows) are cleared for this block number first, so re-processing
    /// never duplicates them.
    pub fn commit_block(&self, snapshot: &BlockSnapshot) -> Result<(), StoreError> {
        let number = snapshot.block_number();
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        if let Some(block) = &snapshot.block {
            tx.execute(
                "INSERT INTO blocks (number, hash, parent_hash, timestamp, gas_used, gas_limit, base_fee_per_gas, reorged)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0)
                 ON CONFLICT(number) DO UPDATE SET
                    hash=excluded.hash, parent_hash=excluded.parent_hash, timestamp=excluded.timestamp,
                    gas_used=excluded.gas_used, gas_limit=excluded.gas_limit,
                    base_fee_per_gas=excluded.base_fee_per_gas, reorged=0",
                params![
                    block.number,
                    hex256(block.hash),
                    hex256(block.parent_hash),
                    block.timestamp,
                    block.gas_used,
                    block.gas_limit,
                    block.base_fee_per_gas.map(u256_to_decimal),
                ],
            )?;
        }

        for t in &snapshot.transactions {
            tx.execute(
                "INSERT INTO transactions (hash, block_number, from_address, to_address, value, input, gas_price,
                    max_fee_per_gas, max_priority_fee_per_gas, gas, tx_type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT(hash) DO UPDATE SET
                    block_number=excluded.block_number, from_address=excluded.from_address,
                    to_address=excluded.to_address, value=excluded.value, input=excluded.input,
                    gas_price=excluded.gas_price, max_fee_per_gas=excluded.max_fee_per_gas,
                    max_priority_fee_per_gas=excluded.max_priority_fee_per_gas, gas=excluded.gas,
                    tx_type=excluded.tx_type",
                params![
                    hex256(t.hash),
                    number,
                    lower_hex_address(t.from),
                    t.to.map(lower_hex_address),
                    u256_to_decimal(t.value),
                    t.input.as_ref(),
                    t.gas_price.map(u256_to_decimal),
                    t.max_fee_per_gas.map(u256_to_decimal),
                    t.max_priority_fee_per_gas.map(u256_to_decimal),
                    t.gas,
                    t.tx_type.as_str(),
                ],
            )?;
        }

        for r in &snapshot.receipts {
            tx.execute(
                "INSERT INTO receipts (transaction_hash, block_number, status, gas_used, log_count,
                    contract_address, effective_gas_price)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(transaction_hash) DO UPDATE SET
                    block_number=excluded.block_number, status=excluded.status, gas_used=excluded.gas_used,
                    log_count=excluded.log_count, contract_address=excluded.contract_address,
                    effective_gas_price=excluded.effective_gas_price",
                params![
                    hex256(r.transaction_hash),
                    number,
                    r.status as i64,
                    r.gas_used,
                    r.log_count,
                    r.contract_address.map(lower_hex_address),
                    u256_to_decimal(r.effective_gas_price),
                ],
            )?;
        }

        // Append-only tables: clear this block number's rows before
        // re-inserting so a replay never duplicates them (spec §8
        // "idempotent replay", §9 "log surrogate IDs... may differ").
        tx.execute("DELETE FROM logs WHERE block_number = ?1", params![number])?;
        for log in &snapshot.logs {
            tx.execute(
                "INSERT INTO logs (transaction_hash, block_number, log_index, address, topic0, topic1, topic2, topic3, data)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    hex256(log.transaction_hash),
                    log.block_number,
                    log.log_index,
                    lower_hex_address(log.address),
                    log.topics[0].map(hex256),
                    log.topics[1].map(hex256),
                    log.topics[2].map(hex256),
                    log.topics[3].map(hex256),
                    log.data.as_ref(),
                ],
            )?;
        }

        if let Some(metrics) = &snapshot.metrics {
            tx.execute(
                "INSERT INTO block_metrics (block_number, tx_count, log_count, total_gas_used, avg_gas_per_tx,
                    top_contracts_json, unique_senders, unique_recipients, avg_gas_price, avg_priority_fee)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(block_number) DO UPDATE SET
                    tx_count=excluded.tx_count, log_count=excluded.log_count,
                    total_gas_used=excluded.total_gas_used, avg_gas_per_tx=excluded.avg_gas_per_tx,
                    top_contracts_json=excluded.top_contracts_json, unique_senders=excluded.unique_senders,
                    unique_recipients=excluded.unique_recipients, avg_gas_price=excluded.avg_gas_price,
                    avg_priority_fee=excluded.avg_priority_fee",
                params![
                    number,
                    metrics.tx_count,
                    metrics.log_count,
                    metrics.total_gas_used,
                    metrics.avg_gas_per_tx,
                    metrics.top_contracts_json,
                    metrics.unique_senders,
                    metrics.unique_recipients,
                    metrics.avg_gas_price,
                    metrics.avg_priority_fee,
                ],
            )?;
        }

        tx.execute("DELETE FROM event_counts WHERE block_number = ?1", params![number])?;
        for (kind, count) in &snapshot.event_counts {
            tx.execute(
                "INSERT INTO event_counts (block_number, event_kind, count) VALUES (?1, ?2, ?3)",
                params![number, kind.as_str(), count],
            )?;
        }

        tx.execute("DELETE FROM token_transfers WHERE block_number = ?1", params![number])?;
        for row in &snapshot.token_transfers {
            tx.execute(
                "INSERT INTO token_transfers (transaction_hash, block_number, log_index, token_address,
                    from_address, to_address, amount) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    hex256(row.transaction_hash),
                    row.block_number,
                    row.log_index,
                    lower_hex_address(row.token_address),
                    lower_hex_address(row.from),
                    lower_hex_address(row.to),
                    row.amount,
                ],
            )?;
        }

        tx.execute("DELETE FROM nft_transfers WHERE block_number = ?1", params![number])?;
        for row in &snapshot.nft_transfers {
            tx.execute(
                "INSERT INTO nft_transfers (transaction_hash, block_number, log_index, token_address,
                    from_address, to_address, token_id, amount, standard) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    hex256(row.transaction_hash),
                    row.block_number,
                    row.log_index,
                    lower_hex_address(row.token_address),
                    lower_hex_address(row.from),
                    lower_hex_address(row.to),
                    row.token_id,
                    row.amount,
                    row.standard.as_str(),
                ],
            )?;
        }

        tx.execute("DELETE FROM dex_swaps WHERE block_number = ?1", params![number])?;
        for row in &snapshot.dex_swaps {
            tx.execute(
                "INSERT INTO dex_swaps (transaction_hash, block_number, log_index, pool_address, dex_name,
                    sender, recipient, amount0_in, amount1_in, amount0_out, amount1_out)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    hex256(row.transaction_hash),
                    row.block_number,
                    row.log_index,
                    lower_hex_address(row.pool_address),
                    row.dex_name,
                    lower_hex_address(row.sender),
                    lower_hex_address(row.recipient),
                    row.amount0_in,
                    row.amount1_in,
                    row.amount0_out,
                    row.amount1_out,
                ],
            )?;
        }

        tx.execute("DELETE FROM contract_deployments WHERE block_number = ?1", params![number])?;
        for row in &snapshot.contract_deployments {
            tx.execute(
                "INSERT INTO contract_deployments (transaction_hash, block_number, deployer, contract_address)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    hex256(row.transaction_hash),
                    row.block_number,
                    lower_hex_address(row.deployer),
                    lower_hex_address(row.contract_address),
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// The highest committed block number (spec §4.7 `checkpoint()`).
    pub fn checkpoint(&self) -> Result<Option<u64>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let value: Option<i64> = conn
            .query_row("SELECT block_number FROM checkpoint WHERE id = 0", [], |row| row.get(0))
            .optional()?;
        Ok(value.map(|v| v as u64))
    }

    /// `setCheckpoint(n)` (spec §4.7).
    pub fn set_checkpoint(&self, n: u64) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO checkpoint (id, block_number) VALUES (0, ?1)
             ON CONFLICT(id) DO UPDATE SET block_number = excluded.block_number",
            params![n],
        )?;
        Ok(())
    }

    /// `blockByNumber(n)` (spec §4.7); used by the Reorg Controller's
    /// `Check`/`Probe` states.
    pub fn block_by_number(&self, n: u64) -> Result<Option<Block>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT number, hash, parent_hash, timestamp, gas_used, gas_limit, base_fee_per_gas, reorged
                 FROM blocks WHERE number = ?1",
                params![n],
                |row| {
                    let hash: String = row.get(1)?;
                    let parent_hash: String = row.get(2)?;
                    let base_fee: Option<String> = row.get(6)?;
                    let reorged: i64 = row.get(7)?;
                    Ok(Block {
                        number: row.get::<_, i64>(0)? as u64,
                        hash: hash.parse().expect("stored hash is valid hex"),
                        parent_hash: parent_hash.parse().expect("stored parent_hash is valid hex"),
                        timestamp: row.get::<_, i64>(3)? as u64,
                        gas_used: row.get::<_, i64>(4)? as u64,
                        gas_limit: row.get::<_, i64>(5)? as u64,
                        base_fee_per_gas: base_fee.map(|s| s.parse().expect("stored base fee is valid decimal")),
                        reorged: reorged != 0,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Returns only blocks that have not been flagged reorged (spec §4.8
    /// `Check`: "Fetch stored block at `next-1` (non-reorged)").
    pub fn non_reorged_block_by_number(&self, n: u64) -> Result<Option<Block>, StoreError> {
        Ok(self.block_by_number(n)?.filter(|b| !b.reorged))
    }

    /// `markReorged(from)` (spec §4.7): flags, never deletes, affected blocks.
    pub fn mark_reorged(&self, from: u64) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("UPDATE blocks SET reorged = 1 WHERE number >= ?1", params![from])?;
        warn!(from, blocks_flagged = changed, "marked blocks reorged");
        Ok(())
    }

    /// `rewind(from)` (spec §4.7): deletes all rows with `blockNumber >=
    /// from` from every downstream table within a single transaction.
    /// Blocks themselves are never deleted here, only flagged via
    /// [`Self::mark_reorged`].
    pub fn rewind(&self, from: u64) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        for table in [
            "logs",
            "receipts",
            "transactions",
            "block_metrics",
            "event_counts",
            "token_transfers",
            "nft_transfers",
            "dex_swaps",
            "contract_deployments",
        ] {
            tx.execute(&format!("DELETE FROM {table} WHERE block_number >= ?1"), params![from])?;
        }
        tx.commit()?;
        info!(from, "rewound store");
        Ok(())
    }

    /// Seeds the static, read-only `contract_labels` table at startup (spec
    /// §3: "seeded at startup").
    pub fn seed_contract_labels(&self, labels: &[ContractLabel]) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        for label in labels {
            conn.execute(
                "INSERT INTO contract_labels (address, name, category, protocol) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(address) DO UPDATE SET name=excluded.name, category=excluded.category, protocol=excluded.protocol",
                params![lower_hex_address(label.address), label.name, label.category, label.protocol],
            )?;
        }
        Ok(())
    }

    pub(crate) fn shared_connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use indexer_types::Transaction;

    fn sample_block(number: u64, hash: B256, parent_hash: B256) -> Block {
        Block { number, hash, parent_hash, timestamp: 1_700_000_000, gas_used: 21_000, gas_limit: 30_000_000, base_fee_per_gas: Some(U256::from(1_000_000_000u64)), reorged: false }
    }

    #[test]
    fn commit_and_read_back_block() {
        let store = StoreGateway::open_in_memory().unwrap();
        let block = sample_block(100, B256::repeat_byte(1), B256::repeat_byte(0));
        let snapshot = BlockSnapshot::new(block.clone());
        store.commit_block(&snapshot).unwrap();

        let fetched = store.block_by_number(100).unwrap().unwrap();
        assert_eq!(fetched.hash, block.hash);
        assert!(!fetched.reorged);
    }

    #[test]
    fn checkpoint_round_trips() {
        let store = StoreGateway::open_in_memory().unwrap();
        assert_eq!(store.checkpoint().unwrap(), None);
        store.set_checkpoint(97).unwrap();
        assert_eq!(store.checkpoint().unwrap(), Some(97));
        store.set_checkpoint(98).unwrap();
        assert_eq!(store.checkpoint().unwrap(), Some(98));
    }

    #[test]
    fn replaying_a_block_does_not_duplicate_append_only_rows() {
        let store = StoreGateway::open_in_memory().unwrap();
        let block = sample_block(5, B256::repeat_byte(2), B256::repeat_byte(1));
        let mut snapshot = BlockSnapshot::new(block.clone());
        let log = indexer_types::Log {
            transaction_hash: B256::repeat_byte(9),
            block_number: 5,
            log_index: 0,
            address: Address::repeat_byte(0xAB),
            topics: [Some(B256::ZERO), None, None, None],
            data: alloy_primitives::Bytes::new(),
        };
        snapshot.logs.push(log);
        store.commit_block(&snapshot).unwrap();
        store.commit_block(&snapshot).unwrap(); // replay

        let conn = store.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM logs WHERE block_number = 5", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn rewind_clears_downstream_tables_and_flags_blocks() {
        let store = StoreGateway::open_in_memory().unwrap();
        for n in 90..=100 {
            let block = sample_block(n, B256::repeat_byte(n as u8), B256::repeat_byte((n - 1) as u8));
            let mut snapshot = BlockSnapshot::new(block);
            snapshot.transactions.push(Transaction {
                hash: B256::repeat_byte(n as u8),
                block_number: n,
                from: Address::ZERO,
                to: Some(Address::ZERO),
                value: U256::ZERO,
                input: alloy_primitives::Bytes::new(),
                gas_price: None,
                max_fee_per_gas: None,
                max_priority_fee_per_gas: None,
                gas: 21_000,
                tx_type: indexer_types::TxTypeTag::Eip1559,
            });
            store.commit_block(&snapshot).unwrap();
        }
        store.set_checkpoint(100).unwrap();

        store.mark_reorged(91).unwrap();
        store.rewind(91).unwrap();
        store.set_checkpoint(90).unwrap();

        assert_eq!(store.checkpoint().unwrap(), Some(90));
        assert!(!store.block_by_number(90).unwrap().unwrap().reorged);
        assert!(store.block_by_number(91).unwrap().unwrap().reorged);

        let conn = store.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions WHERE block_number >= 91", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 0);
    }
}
