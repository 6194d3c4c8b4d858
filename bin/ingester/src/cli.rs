//! This module contains all CLI-specific code.

use anyhow::{anyhow, Result};
use clap::Parser;
use reqwest::Url;

/// The ingester binary's CLI arguments, one-to-one with spec §6's
/// configuration table. `RPC_URL` has no default and is the only field that
/// can fail to resolve; every other field falls back to its documented
/// default when neither flag nor environment variable is set.
#[derive(Parser, Clone, Debug)]
#[command(name = "ingester", about = "Block-by-block OP Stack chain indexer")]
pub struct Cli {
    /// JSON-RPC endpoint URL (env: RPC_URL).
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Idle/backoff sleep in milliseconds (env: POLL_INTERVAL_MS).
    #[arg(long, env = "POLL_INTERVAL_MS", default_value_t = 2_000)]
    pub poll_interval_ms: u64,

    /// Do not ingest within this many blocks of the head (env:
    /// SAFETY_BUFFER_BLOCKS).
    #[arg(long, env = "SAFETY_BUFFER_BLOCKS", default_value_t = 3)]
    pub safety_buffer_blocks: u64,

    /// Blocks to rewind on a parent-hash mismatch (env:
    /// REORG_REWIND_DEPTH).
    #[arg(long, env = "REORG_REWIND_DEPTH", default_value_t = 10)]
    pub reorg_rewind_depth: u64,

    /// Max concurrent receipt fetches per block (env: CONCURRENCY_LIMIT).
    #[arg(long, env = "CONCURRENCY_LIMIT", default_value_t = 5)]
    pub concurrency_limit: usize,

    /// Store location (env: DB_PATH).
    #[arg(long, env = "DB_PATH", default_value = "./data/base.db")]
    pub db_path: String,

    /// Verbosity level (0-4).
    #[arg(long, short, action = clap::ArgAction::Count)]
    pub v: u8,
}

impl Cli {
    /// Returns the configured RPC URL, or a `FatalConfig` error (spec §7)
    /// if neither the flag nor the environment variable was set.
    pub fn rpc_url(&self) -> Result<Url> {
        let raw = self.rpc_url.clone().ok_or_else(|| anyhow!("RPC_URL is required"))?;
        Url::parse(&raw).map_err(|e| anyhow!(e))
    }
}
