use std::sync::Arc;
use std::time::Duration;

use alloy_provider::ProviderBuilder;
use anyhow::{Context, Result};
use clap::Parser;
use indexer_core::{BlockEnricher, HealthCounters, Poller, PollerConfig};
use indexer_pool::PoolResolver;
use indexer_rpc::AlloyChainFetcher;
use indexer_store::{SqliteDurableDexCache, StoreGateway};
use tokio::sync::watch;
use tracing::{error, info};

mod cli;
mod labels;
mod metrics;
mod telemetry;

const METRICS_SERVER_ADDR: &str = "127.0.0.1:9090";
const LOG_TARGET: &str = "ingester";

#[actix_web::main]
async fn main() -> std::process::ExitCode {
    let cli = cli::Cli::parse();
    if let Err(err) = telemetry::init(cli.v) {
        eprintln!("failed to initialize telemetry: {err}");
        return std::process::ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            error!(target: LOG_TARGET, %err, "fatal error");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run(cli: cli::Cli) -> Result<()> {
    let rpc_url = cli.rpc_url().context("loading RPC_URL")?;
    let provider = ProviderBuilder::new().on_http(rpc_url);

    let fetcher: Arc<dyn indexer_rpc::ChainFetcher> =
        Arc::new(AlloyChainFetcher::new(provider.clone(), cli.concurrency_limit));

    let store = StoreGateway::open(&cli.db_path).with_context(|| format!("opening store at {}", cli.db_path))?;
    store.seed_contract_labels(&labels::seed_labels())?;

    let probe = Arc::new(indexer_pool::AlloyFactoryProbe::new(provider));
    let durable_cache = SqliteDurableDexCache::from_gateway(&store);
    let warm_entries = durable_cache.list_all().context("loading cached pool resolutions")?;
    info!(count = warm_entries.len(), "warming pool resolver from durable cache");
    let resolver = PoolResolver::new(Arc::new(durable_cache), probe);
    resolver.warm_from(warm_entries);

    let enricher = BlockEnricher::new(resolver);
    let health = Arc::new(HealthCounters::default());

    let config = PollerConfig {
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        safety_buffer_blocks: cli.safety_buffer_blocks,
        reorg_rewind_depth: cli.reorg_rewind_depth,
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = Poller::new(fetcher, store, enricher, Arc::clone(&health), config, shutdown_rx);

    let poller_handle = tokio::spawn(poller.run());
    let shutdown_handle = tokio::spawn(wait_for_shutdown_signal(shutdown_tx));

    tokio::select! {
        res = metrics::serve_metrics(METRICS_SERVER_ADDR, health) => {
            error!(target: LOG_TARGET, ?res, "metrics server exited");
            res?;
        }
        res = poller_handle => {
            shutdown_handle.abort();
            return res.context("poller task panicked")?.map_err(|e| anyhow::anyhow!(e));
        }
    }
    Ok(())
}

/// Waits for SIGINT or (on unix) SIGTERM, then flips the shutdown flag the
/// poller checks between blocks (spec §4.9 `Shutdown`).
async fn wait_for_shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    #[cfg(unix)]
    {
        let mut terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!(target: LOG_TARGET, "received SIGINT"),
            _ = terminate.recv() => info!(target: LOG_TARGET, "received SIGTERM"),
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!(target: LOG_TARGET, "received ctrl-c");
    }
    let _ = shutdown_tx.send(true);
}
