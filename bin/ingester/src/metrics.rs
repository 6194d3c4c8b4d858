//! Prometheus metrics for the ingester binary, grounded on `trusted-sync`'s
//! lazy-static-gauges-plus-actix-server pattern. Unlike that example's
//! push-as-you-derive counters, these gauges are refreshed from the
//! poller's [`indexer_core::HealthCounters`] snapshot on every `/metrics`
//! scrape, since the poller runs on its own task and the health view is
//! already a pull-style read-only snapshot (spec §4.9).

use std::sync::Arc;

use actix_web::{get, web, App, HttpServer, Responder};
use anyhow::Result;
use indexer_core::HealthCounters;
use lazy_static::lazy_static;
use prometheus::{self, register_gauge, register_int_gauge, Encoder, Gauge, IntGauge, TextEncoder};

lazy_static! {
    pub static ref LAST_PROCESSED_BLOCK: IntGauge =
        register_int_gauge!("ingester_last_processed_block", "Highest block number committed").unwrap();
    pub static ref BLOCKS_PROCESSED: IntGauge =
        register_int_gauge!("ingester_blocks_processed_total", "Blocks processed this session").unwrap();
    pub static ref BLOCKS_BEHIND: IntGauge =
        register_int_gauge!("ingester_blocks_behind", "Blocks behind the safety-buffered head").unwrap();
    pub static ref CATCHING_UP: IntGauge =
        register_int_gauge!("ingester_catching_up", "1 if the poller is in the catch-up pseudostate").unwrap();
    pub static ref ERROR_COUNT: IntGauge =
        register_int_gauge!("ingester_error_count", "Per-block pipeline errors observed this session").unwrap();
    pub static ref BLOCKS_PER_SECOND: Gauge =
        register_gauge!("ingester_blocks_per_second", "Processing rate over the session").unwrap();
}

fn refresh(health: &HealthCounters) {
    let snapshot = health.snapshot();
    LAST_PROCESSED_BLOCK.set(snapshot.last_processed_block as i64);
    BLOCKS_PROCESSED.set(snapshot.blocks_processed as i64);
    BLOCKS_BEHIND.set(snapshot.blocks_behind as i64);
    CATCHING_UP.set(snapshot.catching_up as i64);
    ERROR_COUNT.set(snapshot.error_count as i64);
    BLOCKS_PER_SECOND.set(snapshot.blocks_per_second);
}

/// Starts the metrics server; never returns under normal operation.
pub async fn serve_metrics(bind: &str, health: Arc<HealthCounters>) -> Result<()> {
    HttpServer::new(move || App::new().app_data(web::Data::new(health.clone())).service(index).service(metrics))
        .bind(bind)
        .map_err(|e| anyhow::anyhow!(e))?
        .run()
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

#[get("/")]
async fn index() -> impl Responder {
    "ingester-metrics-server: visit /metrics to view metrics"
}

#[get("/metrics")]
async fn metrics(health: web::Data<Arc<HealthCounters>>) -> impl Responder {
    refresh(&health);
    let encoder = TextEncoder::new();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!("failed to encode prometheus metrics: {:?}", e);
    }
    String::from_utf8(buffer).expect("prometheus output is valid utf8")
}
