//! The orchestration layer (spec §4.6, §4.8, §4.9): the block enricher's
//! pure reduction, the reorg controller's state machine, and the poller's
//! outer loop, wired to the fetcher, resolver, and store crates.

pub mod error;
pub use error::CoreError;

pub mod reducer;
pub use reducer::BlockEnricher;

pub mod reorg;
pub use reorg::{resolve as resolve_reorg, ReorgOutcome, DEFAULT_REWIND_DEPTH};

pub mod health;
pub use health::{HealthCounters, HealthSnapshot};

pub mod poller;
pub use poller::{Poller, PollerConfig};
