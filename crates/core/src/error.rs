use indexer_rpc::FetchError;
use indexer_store::StoreError;

/// Orchestration-layer error (spec §7), composed from the lower layers'
/// errors the way `kona_derive::errors::PipelineErrorKind` composes a
/// per-stage error into `Temporary`/`Critical`. Here the split is by what
/// the poller does about it, not by a shared wrapper type: a fetch failure
/// retries the same block (spec §7 `TransientRpc`), a store failure rolls
/// back and retries (spec §7 `StoreFailure`), and a reorg beyond the
/// configured depth is a continuity violation that halts ingestion.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Spec §9 open question: a reorg deeper than `REORG_REWIND_DEPTH` is
    /// undefined upstream; this surfaces it rather than guessing.
    #[error("chain continuity violation: stored parent hash does not match remote parent hash at block {0} even after a bounded rewind")]
    ChainContinuityViolation(u64),
}

impl CoreError {
    /// Whether the poller's `Error` state should retry the same block
    /// (spec §4.9) rather than treat this as fatal.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_transient(),
            Self::Store(_) => true,
            Self::ChainContinuityViolation(_) => false,
        }
    }
}
