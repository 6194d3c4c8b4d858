/// Errors from the RPC fetcher (spec §7). Split the way
/// `kona_derive::errors::PipelineErrorKind` splits `Temporary`/`Critical`:
/// the fetcher only ever produces the transient half of that taxonomy, plus
/// the one-shot method-unsupported signal spec §4.5/§7 call out by name.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network/5xx/timeout/rate-limit (spec §7 `TransientRpc`). The poller
    /// retries the same block after a delay once the fetcher's own retries
    /// are exhausted.
    #[error("transient RPC failure: {0}")]
    Transient(String),
    /// The node does not implement `eth_getBlockReceipts` (spec §7
    /// `RpcMethodUnsupported`). Distinguished from [`Self::Transient`] so the
    /// caller can latch to per-hash fan-out instead of retrying the batch
    /// call forever.
    #[error("method not supported by this node: {0}")]
    MethodUnsupported(String),
}

impl FetchError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
