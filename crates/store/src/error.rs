/// Errors from the Store Gateway (spec §7 `StoreFailure`: "Transaction
/// abort on constraint violation or I/O error. Policy: the per-block
/// transaction rolls back; the checkpoint does not advance").
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store path {0:?} could not be created")]
    OpenFailed(std::path::PathBuf),
}
