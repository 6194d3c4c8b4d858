use thiserror::Error;

/// A decode failure (spec §7: `DecodeFailure`). Never propagated as a panic;
/// callers drop the enriched row and keep the raw log and its event count.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// `data` was shorter than the decoder needed.
    #[error("short log data: needed at least {needed} bytes, got {got}")]
    ShortData { needed: usize, got: usize },
    /// A required indexed topic was missing (null).
    #[error("missing topic at index {0}")]
    MissingTopic(usize),
    /// A signed value's magnitude exceeded the representable range at its
    /// declared width (spec §8: "absolute values beyond 2^255 are rejected
    /// as decode failure").
    #[error("signed value out of range for the declared width")]
    SignedOverflow,
}
