use thiserror::Error;

/// The unified error type for the serving path.
///
/// Validation errors surface immediately and are never retried; `NotFound`
/// is per-symbol, and whether it fails the whole request or filters the
/// symbol out is the caller's policy. Fast-store trouble never appears here
/// at all — the cache-aside layer degrades to slow-store reads instead.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The requested horizon is not one of the supported set.
    #[error("invalid horizon {got:?}, must be one of: {allowed}")]
    InvalidHorizon {
        /// The offending input.
        got: String,
        /// The allowed codes, comma-separated.
        allowed: String,
    },

    /// The symbol list was empty after parsing.
    #[error("at least one symbol must be provided")]
    NoSymbols,

    /// A requested symbol has no rows for the horizon.
    #[error("no data found for symbol {0}")]
    NotFound(String),

    /// A stored rebased value was not valid decimal text.
    #[error("malformed stored series for {0}")]
    Integrity(String),

    /// The slow store failed; retryable.
    #[error("series store unavailable: {0}")]
    Upstream(String),

    /// The slow store exceeded its deadline; retryable.
    #[error("series store timed out")]
    Timeout,
}
