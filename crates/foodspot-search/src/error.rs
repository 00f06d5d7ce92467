use foodspot_core::CoreError;
use thiserror::Error;

/// Failures a search surfaces to its caller.
///
/// Upstream search, geocode and routing failures never appear here; they are
/// absorbed where they happen (dropped results, coordinate fallback, estimated
/// routes).
#[derive(Debug, Error)]
pub enum SearchError {
    /// Malformed or out-of-range input coordinate.
    #[error(transparent)]
    InvalidCoordinates(#[from] CoreError),

    /// A required upstream credential is not configured.
    #[error("service configuration error: {0}")]
    Configuration(String),

    /// Anything unexpected outside the tolerated upstream failure paths.
    #[error("internal error: {0}")]
    Internal(String),
}
