use std::time::Duration;

use thiserror::Error;

/// Failure while driving the browser for a single company page
///
/// The `Display` text is what lands in a record stub's `error` field.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not discover browser endpoint at {endpoint}: {reason}")]
    Discovery { endpoint: String, reason: String },

    #[error("browser session error: {0}")]
    Browser(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {}ms", .timeout.as_millis())]
    Timeout { url: String, timeout: Duration },

    #[error("could not read rendered page: {0}")]
    Snapshot(String),

    #[error("extraction failed: {0}")]
    Extraction(String),
}
