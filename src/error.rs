//! Error taxonomy.
//!
//! Per-item pricing failures are deliberately absent: the batch contains
//! them as degraded [`PricedItem`](crate::estimate::PricedItem)s instead of
//! propagating them.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing, malformed, or upstream-rejected API key.
    #[error("credential error: {0}")]
    Credential(String),

    /// Drawing analysis failed (upstream or unparsable reply). Fatal to the
    /// analysis; prior results are left untouched.
    #[error("drawing analysis failed: {0}")]
    Extraction(String),

    /// Failure outside the per-item fault boundary of the pricing batch.
    /// No partial estimate is surfaced.
    #[error("cost estimation failed: {0}")]
    Batch(String),

    /// Non-success HTTP status from the Messages API.
    #[error("API request failed ({status}): {body}")]
    Api { status: StatusCode, body: String },

    /// The model returned no text content.
    #[error("API returned an empty reply")]
    EmptyReply,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
