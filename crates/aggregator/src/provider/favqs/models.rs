use serde::Deserialize;

use crate::models::Quote;

/// Response from the `/quotes` listing endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct QuotesResponse {
    /// The page of quotes, in listing order
    #[serde(default)]
    pub quotes: Vec<Quote>,
    // Note: page and last_page exist but are not used; exhaustion is
    // detected by a short or empty batch instead.
}

/// Error body returned alongside some non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}
