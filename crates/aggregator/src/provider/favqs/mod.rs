//! favqs.com provider implementation.
//!
//! # API Endpoints
//!
//! - Listing: `GET {base}/quotes?page={page}&per_page={n}&filter=random`
//! - Tag listing: `GET {base}/quotes?page={page}&per_page={n}&filter={tag}&type=tag`
//!
//! Requests authenticate with `Authorization: Token token={api_key}`.
//! The random listing ignores `page`; the tag listing paginates normally.

mod models;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use tracing::debug;

use crate::errors::QuotesError;
use crate::models::Quote;
use crate::provider::{BatchFilter, BatchRequest, QuoteProvider};

use models::{ErrorResponse, QuotesResponse};

pub const DEFAULT_BASE_URL: &str = "https://favqs.com/api";
const PROVIDER_ID: &str = "FAVQS";

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest response-body excerpt carried in an error message.
const MAX_ERROR_BODY: usize = 200;

/// favqs.com quote provider.
///
/// # Example
///
/// ```ignore
/// let provider = FavqsProvider::new(DEFAULT_BASE_URL, "your-api-key");
/// let quotes = provider.fetch_batch(&request).await?;
/// ```
pub struct FavqsProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FavqsProvider {
    /// Create a provider with the default request timeout.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_timeout(base_url, api_key, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a provider with a custom per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/quotes", self.base_url)
    }

    fn auth_header(&self) -> String {
        format!("Token token={}", self.api_key)
    }

    /// Query string for a batch request.
    fn query_params(request: &BatchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", request.page.to_string()),
            ("per_page", request.per_page.to_string()),
        ];

        match &request.filter {
            BatchFilter::Random => params.push(("filter", "random".to_string())),
            BatchFilter::Tag(tag) => {
                params.push(("filter", tag.clone()));
                params.push(("type", "tag".to_string()));
            }
        }

        params
    }

    /// Build the error for a non-2xx response.
    fn status_error(status: StatusCode, body: &str) -> QuotesError {
        let message = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(ErrorResponse {
                message: Some(message),
                error_code,
            }) => match error_code {
                Some(code) => format!("{} (error code {})", message, code),
                None => message,
            },
            _ if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string(),
            _ => body.chars().take(MAX_ERROR_BODY).collect(),
        };

        QuotesError::Upstream {
            provider: PROVIDER_ID.to_string(),
            status: status.as_u16(),
            message,
        }
    }

    fn parse_quotes(body: &str) -> Result<Vec<Quote>, QuotesError> {
        serde_json::from_str::<QuotesResponse>(body)
            .map(|response| response.quotes)
            .map_err(|e| QuotesError::Decode {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse response: {}", e),
            })
    }
}

#[async_trait]
impl QuoteProvider for FavqsProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_batch(&self, request: &BatchRequest) -> Result<Vec<Quote>, QuotesError> {
        debug!(
            page = request.page,
            per_page = request.per_page,
            filter = %request.filter,
            "Requesting quotes from favqs"
        );

        let response = self
            .client
            .get(self.endpoint())
            .header(header::AUTHORIZATION, self.auth_header())
            .query(&Self::query_params(request))
            .send()
            .await
            .map_err(|e| QuotesError::Network {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| QuotesError::Network {
            provider: PROVIDER_ID.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(Self::status_error(status, &body));
        }

        Self::parse_quotes(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random(page: u32, per_page: u32) -> BatchRequest {
        BatchRequest {
            page,
            per_page,
            filter: BatchFilter::Random,
        }
    }

    #[test]
    fn test_provider_id() {
        let provider = FavqsProvider::new(DEFAULT_BASE_URL, "test-key");
        assert_eq!(provider.id(), "FAVQS");
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let provider = FavqsProvider::new("https://favqs.com/api/", "test-key");
        assert_eq!(provider.endpoint(), "https://favqs.com/api/quotes");
    }

    #[test]
    fn test_auth_header_format() {
        let provider = FavqsProvider::new(DEFAULT_BASE_URL, "abc123");
        assert_eq!(provider.auth_header(), "Token token=abc123");
    }

    #[test]
    fn test_random_query_params() {
        let params = FavqsProvider::query_params(&random(1, 25));
        assert_eq!(
            params,
            vec![
                ("page", "1".to_string()),
                ("per_page", "25".to_string()),
                ("filter", "random".to_string()),
            ]
        );
    }

    #[test]
    fn test_tag_query_params() {
        let request = BatchRequest {
            page: 3,
            per_page: 10,
            filter: BatchFilter::Tag("love".to_string()),
        };
        let params = FavqsProvider::query_params(&request);
        assert_eq!(
            params,
            vec![
                ("page", "3".to_string()),
                ("per_page", "10".to_string()),
                ("filter", "love".to_string()),
                ("type", "tag".to_string()),
            ]
        );
    }

    #[test]
    fn test_status_error_uses_json_message() {
        let body = r#"{ "error_code": 20, "message": "User session not found." }"#;
        let error = FavqsProvider::status_error(StatusCode::UNAUTHORIZED, body);
        assert_eq!(
            error,
            QuotesError::Upstream {
                provider: "FAVQS".to_string(),
                status: 401,
                message: "User session not found. (error code 20)".to_string(),
            }
        );
    }

    #[test]
    fn test_status_error_with_empty_body_uses_reason() {
        let error = FavqsProvider::status_error(StatusCode::TOO_MANY_REQUESTS, "");
        assert_eq!(error.upstream_status(), Some(429));
        assert!(error.to_string().ends_with("Too Many Requests"));
    }

    #[test]
    fn test_status_error_truncates_plain_body() {
        let body = "x".repeat(1000);
        let error = FavqsProvider::status_error(StatusCode::BAD_GATEWAY, &body);
        match error {
            QuotesError::Upstream { message, status, .. } => {
                assert_eq!(status, 502);
                assert_eq!(message.len(), MAX_ERROR_BODY);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_quotes_keeps_response_order() {
        let body = r#"{ "quotes": [
            { "id": 3, "body": "c" },
            { "id": 1, "body": "a" },
            { "id": 2, "body": "b" }
        ] }"#;
        let quotes = FavqsProvider::parse_quotes(body).unwrap();
        let ids: Vec<_> = quotes.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_parse_quotes_rejects_malformed_json() {
        let error = FavqsProvider::parse_quotes("<html>oops</html>").unwrap_err();
        assert!(matches!(error, QuotesError::Decode { .. }));
    }
}
