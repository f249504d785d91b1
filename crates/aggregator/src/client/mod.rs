//! Upstream access with retry.
//!
//! [`UpstreamClient`] wraps a single-attempt [`QuoteProvider`](crate::provider::QuoteProvider)
//! and applies a [`RetryPolicy`] to rate-limited (429) and unavailable (503)
//! responses. Every other failure propagates on the first attempt.

mod upstream;

pub use upstream::{RetryPolicy, UpstreamClient};
