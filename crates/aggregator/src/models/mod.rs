//! Aggregator models
//!
//! - `quote` - The upstream quote record (Quote)
//! - `request` - A validated `getQuotes` request (QuoteRequest) and its bounds
//! - `pagination` - The response envelope (PaginationEnvelope, PaginationInfo)

mod pagination;
mod quote;
mod request;

pub use pagination::{PaginationEnvelope, PaginationInfo};
pub use quote::Quote;
pub use request::{QuoteRequest, DEFAULT_PAGE_SIZE, MAX_COUNT, MAX_PAGE_SIZE};
