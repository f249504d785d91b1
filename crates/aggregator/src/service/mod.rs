//! Quote aggregation service.
//!
//! - `aggregator` - fan-out, dedupe and caching ([`QuoteAggregator`])
//! - `paginator` - slicing an aggregate into pages ([`paginate`])

mod aggregator;
mod paginator;


pub use aggregator::{
    batches_needed, dedupe_batches, AggregatorConfig, QuoteAggregator, DEFAULT_AGGREGATE_TTL,
    DEFAULT_BATCH_TTL, DEFAULT_STAGGER,
};
pub use paginator::paginate;
