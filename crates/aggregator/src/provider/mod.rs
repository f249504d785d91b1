//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteProvider` trait: one upstream attempt per call
//! - `BatchRequest` / `BatchFilter`: the shape of a single upstream call
//! - The favqs.com implementation

mod traits;

pub mod favqs;

pub use traits::{BatchFilter, BatchRequest, QuoteProvider};
