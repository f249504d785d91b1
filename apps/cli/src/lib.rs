pub mod config;
pub mod main_lib;

pub use main_lib::{build_aggregator, init_tracing};
