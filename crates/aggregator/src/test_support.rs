//! Shared fixtures for unit tests.

use std::ops::RangeInclusive;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::time::Instant;

use crate::errors::QuotesError;
use crate::models::Quote;
use crate::provider::{BatchRequest, QuoteProvider};

type Handler = Box<dyn Fn(&BatchRequest, usize) -> Result<Vec<Quote>, QuotesError> + Send + Sync>;

/// Provider driven by a closure of `(request, call_number)`.
pub(crate) struct MockProvider {
    handler: Handler,
    latency: Duration,
    calls: Mutex<Vec<(Instant, BatchRequest)>>,
}

impl MockProvider {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&BatchRequest, usize) -> Result<Vec<Quote>, QuotesError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replays `responses` in call order, then returns empty batches.
    pub fn scripted(responses: Vec<Result<Vec<Quote>, QuotesError>>) -> Self {
        let queue = Mutex::new(VecDeque::from(responses));
        Self::new(move |_, _| {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        })
    }

    /// Simulate time spent on the wire for every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn calls(&self) -> MutexGuard<'_, Vec<(Instant, BatchRequest)>> {
        self.calls.lock().unwrap()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls().iter().map(|(at, _)| *at).collect()
    }

    pub fn requests(&self) -> Vec<BatchRequest> {
        self.calls().iter().map(|(_, request)| request.clone()).collect()
    }
}

#[async_trait]
impl QuoteProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn fetch_batch(&self, request: &BatchRequest) -> Result<Vec<Quote>, QuotesError> {
        let call_number = {
            let mut calls = self.calls();
            calls.push((Instant::now(), request.clone()));
            calls.len() - 1
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        (self.handler)(request, call_number)
    }
}

/// Quotes with the given ids, in order.
pub(crate) fn quotes(ids: &[&str]) -> Vec<Quote> {
    ids.iter()
        .map(|id| Quote::new(*id, "Author", format!("Quote {id}")))
        .collect()
}

/// Quotes with ids drawn from `range`, in order.
pub(crate) fn numbered(range: RangeInclusive<u32>) -> Vec<Quote> {
    range
        .map(|id| Quote::new(id.to_string(), "Author", format!("Quote {id}")))
        .collect()
}

pub(crate) fn status_error(status: u16) -> QuotesError {
    QuotesError::Upstream {
        provider: "MOCK".to_string(),
        status,
        message: "scripted".to_string(),
    }
}

pub(crate) fn ids(quotes: &[Quote]) -> Vec<&str> {
    quotes.iter().map(|q| q.id.as_str()).collect()
}
