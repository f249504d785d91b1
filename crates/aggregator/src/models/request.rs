use crate::errors::{QuotesError, Result};

/// Page size used when the caller does not pass one.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Upper bound on page size; keeps a single request from fanning out into
/// an unbounded number of upstream calls.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Upper bound on `count`. At page size 1 this is still a fan-out of
/// 1001 upstream batches.
pub const MAX_COUNT: u32 = 1000;

/// One `getQuotes` call: how many unique quotes to aggregate, and which
/// page of that aggregate to return.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteRequest {
    /// Total number of unique quotes wanted (the aggregate cap).
    pub count: u32,
    /// 1-based page within the aggregate.
    pub page: u32,
    /// Items per page, also the upstream batch size.
    pub page_size: u32,
    /// Optional tag filter; `None` means random quotes.
    pub tag: Option<String>,
}

impl QuoteRequest {
    /// Request the first page of `count` random quotes with the default page size.
    pub fn new(count: u32) -> Self {
        Self {
            count,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            tag: None,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Check the request constraints and normalise the tag.
    ///
    /// Surrounding whitespace is trimmed from the tag; a tag that is empty
    /// after trimming is rejected rather than silently treated as "random".
    pub fn validate(mut self) -> Result<Self> {
        if self.count < 1 {
            return Err(QuotesError::InvalidRequest(
                "count must be at least 1".to_string(),
            ));
        }
        if self.count > MAX_COUNT {
            return Err(QuotesError::InvalidRequest(format!(
                "count cannot exceed {}",
                MAX_COUNT
            )));
        }
        if self.page < 1 {
            return Err(QuotesError::InvalidRequest(
                "page must be at least 1".to_string(),
            ));
        }
        if self.page_size < 1 {
            return Err(QuotesError::InvalidRequest(
                "pageSize must be at least 1".to_string(),
            ));
        }
        if self.page_size > MAX_PAGE_SIZE {
            return Err(QuotesError::InvalidRequest(format!(
                "pageSize cannot exceed {}",
                MAX_PAGE_SIZE
            )));
        }

        if let Some(tag) = self.tag.take() {
            let trimmed = tag.trim();
            if trimmed.is_empty() {
                return Err(QuotesError::InvalidRequest(
                    "tag must not be blank".to_string(),
                ));
            }
            self.tag = Some(trimmed.to_string());
        }

        Ok(self)
    }
}
