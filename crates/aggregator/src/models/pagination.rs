use serde::{Deserialize, Serialize};

/// Paging metadata returned alongside each page of items.
///
/// Field names are part of the wire contract with existing clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u32,
    pub page_size: u32,
    /// The `count` the caller asked for, even if fewer quotes exist.
    pub total_requested: u32,
    pub has_more: bool,
}

/// `{ items, pagination }` response envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationEnvelope<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

impl<T> PaginationEnvelope<T> {
    /// An envelope with no items and `has_more = false`.
    pub fn empty(page: u32, page_size: u32, total_requested: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: PaginationInfo {
                page,
                page_size,
                total_requested,
                has_more: false,
            },
        }
    }
}
