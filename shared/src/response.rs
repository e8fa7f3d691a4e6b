//! API Response types
//!
//! Standardized response envelope returned by every catalog backend call

use serde::{Deserialize, Serialize};

/// Unified API response structure
///
/// All backend responses follow this format:
/// ```json
/// {
///     "success": true,
///     "status": 200,
///     "message": "Products retrieved",
///     "meta": { "page": 1, "limit": 10, "total": 42 },
///     "data": [ ... ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Application-level outcome
    #[serde(default)]
    pub success: bool,
    /// HTTP-like status code reported by the backend (0 when absent)
    #[serde(default)]
    pub status: u16,
    /// Human-readable message, shown verbatim to the user on failure
    #[serde(default)]
    pub message: String,
    /// Response data (absent on most failures)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Pagination metadata (list endpoints only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> Envelope<T> {
    /// Create a successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            status: 200,
            message: "Success".to_string(),
            data: Some(data),
            meta: None,
        }
    }

    /// Create a successful envelope with custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::ok(data)
        }
    }

    /// Create a failed envelope
    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            message: message.into(),
            data: None,
            meta: None,
        }
    }

    /// Attach pagination metadata
    pub fn with_meta(mut self, meta: PageMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Consume the envelope, returning data only when the call succeeded
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }

    /// Message to show the user, or `fallback` when the backend sent none
    pub fn message_or(&self, fallback: &str) -> String {
        if self.message.trim().is_empty() {
            fallback.to_string()
        } else {
            self.message.clone()
        }
    }

    /// Transform the payload, keeping the outcome fields
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            success: self.success,
            status: self.status,
            message: self.message,
            data: self.data.map(f),
            meta: self.meta,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of items
    pub total: u64,
}

impl PageMeta {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        Self { page, limit, total }
    }

    /// Total number of pages
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            self.total.div_ceil(u64::from(self.limit))
        }
    }
}
