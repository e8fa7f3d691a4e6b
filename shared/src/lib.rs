//! Shared types for the catalog admin workspace
//!
//! Wire models, request payloads, query parameters and the response
//! envelope used between the catalog backend and its clients.

pub mod models;
pub mod response;
pub mod serde_helpers;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use response::{Envelope, PageMeta};
