//! Data models
//!
//! Wire types exchanged with the catalog backend (camelCase JSON).
//! All IDs are opaque strings.

pub mod attribute;
pub mod category;
pub mod gallery;
pub mod product;
pub mod query;
pub mod review;
pub mod tag;
pub mod variant;

// Re-exports
pub use attribute::*;
pub use category::*;
pub use gallery::*;
pub use product::*;
pub use query::*;
pub use review::*;
pub use tag::*;
pub use variant::*;
