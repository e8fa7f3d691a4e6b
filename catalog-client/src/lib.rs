//! Catalog Client - admin client for the catalog backend
//!
//! Typed gateway over the catalog REST API with a tagged read cache,
//! local stores that only apply backend-confirmed changes, and the
//! client-side workflows of the admin dashboard (filtering, bulk
//! operations, product drafts, image association).

pub mod bulk;
pub mod cache;
pub mod config;
pub mod draft;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod http;
pub mod images;
pub mod search;
pub mod session;
pub mod store;
pub mod token_store;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{CatalogGateway, HttpGateway};
pub use session::{Session, TokenClaims};
pub use token_store::TokenStore;

pub use bulk::{BulkDeleteReport, BulkUpdateReport, FailedItem};
pub use draft::ProductDraft;
pub use filter::{FilterState, StatusLabel, facets, filter_products};
pub use images::{ImagePicker, ImageSelection, PickerMode, UploadStaging};
pub use search::DebouncedSearch;
pub use store::{DeleteOutcome, GalleryStore, LoadState, MutationOutcome, ProductStore};

// Re-export shared types for convenience
pub use shared::Envelope;
