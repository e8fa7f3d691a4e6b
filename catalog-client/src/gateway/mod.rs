//! Remote Catalog Gateway
//!
//! One operation per resource action. Every call resolves to the backend's
//! envelope: `success == false` is a normal `Ok` value and callers must
//! inspect it. Only transport failures and unparsable bodies are errors.

mod http;
mod reviews;
mod tags;
mod variants;

pub use http::HttpGateway;

use async_trait::async_trait;
use serde_json::Value;
use shared::Envelope;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, GalleryImage, GalleryImageUpdate, GalleryQuery,
    ImageUpload, Product, ProductCreate, ProductQuery, ProductUpdate,
};

use crate::{ClientResult, Session};

/// Catalog backend operations the stores depend on
///
/// Reads are anonymous; mutations carry the caller's [`Session`].
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    // ========== Products ==========

    async fn list_products(&self, query: &ProductQuery) -> ClientResult<Envelope<Vec<Product>>>;

    async fn get_product(&self, id: &str) -> ClientResult<Envelope<Product>>;

    async fn get_product_by_slug(&self, slug: &str) -> ClientResult<Envelope<Product>>;

    async fn create_product(
        &self,
        session: &Session,
        payload: &ProductCreate,
    ) -> ClientResult<Envelope<Product>>;

    async fn update_product(
        &self,
        session: &Session,
        id: &str,
        payload: &ProductUpdate,
    ) -> ClientResult<Envelope<Product>>;

    async fn delete_product(&self, session: &Session, id: &str) -> ClientResult<Envelope<Value>>;

    // ========== Categories ==========

    async fn list_categories(&self) -> ClientResult<Envelope<Vec<Category>>>;

    async fn search_categories(&self, term: &str) -> ClientResult<Envelope<Vec<Category>>>;

    async fn create_category(
        &self,
        session: &Session,
        payload: &CategoryCreate,
    ) -> ClientResult<Envelope<Category>>;

    async fn update_category(
        &self,
        session: &Session,
        id: &str,
        payload: &CategoryUpdate,
    ) -> ClientResult<Envelope<Category>>;

    async fn delete_category(&self, session: &Session, id: &str) -> ClientResult<Envelope<Value>>;

    // ========== Gallery ==========

    async fn list_images(&self, query: &GalleryQuery)
    -> ClientResult<Envelope<Vec<GalleryImage>>>;

    async fn get_image(&self, id: &str) -> ClientResult<Envelope<GalleryImage>>;

    /// Upload a batch of files in a single multipart request
    async fn upload_images(
        &self,
        session: &Session,
        upload: &ImageUpload,
    ) -> ClientResult<Envelope<Vec<GalleryImage>>>;

    async fn update_image(
        &self,
        session: &Session,
        id: &str,
        payload: &GalleryImageUpdate,
    ) -> ClientResult<Envelope<GalleryImage>>;

    async fn delete_image(&self, session: &Session, id: &str) -> ClientResult<Envelope<Value>>;

    /// Server-side bulk delete (one request for all ids)
    async fn delete_images(
        &self,
        session: &Session,
        ids: &[String],
    ) -> ClientResult<Envelope<Value>>;

    async fn toggle_image_active(
        &self,
        session: &Session,
        id: &str,
        is_active: bool,
    ) -> ClientResult<Envelope<GalleryImage>> {
        let payload = GalleryImageUpdate {
            is_active: Some(is_active),
            ..Default::default()
        };
        self.update_image(session, id, &payload).await
    }
}
