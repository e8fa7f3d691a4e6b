//! Product variant sub-resource

use reqwest::Method;
use serde_json::Value;
use shared::Envelope;
use shared::models::{ProductVariant, ProductVariantCreate, ProductVariantUpdate};

use super::HttpGateway;
use super::http::sub_resource_tags;
use crate::cache::CacheTag;
use crate::{ClientResult, Session};

impl HttpGateway {
    pub async fn list_variants(
        &self,
        product_id: &str,
    ) -> ClientResult<Envelope<Vec<ProductVariant>>> {
        let url = self.endpoint(&["products", product_id, "variants"], &[]);
        let tags = sub_resource_tags(CacheTag::ProductVariants(product_id.to_string()));
        self.fetch_cached(url, tags).await
    }

    pub async fn create_variant(
        &self,
        session: &Session,
        payload: &ProductVariantCreate,
    ) -> ClientResult<Envelope<ProductVariant>> {
        let url = self.endpoint(&["products", "variants"], &[]);
        let tags = [
            CacheTag::Products,
            CacheTag::ProductVariants(payload.product_id.clone()),
        ];
        self.mutate(Method::POST, url, Some(payload), session, &tags)
            .await
    }

    /// The owning product is only known from the response, so per-product
    /// variant listings are invalidated once the update is confirmed
    pub async fn update_variant(
        &self,
        session: &Session,
        id: &str,
        payload: &ProductVariantUpdate,
    ) -> ClientResult<Envelope<ProductVariant>> {
        let url = self.endpoint(&["products", "variants", id], &[]);
        let envelope: Envelope<ProductVariant> = self
            .mutate(Method::PATCH, url, Some(payload), session, &[CacheTag::Products])
            .await?;
        if let Some(variant) = envelope.data.as_ref().filter(|_| envelope.success) {
            self.cache()
                .invalidate(&[CacheTag::ProductVariants(variant.product_id.clone())]);
        }
        Ok(envelope)
    }

    pub async fn delete_variant(
        &self,
        session: &Session,
        id: &str,
    ) -> ClientResult<Envelope<Value>> {
        let url = self.endpoint(&["products", "variants", id], &[]);
        self.mutate(Method::DELETE, url, None::<&()>, session, &[CacheTag::Products])
            .await
    }
}
