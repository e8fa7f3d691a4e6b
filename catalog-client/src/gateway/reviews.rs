//! Product review sub-resource

use reqwest::Method;
use serde_json::{Value, json};
use shared::Envelope;
use shared::models::{PageQuery, ProductReview, ProductReviewCreate};

use super::HttpGateway;
use super::http::sub_resource_tags;
use crate::cache::CacheTag;
use crate::{ClientResult, Session};

impl HttpGateway {
    pub async fn list_reviews(
        &self,
        product_id: &str,
        query: &PageQuery,
    ) -> ClientResult<Envelope<Vec<ProductReview>>> {
        let url = self.endpoint(&["products", product_id, "reviews"], &query.to_pairs());
        let tags = sub_resource_tags(CacheTag::ProductReviews(product_id.to_string()));
        self.fetch_cached(url, tags).await
    }

    pub async fn create_review(
        &self,
        session: &Session,
        payload: &ProductReviewCreate,
    ) -> ClientResult<Envelope<ProductReview>> {
        let url = self.endpoint(&["products", "reviews"], &[]);
        let tags = [CacheTag::ProductReviews(payload.product_id.clone())];
        self.mutate(Method::POST, url, Some(payload), session, &tags)
            .await
    }

    /// Approve or withdraw a review
    pub async fn set_review_approval(
        &self,
        session: &Session,
        id: &str,
        is_approved: bool,
    ) -> ClientResult<Envelope<ProductReview>> {
        let url = self.endpoint(&["products", "reviews", id, "status"], &[]);
        let body = json!({ "isApproved": is_approved });
        let envelope: Envelope<ProductReview> = self
            .mutate(Method::PATCH, url, Some(&body), session, &[CacheTag::Products])
            .await?;
        if let Some(review) = envelope.data.as_ref().filter(|_| envelope.success) {
            self.cache()
                .invalidate(&[CacheTag::ProductReviews(review.product_id.clone())]);
        }
        Ok(envelope)
    }

    pub async fn delete_review(
        &self,
        session: &Session,
        id: &str,
    ) -> ClientResult<Envelope<Value>> {
        let url = self.endpoint(&["products", "reviews", id], &[]);
        self.mutate(Method::DELETE, url, None::<&()>, session, &[CacheTag::Products])
            .await
    }
}
