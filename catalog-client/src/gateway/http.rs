// catalog-client/src/gateway/http.rs
// reqwest 实现 + 响应缓存

use async_trait::async_trait;
use reqwest::{Method, Url, multipart};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use shared::Envelope;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, GalleryBulkDelete, GalleryImage,
    GalleryImageUpdate, GalleryQuery, ImageUpload, Product, ProductCreate, ProductQuery,
    ProductUpdate,
};
use std::time::Duration;

use super::CatalogGateway;
use crate::cache::{CacheTag, ResponseCache};
use crate::http::{NetworkHttpClient, decode};
use crate::{ClientConfig, ClientResult, Session};

/// HTTP gateway to the catalog backend
#[derive(Debug)]
pub struct HttpGateway {
    http: NetworkHttpClient,
    cache: ResponseCache,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = NetworkHttpClient::new(&config.base_url, config.timeout)?;
        tracing::debug!(base_url = %http.base_url(), "catalog gateway ready");
        Ok(Self {
            http,
            cache: ResponseCache::new(Duration::from_secs(config.cache_ttl)),
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub(super) fn endpoint(&self, segments: &[&str], query: &[(&'static str, String)]) -> Url {
        self.http.endpoint(segments, query)
    }

    /// Uncached GET
    pub(super) async fn fetch<T: DeserializeOwned>(&self, url: Url) -> ClientResult<Envelope<T>> {
        decode(self.http.get(url).await?)
    }

    /// GET through the response cache; only successful envelopes are stored
    pub(super) async fn fetch_cached<T: DeserializeOwned>(
        &self,
        url: Url,
        tags: Vec<CacheTag>,
    ) -> ClientResult<Envelope<T>> {
        let key = url.to_string();
        if let Some(body) = self.cache.get(&key) {
            tracing::debug!(%key, "cache hit");
            return decode(body);
        }
        let body = self.http.get(url).await?;
        let envelope: Envelope<T> = decode(body.clone())?;
        if envelope.success {
            self.cache.put(key, tags, body);
        }
        Ok(envelope)
    }

    /// Authorized mutation; on success the given tags are invalidated
    pub(super) async fn mutate<T, B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        session: &Session,
        tags: &[CacheTag],
    ) -> ClientResult<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let path = url.path().to_string();
        let value = self
            .http
            .send_json(method.clone(), url, body, session.token())
            .await?;
        self.settle(method, &path, decode(value)?, tags)
    }

    fn settle<T>(
        &self,
        method: Method,
        path: &str,
        envelope: Envelope<T>,
        tags: &[CacheTag],
    ) -> ClientResult<Envelope<T>> {
        if envelope.success {
            self.cache.invalidate(tags);
            tracing::info!(%method, path, status = envelope.status, "mutation confirmed");
        } else {
            tracing::warn!(
                %method,
                path,
                status = envelope.status,
                message = %envelope.message,
                "mutation rejected"
            );
        }
        Ok(envelope)
    }
}

/// Tags for a per-product listing (variants, reviews)
///
/// Deleting a variant or review only knows the child id, so such listings
/// also carry the product-wide tag those deletes invalidate.
pub(super) fn sub_resource_tags(owner: CacheTag) -> Vec<CacheTag> {
    vec![CacheTag::Products, owner]
}

#[async_trait]
impl CatalogGateway for HttpGateway {
    // ========== Products ==========

    async fn list_products(&self, query: &ProductQuery) -> ClientResult<Envelope<Vec<Product>>> {
        let url = self.endpoint(&["products"], &query.to_pairs());
        self.fetch_cached(url, vec![CacheTag::Products]).await
    }

    async fn get_product(&self, id: &str) -> ClientResult<Envelope<Product>> {
        self.fetch(self.endpoint(&["products", id], &[])).await
    }

    async fn get_product_by_slug(&self, slug: &str) -> ClientResult<Envelope<Product>> {
        self.fetch(self.endpoint(&["products", "slug", slug], &[]))
            .await
    }

    async fn create_product(
        &self,
        session: &Session,
        payload: &ProductCreate,
    ) -> ClientResult<Envelope<Product>> {
        let url = self.endpoint(&["products"], &[]);
        self.mutate(Method::POST, url, Some(payload), session, &[CacheTag::Products])
            .await
    }

    async fn update_product(
        &self,
        session: &Session,
        id: &str,
        payload: &ProductUpdate,
    ) -> ClientResult<Envelope<Product>> {
        let url = self.endpoint(&["products", id], &[]);
        let tags = [CacheTag::Products, CacheTag::Product(id.to_string())];
        self.mutate(Method::PATCH, url, Some(payload), session, &tags)
            .await
    }

    async fn delete_product(&self, session: &Session, id: &str) -> ClientResult<Envelope<Value>> {
        let url = self.endpoint(&["products", id], &[]);
        let tags = [CacheTag::Products, CacheTag::Product(id.to_string())];
        self.mutate(Method::DELETE, url, None::<&()>, session, &tags)
            .await
    }

    // ========== Categories ==========

    async fn list_categories(&self) -> ClientResult<Envelope<Vec<Category>>> {
        let url = self.endpoint(&["category"], &[]);
        self.fetch_cached(url, vec![CacheTag::Categories]).await
    }

    async fn search_categories(&self, term: &str) -> ClientResult<Envelope<Vec<Category>>> {
        let url = self.endpoint(&["category"], &[("searchTerm", term.to_string())]);
        self.fetch_cached(url, vec![CacheTag::Categories]).await
    }

    async fn create_category(
        &self,
        session: &Session,
        payload: &CategoryCreate,
    ) -> ClientResult<Envelope<Category>> {
        let url = self.endpoint(&["category", "create"], &[]);
        self.mutate(Method::POST, url, Some(payload), session, &[CacheTag::Categories])
            .await
    }

    async fn update_category(
        &self,
        session: &Session,
        id: &str,
        payload: &CategoryUpdate,
    ) -> ClientResult<Envelope<Category>> {
        let url = self.endpoint(&["category", id], &[]);
        self.mutate(Method::PATCH, url, Some(payload), session, &[CacheTag::Categories])
            .await
    }

    async fn delete_category(&self, session: &Session, id: &str) -> ClientResult<Envelope<Value>> {
        let url = self.endpoint(&["category", id], &[]);
        self.mutate(Method::DELETE, url, None::<&()>, session, &[CacheTag::Categories])
            .await
    }

    // ========== Gallery ==========

    async fn list_images(
        &self,
        query: &GalleryQuery,
    ) -> ClientResult<Envelope<Vec<GalleryImage>>> {
        self.fetch(self.endpoint(&["gallery"], &query.to_pairs()))
            .await
    }

    async fn get_image(&self, id: &str) -> ClientResult<Envelope<GalleryImage>> {
        self.fetch(self.endpoint(&["gallery", id], &[])).await
    }

    async fn upload_images(
        &self,
        session: &Session,
        upload: &ImageUpload,
    ) -> ClientResult<Envelope<Vec<GalleryImage>>> {
        let mut form = multipart::Form::new();
        for file in &upload.files {
            let part = multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type)?;
            form = form.part("images", part);
        }
        if let Some(names) = upload.custom_names_json() {
            form = form.text("customNames", names);
        }

        let url = self.endpoint(&["gallery", "upload"], &[]);
        let path = url.path().to_string();
        tracing::debug!(files = upload.files.len(), "uploading image batch");
        let value = self.http.post_multipart(url, form, session.token()).await?;
        self.settle(Method::POST, &path, decode(value)?, &[CacheTag::Gallery])
    }

    async fn update_image(
        &self,
        session: &Session,
        id: &str,
        payload: &GalleryImageUpdate,
    ) -> ClientResult<Envelope<GalleryImage>> {
        let url = self.endpoint(&["gallery", id], &[]);
        let tags = [CacheTag::Gallery, CacheTag::GalleryImage(id.to_string())];
        self.mutate(Method::PATCH, url, Some(payload), session, &tags)
            .await
    }

    async fn delete_image(&self, session: &Session, id: &str) -> ClientResult<Envelope<Value>> {
        let url = self.endpoint(&["gallery", id], &[]);
        let tags = [CacheTag::Gallery, CacheTag::GalleryImage(id.to_string())];
        self.mutate(Method::DELETE, url, None::<&()>, session, &tags)
            .await
    }

    async fn delete_images(
        &self,
        session: &Session,
        ids: &[String],
    ) -> ClientResult<Envelope<Value>> {
        let url = self.endpoint(&["gallery", "bulk", "delete"], &[]);
        let payload = GalleryBulkDelete { ids: ids.to_vec() };
        self.mutate(Method::DELETE, url, Some(&payload), session, &[CacheTag::Gallery])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HttpGateway {
        HttpGateway::new(&ClientConfig::new("http://api.test/api/v1")).unwrap()
    }

    #[test]
    fn test_endpoints_follow_backend_routes() {
        let gw = gateway();
        assert_eq!(
            gw.endpoint(&["category", "create"], &[]).as_str(),
            "http://api.test/api/v1/category/create"
        );
        assert_eq!(
            gw.endpoint(&["gallery", "bulk", "delete"], &[]).as_str(),
            "http://api.test/api/v1/gallery/bulk/delete"
        );
        assert_eq!(
            gw.endpoint(&["category"], &[("searchTerm", "shoes & bags".into())])
                .as_str(),
            "http://api.test/api/v1/category?searchTerm=shoes+%26+bags"
        );
    }

    #[tokio::test]
    async fn test_cached_list_is_served_without_network() {
        let gw = gateway();
        let url = gw.endpoint(&["category"], &[]);
        gw.cache().put(
            url.to_string(),
            vec![CacheTag::Categories],
            serde_json::json!({
                "success": true,
                "status": 200,
                "message": "ok",
                "data": [{"id": "c1", "name": "Shoes"}]
            }),
        );

        // api.test never resolves; a network attempt would fail
        let envelope = gw.list_categories().await.unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap()[0].name, "Shoes");
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_cache() {
        let gw = gateway();
        let key = gw.endpoint(&["category"], &[]).to_string();
        gw.cache()
            .put(key.clone(), vec![CacheTag::Categories], serde_json::json!({}));

        let rejected: Envelope<Value> = Envelope::failure(400, "Category name taken");
        let out = gw
            .settle(Method::POST, "/category/create", rejected, &[CacheTag::Categories])
            .unwrap();
        assert!(!out.success);
        assert_eq!(gw.cache().len(), 1);

        let accepted: Envelope<Value> = Envelope::ok(Value::Null);
        gw.settle(Method::POST, "/category/create", accepted, &[CacheTag::Categories])
            .unwrap();
        assert!(gw.cache().is_empty());
    }

    #[test]
    fn test_child_delete_drops_per_product_listings() {
        let gw = gateway();
        let variants = gw.endpoint(&["products", "p1", "variants"], &[]).to_string();
        let reviews = gw.endpoint(&["products", "p1", "reviews"], &[]).to_string();
        gw.cache().put(
            variants,
            sub_resource_tags(CacheTag::ProductVariants("p1".into())),
            serde_json::json!({}),
        );
        gw.cache().put(
            reviews,
            sub_resource_tags(CacheTag::ProductReviews("p1".into())),
            serde_json::json!({}),
        );

        let deleted: Envelope<Value> = Envelope::ok(Value::Null);
        gw.settle(Method::DELETE, "/products/variants/v1", deleted, &[CacheTag::Products])
            .unwrap();
        assert!(gw.cache().is_empty());
    }
}
