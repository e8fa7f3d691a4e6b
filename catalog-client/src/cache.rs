//! Tagged response cache
//!
//! List reads are cached per URL and labelled with invalidation tags.
//! Successful mutations drop every entry carrying one of their tags; the
//! TTL bounds staleness when an invalidation never happens.

use dashmap::DashMap;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Invalidation tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Products,
    Product(String),
    ProductSlug(String),
    ProductVariants(String),
    ProductReviews(String),
    Categories,
    Gallery,
    GalleryImage(String),
    Tags,
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheTag::Products => write!(f, "products"),
            CacheTag::Product(id) => write!(f, "product-{}", id),
            CacheTag::ProductSlug(slug) => write!(f, "product-slug-{}", slug),
            CacheTag::ProductVariants(id) => write!(f, "product-variants-{}", id),
            CacheTag::ProductReviews(id) => write!(f, "product-reviews-{}", id),
            CacheTag::Categories => write!(f, "categories"),
            CacheTag::Gallery => write!(f, "gallery"),
            CacheTag::GalleryImage(id) => write!(f, "gallery-{}", id),
            CacheTag::Tags => write!(f, "tags"),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    body: Value,
    tags: Vec<CacheTag>,
    stored_at: Instant,
}

/// Response cache keyed by request URL
#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Fresh body for `key`; expired entries are evicted on lookup
    pub fn get(&self, key: &str) -> Option<Value> {
        if !self.is_enabled() {
            return None;
        }
        {
            let entry = self.entries.get(key)?;
            if self.is_fresh(&entry) {
                return Some(entry.body.clone());
            }
        }
        if self.evict_expired(key) {
            tracing::debug!(key, "cache entry expired");
        }
        None
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        entry.stored_at.elapsed() < self.ttl
    }

    /// Removes `key` only if the entry stored now is stale; a concurrent
    /// `put` between lookup and eviction survives
    fn evict_expired(&self, key: &str) -> bool {
        self.entries
            .remove_if(key, |_, entry| !self.is_fresh(entry))
            .is_some()
    }

    pub fn put(&self, key: impl Into<String>, tags: Vec<CacheTag>, body: Value) {
        if !self.is_enabled() {
            return;
        }
        self.entries.insert(
            key.into(),
            CacheEntry {
                body,
                tags,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every entry carrying any of `tags`; returns how many were dropped
    pub fn invalidate(&self, tags: &[CacheTag]) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.tags.iter().any(|t| tags.contains(t)));
        let dropped = before.saturating_sub(self.entries.len());
        tracing::debug!(
            tags = %tags.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            dropped,
            "cache invalidated"
        );
        dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_names() {
        assert_eq!(CacheTag::Product("p1".into()).to_string(), "product-p1");
        assert_eq!(CacheTag::GalleryImage("g1".into()).to_string(), "gallery-g1");
        assert_eq!(CacheTag::Categories.to_string(), "categories");
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(30));
        cache.put("/category", vec![CacheTag::Categories], json!({"success": true}));
        assert!(cache.get("/category").is_some());

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(cache.get("/category").is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_eviction_spares_refreshed_entry() {
        let cache = ResponseCache::new(Duration::from_secs(30));
        cache.put("/category", vec![CacheTag::Categories], json!(1));
        tokio::time::advance(Duration::from_secs(31)).await;

        // 另一个请求在过期检查之后写入了新响应
        cache.put("/category", vec![CacheTag::Categories], json!(2));
        assert!(!cache.evict_expired("/category"));
        assert_eq!(cache.get("/category"), Some(json!(2)));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(cache.evict_expired("/category"));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_by_tag() {
        let cache = ResponseCache::new(Duration::from_secs(30));
        cache.put("/products?page=1", vec![CacheTag::Products], json!(1));
        cache.put("/products?page=2", vec![CacheTag::Products], json!(2));
        cache.put("/category", vec![CacheTag::Categories], json!(3));

        assert_eq!(cache.invalidate(&[CacheTag::Products, CacheTag::Product("p1".into())]), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("/category").is_some());
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let cache = ResponseCache::new(Duration::ZERO);
        cache.put("/category", vec![CacheTag::Categories], json!(1));
        assert!(cache.get("/category").is_none());
        assert!(cache.is_empty());
    }
}
