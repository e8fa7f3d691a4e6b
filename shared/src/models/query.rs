//! List query parameters
//!
//! Query structs render to ordered key/value pairs; array parameters
//! repeat their key.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// `GET products` filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search_term: Option<String>,
    pub category_id: Option<String>,
    pub status: Option<ProductStatus>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_digital: Option<bool>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: Option<bool>,
    pub tags: Vec<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "page", self.page);
        push(&mut pairs, "limit", self.limit);
        push(&mut pairs, "searchTerm", self.search_term.as_ref());
        push(&mut pairs, "categoryId", self.category_id.as_ref());
        push(&mut pairs, "status", self.status.map(|s| s.as_str()));
        push(&mut pairs, "isActive", self.is_active);
        push(&mut pairs, "isFeatured", self.is_featured);
        push(&mut pairs, "isDigital", self.is_digital);
        push(&mut pairs, "minPrice", self.min_price);
        push(&mut pairs, "maxPrice", self.max_price);
        push(&mut pairs, "inStock", self.in_stock);
        for tag in &self.tags {
            pairs.push(("tags", tag.clone()));
        }
        push(&mut pairs, "sortBy", self.sort_by.as_ref());
        push(&mut pairs, "sortOrder", self.sort_order.map(|s| s.as_str()));
        pairs
    }
}

/// `GET gallery` filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search_term: Option<String>,
    pub mime_type: Option<String>,
    pub is_active: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl GalleryQuery {
    /// First page of the picker grid
    pub fn picker(search_term: Option<String>) -> Self {
        Self {
            page: Some(1),
            limit: Some(50),
            search_term: search_term.filter(|s| !s.is_empty()),
            ..Default::default()
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "page", self.page);
        push(&mut pairs, "limit", self.limit);
        push(&mut pairs, "searchTerm", self.search_term.as_ref());
        push(&mut pairs, "mimeType", self.mime_type.as_ref());
        push(&mut pairs, "isActive", self.is_active);
        push(&mut pairs, "sortBy", self.sort_by.as_ref());
        push(&mut pairs, "sortOrder", self.sort_order.map(|s| s.as_str()));
        pairs
    }
}

/// Paging/sorting options shared by the review and tag listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl PageQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "page", self.page);
        push(&mut pairs, "limit", self.limit);
        push(&mut pairs, "sortBy", self.sort_by.as_ref());
        push(&mut pairs, "sortOrder", self.sort_order.map(|s| s.as_str()));
        pairs
    }
}

fn push<T: ToString>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<T>) {
    if let Some(v) = value {
        pairs.push((key, v.to_string()));
    }
}
