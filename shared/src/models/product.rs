//! Product Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AttributeMap, Category, ProductReview, ProductTag, ProductVariant};
use crate::serde_helpers::{
    decimal, decimal_option, empty_as_none, map_skip_nulls, null_as_default,
};

/// Publication status stored on the product record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[default]
    Draft,
    Published,
    Archived,
    OutOfStock,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "DRAFT",
            ProductStatus::Published => "PUBLISHED",
            ProductStatus::Archived => "ARCHIVED",
            ProductStatus::OutOfStock => "OUT_OF_STOCK",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub description: Option<String>,
    pub short_description: Option<String>,

    // Pricing
    #[serde(with = "decimal")]
    pub price: Decimal,
    #[serde(default, with = "decimal_option")]
    pub sale_price: Option<Decimal>,
    #[serde(default, with = "decimal_option")]
    pub cost_price: Option<Decimal>,

    // Inventory
    pub sku: Option<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub min_stock: i64,
    pub max_stock: Option<i64>,
    #[serde(default = "default_true")]
    pub track_stock: bool,

    // Physical attributes
    pub weight: Option<f64>,
    /// JSON-encoded dimensions, kept opaque
    pub dimensions: Option<String>,

    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_digital: bool,

    // SEO
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,

    // Media
    /// Gallery image URLs, in display order
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "empty_as_none::deserialize")]
    pub thumbnail: Option<String>,
    /// Gallery image ids, in display order
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub gallery: Vec<String>,

    /// Owning category reference (required)
    pub category_id: String,
    /// Embedded category (populated by list/detail endpoints)
    pub category: Option<Category>,

    #[serde(default, deserialize_with = "map_skip_nulls::deserialize")]
    pub attributes: AttributeMap,
    #[serde(default, deserialize_with = "map_skip_nulls::deserialize")]
    pub specifications: AttributeMap,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,

    // -- Relations --
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub product_variants: Vec<ProductVariant>,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub reviews: Vec<ProductReview>,
    #[serde(default, deserialize_with = "null_as_default::deserialize")]
    pub tags: Vec<ProductTag>,
}

fn default_true() -> bool {
    true
}

/// Create product payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(with = "decimal")]
    pub price: Decimal,
    #[serde(default, with = "decimal_option", skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    #[serde(default, with = "decimal_option", skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    pub status: ProductStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_digital: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    pub category_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributeMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<AttributeMap>,
    /// Tag names
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Update product payload (PATCH, absent fields untouched)
///
/// `thumbnail: Some("")` clears the stored thumbnail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, with = "decimal_option", skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, with = "decimal_option", skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    #[serde(default, with = "decimal_option", skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_digital: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributeMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<AttributeMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
