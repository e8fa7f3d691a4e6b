//! Product Variant Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AttributeMap;
use crate::serde_helpers::{decimal, decimal_option};

/// Product variant entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub sku: Option<String>,
    #[serde(with = "decimal")]
    pub price: Decimal,
    #[serde(default, with = "decimal_option")]
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub attributes: AttributeMap,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create variant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantCreate {
    pub product_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(with = "decimal")]
    pub price: Decimal,
    #[serde(default, with = "decimal_option", skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    pub stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub attributes: AttributeMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Update variant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, with = "decimal_option", skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, with = "decimal_option", skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributeMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
