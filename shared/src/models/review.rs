//! Product Review Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product review entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReview {
    pub id: String,
    pub product_id: String,
    /// 1-5 stars
    pub rating: f64,
    pub title: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub reviewer_name: String,
    #[serde(default)]
    pub reviewer_email: String,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReviewCreate {
    pub product_id: String,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub comment: String,
    pub reviewer_name: String,
    pub reviewer_email: String,
}
