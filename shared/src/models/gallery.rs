//! Gallery Image Model
//!
//! Gallery images are not owned by a product; products reference them by
//! id (`gallery`) and URL (`images`, `thumbnail`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where the image bytes are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Local,
    Cloudinary,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Local => "local",
            StorageType::Cloudinary => "cloudinary",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gallery image entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    pub url: String,
    pub cloudinary_id: Option<String>,
    pub local_path: Option<String>,
    #[serde(default)]
    pub storage_type: StorageType,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// Update image metadata payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Bulk delete payload (`DELETE gallery/bulk/delete`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleryBulkDelete {
    pub ids: Vec<String>,
}

/// One file of a multipart upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Multipart upload request: files plus optional display names keyed by file index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageUpload {
    pub files: Vec<UploadFile>,
    pub custom_names: BTreeMap<usize, String>,
}

impl ImageUpload {
    /// `customNames` form field: JSON object of index -> name, when any name is set
    pub fn custom_names_json(&self) -> Option<String> {
        if self.custom_names.is_empty() {
            return None;
        }
        let map: BTreeMap<String, &str> = self
            .custom_names
            .iter()
            .map(|(idx, name)| (idx.to_string(), name.as_str()))
            .collect();
        serde_json::to_string(&map).ok()
    }
}
