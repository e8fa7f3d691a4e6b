//! Editable product form
//!
//! Holds what the add/edit screens collect and turns it into create or
//! update payloads. Images are filled in by [`crate::images::ImageSelection`].

use rust_decimal::Decimal;
use shared::models::{
    AttributeMap, AttributeValue, Product, ProductCreate, ProductStatus, ProductUpdate,
};

/// One key/value row of the custom attributes or specifications table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRow {
    pub key: String,
    pub value: String,
}

impl AttributeRow {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Lowercase, runs of non-alphanumerics become `-`, no leading/trailing `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut gap = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            gap = false;
        } else {
            gap = true;
        }
    }
    slug
}

fn rows_to_map(rows: &[AttributeRow]) -> AttributeMap {
    rows.iter()
        .filter(|row| !row.key.is_empty() && !row.value.is_empty())
        .map(|row| (row.key.clone(), AttributeValue::from(row.value.as_str())))
        .collect()
}

fn map_to_rows(map: &AttributeMap) -> Vec<AttributeRow> {
    map.iter()
        .map(|(key, value)| AttributeRow::new(key, value.to_string()))
        .collect()
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub sku: String,
    pub stock: i64,
    pub min_stock: i64,
    pub max_stock: Option<i64>,
    pub track_stock: bool,
    pub weight: Option<f64>,
    pub dimensions: String,
    pub status: ProductStatus,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_digital: bool,
    pub meta_title: String,
    pub meta_description: String,
    pub meta_keywords: String,
    /// Image URLs in display order
    pub images: Vec<String>,
    pub thumbnail: Option<String>,
    /// Gallery image ids, parallel to `images`
    pub gallery: Vec<String>,
    pub category_id: String,
    pub attributes: Vec<AttributeRow>,
    pub specifications: Vec<AttributeRow>,
    tags: Vec<String>,
    slug_edited: bool,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            short_description: String::new(),
            price: Decimal::ZERO,
            sale_price: None,
            cost_price: None,
            sku: String::new(),
            stock: 0,
            min_stock: 0,
            max_stock: None,
            track_stock: true,
            weight: None,
            dimensions: String::new(),
            status: ProductStatus::Draft,
            is_active: true,
            is_featured: false,
            is_digital: false,
            meta_title: String::new(),
            meta_description: String::new(),
            meta_keywords: String::new(),
            images: Vec::new(),
            thumbnail: None,
            gallery: Vec::new(),
            category_id: String::new(),
            attributes: Vec::new(),
            specifications: Vec::new(),
            tags: Vec::new(),
            slug_edited: false,
        }
    }
}

impl ProductDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an edit session from a loaded product
    pub fn from_product(product: &Product) -> Self {
        let tags = product
            .tags
            .iter()
            .map(|pt| {
                pt.tag
                    .as_ref()
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| pt.tag_id.clone())
            })
            .collect();

        Self {
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone().unwrap_or_default(),
            short_description: product.short_description.clone().unwrap_or_default(),
            price: product.price,
            sale_price: product.sale_price,
            cost_price: product.cost_price,
            sku: product.sku.clone().unwrap_or_default(),
            stock: product.stock,
            min_stock: product.min_stock,
            max_stock: product.max_stock,
            track_stock: product.track_stock,
            weight: product.weight,
            dimensions: product.dimensions.clone().unwrap_or_default(),
            status: product.status,
            is_active: product.is_active,
            is_featured: product.is_featured,
            is_digital: product.is_digital,
            meta_title: product.meta_title.clone().unwrap_or_default(),
            meta_description: product.meta_description.clone().unwrap_or_default(),
            meta_keywords: product.meta_keywords.clone().unwrap_or_default(),
            images: product.images.clone(),
            thumbnail: product.thumbnail.clone(),
            gallery: product.gallery.clone(),
            category_id: product.category_id.clone(),
            attributes: map_to_rows(&product.attributes),
            specifications: map_to_rows(&product.specifications),
            tags,
            // An existing slug is never regenerated from a renamed product
            slug_edited: !product.slug.is_empty(),
        }
    }

    /// Rename; the slug follows the name until it is edited by hand
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        if !self.slug_edited {
            self.slug = slugify(&self.name);
        }
    }

    /// Manual slug edit; clearing it re-enables generation from the name
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.slug = slug.into();
        self.slug_edited = !self.slug.is_empty();
        if !self.slug_edited {
            self.slug = slugify(&self.name);
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Add a trimmed tag; blanks and duplicates are ignored
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Create payload; saving as draft forces `DRAFT`
    pub fn to_create(&self, as_draft: bool) -> ProductCreate {
        let attributes = rows_to_map(&self.attributes);
        let specifications = rows_to_map(&self.specifications);
        ProductCreate {
            name: self.name.trim().to_string(),
            slug: non_empty(&self.slug),
            description: non_empty(&self.description),
            short_description: non_empty(&self.short_description),
            price: self.price,
            sale_price: self.sale_price,
            cost_price: self.cost_price,
            sku: non_empty(&self.sku),
            stock: self.stock,
            min_stock: Some(self.min_stock),
            max_stock: self.max_stock,
            track_stock: Some(self.track_stock),
            weight: self.weight,
            dimensions: non_empty(&self.dimensions),
            status: if as_draft {
                ProductStatus::Draft
            } else {
                self.status
            },
            is_active: Some(self.is_active),
            is_featured: Some(self.is_featured),
            is_digital: Some(self.is_digital),
            meta_title: non_empty(&self.meta_title),
            meta_description: non_empty(&self.meta_description),
            meta_keywords: non_empty(&self.meta_keywords),
            images: self.images.clone(),
            thumbnail: self.thumbnail.clone(),
            gallery: self.gallery.clone(),
            category_id: self.category_id.clone(),
            attributes: (!attributes.is_empty()).then_some(attributes),
            specifications: (!specifications.is_empty()).then_some(specifications),
            tags: self.tags.clone(),
        }
    }

    /// Full PATCH of every editable field; an unset thumbnail is sent as ""
    pub fn to_update(&self) -> ProductUpdate {
        ProductUpdate {
            name: Some(self.name.trim().to_string()),
            slug: non_empty(&self.slug),
            description: Some(self.description.clone()),
            short_description: Some(self.short_description.clone()),
            price: Some(self.price),
            sale_price: self.sale_price,
            cost_price: self.cost_price,
            sku: Some(self.sku.trim().to_string()),
            stock: Some(self.stock),
            min_stock: Some(self.min_stock),
            max_stock: self.max_stock,
            track_stock: Some(self.track_stock),
            weight: self.weight,
            dimensions: Some(self.dimensions.clone()),
            status: Some(self.status),
            is_active: Some(self.is_active),
            is_featured: Some(self.is_featured),
            is_digital: Some(self.is_digital),
            meta_title: Some(self.meta_title.clone()),
            meta_description: Some(self.meta_description.clone()),
            meta_keywords: Some(self.meta_keywords.clone()),
            images: Some(self.images.clone()),
            thumbnail: Some(self.thumbnail.clone().unwrap_or_default()),
            gallery: Some(self.gallery.clone()),
            category_id: non_empty(&self.category_id),
            attributes: Some(rows_to_map(&self.attributes)),
            specifications: Some(rows_to_map(&self.specifications)),
            tags: Some(self.tags.clone()),
        }
    }
}
