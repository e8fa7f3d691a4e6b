//! Scripted in-memory gateway for store tests

#![allow(dead_code)]

use async_trait::async_trait;
use catalog_client::{CatalogGateway, ClientError, ClientResult, Session};
use serde_json::{Value, json};
use shared::Envelope;
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, GalleryImage, GalleryImageUpdate, GalleryQuery,
    ImageUpload, Product, ProductCreate, ProductQuery, ProductUpdate,
};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn product(id: &str, name: &str) -> Product {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "price": "19.99",
        "stock": 10,
        "minStock": 2,
        "categoryId": "c1",
        "createdAt": "2026-01-10T08:00:00Z",
        "updatedAt": "2026-01-10T08:00:00Z",
    }))
    .unwrap()
}

pub fn category(id: &str, name: &str) -> Category {
    serde_json::from_value(json!({ "id": id, "name": name })).unwrap()
}

pub fn image(id: &str) -> GalleryImage {
    serde_json::from_value(json!({
        "id": id,
        "name": id,
        "originalName": format!("{id}.png"),
        "url": format!("https://cdn.test/{id}.png"),
        "mimeType": "image/png",
    }))
    .unwrap()
}

fn transport_error() -> ClientError {
    ClientError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"))
}

/// Backend double: serves fixed collections and rejects what it is told to
#[derive(Default)]
pub struct FakeGateway {
    pub products: Mutex<Vec<Product>>,
    pub categories: Mutex<Vec<Category>>,
    pub images: Mutex<Vec<GalleryImage>>,
    /// Product ids whose delete is rejected, with the backend message
    pub reject_deletes: Mutex<HashMap<String, String>>,
    pub reject_product_list: AtomicBool,
    pub reject_category_list: AtomicBool,
    pub offline: AtomicBool,
    /// When set, product deletes wait for a notification before answering
    pub delete_gate: Mutex<Option<Arc<Notify>>>,
    pub calls: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<ImageUpload>>,
    next_image: AtomicUsize,
}

impl FakeGateway {
    pub fn with_products(products: Vec<Product>) -> Self {
        let gateway = Self::default();
        *gateway.products.lock().unwrap() = products;
        *gateway.categories.lock().unwrap() = vec![category("c1", "Shoes")];
        gateway
    }

    pub fn reject_delete(&self, id: &str, message: &str) {
        self.reject_deletes
            .lock()
            .unwrap()
            .insert(id.to_string(), message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) -> ClientResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.offline.load(Ordering::SeqCst) {
            return Err(transport_error());
        }
        Ok(())
    }
}

fn not_found<T>() -> Envelope<T> {
    Envelope::failure(404, "Not found")
}

#[async_trait]
impl CatalogGateway for FakeGateway {
    async fn list_products(&self, _query: &ProductQuery) -> ClientResult<Envelope<Vec<Product>>> {
        self.record("list_products".into())?;
        if self.reject_product_list.load(Ordering::SeqCst) {
            return Ok(Envelope::failure(500, "Database unavailable"));
        }
        Ok(Envelope::ok(self.products.lock().unwrap().clone()))
    }

    async fn get_product(&self, id: &str) -> ClientResult<Envelope<Product>> {
        self.record(format!("get_product:{id}"))?;
        let found = self.products.lock().unwrap().iter().find(|p| p.id == id).cloned();
        Ok(found.map(Envelope::ok).unwrap_or_else(not_found))
    }

    async fn get_product_by_slug(&self, slug: &str) -> ClientResult<Envelope<Product>> {
        self.record(format!("get_product_by_slug:{slug}"))?;
        let found = self.products.lock().unwrap().iter().find(|p| p.slug == slug).cloned();
        Ok(found.map(Envelope::ok).unwrap_or_else(not_found))
    }

    async fn create_product(
        &self,
        _session: &Session,
        payload: &ProductCreate,
    ) -> ClientResult<Envelope<Product>> {
        self.record(format!("create_product:{}", payload.name))?;
        let count = self.products.lock().unwrap().len();
        let created = product(&format!("p{}", count + 100), &payload.name);
        self.products.lock().unwrap().insert(0, created.clone());
        Ok(Envelope::ok_with_message(created, "Product created"))
    }

    async fn update_product(
        &self,
        _session: &Session,
        id: &str,
        payload: &ProductUpdate,
    ) -> ClientResult<Envelope<Product>> {
        self.record(format!("update_product:{id}"))?;
        let mut products = self.products.lock().unwrap();
        let Some(existing) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(not_found());
        };
        if let Some(name) = &payload.name {
            existing.name = name.clone();
        }
        if let Some(stock) = payload.stock {
            existing.stock = stock;
        }
        Ok(Envelope::ok(existing.clone()))
    }

    async fn delete_product(&self, _session: &Session, id: &str) -> ClientResult<Envelope<Value>> {
        self.record(format!("delete_product:{id}"))?;
        let gate = self.delete_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(message) = self.reject_deletes.lock().unwrap().get(id) {
            return Ok(Envelope::failure(400, message.clone()));
        }
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Ok(not_found());
        }
        Ok(Envelope::ok_with_message(Value::Null, "Product deleted"))
    }

    async fn list_categories(&self) -> ClientResult<Envelope<Vec<Category>>> {
        self.record("list_categories".into())?;
        if self.reject_category_list.load(Ordering::SeqCst) {
            return Ok(Envelope::failure(500, "Category service down"));
        }
        Ok(Envelope::ok(self.categories.lock().unwrap().clone()))
    }

    async fn search_categories(&self, term: &str) -> ClientResult<Envelope<Vec<Category>>> {
        self.record(format!("search_categories:{term}"))?;
        let term = term.to_lowercase();
        let found = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&term))
            .cloned()
            .collect();
        Ok(Envelope::ok(found))
    }

    async fn create_category(
        &self,
        _session: &Session,
        payload: &CategoryCreate,
    ) -> ClientResult<Envelope<Category>> {
        self.record(format!("create_category:{}", payload.name))?;
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.name == payload.name) {
            return Ok(Envelope::failure(409, "Category already exists"));
        }
        let created = category(&format!("c{}", categories.len() + 1), &payload.name);
        categories.push(created.clone());
        Ok(Envelope::ok(created))
    }

    async fn update_category(
        &self,
        _session: &Session,
        id: &str,
        payload: &CategoryUpdate,
    ) -> ClientResult<Envelope<Category>> {
        self.record(format!("update_category:{id}"))?;
        let mut categories = self.categories.lock().unwrap();
        let Some(existing) = categories.iter_mut().find(|c| c.id == id) else {
            return Ok(not_found());
        };
        if let Some(name) = &payload.name {
            existing.name = name.clone();
        }
        Ok(Envelope::ok(existing.clone()))
    }

    async fn delete_category(&self, _session: &Session, id: &str) -> ClientResult<Envelope<Value>> {
        self.record(format!("delete_category:{id}"))?;
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return Ok(not_found());
        }
        Ok(Envelope::ok(Value::Null))
    }

    async fn list_images(
        &self,
        query: &GalleryQuery,
    ) -> ClientResult<Envelope<Vec<GalleryImage>>> {
        self.record(format!(
            "list_images:{}",
            query.search_term.as_deref().unwrap_or_default()
        ))?;
        Ok(Envelope::ok(self.images.lock().unwrap().clone()))
    }

    async fn get_image(&self, id: &str) -> ClientResult<Envelope<GalleryImage>> {
        self.record(format!("get_image:{id}"))?;
        let found = self.images.lock().unwrap().iter().find(|i| i.id == id).cloned();
        Ok(found.map(Envelope::ok).unwrap_or_else(not_found))
    }

    async fn upload_images(
        &self,
        _session: &Session,
        upload: &ImageUpload,
    ) -> ClientResult<Envelope<Vec<GalleryImage>>> {
        self.record(format!("upload_images:{}", upload.files.len()))?;
        self.uploads.lock().unwrap().push(upload.clone());
        let uploaded: Vec<GalleryImage> = upload
            .files
            .iter()
            .enumerate()
            .map(|(index, file)| {
                let n = self.next_image.fetch_add(1, Ordering::SeqCst);
                let mut img = image(&format!("up{n}"));
                img.original_name = file.file_name.clone();
                if let Some(name) = upload.custom_names.get(&index) {
                    img.name = name.clone();
                }
                img
            })
            .collect();
        let mut images = self.images.lock().unwrap();
        images.splice(0..0, uploaded.iter().cloned());
        Ok(Envelope::ok(uploaded))
    }

    async fn update_image(
        &self,
        _session: &Session,
        id: &str,
        payload: &GalleryImageUpdate,
    ) -> ClientResult<Envelope<GalleryImage>> {
        self.record(format!("update_image:{id}"))?;
        let mut images = self.images.lock().unwrap();
        let Some(existing) = images.iter_mut().find(|i| i.id == id) else {
            return Ok(not_found());
        };
        if let Some(is_active) = payload.is_active {
            existing.is_active = is_active;
        }
        if let Some(name) = &payload.name {
            existing.name = name.clone();
        }
        Ok(Envelope::ok(existing.clone()))
    }

    async fn delete_image(&self, _session: &Session, id: &str) -> ClientResult<Envelope<Value>> {
        self.record(format!("delete_image:{id}"))?;
        self.images.lock().unwrap().retain(|i| i.id != id);
        Ok(Envelope::ok(Value::Null))
    }

    async fn delete_images(
        &self,
        _session: &Session,
        ids: &[String],
    ) -> ClientResult<Envelope<Value>> {
        self.record(format!("delete_images:{}", ids.join(",")))?;
        self.images.lock().unwrap().retain(|i| !ids.contains(&i.id));
        Ok(Envelope::ok(json!({ "deletedCount": ids.len() })))
    }
}
