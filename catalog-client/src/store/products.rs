//! Product listing state: products, categories, in-flight deletes and
//! the bulk selection

use shared::models::{
    Category, CategoryCreate, CategoryUpdate, Product, ProductCreate, ProductQuery, ProductUpdate,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

use super::{Collection, DeleteOutcome, LOAD_FAILED, LoadState, MutationOutcome};
use crate::bulk::{BulkDeleteReport, BulkUpdateReport, FailedItem, fan_out};
use crate::{CatalogGateway, Session};

const DELETE_FAILED: &str = "Failed to delete product";
const DELETE_ERRORED: &str = "An error occurred while deleting the product";

#[derive(Debug, Default)]
struct ProductState {
    products: Collection<Product>,
    categories: Collection<Category>,
    /// Ids with delete requests in flight, and how many
    deleting: HashMap<String, usize>,
    /// Bulk selection; always a subset of loaded product ids
    selected: BTreeSet<String>,
    version: u64,
}

impl ProductState {
    fn begin_delete(&mut self, id: &str) {
        *self.deleting.entry(id.to_string()).or_default() += 1;
    }

    fn end_delete(&mut self, id: &str) {
        if let Some(count) = self.deleting.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                self.deleting.remove(id);
            }
        }
    }
}

/// Product listing store
///
/// The state lock is never held across a gateway call, so readers observe
/// the in-flight deletes while requests are pending. Overlapping deletes of
/// one id keep it marked until the last of them settles.
pub struct ProductStore<G> {
    gateway: Arc<G>,
    session: Session,
    query: ProductQuery,
    state: RwLock<ProductState>,
    changes: watch::Sender<u64>,
}

impl<G: CatalogGateway> ProductStore<G> {
    pub fn new(gateway: Arc<G>, session: Session) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            gateway,
            session,
            query: ProductQuery::default(),
            state: RwLock::new(ProductState::default()),
            changes,
        }
    }

    /// Listing filters sent with every `load`
    pub fn with_query(mut self, query: ProductQuery) -> Self {
        self.query = query;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    /// Receives the store version after every applied change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    fn publish(&self, state: &mut ProductState) {
        state.version += 1;
        self.changes.send_replace(state.version);
    }

    // ========== Reads ==========

    pub async fn products(&self) -> Vec<Product> {
        self.state.read().await.products.items().to_vec()
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.state.read().await.categories.items().to_vec()
    }

    pub async fn product(&self, id: &str) -> Option<Product> {
        self.state.read().await.products.get(id).cloned()
    }

    pub async fn load_state(&self) -> LoadState {
        self.state.read().await.products.state().clone()
    }

    pub async fn is_deleting(&self, id: &str) -> bool {
        self.state.read().await.deleting.contains_key(id)
    }

    pub async fn deleting(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut ids: Vec<String> = state.deleting.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn selected(&self) -> Vec<String> {
        self.state.read().await.selected.iter().cloned().collect()
    }

    pub async fn is_selected(&self, id: &str) -> bool {
        self.state.read().await.selected.contains(id)
    }

    /// Borrow both collections without cloning (for filtering and facets)
    pub async fn view<R>(&self, f: impl FnOnce(&[Product], &[Category]) -> R) -> R {
        let state = self.state.read().await;
        f(state.products.items(), state.categories.items())
    }

    // ========== Loading ==========

    /// Fetch products and categories concurrently and replace both
    ///
    /// A product failure marks the store errored and clears the products;
    /// a category failure only clears the categories.
    pub async fn load(&self) -> LoadState {
        {
            let mut state = self.state.write().await;
            state.products.begin_load();
            state.categories.begin_load();
            self.publish(&mut state);
        }

        let (products, categories) = tokio::join!(
            self.gateway.list_products(&self.query),
            self.gateway.list_categories()
        );

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        match (products, categories) {
            (Ok(products), Ok(categories)) => {
                if products.success {
                    let items = products.data.unwrap_or_default();
                    tracing::debug!(count = items.len(), "products loaded");
                    state.products.finish_load(items);
                } else {
                    let message = products.message_or("Failed to load products");
                    tracing::warn!(%message, "product listing rejected");
                    state.products.fail_load(message);
                }

                if categories.success {
                    state
                        .categories
                        .finish_load(categories.data.unwrap_or_default());
                } else {
                    tracing::warn!(message = %categories.message, "Failed to load categories");
                    state
                        .categories
                        .fail_load(categories.message_or("Failed to load categories"));
                }
            }
            (products, categories) => {
                if let Some(e) = products.err().or(categories.err()) {
                    tracing::error!(error = %e, "Error loading data");
                }
                state.products.fail_load(LOAD_FAILED);
                state.categories.fail_load(LOAD_FAILED);
            }
        }

        let products = &state.products;
        state.selected.retain(|id| products.contains(id));
        self.publish(state);
        state.products.state().clone()
    }

    // ========== Selection ==========

    /// Select a loaded product; unknown ids are ignored
    pub async fn select(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        if !state.products.contains(id) || !state.selected.insert(id.to_string()) {
            return false;
        }
        self.publish(&mut state);
        true
    }

    pub async fn deselect(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        if !state.selected.remove(id) {
            return false;
        }
        self.publish(&mut state);
        true
    }

    /// Flip selection; returns whether `id` is selected afterwards
    pub async fn toggle_selected(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        if state.selected.remove(id) {
            self.publish(&mut state);
            return false;
        }
        if !state.products.contains(id) {
            return false;
        }
        state.selected.insert(id.to_string());
        self.publish(&mut state);
        true
    }

    /// Replace the selection with the loaded subset of `ids`
    pub async fn select_all(&self, ids: &[String]) -> usize {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let products = &state.products;
        state.selected = ids
            .iter()
            .filter(|id| products.contains(id))
            .cloned()
            .collect();
        let count = state.selected.len();
        self.publish(state);
        count
    }

    pub async fn clear_selection(&self) {
        let mut state = self.state.write().await;
        if state.selected.is_empty() {
            return;
        }
        state.selected.clear();
        self.publish(&mut state);
    }

    // ========== Mutations ==========

    /// Replace a product the caller has already confirmed with the backend
    pub async fn apply_update(&self, item: Product) -> bool {
        let mut state = self.state.write().await;
        let replaced = state.products.replace(item);
        if replaced {
            self.publish(&mut state);
        }
        replaced
    }

    pub async fn create_product(&self, payload: &ProductCreate) -> MutationOutcome<Product> {
        match self.gateway.create_product(&self.session, payload).await {
            Ok(envelope) if envelope.success => {
                let message = envelope.message_or("Product created successfully!");
                if let Some(product) = envelope.data.clone() {
                    let mut state = self.state.write().await;
                    state.products.prepend([product]);
                    self.publish(&mut state);
                }
                tracing::info!(name = %payload.name, "product created");
                MutationOutcome::confirmed(envelope.data, message)
            }
            Ok(envelope) => {
                MutationOutcome::rejected(envelope.message_or("Failed to create product"))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error creating product");
                MutationOutcome::rejected("Failed to create product")
            }
        }
    }

    /// Remote PATCH, then replace the local copy with the confirmed product
    pub async fn update_product(
        &self,
        id: &str,
        payload: &ProductUpdate,
    ) -> MutationOutcome<Product> {
        match self.gateway.update_product(&self.session, id, payload).await {
            Ok(envelope) if envelope.success => {
                let message = envelope.message_or("Product updated successfully!");
                if let Some(product) = envelope.data.clone() {
                    self.apply_update(product).await;
                }
                MutationOutcome::confirmed(envelope.data, message)
            }
            Ok(envelope) => {
                MutationOutcome::rejected(envelope.message_or("Failed to update product"))
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Error updating product");
                MutationOutcome::rejected("Failed to update product")
            }
        }
    }

    /// Delete one product; the item stays loaded unless the backend confirms
    ///
    /// Repeated calls for the same id are not deduplicated.
    pub async fn delete_product(&self, id: &str) -> DeleteOutcome {
        {
            let mut state = self.state.write().await;
            state.begin_delete(id);
            self.publish(&mut state);
        }

        let result = self.gateway.delete_product(&self.session, id).await;

        let mut state = self.state.write().await;
        state.end_delete(id);
        let outcome = match result {
            Ok(envelope) if envelope.success => {
                state.products.remove(id);
                state.selected.remove(id);
                tracing::info!(id, "product deleted");
                DeleteOutcome {
                    id: id.to_string(),
                    success: true,
                    message: envelope.message,
                }
            }
            Ok(envelope) => {
                tracing::error!(id, message = %envelope.message, "Failed to delete product");
                DeleteOutcome {
                    id: id.to_string(),
                    success: false,
                    message: envelope.message_or(DELETE_FAILED),
                }
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Error deleting product");
                DeleteOutcome {
                    id: id.to_string(),
                    success: false,
                    message: DELETE_ERRORED.to_string(),
                }
            }
        };
        self.publish(&mut state);
        outcome
    }

    /// Delete every id concurrently and reconcile once all have settled
    ///
    /// Confirmed ids leave the collection and the selection; failed ids stay.
    pub async fn bulk_delete(&self, ids: &[String]) -> BulkDeleteReport {
        if ids.is_empty() {
            return BulkDeleteReport::empty();
        }

        {
            let mut state = self.state.write().await;
            for id in ids {
                state.begin_delete(id);
            }
            self.publish(&mut state);
        }

        let gateway = &self.gateway;
        let session = &self.session;
        let outcomes = fan_out(ids, |id| async move {
            match gateway.delete_product(session, &id).await {
                Ok(envelope) if envelope.success => Ok(()),
                Ok(envelope) => Err(envelope.message_or(DELETE_FAILED)),
                Err(e) => Err(e.to_string()),
            }
        })
        .await;

        let report = BulkDeleteReport::from_outcomes(outcomes);
        for item in &report.failed {
            tracing::error!(id = %item.id, reason = %item.reason, "Failed to delete product");
        }

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let deleted: HashSet<&str> = report.deleted.iter().map(String::as_str).collect();
        state.products.remove_many(&deleted);
        state.selected.retain(|id| !deleted.contains(id.as_str()));
        for id in ids {
            state.end_delete(id);
        }
        self.publish(state);

        tracing::info!(
            deleted = report.success_count,
            failed = report.failed_count,
            "bulk delete settled"
        );
        report
    }

    /// Bulk delete the current selection
    pub async fn bulk_delete_selected(&self) -> BulkDeleteReport {
        let ids = self.selected().await;
        self.bulk_delete(&ids).await
    }

    /// Sequential PATCHes; each confirmed product replaces its local copy
    pub async fn bulk_update(
        &self,
        updates: &[(String, ProductUpdate)],
    ) -> BulkUpdateReport<Product> {
        let mut updated = Vec::new();
        let mut failed = Vec::new();
        for (id, payload) in updates {
            let outcome = self.update_product(id, payload).await;
            if outcome.success {
                updated.extend(outcome.item);
            } else {
                failed.push(FailedItem {
                    id: id.clone(),
                    reason: outcome.message,
                });
            }
        }
        BulkUpdateReport::new(updated, failed)
    }

    // ========== Categories ==========

    pub async fn create_category(&self, payload: &CategoryCreate) -> MutationOutcome<Category> {
        match self.gateway.create_category(&self.session, payload).await {
            Ok(envelope) if envelope.success => {
                let message = envelope.message_or("Category created successfully");
                if let Some(category) = envelope.data.clone() {
                    let mut state = self.state.write().await;
                    state.categories.push(category);
                    self.publish(&mut state);
                }
                tracing::info!(name = %payload.name, "category created");
                MutationOutcome::confirmed(envelope.data, message)
            }
            Ok(envelope) => {
                MutationOutcome::rejected(envelope.message_or("Failed to create category"))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error creating category");
                MutationOutcome::rejected("Failed to create category")
            }
        }
    }

    pub async fn update_category(
        &self,
        id: &str,
        payload: &CategoryUpdate,
    ) -> MutationOutcome<Category> {
        match self.gateway.update_category(&self.session, id, payload).await {
            Ok(envelope) if envelope.success => {
                let message = envelope.message_or("Category updated successfully");
                if let Some(category) = envelope.data.clone() {
                    let mut state = self.state.write().await;
                    if state.categories.replace(category) {
                        self.publish(&mut state);
                    }
                }
                MutationOutcome::confirmed(envelope.data, message)
            }
            Ok(envelope) => {
                MutationOutcome::rejected(envelope.message_or("Failed to update category"))
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Error updating category");
                MutationOutcome::rejected("Failed to update category")
            }
        }
    }

    pub async fn delete_category(&self, id: &str) -> DeleteOutcome {
        let (success, message) = match self.gateway.delete_category(&self.session, id).await {
            Ok(envelope) if envelope.success => {
                let mut state = self.state.write().await;
                state.categories.remove(id);
                self.publish(&mut state);
                tracing::info!(id, "category deleted");
                (true, envelope.message_or("Category deleted successfully"))
            }
            Ok(envelope) => (false, envelope.message_or("Failed to delete category")),
            Err(e) => {
                tracing::error!(id, error = %e, "Error deleting category");
                (false, "Failed to delete category".to_string())
            }
        };
        DeleteOutcome {
            id: id.to_string(),
            success,
            message,
        }
    }
}
