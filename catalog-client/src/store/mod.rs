//! Local State Synchronizer
//!
//! In-memory mirrors of remote collections. Every mutation runs in three
//! phases: issue the request, await the envelope, then apply or discard.
//! Nothing is written locally before the backend confirms it.

mod gallery;
mod products;

pub use gallery::GalleryStore;
pub use products::ProductStore;

use serde::Serialize;
use shared::models::{Category, GalleryImage, Product};
use std::collections::HashSet;

/// Generic "failed to load" message for transport errors
pub const LOAD_FAILED: &str = "Failed to load data. Please try again.";

/// Anything with a stable backend id
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

impl Entity for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for GalleryImage {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Collection lifecycle: `Idle -> Loading -> Loaded | Errored`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Errored(message) => Some(message),
            _ => None,
        }
    }
}

/// Ordered, versioned entity collection
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    state: LoadState,
    version: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            state: LoadState::Idle,
            version: 0,
        }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Bumped on every applied change
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.id().to_string()).collect()
    }

    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
        self.bump();
    }

    /// Replace the whole collection with a confirmed listing
    pub fn finish_load(&mut self, items: Vec<T>) {
        self.items = items;
        self.state = LoadState::Loaded;
        self.bump();
    }

    /// Errored collections are cleared; the message is retained
    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.items.clear();
        self.state = LoadState::Errored(message.into());
        self.bump();
    }

    /// Replace the item with the same id; false when it is not loaded
    pub fn replace(&mut self, item: T) -> bool {
        let Some(slot) = self.items.iter_mut().find(|x| x.id() == item.id()) else {
            return false;
        };
        *slot = item;
        self.bump();
        true
    }

    pub fn prepend(&mut self, items: impl IntoIterator<Item = T>) {
        let mut merged: Vec<T> = items.into_iter().collect();
        if merged.is_empty() {
            return;
        }
        merged.append(&mut self.items);
        self.items = merged;
        self.bump();
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.bump();
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|x| x.id() == id)?;
        let removed = self.items.remove(index);
        self.bump();
        Some(removed)
    }

    /// Remove every item whose id is in `ids`; returns how many went
    pub fn remove_many(&mut self, ids: &HashSet<&str>) -> usize {
        let before = self.items.len();
        self.items.retain(|x| !ids.contains(x.id()));
        let removed = before - self.items.len();
        if removed > 0 {
            self.bump();
        }
        removed
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

/// Result of a single create/update round trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationOutcome<T> {
    pub success: bool,
    pub message: String,
    /// The confirmed entity, as returned by the backend
    pub item: Option<T>,
}

impl<T> MutationOutcome<T> {
    pub fn confirmed(item: Option<T>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            item,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            item: None,
        }
    }
}

/// Result of a single delete round trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub id: String,
    pub success: bool,
    pub message: String,
}
