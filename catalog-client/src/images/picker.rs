//! Gallery picker dialog state

use shared::models::{GalleryImage, GalleryQuery};

use super::{UploadStaging, upload_staged};
use crate::store::{LOAD_FAILED, LoadState, MutationOutcome};
use crate::{CatalogGateway, Session};

const LOAD_IMAGES_FAILED: &str = "Failed to load images";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    /// Picking the thumbnail: at most one image
    Single,
    Multiple,
}

/// One open picker session
///
/// Work happens on a temporary selection seeded from the caller's current
/// images; only [`ImagePicker::confirm`] hands it back.
#[derive(Debug, Clone)]
pub struct ImagePicker {
    mode: PickerMode,
    original: Vec<GalleryImage>,
    temp: Vec<GalleryImage>,
    images: Vec<GalleryImage>,
    search: String,
    state: LoadState,
    staging: UploadStaging,
}

impl ImagePicker {
    pub fn open(mode: PickerMode, current: &[GalleryImage]) -> Self {
        Self {
            mode,
            original: current.to_vec(),
            temp: current.to_vec(),
            images: Vec::new(),
            search: String::new(),
            state: LoadState::Idle,
            staging: UploadStaging::new(),
        }
    }

    pub fn mode(&self) -> PickerMode {
        self.mode
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Fetch the first picker page for the current search term
    pub async fn load<G>(&mut self, gateway: &G) -> &LoadState
    where
        G: CatalogGateway + ?Sized,
    {
        self.state = LoadState::Loading;
        let term = self.search.trim();
        let query = GalleryQuery::picker((!term.is_empty()).then(|| term.to_string()));

        self.state = match gateway.list_images(&query).await {
            Ok(envelope) if envelope.success => {
                self.images = envelope.data.unwrap_or_default();
                tracing::debug!(count = self.images.len(), "picker images loaded");
                LoadState::Loaded
            }
            Ok(envelope) => {
                tracing::warn!(message = %envelope.message, "picker load rejected");
                LoadState::Errored(envelope.message_or(LOAD_IMAGES_FAILED))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading picker images");
                LoadState::Errored(LOAD_FAILED.to_string())
            }
        };
        &self.state
    }

    /// Set the search term; the caller debounces and reloads
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Loaded images matching the search term by name or original file name
    pub fn visible(&self) -> Vec<&GalleryImage> {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return self.images.iter().collect();
        }
        self.images
            .iter()
            .filter(|img| {
                img.name.to_lowercase().contains(&needle)
                    || img.original_name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.temp.iter().any(|img| img.id == id)
    }

    /// Multiple mode toggles membership; single mode replaces the selection
    pub fn toggle(&mut self, image: &GalleryImage) {
        match self.mode {
            PickerMode::Single => self.temp = vec![image.clone()],
            PickerMode::Multiple => {
                if self.is_selected(&image.id) {
                    self.temp.retain(|img| img.id != image.id);
                } else {
                    self.temp.push(image.clone());
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.temp.clear();
    }

    pub fn selection(&self) -> &[GalleryImage] {
        &self.temp
    }

    pub fn staging(&self) -> &UploadStaging {
        &self.staging
    }

    pub fn staging_mut(&mut self) -> &mut UploadStaging {
        &mut self.staging
    }

    /// Show freshly uploaded images first and select them
    pub fn merge_uploaded(&mut self, uploaded: Vec<GalleryImage>) {
        match self.mode {
            PickerMode::Single => {
                if let Some(first) = uploaded.first() {
                    self.temp = vec![first.clone()];
                }
            }
            PickerMode::Multiple => {
                for image in &uploaded {
                    if !self.is_selected(&image.id) {
                        self.temp.push(image.clone());
                    }
                }
            }
        }
        self.images.splice(0..0, uploaded);
        self.staging.clear();
    }

    /// Upload the staged files; staging is kept when the batch fails
    pub async fn upload<G>(
        &mut self,
        gateway: &G,
        session: &Session,
    ) -> MutationOutcome<Vec<GalleryImage>>
    where
        G: CatalogGateway + ?Sized,
    {
        let outcome = upload_staged(gateway, session, &self.staging).await;
        if outcome.success {
            self.merge_uploaded(outcome.item.clone().unwrap_or_default());
        }
        outcome
    }

    /// Close the dialog, handing back the selection
    pub fn confirm(self) -> Vec<GalleryImage> {
        self.temp
    }

    /// Discard changes made since the dialog opened
    pub fn cancel(&mut self) {
        self.temp = self.original.clone();
        self.staging.clear();
        self.search.clear();
    }
}
