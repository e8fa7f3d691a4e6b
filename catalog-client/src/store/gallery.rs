//! Gallery page state

use shared::Envelope;
use shared::models::{GalleryImage, GalleryImageUpdate, GalleryQuery, ImageUpload};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

use super::{Collection, DeleteOutcome, LOAD_FAILED, LoadState, MutationOutcome};
use crate::{CatalogGateway, ClientResult, Session};

const UPLOAD_FAILED: &str = "Failed to upload images";

/// Gallery image store
pub struct GalleryStore<G> {
    gateway: Arc<G>,
    session: Session,
    images: RwLock<Collection<GalleryImage>>,
    changes: watch::Sender<u64>,
}

impl<G: CatalogGateway> GalleryStore<G> {
    pub fn new(gateway: Arc<G>, session: Session) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            gateway,
            session,
            images: RwLock::new(Collection::new()),
            changes,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    fn publish(&self, images: &Collection<GalleryImage>) {
        self.changes.send_replace(images.version());
    }

    pub async fn images(&self) -> Vec<GalleryImage> {
        self.images.read().await.items().to_vec()
    }

    pub async fn load_state(&self) -> LoadState {
        self.images.read().await.state().clone()
    }

    pub async fn load(&self, query: &GalleryQuery) -> LoadState {
        {
            let mut images = self.images.write().await;
            images.begin_load();
            self.publish(&images);
        }

        let result = self.gateway.list_images(query).await;

        let mut images = self.images.write().await;
        match result {
            Ok(envelope) if envelope.success => {
                images.finish_load(envelope.data.unwrap_or_default());
            }
            Ok(envelope) => {
                tracing::warn!(message = %envelope.message, "gallery listing rejected");
                images.fail_load(envelope.message_or("Failed to load images"));
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading images");
                images.fail_load(LOAD_FAILED);
            }
        }
        self.publish(&images);
        images.state().clone()
    }

    /// Upload one batch; confirmed images are prepended to the listing
    ///
    /// The outcome covers the whole batch: a rejected envelope reports the
    /// batch as failed even if the backend stored some of its files.
    pub async fn upload(&self, upload: &ImageUpload) -> MutationOutcome<Vec<GalleryImage>> {
        if upload.files.is_empty() {
            return MutationOutcome::rejected("Please select files to upload");
        }
        match self.gateway.upload_images(&self.session, upload).await {
            Ok(envelope) if envelope.success => {
                let uploaded = envelope.data.clone().unwrap_or_default();
                let message = envelope
                    .message_or(&format!("{} image(s) uploaded successfully", uploaded.len()));
                let mut images = self.images.write().await;
                images.prepend(uploaded.clone());
                self.publish(&images);
                tracing::info!(count = uploaded.len(), "images uploaded");
                MutationOutcome::confirmed(Some(uploaded), message)
            }
            Ok(envelope) => {
                tracing::warn!(message = %envelope.message, "upload rejected");
                MutationOutcome::rejected(envelope.message_or(UPLOAD_FAILED))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error uploading images");
                MutationOutcome::rejected(UPLOAD_FAILED)
            }
        }
    }

    pub async fn update(
        &self,
        id: &str,
        payload: &GalleryImageUpdate,
    ) -> MutationOutcome<GalleryImage> {
        let result = self.gateway.update_image(&self.session, id, payload).await;
        self.apply_image(id, result, "Failed to update image").await
    }

    pub async fn toggle_active(&self, id: &str, is_active: bool) -> MutationOutcome<GalleryImage> {
        let result = self
            .gateway
            .toggle_image_active(&self.session, id, is_active)
            .await;
        self.apply_image(id, result, "Failed to update image status")
            .await
    }

    async fn apply_image(
        &self,
        id: &str,
        result: ClientResult<Envelope<GalleryImage>>,
        fallback: &str,
    ) -> MutationOutcome<GalleryImage> {
        match result {
            Ok(envelope) if envelope.success => {
                if let Some(image) = envelope.data.clone() {
                    let mut images = self.images.write().await;
                    if images.replace(image) {
                        self.publish(&images);
                    }
                }
                MutationOutcome::confirmed(envelope.data, envelope.message)
            }
            Ok(envelope) => MutationOutcome::rejected(envelope.message_or(fallback)),
            Err(e) => {
                tracing::error!(id, error = %e, "Error updating image");
                MutationOutcome::rejected(fallback)
            }
        }
    }

    pub async fn delete(&self, id: &str) -> DeleteOutcome {
        let (success, message) = match self.gateway.delete_image(&self.session, id).await {
            Ok(envelope) if envelope.success => {
                let mut images = self.images.write().await;
                images.remove(id);
                self.publish(&images);
                (true, envelope.message_or("Image deleted successfully"))
            }
            Ok(envelope) => (false, envelope.message_or("Failed to delete image")),
            Err(e) => {
                tracing::error!(id, error = %e, "Error deleting image");
                (false, "Failed to delete image".to_string())
            }
        };
        DeleteOutcome {
            id: id.to_string(),
            success,
            message,
        }
    }

    /// Server-side bulk delete: one request, all or nothing locally
    pub async fn bulk_delete(&self, ids: &[String]) -> MutationOutcome<Vec<String>> {
        if ids.is_empty() {
            return MutationOutcome::confirmed(Some(Vec::new()), "No images selected");
        }
        match self.gateway.delete_images(&self.session, ids).await {
            Ok(envelope) if envelope.success => {
                let mut images = self.images.write().await;
                let gone: HashSet<&str> = ids.iter().map(String::as_str).collect();
                images.remove_many(&gone);
                self.publish(&images);
                tracing::info!(count = ids.len(), "images deleted");
                let message =
                    envelope.message_or(&format!("{} image(s) deleted successfully", ids.len()));
                MutationOutcome::confirmed(Some(ids.to_vec()), message)
            }
            Ok(envelope) => {
                MutationOutcome::rejected(envelope.message_or("Failed to delete images"))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error deleting images");
                MutationOutcome::rejected("Failed to delete images")
            }
        }
    }
}
