//! Staged batch upload

use shared::models::GalleryImage;

use super::UploadStaging;
use crate::store::MutationOutcome;
use crate::{CatalogGateway, Session};

const UPLOAD_FAILED: &str = "Failed to upload images";

/// Upload every staged file in one multipart request
///
/// The staging area is left untouched; callers clear it once they have
/// consumed the outcome.
pub async fn upload_staged<G>(
    gateway: &G,
    session: &Session,
    staging: &UploadStaging,
) -> MutationOutcome<Vec<GalleryImage>>
where
    G: CatalogGateway + ?Sized,
{
    if staging.is_empty() {
        return MutationOutcome::rejected("Please select files to upload");
    }

    let upload = staging.to_upload();
    match gateway.upload_images(session, &upload).await {
        Ok(envelope) if envelope.success => {
            let uploaded = envelope.data.unwrap_or_default();
            tracing::info!(
                staged = staging.len(),
                uploaded = uploaded.len(),
                "staged images uploaded"
            );
            let message = format!("{} image(s) uploaded successfully!", uploaded.len());
            MutationOutcome::confirmed(Some(uploaded), message)
        }
        Ok(envelope) => {
            tracing::warn!(message = %envelope.message, "staged upload rejected");
            MutationOutcome::rejected(envelope.message_or(UPLOAD_FAILED))
        }
        Err(e) => {
            tracing::error!(error = %e, "Error uploading staged images");
            MutationOutcome::rejected(UPLOAD_FAILED)
        }
    }
}
