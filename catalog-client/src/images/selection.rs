//! Selected product images and the thumbnail

use shared::models::GalleryImage;

use crate::draft::ProductDraft;

/// `NoSelection -> ImagesSelected -> ThumbnailAssigned`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    NoSelection,
    ImagesSelected,
    ThumbnailAssigned,
}

/// Images chosen for one product edit session
///
/// Order is selection order and becomes the gallery display order. The
/// thumbnail is always one of the selected images unless it was assigned
/// before the image was deselected by a picker replace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSelection {
    images: Vec<GalleryImage>,
    thumbnail: Option<GalleryImage>,
}

impl ImageSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn thumbnail(&self) -> Option<&GalleryImage> {
        self.thumbnail.as_ref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.images.iter().any(|img| img.id == id)
    }

    pub fn phase(&self) -> SelectionPhase {
        match (&self.thumbnail, self.images.is_empty()) {
            (Some(_), _) => SelectionPhase::ThumbnailAssigned,
            (None, false) => SelectionPhase::ImagesSelected,
            (None, true) => SelectionPhase::NoSelection,
        }
    }

    fn assign_default_thumbnail(&mut self) {
        if self.thumbnail.is_none() {
            self.thumbnail = self.images.first().cloned();
        }
    }

    /// Replace the selection (picker confirm)
    pub fn set_images(&mut self, images: Vec<GalleryImage>) {
        self.images = images;
        self.assign_default_thumbnail();
    }

    /// Append images not already selected
    pub fn add_images(&mut self, images: impl IntoIterator<Item = GalleryImage>) {
        for image in images {
            if !self.contains(&image.id) {
                self.images.push(image);
            }
        }
        self.assign_default_thumbnail();
    }

    /// Explicit thumbnail; it joins the selection if it is not there yet
    pub fn set_thumbnail(&mut self, image: GalleryImage) {
        if !self.contains(&image.id) {
            self.images.push(image.clone());
        }
        self.thumbnail = Some(image);
    }

    /// Deselect an image; removing the thumbnail promotes the new first image
    pub fn remove_image(&mut self, id: &str) -> bool {
        let before = self.images.len();
        self.images.retain(|img| img.id != id);
        if self.images.len() == before {
            return false;
        }
        if self.thumbnail.as_ref().is_some_and(|t| t.id == id) {
            self.thumbnail = self.images.first().cloned();
        }
        true
    }

    pub fn remove_thumbnail(&mut self) {
        self.thumbnail = None;
    }

    pub fn image_urls(&self) -> Vec<String> {
        self.images.iter().map(|img| img.url.clone()).collect()
    }

    pub fn gallery_ids(&self) -> Vec<String> {
        self.images.iter().map(|img| img.id.clone()).collect()
    }

    pub fn thumbnail_url(&self) -> Option<String> {
        self.thumbnail.as_ref().map(|img| img.url.clone())
    }

    /// Project onto the draft's `images`, `gallery` and `thumbnail`
    pub fn apply_to(&self, draft: &mut ProductDraft) {
        draft.images = self.image_urls();
        draft.gallery = self.gallery_ids();
        draft.thumbnail = self.thumbnail_url();
    }
}

#[cfg(test)]
pub(crate) fn image(id: &str) -> GalleryImage {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": id,
        "originalName": format!("{id}.png"),
        "url": format!("https://cdn.test/{id}.png"),
    }))
    .unwrap()
}
