//! Image Association Workflow
//!
//! Binding gallery assets to a product being edited: the per-session
//! selection with its thumbnail, the picker dialog, and staging of local
//! files for a batch upload.

mod picker;
mod selection;
mod staging;
mod upload;

pub use picker::{ImagePicker, PickerMode};
pub use selection::{ImageSelection, SelectionPhase};
pub use staging::{
    ACCEPTED_EXTENSIONS, MAX_UPLOAD_BYTES, Rejected, StagedFile, StagingError, UploadStaging,
};
pub use upload::upload_staged;
