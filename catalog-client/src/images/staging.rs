//! Local files waiting to be uploaded

use shared::models::{ImageUpload, UploadFile};
use std::path::Path;
use thiserror::Error;

/// Per-file upload limit (10 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("file too large: {size} bytes (limit {MAX_UPLOAD_BYTES})")]
    TooLarge { size: u64 },

    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),
}

/// A file refused at staging time
#[derive(Debug)]
pub struct Rejected {
    pub file_name: String,
    pub reason: StagingError,
}

/// A staged file with its editable display name
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub file: UploadFile,
    pub display_name: String,
}

/// Default display name: the file name without its extension
fn default_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
        .to_string()
}

fn check_type(file_name: &str) -> Result<(), StagingError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(StagingError::UnsupportedType(file_name.to_string()))
    }
}

fn check_size(size: u64) -> Result<(), StagingError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(StagingError::TooLarge { size });
    }
    Ok(())
}

/// Upload staging area
#[derive(Debug, Clone, Default)]
pub struct UploadStaging {
    files: Vec<StagedFile>,
}

impl UploadStaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Stage in-memory bytes; returns the staged index
    pub fn stage(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<usize, StagingError> {
        check_type(file_name)?;
        check_size(bytes.len() as u64)?;

        let mime_type = mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        self.files.push(StagedFile {
            display_name: default_name(file_name),
            file: UploadFile {
                file_name: file_name.to_string(),
                mime_type,
                bytes,
            },
        });
        Ok(self.files.len() - 1)
    }

    /// Stage a file from disk; the size is checked before reading
    pub async fn stage_path(&mut self, path: &Path) -> Result<usize, StagingError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        check_type(&file_name)?;
        check_size(tokio::fs::metadata(path).await?.len())?;
        let bytes = tokio::fs::read(path).await?;
        self.stage(&file_name, bytes)
    }

    /// Stage several files; refused ones are returned with their reason
    pub fn stage_all(
        &mut self,
        files: impl IntoIterator<Item = (String, Vec<u8>)>,
    ) -> Vec<Rejected> {
        let mut rejected = Vec::new();
        for (file_name, bytes) in files {
            if let Err(reason) = self.stage(&file_name, bytes) {
                tracing::debug!(%file_name, %reason, "file not staged");
                rejected.push(Rejected { file_name, reason });
            }
        }
        rejected
    }

    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.files.get_mut(index) {
            Some(staged) => {
                staged.display_name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<StagedFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Multipart request for the whole batch; blank names are left to the server
    pub fn to_upload(&self) -> ImageUpload {
        let mut upload = ImageUpload::default();
        for (index, staged) in self.files.iter().enumerate() {
            upload.files.push(staged.file.clone());
            let name = staged.display_name.trim();
            if !name.is_empty() {
                upload.custom_names.insert(index, name.to_string());
            }
        }
        upload
    }
}
