//! Image storage for the replace-image flow.

use voxel_common::net::{DataURL, media_type_for};

use crate::error::ImageError;

/// Default upload limit: 5 MiB.
pub const DEFAULT_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Where uploaded images go.
pub trait ImageStore {
    /// Store `bytes` and return a URL the document can reference.
    ///
    /// # Errors
    /// Returns [`ImageError`] if the upload is rejected.
    fn upload(&mut self, file_name: &str, bytes: &[u8]) -> Result<String, ImageError>;

    /// URLs of previous uploads, oldest first.
    fn list_user_images(&self) -> Vec<String>;
}

/// Inlines uploads as base64 `data:` URLs and remembers them as a gallery.
#[derive(Debug, Clone)]
pub struct DataUrlImageStore {
    max_bytes: usize,
    gallery: Vec<String>,
}

impl DataUrlImageStore {
    /// Store with the given size limit.
    #[must_use]
    pub const fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            gallery: Vec::new(),
        }
    }
}

impl Default for DataUrlImageStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BYTES)
    }
}

impl ImageStore for DataUrlImageStore {
    fn upload(&mut self, file_name: &str, bytes: &[u8]) -> Result<String, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(ImageError::TooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }
        let media_type = media_type_for(file_name);
        if !media_type.starts_with("image/") {
            return Err(ImageError::UnsupportedType(file_name.to_string()));
        }
        let url = DataURL::encode(media_type, bytes).raw_data;
        self.gallery.push(url.clone());
        tracing::info!(file_name, bytes = bytes.len(), "stored image");
        Ok(url)
    }

    fn list_user_images(&self) -> Vec<String> {
        self.gallery.clone()
    }
}
