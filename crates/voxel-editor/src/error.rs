//! Error types for the editor core.
//!
//! Only persistence, image upload and configuration failures ever reach the
//! caller. Everything that would interrupt visual editing (unreachable
//! sources, provider failures, mutations without a valid target) is
//! recovered locally and reported as a [`voxel_common::notice::Notice`].

use thiserror::Error;

/// Failures of a [`crate::store::ScreenStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// No screen with this id exists.
    #[error("screen not found: {0}")]
    NotFound(String),

    /// The backing file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be (de)serialized.
    #[error("corrupt screen record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the write.
    #[error("store rejected the write: {0}")]
    Rejected(String),
}

/// Failures talking to a generation provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The instruction was empty or whitespace.
    #[error("instruction must not be empty")]
    EmptyInstruction,

    /// No credentials or endpoint are configured.
    #[error("generation provider is not configured")]
    NotConfigured,

    /// Transport failure.
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("generation provider returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The provider answered but the payload held no usable markup.
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}

/// Failures of a [`crate::images::ImageStore`].
#[derive(Debug, Error)]
pub enum ImageError {
    /// The uploaded file had no content.
    #[error("image file is empty")]
    Empty,

    /// The file exceeds the store's size limit.
    #[error("image is {size} bytes; the limit is {limit}")]
    TooLarge {
        /// Size of the upload in bytes.
        size: usize,
        /// Maximum accepted size in bytes.
        limit: usize,
    },

    /// The file extension does not map to an image media type.
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
}

/// Failures reading a screen's source markup.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Local file could not be read.
    #[error("could not read {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Remote source could not be fetched.
    #[error("could not fetch {url}: {source}")]
    Fetch {
        /// URL that was fetched.
        url: String,
        /// Underlying error.
        source: voxel_common::net::FetchError,
    },
}

/// Failures loading an [`crate::config::EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for this schema.
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment override held a value of the wrong shape.
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Errors surfaced by [`crate::session::EditorSession`].
#[derive(Debug, Error)]
pub enum EditorError {
    /// Saving a version failed; the in-memory document is unchanged.
    #[error("save failed: {0}")]
    Persistence(#[from] StoreError),

    /// Uploading a replacement image failed.
    #[error("image upload failed: {0}")]
    Image(#[from] ImageError),

    /// The session is not bound to a stored screen.
    #[error("the open document is not associated with a screen")]
    NoScreen,
}
