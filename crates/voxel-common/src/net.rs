//! HTTP fetch and `data:` URL utilities for the Voxel editor.
//!
//! Provides simple blocking HTTP GET wrappers used by the screen loader and
//! the inverse pair of `data:` URL helpers used by the image store.
use base64::Engine;
use std::time::Duration;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("voxel-editor/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while fetching or decoding a resource.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP client could not be built or the request failed in transit.
    #[error("request failed: {0}")]
    Request(String),
    /// The server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Status(String),
    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
    /// A `data:` URL was malformed.
    #[error("invalid data URL: {0}")]
    DataUrl(String),
}

/// A parsed `data:` URL that can be decoded into raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataURL {
    /// The full raw `data:` URL string (e.g. `data:image/png;base64,...`).
    pub raw_data: String,
}

impl DataURL {
    /// Create a new `DataURL` from a raw data URL string.
    #[must_use]
    pub const fn new(raw_data: String) -> Self {
        Self { raw_data }
    }

    /// Build a base64 `data:` URL for `bytes` of the given media type.
    #[must_use]
    pub fn encode(media_type: &str, bytes: &[u8]) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self {
            raw_data: format!("data:{media_type};base64,{payload}"),
        }
    }

    /// The media type portion (`image/png` in `data:image/png;base64,...`).
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        let rest = self.raw_data.strip_prefix("data:")?;
        let metadata = &rest[..rest.find(',')?];
        metadata.split(';').next().filter(|m| !m.is_empty())
    }

    /// Decode the data URL payload into raw bytes.
    ///
    /// Base64 payloads are decoded; anything else is returned as its raw
    /// UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if the URL has no payload separator or
    /// base64 decoding fails.
    pub fn decode(&self) -> Result<Vec<u8>, FetchError> {
        let data_url = self.raw_data.trim_start_matches("data:");
        let Some((metadata, data)) = data_url.split_once(',') else {
            return Err(FetchError::DataUrl("missing comma".to_string()));
        };

        if metadata.ends_with(";base64") {
            base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| FetchError::DataUrl(format!("base64 decode error: {e}")))
        } else {
            Ok(data.as_bytes().to_vec())
        }
    }
}

/// Guess a media type from a file name's extension.
#[must_use]
pub fn media_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "html" | "htm" => "text/html",
        _ => "application/octet-stream",
    }
}

/// Whether `source` should be fetched over the network rather than read from disk.
#[must_use]
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetch a URL and return its body as text.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created, the request fails,
/// the response has a non-success status, or the body cannot be decoded.
pub fn fetch_text(url: &str) -> Result<String, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(|e| FetchError::Request(format!("failed to create HTTP client: {e}")))?;

    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .map_err(|e| FetchError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().to_string()));
    }

    response.text().map_err(|e| FetchError::Body(e.to_string()))
}
