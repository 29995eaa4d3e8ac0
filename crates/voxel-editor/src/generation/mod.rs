//! Natural-language generation of markup.
//!
//! The provider is an external collaborator behind [`GenerationProvider`].
//! When it is missing or fails, [`generate`] falls back to deterministic
//! canned markup so the user always gets something to preview.

pub mod bridge;
pub mod fallback;
pub mod http;

use serde::Serialize;
use strum_macros::Display;
use voxel_common::notice::Notice;

use crate::error::GenerationError;
use crate::live_tree::LiveTree;

pub use bridge::{ApplyMode, GenerationBridge, GenerationTicket};
pub use fallback::fallback_markup;
pub use http::{GenerationConfig, HttpProvider};

/// Structural facts about the source screen, sent as extra context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScreenMetadata {
    /// Display name of the screen.
    pub name: Option<String>,
    /// Content of `<title>`.
    pub title: Option<String>,
    /// Number of elements in the document.
    pub element_count: usize,
    /// Text of each heading, in document order, prefixed with its level.
    pub headings: Vec<String>,
}

impl ScreenMetadata {
    /// Collect metadata from a rendered tree.
    #[must_use]
    pub fn from_live_tree(live: &LiveTree, name: Option<&str>) -> Self {
        let tree = live.tree();
        let title = tree
            .find_element(tree.root(), "title")
            .map(|id| tree.text_content(id).trim().to_string())
            .filter(|t| !t.is_empty());
        let headings = tree
            .iter_all()
            .filter_map(|id| {
                let tag = &tree.as_element(id)?.tag_name;
                let level = tag.strip_prefix('h')?.parse::<u8>().ok()?;
                (1..=6).contains(&level).then(|| {
                    let text = tree.text_content(id);
                    format!("h{level}: {}", text.split_whitespace().collect::<Vec<_>>().join(" "))
                })
            })
            .collect();
        Self {
            name: name.map(str::to_string),
            title,
            element_count: live.element_count(),
            headings,
        }
    }
}

/// Everything a provider needs to produce new markup.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// What the user asked for. Must not be blank.
    pub instruction: String,
    /// The current clean document.
    pub current_html: String,
    /// Optional product context.
    pub context: Option<String>,
    /// Optional structure of the source screen.
    pub metadata: Option<ScreenMetadata>,
}

impl GenerationRequest {
    /// Request with just an instruction and the current document.
    #[must_use]
    pub fn new(instruction: impl Into<String>, current_html: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            current_html: current_html.into(),
            context: None,
            metadata: None,
        }
    }

    /// Attach product context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach screen metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: ScreenMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// An external text-generation service.
pub trait GenerationProvider {
    /// Whether credentials and an endpoint are available.
    fn is_configured(&self) -> bool;

    /// Produce raw markup for `request`.
    ///
    /// # Errors
    /// Any [`GenerationError`]; callers fall back rather than fail.
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// A provider that is never configured. Every request uses the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl GenerationProvider for OfflineProvider {
    fn is_configured(&self) -> bool {
        false
    }

    fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured)
    }
}

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum GenerationSource {
    /// The configured provider.
    Provider,
    /// The local canned-response generator.
    Fallback,
}

/// Markup ready for preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Cleaned markup.
    pub html: String,
    /// Where it came from.
    pub source: GenerationSource,
    /// Warning raised when the fallback was used.
    pub notice: Option<Notice>,
}

impl GenerationResult {
    /// Whether the canned-response generator produced this result.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == GenerationSource::Fallback
    }
}

/// Ask `provider` for markup, falling back to canned markup when it is not
/// configured, fails, or answers with nothing usable.
///
/// # Errors
/// Returns [`GenerationError::EmptyInstruction`] for a blank instruction.
/// Provider failures never surface as errors.
pub fn generate(
    provider: &dyn GenerationProvider,
    request: &GenerationRequest,
) -> Result<GenerationResult, GenerationError> {
    if request.instruction.trim().is_empty() {
        return Err(GenerationError::EmptyInstruction);
    }

    let failure = if provider.is_configured() {
        match provider.generate(request).map(|raw| clean_markup(&raw)) {
            Ok(html) if !html.trim().is_empty() => {
                tracing::info!(bytes = html.len(), "generation succeeded");
                return Ok(GenerationResult {
                    html,
                    source: GenerationSource::Provider,
                    notice: None,
                });
            }
            Ok(_) => GenerationError::MalformedResponse("empty markup".to_string()),
            Err(e) => e,
        }
    } else {
        GenerationError::NotConfigured
    };

    let notice = Notice::warning(
        "Generation",
        format!("{failure}; using a built-in template instead"),
    );
    Ok(GenerationResult {
        html: fallback_markup(&request.instruction),
        source: GenerationSource::Fallback,
        notice: Some(notice),
    })
}

/// Remove a leading and a trailing fenced code-block marker, each on its own.
///
/// The opening fence may carry a language tag (ASCII letters) and may share
/// a line with the markup. Text without fences is returned unchanged.
#[must_use]
pub fn clean_markup(raw: &str) -> String {
    let trimmed = raw.trim();
    let opened = trimmed
        .strip_prefix("```")
        .map(|rest| rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()));
    let body = opened.unwrap_or(trimmed).trim_end();
    let closed = body.strip_suffix("```");
    if opened.is_none() && closed.is_none() {
        return raw.to_string();
    }
    closed.unwrap_or(body).trim().to_string()
}

/// System and user prompts for `request`.
#[must_use]
pub fn build_prompt(request: &GenerationRequest) -> (String, String) {
    let system = "You edit HTML screens. Reply with HTML only: either a complete \
                  document or a fragment to append to the body. Do not explain."
        .to_string();

    let mut user = format!("Instruction: {}\n", request.instruction.trim());
    if let Some(context) = request.context.as_deref().filter(|c| !c.trim().is_empty()) {
        user.push_str(&format!("Product context: {}\n", context.trim()));
    }
    if let Some(metadata) = &request.metadata {
        if let Some(name) = &metadata.name {
            user.push_str(&format!("Screen: {name}\n"));
        }
        if let Some(title) = &metadata.title {
            user.push_str(&format!("Title: {title}\n"));
        }
        user.push_str(&format!("Elements: {}\n", metadata.element_count));
        if !metadata.headings.is_empty() {
            user.push_str(&format!("Outline: {}\n", metadata.headings.join("; ")));
        }
    }
    user.push_str("Current HTML:\n");
    user.push_str(&request.current_html);
    (system, user)
}
