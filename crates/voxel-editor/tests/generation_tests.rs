//! Tests for the generation bridge, markup cleaning and the fallback.

use std::cell::Cell;

use voxel_editor::generation::http::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use voxel_editor::generation::{
    GenerationConfig, ScreenMetadata, build_prompt, clean_markup, fallback_markup, generate,
};
use voxel_editor::{
    ApplyMode, CommitReason, Document, EditorConfig, EditorSession, GenerationBridge,
    GenerationError, GenerationProvider, GenerationRequest, GenerationResult, GenerationSource,
    HttpProvider, LiveTree, OfflineProvider, SharedDocument,
};

const PAGE: &str = "<html><head><title>Shop</title></head><body><h1>Welcome</h1><h2>Deals  of the day</h2></body></html>";

/// Provider that answers with canned text and counts calls.
struct StaticProvider {
    reply: Result<String, u16>,
    calls: Cell<u32>,
}

impl StaticProvider {
    fn ok(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: Cell::new(0),
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            calls: Cell::new(0),
        }
    }
}

impl GenerationProvider for StaticProvider {
    fn is_configured(&self) -> bool {
        true
    }

    fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.set(self.calls.get() + 1);
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(status) => Err(GenerationError::Status {
                status: *status,
                body: "upstream unavailable".to_string(),
            }),
        }
    }
}

fn session(sink: &SharedDocument) -> EditorSession {
    EditorSession::new(
        Document::load("<html><head></head><body><p>x</p></body></html>"),
        EditorConfig::default(),
        Box::new(sink.clone()),
    )
}

#[test]
fn test_fallback_without_provider_produces_button() {
    let request = GenerationRequest::new("add a button", PAGE);
    let result = generate(&OfflineProvider, &request).unwrap();
    assert!(result.html.contains("<button"));
    assert_eq!(result.source, GenerationSource::Fallback);
    assert!(result.is_fallback());
    assert!(result.notice.is_some());
}

#[test]
fn test_provider_failure_falls_back_with_warning() {
    let provider = StaticProvider::failing(503);
    let result = generate(&provider, &GenerationRequest::new("add a footer", PAGE)).unwrap();
    assert_eq!(provider.calls.get(), 1);
    assert!(result.is_fallback());
    assert!(result.html.contains("<footer"));
    assert!(result.notice.unwrap().message.contains("503"));
}

#[test]
fn test_empty_provider_answer_falls_back() {
    let provider = StaticProvider::ok("```html\n```");
    let result = generate(&provider, &GenerationRequest::new("add a table", PAGE)).unwrap();
    assert!(result.is_fallback());
    assert!(result.html.contains("<table"));
}

#[test]
fn test_provider_markup_is_cleaned() {
    let provider = StaticProvider::ok("```html\n<section>Hi</section>\n```");
    let result = generate(&provider, &GenerationRequest::new("anything", PAGE)).unwrap();
    assert_eq!(result.source, GenerationSource::Provider);
    assert_eq!(result.html, "<section>Hi</section>");
    assert!(result.notice.is_none());
}

#[test]
fn test_blank_instruction_is_rejected() {
    let provider = StaticProvider::ok("<p>x</p>");
    let err = generate(&provider, &GenerationRequest::new("  ", PAGE)).unwrap_err();
    assert!(matches!(err, GenerationError::EmptyInstruction));
    assert_eq!(provider.calls.get(), 0);
}

#[test]
fn test_clean_markup_only_strips_fences() {
    assert_eq!(clean_markup("```\n<p>a</p>\n```"), "<p>a</p>");
    assert_eq!(clean_markup("  ```html\n<p>a</p>\n```  \n"), "<p>a</p>");
    assert_eq!(clean_markup("<p>```not a fence```</p>"), "<p>```not a fence```</p>");
    assert_eq!(clean_markup("  <p>a</p>\n"), "  <p>a</p>\n");
}

#[test]
fn test_clean_markup_single_line_fence() {
    assert_eq!(clean_markup("```html<div>x</div>```"), "<div>x</div>");
    assert_eq!(clean_markup("```<button>Go</button>```"), "<button>Go</button>");
    assert_eq!(clean_markup("```html <p>a</p>"), "<p>a</p>");
}

#[test]
fn test_clean_markup_trailing_fence_only() {
    assert_eq!(clean_markup("<div>x</div>\n```"), "<div>x</div>");
    assert_eq!(clean_markup("<div>x</div>```\n\n"), "<div>x</div>");
}

#[test]
fn test_single_line_fenced_answer_is_used() {
    let provider = StaticProvider::ok("```html<aside>Tip</aside>```");
    let result = generate(&provider, &GenerationRequest::new("add a tip", PAGE)).unwrap();
    assert_eq!(result.source, GenerationSource::Provider);
    assert_eq!(result.html, "<aside>Tip</aside>");
}

#[test]
fn test_fallback_keywords() {
    assert!(fallback_markup("Add a signup form").contains("<form"));
    assert!(fallback_markup("make a pricing card").contains("border-radius: 12px"));
    assert!(fallback_markup("top navigation").contains("<nav"));
    assert!(fallback_markup("a hero banner").contains("<h1"));
    assert!(fallback_markup("bullet list of perks").contains("<ul"));
    assert!(fallback_markup("insert an image").contains("<img"));
}

#[test]
fn test_fallback_default_echoes_escaped_instruction() {
    let html = fallback_markup("something <odd> & new");
    assert!(html.contains("<section"));
    assert!(html.contains("something &lt;odd&gt; &amp; new"));
}

#[test]
fn test_fallback_is_deterministic() {
    assert_eq!(fallback_markup("add a button"), fallback_markup("add a button"));
}

#[test]
fn test_metadata_and_prompt() {
    let live = LiveTree::render(&Document::load(PAGE), &EditorConfig::default());
    let metadata = ScreenMetadata::from_live_tree(&live, Some("Home"));
    assert_eq!(metadata.title.as_deref(), Some("Shop"));
    assert_eq!(metadata.headings, ["h1: Welcome", "h2: Deals of the day"]);

    let request = GenerationRequest::new("add a button", PAGE)
        .with_context("An online store")
        .with_metadata(metadata);
    let (system, user) = build_prompt(&request);
    assert!(system.contains("HTML"));
    assert!(user.contains("Instruction: add a button"));
    assert!(user.contains("Product context: An online store"));
    assert!(user.contains("Screen: Home"));
    assert!(user.ends_with(PAGE));
}

#[test]
fn test_superseded_ticket_is_ignored() {
    let mut bridge = GenerationBridge::new();
    let first = bridge.begin();
    let second = bridge.begin();
    let stale = generate(&OfflineProvider, &GenerationRequest::new("footer", PAGE)).unwrap();
    let fresh = generate(&OfflineProvider, &GenerationRequest::new("button", PAGE)).unwrap();

    assert!(bridge.complete(second, fresh));
    assert!(!bridge.complete(first, stale));
    assert!(bridge.preview().unwrap().html.contains("<button"));
}

#[test]
fn test_invalidate_drops_in_flight_and_preview() {
    let mut bridge = GenerationBridge::new();
    let ticket = bridge.begin();
    bridge.invalidate();
    let result = GenerationResult {
        html: "<p>late</p>".to_string(),
        source: GenerationSource::Provider,
        notice: None,
    };
    assert!(!bridge.complete(ticket, result));
    assert!(bridge.preview().is_none());
}

#[test]
fn test_apply_appends_marked_container() {
    let sink = SharedDocument::new();
    let mut session = session(&sink);
    let mut bridge = GenerationBridge::new();
    let preview = bridge
        .run(&OfflineProvider, &GenerationRequest::new("add a button", PAGE))
        .unwrap()
        .unwrap();
    assert!(preview.is_fallback());
    assert_eq!(sink.commit_count(), 0);

    assert!(bridge.apply(&mut session, ApplyMode::Append));
    let commit = sink.commits().pop().unwrap();
    assert_eq!(commit.reason, CommitReason::ApplyGeneration);
    assert!(commit.html.starts_with("<html><head></head><body><p>x</p><div data-voxel-inserted=\"generated\"><div"));
    assert!(commit.html.contains("<button"));
    assert!(bridge.preview().is_none());
}

#[test]
fn test_apply_replace_swaps_document() {
    let sink = SharedDocument::new();
    let mut session = session(&sink);
    let mut bridge = GenerationBridge::new();
    let provider = StaticProvider::ok("<!DOCTYPE html><html><head></head><body><main>new</main></body></html>");
    let _ = bridge
        .run(&provider, &GenerationRequest::new("redo it", PAGE))
        .unwrap();

    assert!(bridge.apply(&mut session, ApplyMode::Replace));
    assert_eq!(
        sink.current().unwrap(),
        "<!DOCTYPE html><html><head></head><body><main>new</main></body></html>"
    );
    assert_eq!(session.selected(), None);
}

#[test]
fn test_discard_leaves_document_untouched() {
    let sink = SharedDocument::new();
    let mut session = session(&sink);
    let mut bridge = GenerationBridge::new();
    let _ = bridge
        .run(&OfflineProvider, &GenerationRequest::new("add a card", PAGE))
        .unwrap();
    assert!(bridge.discard());
    assert!(!bridge.discard());
    assert!(!bridge.apply(&mut session, ApplyMode::Append));
    assert_eq!(sink.commit_count(), 0);
}

#[test]
fn test_generation_config_from_lookup() {
    let empty = GenerationConfig::from_lookup(|_| None);
    assert!(!empty.is_configured());
    assert_eq!(empty.model, DEFAULT_MODEL);

    let configured = GenerationConfig::from_lookup(|var| match var {
        "VOXEL_LLM_API_KEY" => Some("sk-test".to_string()),
        "VOXEL_LLM_MODEL" => Some("local-model".to_string()),
        "VOXEL_LLM_ENDPOINT" => Some("  ".to_string()),
        _ => None,
    });
    assert!(configured.is_configured());
    assert_eq!(configured.model, "local-model");
    assert_eq!(configured.endpoint, DEFAULT_ENDPOINT);
}

#[test]
fn test_unconfigured_http_provider_uses_fallback() {
    let provider = HttpProvider::new(GenerationConfig::default()).unwrap();
    assert!(!provider.is_configured());
    let result = generate(&provider, &GenerationRequest::new("add a button", PAGE)).unwrap();
    assert!(result.is_fallback());
}
