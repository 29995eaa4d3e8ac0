//! One open editor: document, live tree, interaction state and commits.
//!
//! The host feeds interaction events in through [`EditorSession::dispatch`]
//! (or calls the operations directly) and drives the debounce timer with
//! [`EditorSession::tick`]. Every mutation re-serializes the tree, replaces
//! the current [`Document`] wholesale and forwards a [`Commit`] to the
//! injected [`DocumentSink`].

use strum_macros::Display;
use voxel_common::notice::{Notice, clear_warnings};
use voxel_dom::NodeId;

use crate::commit::{Commit, CommitReason, DocumentSink};
use crate::config::EditorConfig;
use crate::debounce::{Clock, Debouncer, SystemClock};
use crate::document::{Document, load_screen_source};
use crate::error::EditorError;
use crate::generation::ApplyMode;
use crate::images::ImageStore;
use crate::live_tree::LiveTree;
use crate::mutation;
use crate::properties::{ElementProperties, is_text_bearing};
use crate::selection::SelectionTracker;
use crate::store::{ScreenStore, Version, VersionMeta};
use crate::toolbar::{ToolbarAction, ToolbarState, Viewport};

/// Coarse interaction state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum EditorState {
    /// Nothing selected.
    Idle,
    /// An element is selected.
    Selected,
    /// The selected element is being edited as text.
    EditingText,
}

/// Where an inserted fragment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum FragmentOrigin {
    /// Produced by the generation bridge. Always wrapped.
    Generated,
    /// Picked from the component library. Wrapped if configured.
    Library,
}

/// Interaction events delivered by the host, targets as live-tree node ids.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Primary click on an element.
    Click(NodeId),
    /// Click on empty canvas outside any element.
    BackgroundClick,
    /// Escape key.
    Escape,
    /// Pointer moved onto an element.
    PointerEnter(NodeId),
    /// Pointer left an element.
    PointerLeave(NodeId),
    /// Double-click or context interaction that opens the toolbar.
    SecondaryClick {
        /// Element under the pointer.
        target: NodeId,
        /// Pointer x relative to the viewport container.
        x: f32,
        /// Pointer y relative to the viewport container.
        y: f32,
        /// Size of the viewport container.
        viewport: Viewport,
    },
    /// The editable element's content after a keystroke.
    Input {
        /// Full inner markup of the element, as the host's editable
        /// region reports it.
        html: String,
    },
    /// The editable element lost focus.
    Blur,
    /// Click outside the toolbar.
    OutsideClick,
    /// A toolbar button was pressed.
    Toolbar(ToolbarAction),
}

/// An open editing session over one document.
pub struct EditorSession {
    config: EditorConfig,
    document: Document,
    live: LiveTree,
    selection: SelectionTracker,
    properties: Option<ElementProperties>,
    toolbar: ToolbarState,
    state: EditorState,
    editing: Option<NodeId>,
    image_target: Option<NodeId>,
    debouncer: Debouncer,
    clock: Box<dyn Clock>,
    sink: Box<dyn DocumentSink>,
    sequence: u64,
    notices: Vec<Notice>,
    closed: bool,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("screen_id", &self.document.screen_id)
            .field("state", &self.state)
            .field("selected", &self.selection.selected())
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Render `document` and start a session committing to `sink`.
    #[must_use]
    pub fn new(document: Document, config: EditorConfig, sink: Box<dyn DocumentSink>) -> Self {
        let live = LiveTree::render(&document, &config);
        let selection = SelectionTracker::new(
            &config.selection_attribute,
            &config.hover_attribute,
            &config.path_separator,
        );
        let debouncer = Debouncer::new(config.debounce());
        tracing::info!(screen = ?document.screen_id, "opened editor session");
        Self {
            config,
            document,
            live,
            selection,
            properties: None,
            toolbar: ToolbarState::default(),
            state: EditorState::Idle,
            editing: None,
            image_target: None,
            debouncer,
            clock: Box::new(SystemClock::new()),
            sink,
            sequence: 0,
            notices: Vec::new(),
            closed: false,
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current canonical document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The live tree.
    #[must_use]
    pub const fn live_tree(&self) -> &LiveTree {
        &self.live
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Interaction state.
    #[must_use]
    pub const fn state(&self) -> EditorState {
        self.state
    }

    /// Selected element.
    #[must_use]
    pub const fn selected(&self) -> Option<NodeId> {
        self.selection.selected()
    }

    /// Hovered element.
    #[must_use]
    pub const fn hovered(&self) -> Option<NodeId> {
        self.selection.hovered()
    }

    /// Structural path of the selection.
    #[must_use]
    pub fn selection_path(&self) -> &str {
        self.selection.path()
    }

    /// Property snapshot of the selection.
    #[must_use]
    pub const fn properties(&self) -> Option<&ElementProperties> {
        self.properties.as_ref()
    }

    /// Toolbar state.
    #[must_use]
    pub const fn toolbar(&self) -> &ToolbarState {
        &self.toolbar
    }

    /// Image whose replace flow is open, if any.
    #[must_use]
    pub const fn image_replace_target(&self) -> Option<NodeId> {
        self.image_target
    }

    /// Number of commits made so far.
    #[must_use]
    pub const fn commit_count(&self) -> u64 {
        self.sequence
    }

    /// Whether a debounced commit is waiting.
    #[must_use]
    pub const fn has_pending_commit(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Drain soft notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // =========================================================================
    // Event delegation
    // =========================================================================

    /// Route one interaction event.
    pub fn dispatch(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::Click(target) => {
                let tree = self.live.tree();
                if self
                    .editing
                    .is_some_and(|e| e == target || tree.is_descendant_of(target, e))
                {
                    return;
                }
                let _ = self.select(Some(target));
            }
            EditorEvent::BackgroundClick => {
                let _ = self.select(None);
            }
            EditorEvent::Escape => {
                self.blur();
                let _ = self.select(None);
            }
            EditorEvent::PointerEnter(target) => {
                let _ = self.hover(Some(target));
            }
            EditorEvent::PointerLeave(target) => {
                if self.selection.hovered() == Some(target) {
                    let _ = self.hover(None);
                }
            }
            EditorEvent::SecondaryClick {
                target,
                x,
                y,
                viewport,
            } => self.open_toolbar(target, x, y, viewport),
            EditorEvent::Input { html } => {
                let _ = self.input(&html);
            }
            EditorEvent::Blur => self.blur(),
            EditorEvent::OutsideClick => {
                self.toolbar.hide();
            }
            EditorEvent::Toolbar(action) => self.toolbar_action(action),
        }
    }

    fn open_toolbar(&mut self, target: NodeId, x: f32, y: f32, viewport: Viewport) {
        if self.select(Some(target)).is_none() {
            return;
        }
        let tag = self
            .live
            .tree()
            .as_element(target)
            .map(|e| e.tag_name.clone())
            .unwrap_or_default();
        self.toolbar.show(target, &tag, x, y, viewport, &self.config);
        if self.toolbar.is_image {
            self.image_target = Some(target);
        }
    }

    fn toolbar_action(&mut self, action: ToolbarAction) {
        let Some(target) = self.toolbar.target.filter(|_| self.toolbar.visible) else {
            return;
        };
        self.toolbar.hide();
        if self.selection.selected() != Some(target) {
            let _ = self.select(Some(target));
        }
        match action {
            ToolbarAction::EditText => {
                let _ = self.begin_text_edit();
            }
            ToolbarAction::ChangeImage => {
                if self.live.tree().is_element_named(target, "img") {
                    self.image_target = Some(target);
                }
            }
            ToolbarAction::Duplicate => {
                let _ = self.duplicate_selected();
            }
            ToolbarAction::Delete => {
                let _ = self.delete_selected();
            }
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select `target`, or nothing. A root container selects nothing.
    ///
    /// Leaving an element that is being text-edited commits it first. A new
    /// selection always hides the toolbar.
    pub fn select(&mut self, target: Option<NodeId>) -> Option<NodeId> {
        if self.editing.is_some() {
            if self.editing == target {
                return target;
            }
            self.blur();
        }
        let selected = self.selection.select(&mut self.live, target);
        self.state = if selected.is_some() {
            EditorState::Selected
        } else {
            EditorState::Idle
        };
        self.toolbar.hide();
        self.image_target = None;
        self.refresh_properties();
        selected
    }

    /// Move the hover marker.
    pub fn hover(&mut self, target: Option<NodeId>) -> Option<NodeId> {
        self.selection.hover(&mut self.live, target)
    }

    // =========================================================================
    // Text editing
    // =========================================================================

    /// Make the selected element editable. Only text-bearing elements can
    /// be edited.
    pub fn begin_text_edit(&mut self) -> bool {
        let Some(target) = self.selection.selected() else {
            return false;
        };
        if self.state == EditorState::EditingText {
            return self.editing == Some(target);
        }
        if !is_text_bearing(self.live.tree(), target) {
            return false;
        }
        self.live.set_editable(target);
        self.editing = Some(target);
        self.state = EditorState::EditingText;
        tracing::debug!(node = target.0, "began text edit");
        true
    }

    /// Apply a keystroke's result, the element's new inner markup, and
    /// restart the debounce window.
    pub fn input(&mut self, html: &str) -> bool {
        let Some(target) = self.editing else {
            return false;
        };
        let _ = mutation::set_inner_html(&mut self.live, target, html);
        self.debouncer.schedule(self.clock.now());
        true
    }

    /// Leave text editing and commit immediately.
    pub fn blur(&mut self) {
        if self.editing.take().is_none() {
            return;
        }
        let _ = self.debouncer.cancel();
        self.live.clear_editable();
        self.state = if self.selection.selected().is_some() {
            EditorState::Selected
        } else {
            EditorState::Idle
        };
        self.commit(CommitReason::Blur);
        self.refresh_properties();
    }

    /// Fire the debounced commit if its window has passed.
    pub fn tick(&mut self) -> bool {
        if self.debouncer.poll(self.clock.now()) {
            self.commit(CommitReason::Debounce);
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Structural mutations
    // =========================================================================

    /// Delete the selection. Refused while text editing.
    pub fn delete_selected(&mut self) -> bool {
        if self.state == EditorState::EditingText {
            return false;
        }
        let Some(target) = self.selection.selected() else {
            return false;
        };
        if !mutation::delete(&mut self.live, target) {
            return false;
        }
        self.selection.forget_detached(&self.live);
        let _ = self.select(None);
        self.commit(CommitReason::Delete);
        true
    }

    /// Duplicate the selection. The copy is not selected.
    pub fn duplicate_selected(&mut self) -> Option<NodeId> {
        let target = self.selection.selected()?;
        let strip = [
            self.config.selection_attribute.as_str(),
            self.config.hover_attribute.as_str(),
        ];
        let copy = mutation::duplicate(&mut self.live, target, &strip)?;
        self.toolbar.hide();
        self.commit(CommitReason::Duplicate);
        Some(copy)
    }

    /// Point the image being replaced (or the selected image) at `url`.
    /// Non-image targets are left alone and nothing is committed.
    pub fn replace_image(&mut self, url: &str) -> bool {
        let Some(target) = self.image_target.or(self.selection.selected()) else {
            return false;
        };
        if !mutation::replace_image_src(&mut self.live, target, url) {
            return false;
        }
        self.image_target = None;
        self.commit(CommitReason::ReplaceImage);
        self.refresh_properties();
        true
    }

    /// Upload `bytes` to `images` and use the result as the new source.
    ///
    /// Nothing is uploaded when the target is not an image.
    ///
    /// # Errors
    /// Returns [`EditorError::Image`] if the store rejects the upload.
    pub fn replace_image_from_upload(
        &mut self,
        images: &mut dyn ImageStore,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<bool, EditorError> {
        let target = self.image_target.or(self.selection.selected());
        if !target.is_some_and(|t| self.live.tree().is_element_named(t, "img")) {
            return Ok(false);
        }
        let url = images.upload(file_name, bytes).inspect_err(|e| {
            self.notices.push(Notice::error("Images", e.to_string()));
        })?;
        Ok(self.replace_image(&url))
    }

    /// Set one inline style property on the selection.
    pub fn set_style(&mut self, property: &str, value: &str) -> bool {
        let Some(target) = self.selection.selected() else {
            return false;
        };
        if !mutation::set_style_property(&mut self.live, target, property, value) {
            return false;
        }
        self.commit(CommitReason::Style);
        self.refresh_properties();
        true
    }

    /// Set one attribute on the selection. Editor marker names are refused.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> bool {
        let Some(target) = self.selection.selected() else {
            return false;
        };
        let reserved = [
            self.config.selection_attribute.as_str(),
            self.config.hover_attribute.as_str(),
        ];
        if !mutation::set_attribute(&mut self.live, target, name, value, &reserved) {
            return false;
        }
        self.commit(CommitReason::Attribute);
        self.refresh_properties();
        true
    }

    /// Append a fragment to the end of `<body>`.
    pub fn insert_fragment(&mut self, markup: &str, origin: FragmentOrigin) -> Option<NodeId> {
        let inserted = self.insert_fragment_inner(markup, origin)?;
        self.commit(CommitReason::InsertFragment);
        Some(inserted)
    }

    fn insert_fragment_inner(&mut self, markup: &str, origin: FragmentOrigin) -> Option<NodeId> {
        if markup.trim().is_empty() {
            return None;
        }
        let wrap = match origin {
            FragmentOrigin::Generated => true,
            FragmentOrigin::Library => self.config.wrap_library_fragments,
        };
        let origin_name = origin.to_string();
        let wrapper = wrap.then_some((self.config.inserted_attribute.as_str(), origin_name.as_str()));
        mutation::insert_fragment(&mut self.live, markup, wrapper)
    }

    /// Apply generated markup, appended or replacing the document.
    pub fn apply_generation(&mut self, html: &str, mode: ApplyMode) -> bool {
        if html.trim().is_empty() {
            return false;
        }
        match mode {
            ApplyMode::Append => {
                self.blur();
                if self.insert_fragment_inner(html, FragmentOrigin::Generated).is_none() {
                    return false;
                }
            }
            ApplyMode::Replace => {
                self.blur();
                let screen_id = self.document.screen_id.clone();
                self.rerender(Document {
                    raw: html.to_string(),
                    screen_id,
                });
            }
        }
        self.commit(CommitReason::ApplyGeneration);
        true
    }

    // =========================================================================
    // Documents and persistence
    // =========================================================================

    /// Switch to a different document. Pending edits of the old one are
    /// flushed first and in-flight state is discarded.
    pub fn open_screen(&mut self, document: Document) {
        self.flush(CommitReason::Teardown);
        clear_warnings();
        tracing::info!(screen = ?document.screen_id, "opening screen");
        self.rerender(document);
    }

    /// Open markup from a file or URL, with a placeholder on failure.
    pub fn open_source(&mut self, source: &str, display_name: &str) {
        let (document, notice) = load_screen_source(source, display_name);
        self.open_screen(document);
        self.notices.extend(notice);
    }

    /// Open the latest version of a stored screen.
    ///
    /// # Errors
    /// Returns [`EditorError::Persistence`] if the screen cannot be loaded.
    pub fn open_from_store(&mut self, store: &dyn ScreenStore, id: &str) -> Result<(), EditorError> {
        let screen = store.load_screen(id)?;
        self.open_screen(Document::load(screen.html).with_screen_id(screen.id));
        Ok(())
    }

    /// Save the current document as a new version of its screen.
    ///
    /// A pending debounced edit is committed first. On failure the in-memory
    /// document is untouched and an error notice is raised.
    ///
    /// # Errors
    /// Returns [`EditorError::NoScreen`] for a document without a screen, or
    /// [`EditorError::Persistence`] if the store fails.
    pub fn save_version(
        &mut self,
        store: &mut dyn ScreenStore,
        meta: VersionMeta,
    ) -> Result<Version, EditorError> {
        let Some(screen_id) = self.document.screen_id.clone() else {
            return Err(EditorError::NoScreen);
        };
        if self.debouncer.cancel() {
            self.commit(CommitReason::Debounce);
        }
        match store.save_version(&screen_id, &self.document.raw, meta) {
            Ok(version) => {
                self.notices
                    .push(Notice::info("Persistence", format!("saved version {}", version.number)));
                Ok(version)
            }
            Err(e) => {
                self.notices
                    .push(Notice::error("Persistence", format!("could not save: {e}")));
                Err(EditorError::Persistence(e))
            }
        }
    }

    /// End the session, committing any uncommitted edit.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.flush(CommitReason::Teardown);
        self.closed = true;
        tracing::info!(commits = self.sequence, "closed editor session");
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Commit an edit that is still in flight under `reason`.
    fn flush(&mut self, reason: CommitReason) {
        let pending = self.debouncer.cancel();
        let editing = self.editing.take().is_some();
        if editing {
            self.live.clear_editable();
        }
        if pending || editing {
            self.commit(reason);
        }
    }

    fn rerender(&mut self, document: Document) {
        let _ = self.debouncer.cancel();
        self.live = LiveTree::render(&document, &self.config);
        self.document = document;
        self.selection.reset();
        self.toolbar.hide();
        self.editing = None;
        self.image_target = None;
        self.properties = None;
        self.state = EditorState::Idle;
    }

    fn refresh_properties(&mut self) {
        self.properties = self
            .selection
            .selected()
            .and_then(|id| ElementProperties::of(&self.live, id));
    }

    fn commit(&mut self, reason: CommitReason) {
        let html = self.live.serialize();
        self.sequence += 1;
        self.document.raw.clone_from(&html);
        tracing::debug!(sequence = self.sequence, %reason, bytes = html.len(), "commit");
        self.sink.commit(Commit {
            sequence: self.sequence,
            reason,
            html,
        });
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.close();
    }
}
