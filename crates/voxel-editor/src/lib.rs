//! Direct-manipulation editing core for imported HTML screens.
//!
//! An [`EditorSession`] turns an arbitrary, externally authored document
//! into a live tree the user can select, hover, edit and restructure, and
//! keeps a clean canonical [`Document`] in step with it:
//!
//! - [`live_tree`]: parsed document plus the injected editor style block
//! - [`selection`]: single-holder selection and hover markers
//! - [`mutation`]: delete, duplicate, image replace, style/attribute patch,
//!   fragment insertion, text edits
//! - [`debounce`]: keystrokes collapse into one commit per quiet window
//! - [`toolbar`]: the floating contextual action menu
//! - [`generation`]: instruction to markup, with a deterministic fallback
//! - [`store`] and [`images`]: interfaces to the persistence backend
//!
//! Persisted markup never contains selection or hover markers, the editor's
//! editable flag, or the `<style id="voxel-editor-styles">` block.

pub mod color;
pub mod commit;
pub mod config;
pub mod debounce;
pub mod document;
pub mod error;
pub mod generation;
pub mod images;
pub mod live_tree;
pub mod mutation;
pub mod properties;
pub mod scaffold;
pub mod selection;
pub mod session;
pub mod store;
pub mod toolbar;

pub use commit::{Commit, CommitReason, DocumentSink, SharedDocument};
pub use config::EditorConfig;
pub use debounce::{Clock, Debouncer, ManualClock, SystemClock};
pub use document::{Document, load_screen_source};
pub use error::{ConfigError, EditorError, GenerationError, ImageError, LoadError, StoreError};
pub use generation::{
    ApplyMode, GenerationBridge, GenerationProvider, GenerationRequest, GenerationResult,
    GenerationSource, HttpProvider, OfflineProvider,
};
pub use images::{DataUrlImageStore, ImageStore};
pub use live_tree::LiveTree;
pub use properties::{ElementProperties, StyleSnapshot};
pub use scaffold::strip_editor_styles;
pub use selection::SelectionTracker;
pub use session::{EditorEvent, EditorSession, EditorState, FragmentOrigin};
pub use store::{JsonFileStore, MemoryStore, ScreenStore, Version, VersionMeta};
pub use toolbar::{ToolbarAction, ToolbarState, Viewport};
