//! Soft notices surfaced to the user.
//!
//! A notice is never an error: the editor has already recovered (placeholder
//! document, fallback generation, ...) and only wants the user to know. Every
//! notice is also emitted as a `tracing` event. [`warn_once`] deduplicates
//! repeated warnings so a chatty component cannot flood the log.

use std::collections::HashSet;
use std::fmt;
use std::sync::Mutex;

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// How loudly a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational; the user may ignore it.
    Info,
    /// Something degraded but the session continues.
    Warning,
    /// An explicit failure the user should act on (e.g. a failed save).
    Error,
}

/// A message for the user, tagged with the component that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity of the notice.
    pub level: NoticeLevel,
    /// Short component name, e.g. `"Loader"` or `"Generation"`.
    pub component: String,
    /// Human-readable message.
    pub message: String,
}

impl Notice {
    /// Create a notice and emit it as a tracing event.
    #[must_use]
    pub fn new(level: NoticeLevel, component: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match level {
            NoticeLevel::Info => tracing::info!(component, "{message}"),
            NoticeLevel::Warning => tracing::warn!(component, "{message}"),
            NoticeLevel::Error => tracing::error!(component, "{message}"),
        }
        Self {
            level,
            component: component.to_string(),
            message,
        }
    }

    /// Shorthand for an informational notice.
    #[must_use]
    pub fn info(component: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, component, message)
    }

    /// Shorthand for a warning notice.
    #[must_use]
    pub fn warning(component: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, component, message)
    }

    /// Shorthand for an error notice.
    #[must_use]
    pub fn error(component: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, component, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.component, self.message)
    }
}

/// Warn about an unsupported or degraded situation (emitted once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("HTML Parser", "stray end tag </span> ignored");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
}

/// Clear all recorded warnings (call when opening a new screen)
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
