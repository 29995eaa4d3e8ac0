//! Commits of serialized documents to the surrounding application.

use std::cell::RefCell;
use std::rc::Rc;

use strum_macros::Display;

/// Why a commit happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum CommitReason {
    /// The editable element lost focus.
    Blur,
    /// Typing went quiet for the debounce window.
    Debounce,
    /// An element was removed.
    Delete,
    /// An element was cloned.
    Duplicate,
    /// An image source changed.
    ReplaceImage,
    /// One style property changed.
    Style,
    /// One attribute changed.
    Attribute,
    /// A generated or library fragment was inserted.
    InsertFragment,
    /// A generation result was applied.
    ApplyGeneration,
    /// The session was closed with an uncommitted edit.
    Teardown,
}

/// One wholesale replacement of the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Position in the session's commit order, starting at 1.
    pub sequence: u64,
    /// What triggered it.
    pub reason: CommitReason,
    /// The clean serialized document.
    pub html: String,
}

/// Receiver of commits, usually the host application's state container.
pub trait DocumentSink {
    /// Accept a commit. The latest commit always wins.
    fn commit(&mut self, commit: Commit);
}

#[derive(Debug, Default)]
struct SharedState {
    current: Option<String>,
    commits: Vec<Commit>,
}

/// A sink that keeps every commit, shareable between the session and its
/// owner. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct SharedDocument {
    state: Rc<RefCell<SharedState>>,
}

impl SharedDocument {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of the latest commit.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.state.borrow().current.clone()
    }

    /// Every commit so far, in order.
    #[must_use]
    pub fn commits(&self) -> Vec<Commit> {
        self.state.borrow().commits.clone()
    }

    /// Number of commits so far.
    #[must_use]
    pub fn commit_count(&self) -> usize {
        self.state.borrow().commits.len()
    }
}

impl DocumentSink for SharedDocument {
    fn commit(&mut self, commit: Commit) {
        let mut state = self.state.borrow_mut();
        state.current = Some(commit.html.clone());
        state.commits.push(commit);
    }
}
