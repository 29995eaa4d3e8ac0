//! Request tickets, preview and apply/discard for generated markup.
//!
//! Every request takes a ticket, and a newer ticket supersedes older ones.
//! A result that arrives for a superseded ticket is dropped, so a slow
//! response can never overwrite the outcome of a newer request or land in a
//! screen the user has since left.

use super::{GenerationProvider, GenerationRequest, GenerationResult, generate};
use crate::error::GenerationError;
use crate::session::EditorSession;

/// Identifies one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationTicket(u64);

/// How an applied result enters the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// Append the markup to `<body>` inside an editor-marked container.
    #[default]
    Append,
    /// Replace the whole document with the markup.
    Replace,
}

/// Orchestrates generation requests and holds the preview.
#[derive(Debug, Default)]
pub struct GenerationBridge {
    issued: u64,
    current: Option<u64>,
    preview: Option<GenerationResult>,
}

impl GenerationBridge {
    /// Bridge with no requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request. Any earlier in-flight request is superseded.
    pub const fn begin(&mut self) -> GenerationTicket {
        self.issued += 1;
        self.current = Some(self.issued);
        GenerationTicket(self.issued)
    }

    /// Whether `ticket` is the most recent live request.
    #[must_use]
    pub fn is_current(&self, ticket: GenerationTicket) -> bool {
        self.current == Some(ticket.0)
    }

    /// Deliver the outcome of `ticket`. Returns `false` and drops the result
    /// if the ticket was superseded or invalidated.
    pub fn complete(&mut self, ticket: GenerationTicket, result: GenerationResult) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "dropping superseded generation result");
            return false;
        }
        self.current = None;
        self.preview = Some(result);
        true
    }

    /// Supersede every in-flight request and clear the preview.
    pub fn invalidate(&mut self) {
        self.current = None;
        self.preview = None;
    }

    /// Run a request to completion against `provider`.
    ///
    /// # Errors
    /// Returns [`GenerationError::EmptyInstruction`] for a blank instruction.
    pub fn run(
        &mut self,
        provider: &dyn GenerationProvider,
        request: &GenerationRequest,
    ) -> Result<Option<&GenerationResult>, GenerationError> {
        let ticket = self.begin();
        let result = match generate(provider, request) {
            Ok(result) => result,
            Err(e) => {
                self.current = None;
                return Err(e);
            }
        };
        let _ = self.complete(ticket, result);
        Ok(self.preview.as_ref())
    }

    /// The result waiting for apply or discard.
    #[must_use]
    pub const fn preview(&self) -> Option<&GenerationResult> {
        self.preview.as_ref()
    }

    /// Commit the preview into `session`. Returns whether anything changed.
    pub fn apply(&mut self, session: &mut EditorSession, mode: ApplyMode) -> bool {
        let Some(result) = self.preview.take() else {
            return false;
        };
        session.apply_generation(&result.html, mode)
    }

    /// Drop the preview without touching the document.
    pub fn discard(&mut self) -> bool {
        self.preview.take().is_some()
    }
}
