//! Request log: undo stack plus chronological history.

use serde::{Deserialize, Serialize};

use crate::models::Request;

/// Accepted requests.
///
/// Two views are kept:
/// - the **undo stack** (LIFO) holds accepted non-undo requests; undo pops
///   from it, so an undo can never itself be undone;
/// - the **history** (oldest first) holds every accepted request, undo
///   requests included, and is what gets persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLog {
    undo_stack: Vec<Request>,
    history: Vec<Request>,
}

impl RequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an accepted request.
    ///
    /// Undo requests are appended to the history only.
    pub fn record(&mut self, request: Request) {
        if !request.is_undo() {
            self.undo_stack.push(request.clone());
        }
        self.history.push(request);
    }

    /// The most recent undoable request.
    pub fn peek(&self) -> Option<&Request> {
        self.undo_stack.last()
    }

    /// Removes and returns the most recent undoable request.
    pub fn pop(&mut self) -> Option<Request> {
        self.undo_stack.pop()
    }

    /// Puts a popped request back on top of the undo stack.
    pub(crate) fn restore(&mut self, request: Request) {
        self.undo_stack.push(request);
    }

    /// Number of undoable requests.
    pub fn depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Every accepted request, oldest first.
    pub fn history(&self) -> &[Request] {
        &self.history
    }
}
