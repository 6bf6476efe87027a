//! Drag gesture state, reduced to what the move engine needs.
//!
//! Pointer and touch details stay with the input layer; this only remembers
//! which block is held and what it last hovered.

use super::moves::{DropRequest, DropTarget};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DragSession {
    active: Option<String>,
    over: Option<DropTarget>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up a block. Replaces any drag already in progress.
    pub fn start(&mut self, block_id: impl Into<String>) {
        self.active = Some(block_id.into());
        self.over = None;
    }

    /// Record the current hover candidate. Ignored when nothing is held.
    pub fn over(&mut self, target: DropTarget) {
        if self.active.is_some() {
            self.over = Some(target);
        }
    }

    /// Pointer left every droppable area.
    pub fn leave(&mut self) {
        self.over = None;
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn hovered(&self) -> Option<&DropTarget> {
        self.over.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Release the block. Yields a request only when both a source and a
    /// target are known; the session is reset either way.
    pub fn end(&mut self) -> Option<DropRequest> {
        let source = self.active.take()?;
        let target = self.over.take()?;
        Some(DropRequest { source, target })
    }

    pub fn cancel(&mut self) {
        self.active = None;
        self.over = None;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::date;
    use super::*;
    use crate::schedule::Slot;

    #[test]
    fn start_over_end_yields_request() {
        let mut drag = DragSession::new();
        drag.start("a");
        drag.over(DropTarget::Block("b".into()));
        let slot = Slot::new(date(2024, 1, 2), 14).unwrap();
        drag.over(DropTarget::Cell(slot));
        assert_eq!(drag.end(), Some(DropRequest::onto_cell("a", slot)));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn end_without_target_yields_nothing_and_resets() {
        let mut drag = DragSession::new();
        drag.start("a");
        drag.over(DropTarget::Block("b".into()));
        drag.leave();
        assert_eq!(drag.end(), None);
        assert_eq!(drag.active(), None);
    }

    #[test]
    fn hover_without_drag_is_ignored() {
        let mut drag = DragSession::new();
        drag.over(DropTarget::Block("b".into()));
        assert!(drag.hovered().is_none());
        assert_eq!(drag.end(), None);
    }

    #[test]
    fn cancel_clears_everything() {
        let mut drag = DragSession::new();
        drag.start("a");
        drag.over(DropTarget::Block("b".into()));
        drag.cancel();
        assert!(!drag.is_dragging());
        assert!(drag.hovered().is_none());
    }
}
