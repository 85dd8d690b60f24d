// ABOUTME: Bounded undo/redo stacks of layout frames for a tab
// Frames share subtrees with each other, so keeping many of them is cheap

use std::collections::VecDeque;

use crate::layout::{ops, LayoutNode, PaneId};
use crate::models::SessionId;

pub const DEFAULT_HISTORY_DEPTH: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryFrame {
    pub layout: LayoutNode,
    pub active_pane: PaneId,
    pub zoomed_pane: Option<PaneId>,
}

/// Undo stack capped at `max_depth` (oldest evicted first). Recording a new
/// frame clears the redo stack.
#[derive(Debug, Clone)]
pub struct LayoutHistory {
    undo: VecDeque<HistoryFrame>,
    redo: Vec<HistoryFrame>,
    max_depth: usize,
}

impl LayoutHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    pub fn record(&mut self, previous: HistoryFrame) {
        self.redo.clear();
        if self.max_depth == 0 {
            return;
        }
        self.undo.push_back(previous);
        while self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
    }

    /// Step back: returns the frame to restore and remembers `current` for redo.
    pub fn undo(&mut self, current: HistoryFrame) -> Option<HistoryFrame> {
        let frame = self.undo.pop_back()?;
        self.redo.push(current);
        Some(frame)
    }

    pub fn redo(&mut self, current: HistoryFrame) -> Option<HistoryFrame> {
        let frame = self.redo.pop()?;
        self.undo.push_back(current);
        Some(frame)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Empty `session` from every recorded frame.
    pub fn release_session(&mut self, session: &SessionId) {
        for frame in self.undo.iter_mut().chain(self.redo.iter_mut()) {
            frame.layout = ops::release_session(&frame.layout, session);
        }
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for LayoutHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}
