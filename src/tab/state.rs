// ABOUTME: TabState applies layout operations to a tab and keeps active/zoomed panes valid
// Each structural change records the previous frame for undo

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::history::{HistoryFrame, LayoutHistory};
use crate::layout::{
    codec, navigator, ops, preset, resolver, ChildSlot, Cycle, Direction, IdGenerator,
    LayoutError, LayoutNode, PaneId, Preset, SaveMode, SavedLayout, SplitDirection,
};
use crate::models::{SessionHandle, SessionId};

/// Outcome of closing a pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabClose {
    /// The last pane closed; the owner should close the tab.
    Closed,
    Remaining,
}

/// Saved state of one tab: a snapshot layout plus its focus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub layout: SavedLayout,
    pub active_pane_id: PaneId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoomed_pane_id: Option<PaneId>,
}

/// What a restore changed, for the user-facing notice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub displaced: Vec<SessionId>,
    pub unmatched: Vec<PaneId>,
}

#[derive(Debug)]
pub struct TabState {
    layout: LayoutNode,
    active_pane: PaneId,
    zoomed_pane: Option<PaneId>,
    ids: IdGenerator,
    history: LayoutHistory,
}

impl TabState {
    /// A tab with one empty pane.
    pub fn new() -> Self {
        Self::with_history(LayoutHistory::default())
    }

    pub fn with_history(history: LayoutHistory) -> Self {
        let ids = IdGenerator::new();
        let layout = LayoutNode::pane(ids.next());
        Self {
            active_pane: layout.first_pane_id(),
            layout,
            zoomed_pane: None,
            ids,
            history,
        }
    }

    /// Adopt an existing tree; new ids continue after the largest id in it.
    pub fn from_layout(layout: LayoutNode) -> Result<Self, LayoutError> {
        layout.validate()?;
        Ok(Self {
            active_pane: layout.first_pane_id(),
            ids: IdGenerator::after(&layout),
            layout,
            zoomed_pane: None,
            history: LayoutHistory::default(),
        })
    }

    pub const fn layout(&self) -> &LayoutNode {
        &self.layout
    }

    pub const fn active_pane(&self) -> PaneId {
        self.active_pane
    }

    pub const fn zoomed_pane(&self) -> Option<PaneId> {
        self.zoomed_pane
    }

    pub const fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub const fn history(&self) -> &LayoutHistory {
        &self.history
    }

    pub fn split_active(&mut self, direction: SplitDirection) -> Option<PaneId> {
        self.split_pane(self.active_pane, direction)
    }

    /// Split `pane` and focus the new empty pane.
    pub fn split_pane(&mut self, pane: PaneId, direction: SplitDirection) -> Option<PaneId> {
        let outcome = ops::split(&self.layout, pane, direction, &self.ids);
        let new_pane = outcome.new_pane?;
        self.commit(outcome.layout);
        self.active_pane = new_pane;
        self.zoomed_pane = None;
        Some(new_pane)
    }

    pub fn close_active(&mut self) -> TabClose {
        self.close_pane(self.active_pane)
    }

    /// Close `pane`. Focus moves to the first pane of the promoted sibling
    /// when the closed pane was active.
    pub fn close_pane(&mut self, pane: PaneId) -> TabClose {
        let successor = ops::promoted_sibling(&self.layout, pane);
        match ops::close(&self.layout, pane) {
            None => {
                info!("closed last pane {}, tab closing", pane);
                self.history.clear();
                TabClose::Closed
            }
            Some(layout) => {
                self.commit(layout);
                if self.active_pane == pane {
                    if let Some(successor) = successor {
                        self.active_pane = successor;
                    }
                }
                if self.zoomed_pane == Some(pane) {
                    self.zoomed_pane = None;
                }
                TabClose::Remaining
            }
        }
    }

    /// Move focus to the neighbour in `direction`. `false` at the layout edge.
    pub fn focus(&mut self, direction: Direction) -> bool {
        match navigator::adjacent(&self.layout, self.active_pane, direction) {
            Some(next) => {
                self.active_pane = next;
                true
            }
            None => false,
        }
    }

    pub fn cycle(&mut self, cycle: Cycle) -> PaneId {
        if let Some(next) = navigator::cyclic(&self.layout, self.active_pane, cycle) {
            self.active_pane = next;
        }
        self.active_pane
    }

    pub fn focus_pane(&mut self, pane: PaneId) -> bool {
        if !self.layout.contains(pane) {
            return false;
        }
        self.active_pane = pane;
        true
    }

    /// Zoom the active pane, or unzoom if a pane is already zoomed.
    pub fn toggle_zoom(&mut self) -> Option<PaneId> {
        self.zoomed_pane = match self.zoomed_pane {
            Some(_) => None,
            None if self.layout.pane_count() > 1 => Some(self.active_pane),
            None => None,
        };
        self.zoomed_pane
    }

    /// Resize the split holding the active pane.
    pub fn resize_active(&mut self, ratio: f64) {
        self.set_ratio(self.active_pane, ratio);
    }

    pub fn set_ratio(&mut self, pane: PaneId, ratio: f64) {
        let layout = ops::set_ratio(&self.layout, pane, ratio);
        self.commit(layout);
    }

    pub fn set_ratio_at(&mut self, path: &[ChildSlot], ratio: f64) {
        let layout = ops::set_ratio_at(&self.layout, path, ratio);
        self.commit(layout);
    }

    pub fn balance(&mut self) {
        let layout = ops::balance(&self.layout);
        self.commit(layout);
    }

    /// Replace the layout with `preset`. Returns the displaced sessions.
    pub fn apply_preset(&mut self, preset: Preset) -> Vec<SessionId> {
        let applied = preset::apply_preset(&self.layout, preset, &self.ids);
        self.commit(applied.layout);
        self.active_pane = applied.active_pane;
        self.zoomed_pane = None;
        applied.displaced
    }

    pub fn bind_active(&mut self, session: &SessionId) {
        self.bind_session(self.active_pane, session);
    }

    pub fn bind_session(&mut self, pane: PaneId, session: &SessionId) {
        let layout = ops::bind_session(&self.layout, pane, session);
        self.commit(layout);
    }

    /// Empty `pane`, returning the session it displayed.
    pub fn unbind_pane(&mut self, pane: PaneId) -> Option<SessionId> {
        let (layout, held) = ops::unbind_pane(&self.layout, pane);
        self.commit(layout);
        held
    }

    /// Empty the panes showing `session`, e.g. after its process exited.
    /// The session is also dropped from history so undo cannot bring it back.
    pub fn release_session(&mut self, session: &SessionId) {
        self.layout = ops::release_session(&self.layout, session);
        self.history.release_session(session);
    }

    pub fn snapshot(&self, pool: &[SessionHandle]) -> TabSnapshot {
        TabSnapshot {
            layout: codec::save_layout(&self.layout, pool, SaveMode::Snapshot),
            active_pane_id: self.active_pane,
            zoomed_pane_id: self.zoomed_pane,
        }
    }

    /// Restore this tab's saved state, keeping pane ids and focus.
    pub fn restore_snapshot(&mut self, snapshot: &TabSnapshot, pool: &[SessionHandle]) -> RestoreSummary {
        let restored = resolver::restore(
            &snapshot.layout,
            pool,
            &self.layout.bound_sessions(),
            SaveMode::Snapshot,
            &self.ids,
        );
        self.commit(restored.layout);
        if restored.ids_preserved {
            self.active_pane = snapshot.active_pane_id;
            self.zoomed_pane = snapshot.zoomed_pane_id;
        } else {
            self.active_pane = self.layout.first_pane_id();
            self.zoomed_pane = None;
        }
        self.repair_focus();
        RestoreSummary {
            displaced: restored.displaced,
            unmatched: restored.unmatched,
        }
    }

    /// Instantiate a reusable template in this tab with fresh pane ids.
    pub fn apply_template(&mut self, template: &SavedLayout, pool: &[SessionHandle]) -> RestoreSummary {
        let restored = resolver::restore(
            template,
            pool,
            &self.layout.bound_sessions(),
            SaveMode::Template,
            &self.ids,
        );
        self.commit(restored.layout);
        self.active_pane = self.layout.first_pane_id();
        self.zoomed_pane = None;
        RestoreSummary {
            displaced: restored.displaced,
            unmatched: restored.unmatched,
        }
    }

    pub fn undo(&mut self) -> bool {
        let current = self.frame();
        match self.history.undo(current) {
            Some(frame) => {
                self.load_frame(frame);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.frame();
        match self.history.redo(current) {
            Some(frame) => {
                self.load_frame(frame);
                true
            }
            None => false,
        }
    }

    fn frame(&self) -> HistoryFrame {
        HistoryFrame {
            layout: self.layout.clone(),
            active_pane: self.active_pane,
            zoomed_pane: self.zoomed_pane,
        }
    }

    fn load_frame(&mut self, frame: HistoryFrame) {
        self.layout = frame.layout;
        self.active_pane = frame.active_pane;
        self.zoomed_pane = frame.zoomed_pane;
        self.repair_focus();
    }

    /// Install `layout` as current, recording the previous frame if it changed.
    fn commit(&mut self, layout: LayoutNode) {
        if layout == self.layout {
            return;
        }
        debug!(
            "layout changed: {} -> {} panes",
            self.layout.pane_count(),
            layout.pane_count()
        );
        let previous = self.frame();
        self.history.record(previous);
        self.layout = layout;
        self.repair_focus();
    }

    fn repair_focus(&mut self) {
        if !self.layout.contains(self.active_pane) {
            self.active_pane = self.layout.first_pane_id();
        }
        if let Some(zoomed) = self.zoomed_pane {
            if !self.layout.contains(zoomed) || self.layout.pane_count() < 2 {
                self.zoomed_pane = None;
            }
        }
    }
}

impl Default for TabState {
    fn default() -> Self {
        Self::new()
    }
}

