// ABOUTME: Converts live layouts into saved layouts carrying bindings instead of session ids
// Templates get fresh pane ids; tab snapshots keep theirs so the active pane survives a round trip

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::id::IdGenerator;
use super::node::{LayoutNode, SavedLayout, SavedPane};
use crate::models::session::find_session;
use crate::models::{Binding, SessionHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// Reusable across tabs; pane ids are regenerated.
    Template,
    /// Restores one tab's exact state; pane ids are preserved.
    Snapshot,
}

/// Describe `tree` as a saved layout.
///
/// Each bound pane gets a binding built from its session's handle in
/// `pool`. Empty panes, and panes whose session is no longer in the pool,
/// are saved without a binding.
pub fn save_layout(tree: &LayoutNode, pool: &[SessionHandle], mode: SaveMode) -> SavedLayout {
    let ids = IdGenerator::new();
    tree.map(&mut |pane| {
        let binding = pane.bound_session_id.as_ref().and_then(|session| {
            let handle = find_session(pool, session);
            if handle.is_none() {
                debug!("session {} missing from directory, saving pane {} unbound", session, pane.id);
            }
            handle.map(Binding::from)
        });
        let id = match mode {
            SaveMode::Template => ids.next(),
            SaveMode::Snapshot => pane.id,
        };
        SavedPane { id, binding }
    })
}

pub fn save_template(tree: &LayoutNode, pool: &[SessionHandle]) -> SavedLayout {
    save_layout(tree, pool, SaveMode::Template)
}

pub fn save_snapshot(tree: &LayoutNode, pool: &[SessionHandle]) -> SavedLayout {
    save_layout(tree, pool, SaveMode::Snapshot)
}
