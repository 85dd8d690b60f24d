// ABOUTME: Resolves a saved layout's bindings against the currently live sessions on restore
// Matching is by project path, then label, then tool; a session is never bound into two panes

use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::codec::SaveMode;
use super::id::{IdGenerator, PaneId};
use super::node::{LayoutNode, Pane, SavedLayout};
use crate::models::{Binding, SessionHandle, SessionId};

#[derive(Debug, Clone, PartialEq)]
pub struct Restored {
    pub layout: LayoutNode,
    /// Sessions bound before the restore that no pane references afterwards.
    pub displaced: Vec<SessionId>,
    /// Panes that had a binding but found no live session (shown as launchers).
    pub unmatched: Vec<PaneId>,
    /// `false` when the saved ids were replaced, so saved focus ids no longer apply.
    pub ids_preserved: bool,
}

/// Pick the live session for one binding.
///
/// Candidates are unassigned sessions on the binding's project path, in pool
/// order. An exact label match wins, then an exact tool match, then the
/// first candidate.
pub fn match_binding<'a>(
    binding: &Binding,
    pool: &'a [SessionHandle],
    assigned: &HashSet<SessionId>,
) -> Option<&'a SessionHandle> {
    let candidates: Vec<&SessionHandle> = pool
        .iter()
        .filter(|s| !assigned.contains(&s.id) && s.project_path == binding.project_path)
        .collect();

    let by_label = binding.custom_label.as_ref().and_then(|label| {
        candidates
            .iter()
            .find(|s| s.custom_label.as_ref() == Some(label))
    });
    let by_tool = || {
        binding
            .tool
            .as_ref()
            .and_then(|tool| candidates.iter().find(|s| s.tool.as_ref() == Some(tool)))
    };

    by_label.or_else(by_tool).or_else(|| candidates.first()).copied()
}

/// Turn `saved` into a live layout bound to sessions from `pool`.
///
/// In `Template` mode every pane gets a fresh id from `ids`. In `Snapshot`
/// mode saved ids are kept and `ids` is advanced past them; a snapshot with
/// duplicate ids falls back to fresh ids. `previously_bound` lists the
/// sessions the tab displayed before, for the displaced report.
pub fn restore(
    saved: &SavedLayout,
    pool: &[SessionHandle],
    previously_bound: &[SessionId],
    mode: SaveMode,
    ids: &IdGenerator,
) -> Restored {
    let keep_ids = match mode {
        SaveMode::Template => false,
        SaveMode::Snapshot => match saved.validate() {
            Ok(()) => {
                ids.observe(saved);
                true
            }
            Err(e) => {
                warn!("snapshot has invalid pane ids ({}), assigning fresh ids", e);
                false
            }
        },
    };

    let mut assigned: HashSet<SessionId> = HashSet::new();
    let mut unmatched = Vec::new();
    let layout = saved.map(&mut |saved_pane| {
        let id = if keep_ids { saved_pane.id } else { ids.next() };
        let session = saved_pane.binding.as_ref().and_then(|binding| {
            let found = match_binding(binding, pool, &assigned);
            if found.is_none() {
                debug!("no live session for {} in pane {}", binding.label(), id);
                unmatched.push(id);
            }
            found.map(|s| s.id.clone())
        });
        if let Some(session) = &session {
            assigned.insert(session.clone());
        }
        Pane {
            id,
            bound_session_id: session,
        }
    });

    let displaced: Vec<SessionId> = previously_bound
        .iter()
        .filter(|s| !assigned.contains(*s))
        .cloned()
        .collect();

    info!(
        "restored layout with {} panes, {} bound, {} unmatched, {} displaced",
        layout.pane_count(),
        assigned.len(),
        unmatched.len(),
        displaced.len()
    );

    Restored {
        layout,
        displaced,
        unmatched,
        ids_preserved: keep_ids,
    }
}
