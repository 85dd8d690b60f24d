// ABOUTME: Integration tests for TabState: focus handling, zoom, undo/redo and snapshot restore

use pretty_assertions::assert_eq;

use panedeck::layout::{
    Cycle, Direction, LayoutError, LayoutNode, Node, PaneId, Preset, SavedLayout, SavedPane, Split,
    SplitDirection,
};
use panedeck::models::{SessionHandle, SessionId};
use panedeck::tab::{LayoutHistory, TabClose, TabSnapshot, TabState};

#[test]
fn test_new_tab_has_one_empty_pane() {
    let tab = TabState::new();
    assert_eq!(tab.layout().pane_count(), 1);
    assert_eq!(tab.active_pane(), tab.layout().first_pane_id());
    assert_eq!(tab.zoomed_pane(), None);
    assert!(!tab.history().can_undo());
}

#[test]
fn test_split_focuses_new_pane_and_navigation_returns() {
    let mut tab = TabState::new();
    let first = tab.active_pane();
    let second = tab.split_active(SplitDirection::Row).unwrap();

    assert_eq!(tab.active_pane(), second);
    assert!(tab.focus(Direction::Left));
    assert_eq!(tab.active_pane(), first);
    assert!(!tab.focus(Direction::Left));
    assert_eq!(tab.cycle(Cycle::Prev), second);
}

#[test]
fn test_close_active_moves_focus_to_sibling() {
    let mut tab = TabState::new();
    let first = tab.active_pane();
    tab.split_active(SplitDirection::Column);

    assert_eq!(tab.close_active(), TabClose::Remaining);
    assert_eq!(tab.active_pane(), first);
    assert_eq!(tab.close_active(), TabClose::Closed);
}

#[test]
fn test_undo_redo_restores_layout_and_focus() {
    let mut tab = TabState::new();
    let first = tab.active_pane();
    let before = tab.layout().clone();
    tab.split_active(SplitDirection::Row);
    let after = tab.layout().clone();

    assert!(tab.undo());
    assert_eq!(tab.layout(), &before);
    assert_eq!(tab.active_pane(), first);

    assert!(tab.redo());
    assert_eq!(tab.layout(), &after);
    assert!(!tab.redo());
}

#[test]
fn test_ids_not_reused_after_undo() {
    let mut tab = TabState::new();
    let second = tab.split_active(SplitDirection::Row).unwrap();
    tab.undo();
    let third = tab.split_active(SplitDirection::Row).unwrap();
    assert_ne!(second, third);
    assert!(third > second);
}

#[test]
fn test_new_change_clears_redo() {
    let mut tab = TabState::new();
    tab.split_active(SplitDirection::Row);
    tab.undo();
    tab.split_active(SplitDirection::Column);
    assert!(!tab.redo());
}

#[test]
fn test_history_depth_is_bounded() {
    let mut tab = TabState::with_history(LayoutHistory::new(3));
    for _ in 0..6 {
        tab.split_active(SplitDirection::Row);
    }
    let mut undone = 0;
    while tab.undo() {
        undone += 1;
    }
    assert_eq!(undone, 3);
}

#[test]
fn test_noop_operations_do_not_record_history() {
    let mut tab = TabState::new();
    tab.balance();
    tab.set_ratio(tab.active_pane(), 0.7);
    assert!(!tab.history().can_undo());
}

#[test]
fn test_zoom_toggles_and_clears_on_close() {
    let mut tab = TabState::new();
    assert_eq!(tab.toggle_zoom(), None, "a single pane cannot zoom");

    let second = tab.split_active(SplitDirection::Row).unwrap();
    assert_eq!(tab.toggle_zoom(), Some(second));
    assert_eq!(tab.toggle_zoom(), None);

    tab.toggle_zoom();
    tab.close_pane(second);
    assert_eq!(tab.zoomed_pane(), None);
}

#[test]
fn test_apply_preset_reports_displaced() {
    let mut tab = TabState::new();
    tab.bind_active(&SessionId::new("a"));
    let second = tab.split_active(SplitDirection::Row).unwrap();
    tab.bind_session(second, &SessionId::new("b"));

    let displaced = tab.apply_preset(Preset::Single);
    assert_eq!(displaced, vec![SessionId::new("b")]);
    assert_eq!(tab.layout().bound_sessions(), vec![SessionId::new("a")]);
}

#[test]
fn test_bind_moves_session_between_panes() {
    let mut tab = TabState::new();
    let first = tab.active_pane();
    tab.bind_active(&SessionId::new("a"));
    let second = tab.split_active(SplitDirection::Row).unwrap();
    tab.bind_session(second, &SessionId::new("a"));

    assert_eq!(tab.layout().pane_for_session(&SessionId::new("a")), Some(second));
    assert!(tab.layout().find_pane(first).unwrap().bound_session_id.is_none());
}

#[test]
fn test_release_session_survives_undo() {
    let mut tab = TabState::new();
    tab.bind_active(&SessionId::new("gone"));
    tab.split_active(SplitDirection::Row);
    tab.release_session(&SessionId::new("gone"));

    while tab.undo() {}
    assert!(tab.layout().bound_sessions().is_empty());
}

#[test]
fn test_snapshot_restores_focus_and_ids() {
    let pool = vec![
        SessionHandle::new("a", "/x", "x"),
        SessionHandle::new("b", "/y", "y"),
    ];
    let mut tab = TabState::new();
    tab.bind_active(&SessionId::new("a"));
    let second = tab.split_active(SplitDirection::Column).unwrap();
    tab.bind_session(second, &SessionId::new("b"));
    let snapshot = tab.snapshot(&pool);
    let json = serde_json::to_string(&snapshot).unwrap();

    let mut restored = TabState::new();
    let summary = restored.restore_snapshot(&serde_json::from_str(&json).unwrap(), &pool);

    assert!(summary.unmatched.is_empty());
    assert_eq!(restored.layout().pane_ids(), tab.layout().pane_ids());
    assert_eq!(restored.active_pane(), second);
    assert_eq!(
        restored.layout().bound_sessions(),
        vec![SessionId::new("a"), SessionId::new("b")]
    );
    let next = restored.split_active(SplitDirection::Row).unwrap();
    assert!(!tab.layout().contains(next));
}

#[test]
fn test_resize_active_clamps_and_records() {
    let mut tab = TabState::new();
    tab.split_active(SplitDirection::Row);
    tab.resize_active(2.0);
    assert_eq!(tab.layout().as_split().unwrap().ratio(), 0.9);
    assert!(tab.undo());
    assert_eq!(tab.layout().as_split().unwrap().ratio(), 0.5);
}

fn saved_pane(raw: u64) -> SavedLayout {
    Node::Pane(SavedPane {
        id: PaneId::from_raw(raw),
        binding: None,
    })
}

#[test]
fn test_snapshot_with_duplicate_ids_resets_focus_and_zoom() {
    let layout = Node::Split(Split::new(
        SplitDirection::Row,
        0.5,
        Node::Split(Split::new(SplitDirection::Column, 0.5, saved_pane(9), saved_pane(9))),
        saved_pane(3),
    ));
    let snapshot = TabSnapshot {
        layout,
        active_pane_id: PaneId::from_raw(4),
        zoomed_pane_id: Some(PaneId::from_raw(3)),
    };

    let mut tab = TabState::new();
    tab.restore_snapshot(&snapshot, &[]);

    assert_eq!(tab.layout().pane_count(), 3);
    assert!(tab.layout().validate().is_ok());
    assert_eq!(tab.active_pane(), tab.layout().first_pane_id());
    assert_eq!(tab.zoomed_pane(), None);
}

#[test]
fn test_single_pane_snapshot_is_never_zoomed() {
    let mut tab = TabState::new();
    tab.split_active(SplitDirection::Row);
    let snapshot = TabSnapshot {
        layout: saved_pane(1),
        active_pane_id: PaneId::from_raw(1),
        zoomed_pane_id: Some(PaneId::from_raw(1)),
    };

    tab.restore_snapshot(&snapshot, &[]);

    assert_eq!(tab.layout().pane_count(), 1);
    assert_eq!(tab.active_pane(), PaneId::from_raw(1));
    assert_eq!(tab.zoomed_pane(), None);
}

#[test]
fn test_from_layout_rejects_duplicate_ids() {
    let duplicate = LayoutNode::Split(Split::new(
        SplitDirection::Row,
        0.5,
        LayoutNode::pane(PaneId::from_raw(1)),
        LayoutNode::pane(PaneId::from_raw(1)),
    ));
    assert_eq!(
        TabState::from_layout(duplicate).err(),
        Some(LayoutError::DuplicatePaneId(PaneId::from_raw(1)))
    );

    let mut tab = TabState::from_layout(LayoutNode::pane(PaneId::from_raw(7))).unwrap();
    assert_eq!(tab.active_pane(), PaneId::from_raw(7));
    assert_eq!(tab.split_active(SplitDirection::Row), Some(PaneId::from_raw(8)));
}

#[test]
fn test_unbind_pane_returns_session_and_is_undoable() {
    let mut tab = TabState::new();
    let pane = tab.active_pane();
    tab.bind_active(&SessionId::new("a"));

    assert_eq!(tab.unbind_pane(pane), Some(SessionId::new("a")));
    assert!(tab.layout().bound_sessions().is_empty());
    assert_eq!(tab.unbind_pane(pane), None);

    assert!(tab.undo());
    assert_eq!(tab.layout().bound_sessions(), vec![SessionId::new("a")]);
}
