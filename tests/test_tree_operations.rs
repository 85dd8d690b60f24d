// ABOUTME: Integration tests for structural tree operations and the invariants they must preserve
// Includes a long pseudo-random sequence of split, close, resize, balance, preset and restore steps

use pretty_assertions::assert_eq;
use std::collections::HashSet;

use panedeck::layout::{
    apply_preset, balance, bind_session, close, ops, restore, save_template, set_ratio, split,
    ChildSlot, IdGenerator, LayoutNode, Node, PaneId, Preset, SaveMode, SplitDirection, MAX_RATIO,
    MIN_RATIO,
};
use panedeck::models::{SessionHandle, SessionId};

fn assert_invariants(tree: &LayoutNode) {
    let ids = tree.pane_ids();
    let unique: HashSet<PaneId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len(), "pane ids must be unique");
    let sessions = tree.bound_sessions();
    let unique_sessions: HashSet<&SessionId> = sessions.iter().collect();
    assert_eq!(unique_sessions.len(), sessions.len(), "a session is bound into one pane at most");
    assert!(tree.validate().is_ok());
    assert_ratios_in_range(tree);
    assert_eq!(tree.pane_count(), tree.split_count() + 1);
}

fn assert_ratios_in_range(node: &LayoutNode) {
    if let Node::Split(split) = node {
        assert!(split.ratio() >= MIN_RATIO && split.ratio() <= MAX_RATIO, "ratio {}", split.ratio());
        assert_ratios_in_range(split.first());
        assert_ratios_in_range(split.second());
    }
}

/// Small deterministic generator so the sequence test is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        ((self.0 >> 33) as usize) % bound
    }
}

#[test]
fn test_split_then_close_new_pane_restores_tree() {
    let ids = IdGenerator::new();
    let root = ids.next();
    let tree = split(&LayoutNode::pane(root), root, SplitDirection::Row, &ids).layout;
    let second = tree.pane_ids()[1];

    let outcome = split(&tree, second, SplitDirection::Column, &ids);
    let new_pane = outcome.new_pane.unwrap();
    let back = close(&outcome.layout, new_pane).unwrap();

    assert_eq!(back, tree);
}

#[test]
fn test_split_unknown_pane_is_noop() {
    let ids = IdGenerator::new();
    let tree = LayoutNode::pane(ids.next());
    let outcome = split(&tree, PaneId::from_raw(99), SplitDirection::Row, &ids);
    assert_eq!(outcome.new_pane, None);
    assert_eq!(outcome.layout, tree);
}

#[test]
fn test_close_only_pane_closes_tab() {
    let tree = LayoutNode::pane(PaneId::from_raw(1));
    assert_eq!(close(&tree, PaneId::from_raw(1)), None);
}

#[test]
fn test_close_promotes_sibling_subtree() {
    let ids = IdGenerator::new();
    let a = ids.next();
    let tree = split(&LayoutNode::pane(a), a, SplitDirection::Row, &ids).layout;
    let b = tree.pane_ids()[1];
    let tree = split(&tree, b, SplitDirection::Column, &ids).layout;

    let closed = close(&tree, a).unwrap();
    let Node::Split(split) = &closed else {
        panic!("expected the column split to become root");
    };
    assert_eq!(split.direction, SplitDirection::Column);
    assert_eq!(closed.pane_count(), 2);
}

#[test]
fn test_ratio_is_clamped() {
    let ids = IdGenerator::new();
    let a = ids.next();
    let tree = split(&LayoutNode::pane(a), a, SplitDirection::Row, &ids).layout;

    let low = set_ratio(&tree, a, -5.0);
    assert_eq!(low.as_split().unwrap().ratio(), MIN_RATIO);

    let high = set_ratio(&tree, a, 5.0);
    assert_eq!(high.as_split().unwrap().ratio(), MAX_RATIO);

    let exact = set_ratio(&tree, a, 0.3);
    assert_eq!(exact.as_split().unwrap().ratio(), 0.3);
}

#[test]
fn test_set_ratio_only_matches_direct_children() {
    let ids = IdGenerator::new();
    let a = ids.next();
    let tree = split(&LayoutNode::pane(a), a, SplitDirection::Row, &ids).layout;
    let b = tree.pane_ids()[1];
    let tree = split(&tree, b, SplitDirection::Column, &ids).layout;

    let updated = set_ratio(&tree, b, 0.8);
    let root = updated.as_split().unwrap();
    assert_eq!(root.ratio(), 0.5);
    assert_eq!(root.second().as_split().unwrap().ratio(), 0.8);

    let by_path = ops::set_ratio_at(&tree, &[], 0.25);
    assert_eq!(by_path.as_split().unwrap().ratio(), 0.25);

    let deeper = ops::set_ratio_at(&tree, &[ChildSlot::Second], 0.7);
    assert_eq!(deeper.as_split().unwrap().second().as_split().unwrap().ratio(), 0.7);
}

#[test]
fn test_balance_is_idempotent() {
    let ids = IdGenerator::new();
    let a = ids.next();
    let tree = split(&LayoutNode::pane(a), a, SplitDirection::Row, &ids).layout;
    let tree = set_ratio(&tree, a, 0.8);
    let b = tree.pane_ids()[1];
    let tree = split(&tree, b, SplitDirection::Column, &ids).layout;
    let tree = set_ratio(&tree, b, 0.2);

    let once = balance(&tree);
    let twice = balance(&once);
    assert_eq!(once, twice);
    assert_eq!(once.as_split().unwrap().ratio(), 0.5);
    assert_eq!(once.pane_ids(), tree.pane_ids());
}

#[test]
fn test_clone_with_fresh_ids_keeps_shape_and_bindings() {
    let ids = IdGenerator::new();
    let a = ids.next();
    let tree = split(&LayoutNode::bound_pane(a, "s1"), a, SplitDirection::Row, &ids).layout;

    let fresh = ops::clone_with_fresh_ids(&tree, &ids);
    assert_eq!(fresh.pane_count(), 2);
    assert!(fresh.pane_ids().iter().all(|id| !tree.contains(*id)));
    assert_eq!(fresh.bound_sessions(), tree.bound_sessions());
}

#[test]
fn test_random_operation_sequence_keeps_invariants() {
    let ids = IdGenerator::new();
    let mut tree = LayoutNode::pane(ids.next());
    let mut rng = Lcg(0x5eed);
    let mut issued: HashSet<PaneId> = tree.pane_ids().into_iter().collect();
    let pool: Vec<SessionHandle> = (0..6)
        .map(|i| {
            let handle = SessionHandle::new(format!("s{}", i), format!("/p{}", i % 3), "p");
            if i % 2 == 0 { handle.with_tool("claude") } else { handle }
        })
        .collect();

    for _ in 0..800 {
        let panes = tree.pane_ids();
        let target = panes[rng.next(panes.len())];
        match rng.next(9) {
            0 | 1 => {
                let direction = if rng.next(2) == 0 { SplitDirection::Row } else { SplitDirection::Column };
                let outcome = split(&tree, target, direction, &ids);
                let new_pane = outcome.new_pane.unwrap();
                assert!(issued.insert(new_pane), "id {} issued twice", new_pane);
                assert_eq!(outcome.layout.pane_count(), tree.pane_count() + 1);
                tree = outcome.layout;
            }
            2 => {
                if let Some(next) = close(&tree, target) {
                    assert_eq!(next.pane_count(), tree.pane_count() - 1);
                    assert!(!next.contains(target));
                    tree = next;
                }
            }
            3 => {
                let ratio = rng.next(300) as f64 / 100.0 - 1.0;
                tree = set_ratio(&tree, target, ratio);
            }
            4 => {
                tree = balance(&tree);
                assert_eq!(balance(&tree), tree);
            }
            5 => {
                let preset = Preset::ALL[rng.next(Preset::ALL.len())];
                let before = tree.bound_sessions().len();
                let applied = apply_preset(&tree, preset, &ids);
                assert_eq!(applied.layout.pane_count(), preset.pane_count());
                assert_eq!(
                    applied.layout.bound_sessions().len() + applied.displaced.len(),
                    before
                );
                tree = applied.layout;
                for id in tree.pane_ids() {
                    assert!(issued.insert(id), "id {} issued twice", id);
                }
            }
            6 => {
                let saved = save_template(&tree, &pool);
                let restored = restore(&saved, &pool, &tree.bound_sessions(), SaveMode::Template, &ids);
                assert_eq!(restored.layout.pane_count(), tree.pane_count());
                tree = restored.layout;
                for id in tree.pane_ids() {
                    assert!(issued.insert(id), "id {} issued twice", id);
                }
            }
            _ => {
                let session = &pool[rng.next(pool.len())].id;
                tree = bind_session(&tree, target, session);
                assert_eq!(tree.pane_for_session(session), Some(target));
            }
        }
        assert_invariants(&tree);
    }
}
