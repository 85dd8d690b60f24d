// ABOUTME: Structural operations on layout trees: split, close, ratio updates, balance, re-keying
// Every operation takes a tree by reference and returns a new one sharing untouched subtrees

use std::sync::Arc;
use tracing::debug;

use super::id::{IdGenerator, PaneId};
use super::node::{
    ChildSlot, LayoutNode, Node, Pane, PaneLeaf, Split, SplitDirection, DEFAULT_RATIO,
};
use crate::models::SessionId;

/// Result of [`split`]. `new_pane` is `None` when the target was not in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome<P> {
    pub layout: Node<P>,
    pub new_pane: Option<PaneId>,
}

/// Replace pane `target` with a split holding the original pane first and a
/// new empty pane second.
pub fn split<P: PaneLeaf>(
    tree: &Node<P>,
    target: PaneId,
    direction: SplitDirection,
    ids: &IdGenerator,
) -> SplitOutcome<P> {
    if !tree.contains(target) {
        debug!("split ignored, pane {} not in layout", target);
        return SplitOutcome {
            layout: tree.clone(),
            new_pane: None,
        };
    }

    let new_id = ids.next();
    let layout = rewrite_pane(tree, target, &mut |pane| {
        Node::Split(Split::new(
            direction,
            DEFAULT_RATIO,
            Node::Pane(pane.clone()),
            Node::Pane(P::empty(new_id)),
        ))
    })
    .unwrap_or_else(|| tree.clone());

    debug!("split pane {} {:?}, new pane {}", target, direction, new_id);
    SplitOutcome {
        layout,
        new_pane: Some(new_id),
    }
}

/// Remove pane `target`, promoting its sibling into the parent's position.
///
/// Returns `None` when the last pane was closed and the owning tab should
/// close. An unknown id leaves the tree unchanged.
pub fn close<P: PaneLeaf>(tree: &Node<P>, target: PaneId) -> Option<Node<P>> {
    if let Node::Pane(pane) = tree {
        if pane.id() == target {
            debug!("closed last pane {}", target);
            return None;
        }
    }

    match remove_pane(tree, target) {
        Some(layout) => {
            debug!("closed pane {}", target);
            Some(layout)
        }
        None => {
            debug!("close ignored, pane {} not in layout", target);
            Some(tree.clone())
        }
    }
}

/// The pane that should take focus once `target` closes: the first pane of
/// the sibling subtree that [`close`] would promote.
pub fn promoted_sibling<P: PaneLeaf>(tree: &Node<P>, target: PaneId) -> Option<PaneId> {
    let Node::Split(split) = tree else {
        return None;
    };
    if is_pane(split.first(), target) {
        return Some(split.second().first_pane_id());
    }
    if is_pane(split.second(), target) {
        return Some(split.first().first_pane_id());
    }
    promoted_sibling(split.first(), target).or_else(|| promoted_sibling(split.second(), target))
}

/// Set the ratio of the split that has pane `pane` as a direct child.
///
/// Only immediate pane children are matched; a pane nested deeper inside
/// either child does not address this split. Use [`set_ratio_at`] to
/// address a split by position.
pub fn set_ratio<P: PaneLeaf>(tree: &Node<P>, pane: PaneId, ratio: f64) -> Node<P> {
    rewrite_parent_split(tree, pane, ratio).unwrap_or_else(|| {
        debug!("ratio update ignored, pane {} has no parent split", pane);
        tree.clone()
    })
}

/// Set the ratio of the split found by following `path` from the root.
pub fn set_ratio_at<P: PaneLeaf>(tree: &Node<P>, path: &[ChildSlot], ratio: f64) -> Node<P> {
    if !matches!(tree.node_at(path), Some(Node::Split(_))) {
        debug!("ratio update ignored, no split at {:?}", path);
        return tree.clone();
    }
    rewrite_at(tree, path, &mut |node| match node {
        Node::Split(split) => Node::Split(split.with_ratio(ratio)),
        Node::Pane(_) => node.clone(),
    })
    .unwrap_or_else(|| tree.clone())
}

/// Reset every split ratio to exactly 0.5.
pub fn balance<P: PaneLeaf>(tree: &Node<P>) -> Node<P> {
    balance_node(tree).unwrap_or_else(|| tree.clone())
}

/// Deep copy with every pane re-keyed from `ids`, in depth-first order.
/// Leaf payloads other than the id are preserved.
pub fn clone_with_fresh_ids<P: PaneLeaf>(tree: &Node<P>, ids: &IdGenerator) -> Node<P> {
    match tree {
        Node::Pane(pane) => Node::Pane(pane.with_id(ids.next())),
        Node::Split(split) => {
            let first = clone_with_fresh_ids(split.first(), ids);
            let second = clone_with_fresh_ids(split.second(), ids);
            Node::Split(Split::new(split.direction, split.ratio(), first, second))
        }
    }
}

/// Bind `session` into pane `pane`. The session is released from any other
/// pane first so it is never displayed twice. Unknown panes are a no-op.
pub fn bind_session(tree: &LayoutNode, pane: PaneId, session: &SessionId) -> LayoutNode {
    if !tree.contains(pane) {
        debug!("bind ignored, pane {} not in layout", pane);
        return tree.clone();
    }
    let released = release_session(tree, session);
    rewrite_pane(&released, pane, &mut |p| {
        Node::Pane(Pane::bound(p.id, session.clone()))
    })
    .unwrap_or(released)
}

/// Empty every pane bound to `session`.
pub fn release_session(tree: &LayoutNode, session: &SessionId) -> LayoutNode {
    map_panes(tree, &mut |p| {
        (p.bound_session_id.as_ref() == Some(session)).then(|| Pane::empty(p.id))
    })
    .unwrap_or_else(|| tree.clone())
}

/// Empty the given pane, returning the session it held.
pub fn unbind_pane(tree: &LayoutNode, pane: PaneId) -> (LayoutNode, Option<SessionId>) {
    let held = tree.find_pane(pane).and_then(|p| p.bound_session_id.clone());
    if held.is_none() {
        return (tree.clone(), None);
    }
    let layout = rewrite_pane(tree, pane, &mut |p| Node::Pane(Pane::empty(p.id)))
        .unwrap_or_else(|| tree.clone());
    (layout, held)
}

fn is_pane<P: PaneLeaf>(node: &Node<P>, id: PaneId) -> bool {
    matches!(node, Node::Pane(pane) if pane.id() == id)
}

fn rebuild<P>(split: &Split<P>, slot: ChildSlot, child: Node<P>) -> Node<P> {
    let (first, second) = match slot {
        ChildSlot::First => (Arc::new(child), split.shared_second().clone()),
        ChildSlot::Second => (split.shared_first().clone(), Arc::new(child)),
    };
    Node::Split(Split::from_shared(split.direction, split.ratio(), first, second))
}

/// Rewrite the pane with id `target`. `None` when it is not in the subtree.
fn rewrite_pane<P: PaneLeaf>(
    node: &Node<P>,
    target: PaneId,
    f: &mut dyn FnMut(&P) -> Node<P>,
) -> Option<Node<P>> {
    match node {
        Node::Pane(pane) if pane.id() == target => Some(f(pane)),
        Node::Pane(_) => None,
        Node::Split(split) => {
            if let Some(first) = rewrite_pane(split.first(), target, f) {
                return Some(rebuild(split, ChildSlot::First, first));
            }
            rewrite_pane(split.second(), target, f)
                .map(|second| rebuild(split, ChildSlot::Second, second))
        }
    }
}

fn rewrite_at<P>(
    node: &Node<P>,
    path: &[ChildSlot],
    f: &mut dyn FnMut(&Node<P>) -> Node<P>,
) -> Option<Node<P>> {
    let Some((slot, rest)) = path.split_first() else {
        return Some(f(node));
    };
    match node {
        Node::Pane(_) => None,
        Node::Split(split) => {
            rewrite_at(split.child(*slot), rest, f).map(|child| rebuild(split, *slot, child))
        }
    }
}

/// Apply `f` to every pane; `Some` replaces the pane. `None` when nothing changed.
fn map_panes<P: PaneLeaf>(node: &Node<P>, f: &mut dyn FnMut(&P) -> Option<P>) -> Option<Node<P>> {
    match node {
        Node::Pane(pane) => f(pane).map(Node::Pane),
        Node::Split(split) => {
            let first = map_panes(split.first(), f);
            let second = map_panes(split.second(), f);
            if first.is_none() && second.is_none() {
                return None;
            }
            Some(Node::Split(Split::from_shared(
                split.direction,
                split.ratio(),
                first.map_or_else(|| split.shared_first().clone(), Arc::new),
                second.map_or_else(|| split.shared_second().clone(), Arc::new),
            )))
        }
    }
}

fn remove_pane<P: PaneLeaf>(node: &Node<P>, target: PaneId) -> Option<Node<P>> {
    let Node::Split(split) = node else {
        return None;
    };
    if is_pane(split.first(), target) {
        return Some(split.second().clone());
    }
    if is_pane(split.second(), target) {
        return Some(split.first().clone());
    }
    if let Some(first) = remove_pane(split.first(), target) {
        return Some(rebuild(split, ChildSlot::First, first));
    }
    remove_pane(split.second(), target).map(|second| rebuild(split, ChildSlot::Second, second))
}

fn rewrite_parent_split<P: PaneLeaf>(node: &Node<P>, target: PaneId, ratio: f64) -> Option<Node<P>> {
    let Node::Split(split) = node else {
        return None;
    };
    if is_pane(split.first(), target) || is_pane(split.second(), target) {
        return Some(Node::Split(split.with_ratio(ratio)));
    }
    if let Some(first) = rewrite_parent_split(split.first(), target, ratio) {
        return Some(rebuild(split, ChildSlot::First, first));
    }
    rewrite_parent_split(split.second(), target, ratio)
        .map(|second| rebuild(split, ChildSlot::Second, second))
}

#[allow(clippy::float_cmp)]
fn balance_node<P>(node: &Node<P>) -> Option<Node<P>> {
    let Node::Split(split) = node else {
        return None;
    };
    let first = balance_node(split.first());
    let second = balance_node(split.second());
    if first.is_none() && second.is_none() && split.ratio() == DEFAULT_RATIO {
        return None;
    }
    Some(Node::Split(Split::from_shared(
        split.direction,
        DEFAULT_RATIO,
        first.map_or_else(|| split.shared_first().clone(), Arc::new),
        second.map_or_else(|| split.shared_second().clone(), Arc::new),
    )))
}
