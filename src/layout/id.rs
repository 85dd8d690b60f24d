// ABOUTME: Pane identity: the PaneId newtype and the monotonic IdGenerator owned by a tab
// Ids are never handed out twice by one generator, including across undo/redo

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::node::{Node, PaneLeaf};

/// Stable identifier of a pane. `0` is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(u64);

impl PaneId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Monotonic pane id source.
///
/// `next` takes `&self` and increments atomically, so one generator may be
/// shared between threads creating panes concurrently.
#[derive(Debug)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// A generator whose first id is strictly greater than every id in `tree`.
    pub fn after<P: PaneLeaf>(tree: &Node<P>) -> Self {
        let ids = Self::new();
        ids.observe(tree);
        ids
    }

    pub fn next(&self) -> PaneId {
        PaneId(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Advance past every id present in `tree`.
    ///
    /// Required after adopting a tree whose ids came from elsewhere (a
    /// restored snapshot), otherwise later panes could collide with them.
    pub fn observe<P: PaneLeaf>(&self, tree: &Node<P>) {
        if let Some(max) = tree.pane_ids().into_iter().map(PaneId::get).max() {
            self.last.fetch_max(max, Ordering::SeqCst);
        }
    }

    pub fn last_issued(&self) -> Option<PaneId> {
        match self.last.load(Ordering::SeqCst) {
            0 => None,
            raw => Some(PaneId(raw)),
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::node::{LayoutNode, Pane, Split, SplitDirection};

    #[test]
    fn test_ids_are_monotonic_and_non_zero() {
        let ids = IdGenerator::new();
        assert_eq!(ids.last_issued(), None);
        let a = ids.next();
        let b = ids.next();
        assert_eq!(a.get(), 1);
        assert!(b > a);
        assert_eq!(ids.last_issued(), Some(b));
    }

    #[test]
    fn test_observe_skips_existing_ids() {
        let tree = LayoutNode::Split(Split::new(
            SplitDirection::Row,
            0.5,
            LayoutNode::Pane(Pane::empty(PaneId::from_raw(7))),
            LayoutNode::Pane(Pane::empty(PaneId::from_raw(3))),
        ));
        let ids = IdGenerator::new();
        ids.next();
        ids.observe(&tree);
        assert_eq!(ids.next().get(), 8);

        // Observing an older tree never moves the counter backwards.
        ids.observe(&LayoutNode::Pane(Pane::empty(PaneId::from_raw(2))));
        assert_eq!(ids.next().get(), 9);
    }

    #[test]
    fn test_shared_generator_across_threads() {
        let ids = std::sync::Arc::new(IdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..100).map(|_| ids.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<PaneId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 400);
    }
}
