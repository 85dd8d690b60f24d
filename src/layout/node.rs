// ABOUTME: Layout tree data model: binary splits over pane leaves with structural sharing
// The same generic tree carries live panes (session ids) and saved panes (bindings)

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use super::error::LayoutError;
use super::id::PaneId;
use crate::models::{Binding, SessionId};

pub const MIN_RATIO: f64 = 0.1;
pub const MAX_RATIO: f64 = 0.9;
pub const DEFAULT_RATIO: f64 = 0.5;

/// Clamp a ratio into `[MIN_RATIO, MAX_RATIO]`. NaN becomes the default ratio.
pub fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        DEFAULT_RATIO
    } else {
        ratio.clamp(MIN_RATIO, MAX_RATIO)
    }
}

fn deserialize_ratio<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_ratio)
}

/// `Row` places children side by side (first on the left), `Column` stacks
/// them (first on top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    Row,
    Column,
}

/// Leaf payload of a layout tree.
pub trait PaneLeaf: Clone {
    fn id(&self) -> PaneId;

    /// Same payload under a different id.
    fn with_id(&self, id: PaneId) -> Self;

    /// A fresh leaf with nothing attached.
    fn empty(id: PaneId) -> Self;

    fn is_empty(&self) -> bool;
}

/// A live pane, optionally displaying one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pane {
    pub id: PaneId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound_session_id: Option<SessionId>,
}

impl Pane {
    pub const fn empty(id: PaneId) -> Self {
        Self {
            id,
            bound_session_id: None,
        }
    }

    pub fn bound(id: PaneId, session: SessionId) -> Self {
        Self {
            id,
            bound_session_id: Some(session),
        }
    }
}

impl PaneLeaf for Pane {
    fn id(&self) -> PaneId {
        self.id
    }

    fn with_id(&self, id: PaneId) -> Self {
        Self {
            id,
            bound_session_id: self.bound_session_id.clone(),
        }
    }

    fn empty(id: PaneId) -> Self {
        Self::empty(id)
    }

    fn is_empty(&self) -> bool {
        self.bound_session_id.is_none()
    }
}

/// A pane of a saved layout, carrying a binding instead of a live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPane {
    pub id: PaneId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<Binding>,
}

impl PaneLeaf for SavedPane {
    fn id(&self) -> PaneId {
        self.id
    }

    fn with_id(&self, id: PaneId) -> Self {
        Self {
            id,
            binding: self.binding.clone(),
        }
    }

    fn empty(id: PaneId) -> Self {
        Self { id, binding: None }
    }

    fn is_empty(&self) -> bool {
        self.binding.is_none()
    }
}

/// Internal node dividing its area between exactly two children.
///
/// `ratio` is the first child's share along the split axis and is clamped
/// on every write, including deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split<P> {
    pub direction: SplitDirection,
    #[serde(deserialize_with = "deserialize_ratio")]
    ratio: f64,
    children: [Arc<Node<P>>; 2],
}

impl<P> Split<P> {
    pub fn new(direction: SplitDirection, ratio: f64, first: Node<P>, second: Node<P>) -> Self {
        Self::from_shared(direction, ratio, Arc::new(first), Arc::new(second))
    }

    pub fn from_shared(
        direction: SplitDirection,
        ratio: f64,
        first: Arc<Node<P>>,
        second: Arc<Node<P>>,
    ) -> Self {
        Self {
            direction,
            ratio: clamp_ratio(ratio),
            children: [first, second],
        }
    }

    pub const fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn first(&self) -> &Node<P> {
        &self.children[0]
    }

    pub fn second(&self) -> &Node<P> {
        &self.children[1]
    }

    pub fn shared_first(&self) -> &Arc<Node<P>> {
        &self.children[0]
    }

    pub fn shared_second(&self) -> &Arc<Node<P>> {
        &self.children[1]
    }

    pub fn child(&self, slot: ChildSlot) -> &Node<P> {
        match slot {
            ChildSlot::First => self.first(),
            ChildSlot::Second => self.second(),
        }
    }

    /// Same children under a new (clamped) ratio. Children are shared.
    pub fn with_ratio(&self, ratio: f64) -> Self {
        Self::from_shared(
            self.direction,
            ratio,
            self.children[0].clone(),
            self.children[1].clone(),
        )
    }
}

/// Which child of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildSlot {
    First,
    Second,
}

/// A layout tree. Never empty: the minimal tree is a single pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node<P> {
    Pane(P),
    Split(Split<P>),
}

pub type LayoutNode = Node<Pane>;
pub type SavedLayout = Node<SavedPane>;

impl<P> Node<P> {
    pub const fn as_pane(&self) -> Option<&P> {
        match self {
            Self::Pane(pane) => Some(pane),
            Self::Split(_) => None,
        }
    }

    pub const fn as_split(&self) -> Option<&Split<P>> {
        match self {
            Self::Split(split) => Some(split),
            Self::Pane(_) => None,
        }
    }

    /// Longest root-to-leaf edge count.
    pub fn depth(&self) -> usize {
        match self {
            Self::Pane(_) => 0,
            Self::Split(split) => 1 + split.first().depth().max(split.second().depth()),
        }
    }

    pub fn split_count(&self) -> usize {
        match self {
            Self::Pane(_) => 0,
            Self::Split(split) => 1 + split.first().split_count() + split.second().split_count(),
        }
    }

    /// Leaves in depth-first order (first child before second).
    pub fn panes(&self) -> Vec<&P> {
        let mut out = Vec::new();
        self.collect_panes(&mut out);
        out
    }

    fn collect_panes<'a>(&'a self, out: &mut Vec<&'a P>) {
        match self {
            Self::Pane(pane) => out.push(pane),
            Self::Split(split) => {
                split.first().collect_panes(out);
                split.second().collect_panes(out);
            }
        }
    }

    pub fn pane_count(&self) -> usize {
        match self {
            Self::Pane(_) => 1,
            Self::Split(split) => split.first().pane_count() + split.second().pane_count(),
        }
    }

    /// Same shape with every leaf converted by `f`, called in depth-first order.
    pub fn map<Q>(&self, f: &mut dyn FnMut(&P) -> Q) -> Node<Q> {
        match self {
            Self::Pane(pane) => Node::Pane(f(pane)),
            Self::Split(split) => {
                let first = split.first().map(f);
                let second = split.second().map(f);
                Node::Split(Split::new(split.direction, split.ratio(), first, second))
            }
        }
    }

    /// Follow a structural path from this node.
    pub fn node_at(&self, path: &[ChildSlot]) -> Option<&Self> {
        let Some((slot, rest)) = path.split_first() else {
            return Some(self);
        };
        match self {
            Self::Pane(_) => None,
            Self::Split(split) => split.child(*slot).node_at(rest),
        }
    }
}

impl<P: PaneLeaf> Node<P> {
    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.panes().into_iter().map(PaneLeaf::id).collect()
    }

    pub fn find_pane(&self, id: PaneId) -> Option<&P> {
        match self {
            Self::Pane(pane) => (pane.id() == id).then_some(pane),
            Self::Split(split) => split
                .first()
                .find_pane(id)
                .or_else(|| split.second().find_pane(id)),
        }
    }

    pub fn contains(&self, id: PaneId) -> bool {
        self.find_pane(id).is_some()
    }

    /// First pane in depth-first order. Always exists.
    pub fn first_pane_id(&self) -> PaneId {
        match self {
            Self::Pane(pane) => pane.id(),
            Self::Split(split) => split.first().first_pane_id(),
        }
    }

    /// Check that pane ids are unique and non-zero.
    ///
    /// Binary shape, ratio bounds and non-emptiness hold by construction.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen = HashSet::new();
        for id in self.pane_ids() {
            if id.get() == 0 {
                return Err(LayoutError::ZeroPaneId);
            }
            if !seen.insert(id) {
                return Err(LayoutError::DuplicatePaneId(id));
            }
        }
        Ok(())
    }
}

impl LayoutNode {
    pub fn pane(id: PaneId) -> Self {
        Self::Pane(Pane::empty(id))
    }

    pub fn bound_pane(id: PaneId, session: impl Into<SessionId>) -> Self {
        Self::Pane(Pane::bound(id, session.into()))
    }

    /// Bound sessions in depth-first order.
    pub fn bound_sessions(&self) -> Vec<SessionId> {
        self.panes()
            .into_iter()
            .filter_map(|p| p.bound_session_id.clone())
            .collect()
    }

    pub fn pane_for_session(&self, session: &SessionId) -> Option<PaneId> {
        self.panes()
            .into_iter()
            .find(|p| p.bound_session_id.as_ref() == Some(session))
            .map(|p| p.id)
    }
}

impl SavedLayout {
    pub fn bindings(&self) -> Vec<Option<&Binding>> {
        self.panes().into_iter().map(|p| p.binding.as_ref()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> PaneId {
        PaneId::from_raw(raw)
    }

    fn sample() -> LayoutNode {
        LayoutNode::Split(Split::new(
            SplitDirection::Row,
            0.3,
            LayoutNode::bound_pane(id(1), "a"),
            LayoutNode::Split(Split::new(
                SplitDirection::Column,
                0.5,
                LayoutNode::pane(id(2)),
                LayoutNode::bound_pane(id(3), "b"),
            )),
        ))
    }

    #[test]
    fn test_ratio_clamped_on_construction() {
        let low = Split::new(SplitDirection::Row, -5.0, LayoutNode::pane(id(1)), LayoutNode::pane(id(2)));
        let high = Split::new(SplitDirection::Row, 5.0, LayoutNode::pane(id(1)), LayoutNode::pane(id(2)));
        let nan = Split::new(SplitDirection::Row, f64::NAN, LayoutNode::pane(id(1)), LayoutNode::pane(id(2)));
        assert_eq!(low.ratio(), MIN_RATIO);
        assert_eq!(high.ratio(), MAX_RATIO);
        assert_eq!(nan.ratio(), DEFAULT_RATIO);
    }

    #[test]
    fn test_depth_first_order() {
        let tree = sample();
        assert_eq!(tree.pane_ids(), vec![id(1), id(2), id(3)]);
        assert_eq!(tree.bound_sessions(), vec![SessionId::new("a"), SessionId::new("b")]);
        assert_eq!(tree.first_pane_id(), id(1));
        assert_eq!(tree.pane_count(), 3);
        assert_eq!(tree.split_count(), 2);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_pane_for_session() {
        let tree = sample();
        assert_eq!(tree.pane_for_session(&SessionId::new("b")), Some(id(3)));
        assert_eq!(tree.pane_for_session(&SessionId::new("zzz")), None);
    }

    #[test]
    fn test_node_at_follows_path() {
        let tree = sample();
        let node = tree.node_at(&[ChildSlot::Second, ChildSlot::First]).unwrap();
        assert_eq!(node.as_pane().map(|p| p.id), Some(id(2)));
        assert!(tree.node_at(&[ChildSlot::First, ChildSlot::First]).is_none());
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let tree = LayoutNode::Split(Split::new(
            SplitDirection::Row,
            0.5,
            LayoutNode::pane(id(4)),
            LayoutNode::pane(id(4)),
        ));
        assert_eq!(tree.validate(), Err(LayoutError::DuplicatePaneId(id(4))));
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_json_shape() {
        let tree = sample();
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["type"], "split");
        assert_eq!(json["direction"], "row");
        assert_eq!(json["children"][0]["type"], "pane");
        assert_eq!(json["children"][0]["boundSessionId"], "a");
        assert!(json["children"][1]["children"][0].get("boundSessionId").is_none());

        let back: LayoutNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_deserialized_ratio_is_clamped() {
        let json = r#"{"type":"split","direction":"column","ratio":42.0,"children":[
            {"type":"pane","id":1},{"type":"pane","id":2}]}"#;
        let tree: LayoutNode = serde_json::from_str(json).unwrap();
        assert_eq!(tree.as_split().unwrap().ratio(), MAX_RATIO);
    }

    #[test]
    fn test_split_with_one_child_does_not_parse() {
        let json = r#"{"type":"split","direction":"row","ratio":0.5,"children":[{"type":"pane","id":1}]}"#;
        assert!(serde_json::from_str::<LayoutNode>(json).is_err());
    }
}
