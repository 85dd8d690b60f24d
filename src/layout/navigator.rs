// ABOUTME: Spatial queries over a layout: pane rectangles, dividers, directional and cyclic focus
// All geometry is normalized to the unit square with the root at (0, 0, 1, 1)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::id::PaneId;
use super::node::{ChildSlot, Node, PaneLeaf, SplitDirection};

/// Tolerance for edge contact, absorbing floating point error from nested ratios.
pub const EDGE_EPSILON: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const UNIT: Self = Self {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Split along `direction` at `ratio`, returning (first, second).
    pub fn split(&self, direction: SplitDirection, ratio: f64) -> (Self, Self) {
        match direction {
            SplitDirection::Row => {
                let first_w = self.w * ratio;
                (
                    Self { w: first_w, ..*self },
                    Self {
                        x: self.x + first_w,
                        w: self.w - first_w,
                        ..*self
                    },
                )
            }
            SplitDirection::Column => {
                let first_h = self.h * ratio;
                (
                    Self { h: first_h, ..*self },
                    Self {
                        y: self.y + first_h,
                        h: self.h - first_h,
                        ..*self
                    },
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneBox {
    pub id: PaneId,
    pub rect: Rect,
    pub cx: f64,
    pub cy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cycle {
    Next,
    Prev,
}

/// The line between a split's two children.
#[derive(Debug, Clone, PartialEq)]
pub struct Divider {
    /// Structural path from the root to the split.
    pub path: Vec<ChildSlot>,
    pub direction: SplitDirection,
    /// Area covered by the split.
    pub bounds: Rect,
    /// Coordinate of the line: an x for `Row` splits, a y for `Column` splits.
    pub position: f64,
}

impl Divider {
    /// Ratio the split would take if the divider were dragged to `(x, y)`.
    /// The caller clamps through the ratio update.
    pub fn ratio_for(&self, x: f64, y: f64) -> f64 {
        match self.direction {
            SplitDirection::Row if self.bounds.w > 0.0 => (x - self.bounds.x) / self.bounds.w,
            SplitDirection::Column if self.bounds.h > 0.0 => (y - self.bounds.y) / self.bounds.h,
            _ => super::node::DEFAULT_RATIO,
        }
    }

    fn distance_to(&self, x: f64, y: f64) -> Option<f64> {
        match self.direction {
            SplitDirection::Row => (y >= self.bounds.y && y <= self.bounds.bottom())
                .then(|| (x - self.position).abs()),
            SplitDirection::Column => (x >= self.bounds.x && x <= self.bounds.right())
                .then(|| (y - self.position).abs()),
        }
    }
}

/// Normalized rectangle of every pane, in depth-first order.
pub fn pane_boxes<P: PaneLeaf>(tree: &Node<P>) -> Vec<PaneBox> {
    let mut out = Vec::new();
    collect_boxes(tree, Rect::UNIT, &mut out);
    out
}

fn collect_boxes<P: PaneLeaf>(node: &Node<P>, rect: Rect, out: &mut Vec<PaneBox>) {
    match node {
        Node::Pane(pane) => {
            let (cx, cy) = rect.center();
            out.push(PaneBox {
                id: pane.id(),
                rect,
                cx,
                cy,
            });
        }
        Node::Split(split) => {
            let (first, second) = rect.split(split.direction, split.ratio());
            collect_boxes(split.first(), first, out);
            collect_boxes(split.second(), second, out);
        }
    }
}

/// Every divider in the tree, parents before children.
pub fn dividers<P>(tree: &Node<P>) -> Vec<Divider> {
    let mut out = Vec::new();
    collect_dividers(tree, Rect::UNIT, &mut Vec::new(), &mut out);
    out
}

fn collect_dividers<P>(node: &Node<P>, rect: Rect, path: &mut Vec<ChildSlot>, out: &mut Vec<Divider>) {
    let Node::Split(split) = node else {
        return;
    };
    let (first, second) = rect.split(split.direction, split.ratio());
    let position = match split.direction {
        SplitDirection::Row => first.right(),
        SplitDirection::Column => first.bottom(),
    };
    out.push(Divider {
        path: path.clone(),
        direction: split.direction,
        bounds: rect,
        position,
    });

    path.push(ChildSlot::First);
    collect_dividers(split.first(), first, path, out);
    path.pop();
    path.push(ChildSlot::Second);
    collect_dividers(split.second(), second, path, out);
    path.pop();
}

/// Closest divider within `tolerance` of the point, for drag hit testing.
pub fn divider_at<P>(tree: &Node<P>, x: f64, y: f64, tolerance: f64) -> Option<Divider> {
    dividers(tree)
        .into_iter()
        .filter_map(|d| d.distance_to(x, y).map(|dist| (dist, d)))
        .filter(|(dist, _)| *dist <= tolerance)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, d)| d)
}

/// The pane covering the point, if any.
pub fn pane_at<P: PaneLeaf>(tree: &Node<P>, x: f64, y: f64) -> Option<PaneId> {
    pane_boxes(tree)
        .into_iter()
        .find(|b| b.rect.contains(x, y))
        .map(|b| b.id)
}

/// The neighbouring pane in `direction`, or `None` at the layout edge.
///
/// A candidate must share the edge being crossed and overlap the current
/// pane on the perpendicular axis. Ties go to the candidate whose centre is
/// best aligned with the current pane. Never wraps.
pub fn adjacent<P: PaneLeaf>(tree: &Node<P>, pane: PaneId, direction: Direction) -> Option<PaneId> {
    let boxes = pane_boxes(tree);
    let current = boxes.iter().find(|b| b.id == pane)?;
    let cur = current.rect;

    boxes
        .iter()
        .filter(|b| b.id != pane)
        .filter_map(|b| {
            let r = b.rect;
            let (gap, overlap, misalignment) = match direction {
                Direction::Left => (cur.x - r.right(), overlap(cur.y, cur.bottom(), r.y, r.bottom()), (b.cy - current.cy).abs()),
                Direction::Right => (r.x - cur.right(), overlap(cur.y, cur.bottom(), r.y, r.bottom()), (b.cy - current.cy).abs()),
                Direction::Up => (cur.y - r.bottom(), overlap(cur.x, cur.right(), r.x, r.right()), (b.cx - current.cx).abs()),
                Direction::Down => (r.y - cur.bottom(), overlap(cur.x, cur.right(), r.x, r.right()), (b.cx - current.cx).abs()),
            };
            (gap.abs() <= EDGE_EPSILON && overlap > EDGE_EPSILON).then_some((gap.abs(), misalignment, b.id))
        })
        .min_by(|a, b| match a.0.total_cmp(&b.0) {
            Ordering::Equal => a.1.total_cmp(&b.1),
            other => other,
        })
        .map(|(_, _, id)| id)
}

fn overlap(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> f64 {
    a_end.min(b_end) - a_start.max(b_start)
}

/// The pane one step forward or backward in depth-first order, wrapping at
/// both ends. `None` if `pane` is not in the tree.
pub fn cyclic<P: PaneLeaf>(tree: &Node<P>, pane: PaneId, cycle: Cycle) -> Option<PaneId> {
    let ids = tree.pane_ids();
    let index = ids.iter().position(|id| *id == pane)?;
    let len = ids.len();
    let next = match cycle {
        Cycle::Next => (index + 1) % len,
        Cycle::Prev => (index + len - 1) % len,
    };
    Some(ids[next])
}
