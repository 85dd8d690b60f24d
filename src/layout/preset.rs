// ABOUTME: Canonical layout presets and re-flowing a live layout's sessions into a preset
// Sessions that do not fit the preset are reported back as displaced, never dropped silently

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use super::error::LayoutError;
use super::id::{IdGenerator, PaneId};
use super::node::{LayoutNode, Node, Pane, PaneLeaf, Split, SplitDirection, DEFAULT_RATIO};
use crate::models::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    #[serde(rename = "single")]
    Single,
    /// Two panes side by side.
    #[serde(rename = "row-2")]
    Row2,
    /// Two panes stacked.
    #[serde(rename = "column-2")]
    Column2,
    /// Two stacked pairs side by side.
    #[serde(rename = "grid-2x2")]
    Grid2x2,
}

impl Preset {
    pub const ALL: [Self; 4] = [Self::Single, Self::Row2, Self::Column2, Self::Grid2x2];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Row2 => "row-2",
            Self::Column2 => "column-2",
            Self::Grid2x2 => "grid-2x2",
        }
    }

    pub const fn pane_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Row2 | Self::Column2 => 2,
            Self::Grid2x2 => 4,
        }
    }

    /// A fresh tree of empty panes with every ratio at 0.5.
    pub fn build<P: PaneLeaf>(self, ids: &IdGenerator) -> Node<P> {
        self.build_with(ids, &mut P::empty)
    }

    /// Build the preset, creating each leaf with `leaf` in depth-first order.
    fn build_with<P>(self, ids: &IdGenerator, leaf: &mut dyn FnMut(PaneId) -> P) -> Node<P> {
        let mut pane = || Node::Pane(leaf(ids.next()));
        match self {
            Self::Single => pane(),
            Self::Row2 => {
                let first = pane();
                let second = pane();
                Node::Split(Split::new(SplitDirection::Row, DEFAULT_RATIO, first, second))
            }
            Self::Column2 => {
                let first = pane();
                let second = pane();
                Node::Split(Split::new(SplitDirection::Column, DEFAULT_RATIO, first, second))
            }
            Self::Grid2x2 => {
                let top_left = pane();
                let bottom_left = pane();
                let top_right = pane();
                let bottom_right = pane();
                Node::Split(Split::new(
                    SplitDirection::Row,
                    DEFAULT_RATIO,
                    Node::Split(Split::new(SplitDirection::Column, DEFAULT_RATIO, top_left, bottom_left)),
                    Node::Split(Split::new(SplitDirection::Column, DEFAULT_RATIO, top_right, bottom_right)),
                ))
            }
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LayoutError::UnknownPreset(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresetApplication {
    pub layout: LayoutNode,
    /// First pane of the preset; the tab should focus it.
    pub active_pane: PaneId,
    /// Sessions that were bound before but found no pane in the preset.
    pub displaced: Vec<SessionId>,
}

/// Replace `current` with `preset`, moving bound sessions across one-to-one
/// in depth-first order.
pub fn apply_preset(current: &LayoutNode, preset: Preset, ids: &IdGenerator) -> PresetApplication {
    let mut sessions = current.bound_sessions().into_iter();
    let layout = preset.build_with(ids, &mut |id| Pane {
        id,
        bound_session_id: sessions.next(),
    });
    let displaced: Vec<SessionId> = sessions.collect();

    if displaced.is_empty() {
        debug!("applied preset {}", preset);
    } else {
        info!("applied preset {}, {} sessions displaced", preset, displaced.len());
    }

    PresetApplication {
        active_pane: layout.first_pane_id(),
        layout,
        displaced,
    }
}
