// ABOUTME: Pane layout engine: the split tree, its structural operations and spatial queries
// Pure and synchronous; every operation maps an immutable tree to a new tree or a data outcome

pub mod codec;
pub mod error;
pub mod id;
pub mod navigator;
pub mod node;
pub mod ops;
pub mod preset;
pub mod resolver;

pub use codec::{save_layout, save_snapshot, save_template, SaveMode};
pub use error::LayoutError;
pub use id::{IdGenerator, PaneId};
pub use navigator::{adjacent, cyclic, dividers, pane_boxes, Cycle, Direction, Divider, PaneBox, Rect};
pub use node::{
    clamp_ratio, ChildSlot, LayoutNode, Node, Pane, PaneLeaf, SavedLayout, SavedPane, Split,
    SplitDirection, MAX_RATIO, MIN_RATIO,
};
pub use ops::{balance, bind_session, clone_with_fresh_ids, close, release_session, set_ratio, set_ratio_at, split, unbind_pane, SplitOutcome};
pub use preset::{apply_preset, Preset, PresetApplication};
pub use resolver::{restore, Restored};
