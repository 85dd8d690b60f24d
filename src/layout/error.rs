// ABOUTME: Error types for the few fallible layout surfaces
// Structural operations never fail; these cover validation of foreign trees and parsing

use thiserror::Error;

use super::id::PaneId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Duplicate pane id in layout: {0}")]
    DuplicatePaneId(PaneId),

    #[error("Pane id 0 is reserved")]
    ZeroPaneId,

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}
