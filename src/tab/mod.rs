// ABOUTME: Tab context owning one layout tree, its focus and zoom state, id space and undo history

pub mod history;
pub mod state;

pub use history::{HistoryFrame, LayoutHistory, DEFAULT_HISTORY_DEPTH};
pub use state::{RestoreSummary, TabClose, TabSnapshot, TabState};
