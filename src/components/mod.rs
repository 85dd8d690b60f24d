// ABOUTME: Rendering components for layouts

pub mod layout_preview;

pub use layout_preview::{buffer_to_string, cell_rects, LayoutPreviewComponent};
