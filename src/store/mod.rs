// ABOUTME: Layout persistence module for named, reusable layouts
// Provides file-backed storage of saved layouts across application restarts

pub mod persistence;

pub use persistence::{LayoutStore, NamedLayout, StoreError};
