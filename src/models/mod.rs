// ABOUTME: Core data models shared by the layout engine: live session handles and durable bindings

pub mod binding;
pub mod session;

pub use binding::Binding;
pub use session::{SessionHandle, SessionId};
