// ABOUTME: Library crate for Panedeck exposing the layout engine, tab state and layout store

pub mod components;
pub mod config;
pub mod layout;
pub mod models;
pub mod store;
pub mod tab;
