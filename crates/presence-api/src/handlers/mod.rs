//! HTTP handlers.

pub mod activity;
pub mod fallback;
pub mod me;
pub mod root;
