//! Core type definitions used across the relay workspace.

pub mod id;
pub mod json;

pub use id::*;
pub use json::stringify_ids;
