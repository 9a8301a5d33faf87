//! # presence-cache
//!
//! Activity snapshot cache. Answers "what is the tracked user doing right
//! now?" from the live gateway state, re-reading it at most once per TTL.
//!
//! The tracked user is resolved once from a configured DM channel and kept
//! for the life of the process.

pub mod activity;
pub mod state;

pub use activity::{ActivityCache, ActivityReport};
