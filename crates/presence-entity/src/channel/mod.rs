//! Channel entity and kinds.

pub mod kind;
pub mod model;
