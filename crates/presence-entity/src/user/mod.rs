//! User entity.

pub mod model;
