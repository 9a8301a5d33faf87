//! Message entity.

pub mod model;
