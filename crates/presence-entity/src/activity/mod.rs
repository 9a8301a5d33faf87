//! Rich presence activity entity.

pub mod model;
