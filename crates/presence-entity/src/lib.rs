//! # presence-entity
//!
//! Domain records mirrored from the Discord gateway: users, private
//! channels, relationships with their current activities, and messages.

pub mod activity;
pub mod channel;
pub mod message;
pub mod relationship;
pub mod user;

pub use activity::model::{Activity, ActivityTimestamps};
pub use channel::kind::ChannelKind;
pub use channel::model::Channel;
pub use message::model::Message;
pub use relationship::kind::RelationshipKind;
pub use relationship::model::Relationship;
pub use user::model::User;
