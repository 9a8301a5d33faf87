//! In-memory view of the gateway session.
//!
//! The gateway client writes into [`GatewayState`] as events arrive; readers
//! such as the activity cache and the HTTP handlers only see the read-only
//! [`ConnectionState`] surface.

pub mod dispatch;
pub mod store;

use presence_core::types::id::{ChannelId, UserId};
use presence_entity::{Channel, Relationship, User};

pub use dispatch::{Dispatched, apply_dispatch};
pub use store::GatewayState;

/// Read-only access to the live connection.
pub trait ConnectionState: Send + Sync + std::fmt::Debug + 'static {
    /// Whether the session is usable: READY and READY_SUPPLEMENTAL have
    /// been applied, or a session was resumed.
    fn is_ready(&self) -> bool;

    /// The connected account, once known.
    fn current_user(&self) -> Option<User>;

    /// Look up a private channel.
    fn channel(&self, id: ChannelId) -> Option<Channel>;

    /// Look up the relationship with a user, including current activities.
    fn relationship(&self, user_id: UserId) -> Option<Relationship>;
}
