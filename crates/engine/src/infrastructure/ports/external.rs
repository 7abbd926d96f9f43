//! External service port traits (observer notifications).

use async_trait::async_trait;
use arena_shared::ServerMessage;

use super::error::NotificationError;

/// Best-effort delivery of engine events to whoever is watching.
///
/// Callers publish only after the state change committed. A failed publish
/// is logged by the caller and never undoes the change.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn publish(&self, message: ServerMessage) -> Result<(), NotificationError>;
}
