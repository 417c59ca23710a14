//! The ejabberd admin API contract.

use async_trait::async_trait;

use crate::Result;
use crate::operation::definitions::RoomOptions;

/// Admin commands exposed by an ejabberd server.
///
/// The XMPP domain and MUC service come from the client configuration, so
/// callers only pass the arguments that identify the user or room.
#[async_trait]
pub trait EjabberdApi: Send + Sync {
    /// Echo a sentence back; useful as a connectivity check.
    ///
    /// Returns `None` when the reply carries no `repeated` field.
    async fn echo(&self, sentence: &str) -> Result<Option<String>>;

    /// List registered users of the configured domain.
    async fn registered_users(&self) -> Result<Vec<String>>;

    /// Register a user.
    ///
    /// Fails with [`UserAlreadyRegistered`](crate::Error::UserAlreadyRegistered)
    /// when the account exists.
    async fn register(&self, user: &str, password: &str) -> Result<bool>;

    /// Remove a user.
    async fn unregister(&self, user: &str) -> Result<bool>;

    /// Change a user's password.
    async fn change_password(&self, user: &str, newpass: &str) -> Result<bool>;

    /// Check a password; it is sent as a SHA-1 digest.
    async fn check_password_hash(&self, user: &str, password: &str) -> Result<bool>;

    /// Set the nickname in a user's vCard.
    async fn set_nickname(&self, user: &str, nickname: &str) -> Result<bool>;

    /// List the MUC rooms currently online.
    async fn muc_online_rooms(&self) -> Result<Vec<String>>;

    /// Create a MUC room.
    async fn create_room(&self, name: &str) -> Result<bool>;

    /// Destroy a MUC room.
    async fn destroy_room(&self, name: &str) -> Result<bool>;

    /// Read a MUC room's options.
    async fn get_room_options(&self, name: &str) -> Result<RoomOptions>;
}
