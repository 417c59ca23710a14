//! Configured ejabberd admin client.

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use crate::Result;
use crate::dispatch;
use crate::operation::definitions::{
    ChangePassword, CheckPasswordHash, CreateRoom, DestroyRoom, Echo, GetRoomOptions,
    MucOnlineRooms, Register, RegisteredUsers, RoomOptions, SetNickname, UnRegister,
};
use crate::operation::{Arguments, Operation};
use crate::traits::{EjabberdApi, Transport};
use crate::types::{CallContext, ClientConfig};

/// An ejabberd admin client over any [`Transport`].
///
/// The call context and admin credentials are rebuilt from the configuration
/// on every call; `host` and `service` arguments are filled in from the
/// context.
///
/// # Example
///
/// ```no_run
/// use ejab_core::{ClientConfig, EjabberdApi, EjabberdClient, Transport};
///
/// # async fn example<T: Transport>(transport: T) -> ejab_core::Result<()> {
/// let config = ClientConfig::new("localhost", 4560, "admin", "secret", "example.org");
/// let client = EjabberdClient::new(config, transport);
///
/// if client.register("alice", "wonderland").await? {
///     println!("registered");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EjabberdClient<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> EjabberdClient<T> {
    /// Create a client from a configuration and a transport.
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Dispatch an arbitrary operation with caller-built arguments.
    ///
    /// No `host`/`service` injection happens here.
    pub async fn call<O: Operation>(&self, operation: &O, arguments: &Arguments) -> Result<O::Output> {
        let context = self.config.context();
        let auth = self.config.auth();
        dispatch::call(&self.transport, operation, &context, &auth, arguments).await
    }

    /// Dispatch with the given pairs plus the context fields the operation declares.
    async fn call_with_context<O: Operation>(
        &self,
        operation: &O,
        pairs: &[(&str, &str)],
    ) -> Result<O::Output> {
        let context = self.config.context();
        let auth = self.config.auth();
        let arguments = with_context::<O>(&context, pairs);
        dispatch::call(&self.transport, operation, &context, &auth, &arguments).await
    }
}

/// Build arguments from `pairs`, adding `host` and `service` when `O` declares them.
fn with_context<O: Operation>(context: &CallContext, pairs: &[(&str, &str)]) -> Arguments {
    let mut arguments: Arguments = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), Value::from(*value)))
        .collect();

    for descriptor in O::ARGUMENTS {
        let injected = match descriptor.name {
            "host" => context.host(),
            "service" => context.service(),
            _ => continue,
        };
        arguments
            .entry(descriptor.name)
            .or_insert_with(|| Value::from(injected));
    }

    arguments
}

#[async_trait]
impl<T: Transport> EjabberdApi for EjabberdClient<T> {
    #[instrument(skip(self))]
    async fn echo(&self, sentence: &str) -> Result<Option<String>> {
        self.call_with_context(&Echo, &[("sentence", sentence)]).await
    }

    #[instrument(skip(self))]
    async fn registered_users(&self) -> Result<Vec<String>> {
        self.call_with_context(&RegisteredUsers, &[]).await
    }

    #[instrument(skip(self, password))]
    async fn register(&self, user: &str, password: &str) -> Result<bool> {
        self.call_with_context(&Register, &[("user", user), ("password", password)])
            .await
    }

    #[instrument(skip(self))]
    async fn unregister(&self, user: &str) -> Result<bool> {
        self.call_with_context(&UnRegister, &[("user", user)]).await
    }

    #[instrument(skip(self, newpass))]
    async fn change_password(&self, user: &str, newpass: &str) -> Result<bool> {
        self.call_with_context(&ChangePassword, &[("user", user), ("newpass", newpass)])
            .await
    }

    #[instrument(skip(self, password))]
    async fn check_password_hash(&self, user: &str, password: &str) -> Result<bool> {
        self.call_with_context(&CheckPasswordHash, &[("user", user), ("password", password)])
            .await
    }

    #[instrument(skip(self))]
    async fn set_nickname(&self, user: &str, nickname: &str) -> Result<bool> {
        self.call_with_context(&SetNickname, &[("user", user), ("nickname", nickname)])
            .await
    }

    #[instrument(skip(self))]
    async fn muc_online_rooms(&self) -> Result<Vec<String>> {
        self.call_with_context(&MucOnlineRooms, &[]).await
    }

    #[instrument(skip(self))]
    async fn create_room(&self, name: &str) -> Result<bool> {
        self.call_with_context(&CreateRoom, &[("name", name)]).await
    }

    #[instrument(skip(self))]
    async fn destroy_room(&self, name: &str) -> Result<bool> {
        self.call_with_context(&DestroyRoom, &[("name", name)]).await
    }

    #[instrument(skip(self))]
    async fn get_room_options(&self, name: &str) -> Result<RoomOptions> {
        self.call_with_context(&GetRoomOptions, &[("name", name)]).await
    }
}
