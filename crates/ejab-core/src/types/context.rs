//! Per-call context and credentials.

use std::fmt;

use serde_json::{Map, Value};

/// Server-side data injected into every request.
///
/// Built fresh from the client configuration before each call and never
/// mutated while the call is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    host: String,
    service: String,
}

impl CallContext {
    /// Create a new call context.
    ///
    /// * `host` - the XMPP domain served by ejabberd
    /// * `service` - the multi-user chat service name (e.g. "conference")
    pub fn new(host: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            service: service.into(),
        }
    }

    /// Returns the XMPP domain.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the MUC service name.
    pub fn service(&self) -> &str {
        &self.service
    }
}

/// Admin credentials sent with authenticated calls.
///
/// # Security
///
/// The password is never exposed in Debug output.
#[derive(Clone)]
pub struct AuthCredentials {
    user: String,
    server: String,
    password: String,
}

impl AuthCredentials {
    /// Create new credentials.
    pub fn new(
        user: impl Into<String>,
        server: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            server: server.into(),
            password: password.into(),
        }
    }

    /// Returns the admin user name.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the server (XMPP domain) the admin user belongs to.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Encode as the `{user, server, password}` struct ejabberd expects as the
    /// first parameter of an authenticated call.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("user".to_string(), Value::from(self.user.as_str()));
        map.insert("server".to_string(), Value::from(self.server.as_str()));
        map.insert("password".to_string(), Value::from(self.password.as_str()));
        Value::Object(map)
    }
}

impl fmt::Debug for AuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCredentials")
            .field("user", &self.user)
            .field("server", &self.server)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
