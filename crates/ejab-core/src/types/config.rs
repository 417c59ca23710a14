//! Client configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

use super::{AuthCredentials, CallContext, ServiceUrl};

/// Default multi-user chat service name.
pub const DEFAULT_MUC_SERVICE: &str = "conference";

/// Environment variable names read by [`ClientConfig::from_env`].
pub mod env {
    /// Host name of the XML-RPC listener.
    pub const HOST: &str = "EJABBERD_HOST";
    /// Port of the XML-RPC listener.
    pub const PORT: &str = "EJABBERD_PORT";
    /// Admin account user name.
    pub const USERNAME: &str = "EJABBERD_USERNAME";
    /// Admin account password.
    pub const PASSWORD: &str = "EJABBERD_PASSWORD";
    /// XMPP virtual host injected as `host`.
    pub const XMPP_DOMAIN: &str = "EJABBERD_XMPP_DOMAIN";
    /// Optional MUC service name, defaults to [`super::DEFAULT_MUC_SERVICE`].
    pub const MUC_SERVICE: &str = "EJABBERD_MUC_SERVICE";
    /// Optional `http` or `https`, defaults to `https`.
    pub const PROTOCOL: &str = "EJABBERD_PROTOCOL";
    /// Optional flag enabling request and response body logging.
    pub const VERBOSE: &str = "EJABBERD_VERBOSE";
}

/// URL scheme used to reach the XML-RPC endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    /// Returns the URL scheme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(InvalidInputError::Protocol {
                value: s.to_string(),
            }
            .into()),
        }
    }
}

/// Everything needed to reach and authenticate against an ejabberd server.
///
/// # Example
///
/// ```
/// use ejab_core::ClientConfig;
///
/// let config = ClientConfig::new("localhost", 4560, "admin", "secret", "example.org");
/// assert_eq!(config.muc_service, "conference");
/// assert_eq!(config.service_url().unwrap().as_str(), "https://localhost:4560/");
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Host name of the XML-RPC listener.
    pub host: String,
    /// Port of the XML-RPC listener.
    pub port: u16,
    /// Admin account user name.
    pub username: String,
    /// Admin account password.
    pub password: String,
    /// XMPP domain served by ejabberd.
    pub xmpp_domain: String,
    /// Multi-user chat service name.
    #[serde(default = "default_muc_service")]
    pub muc_service: String,
    /// Scheme used to reach the listener.
    #[serde(default)]
    pub protocol: Protocol,
    /// Log full request and response bodies.
    #[serde(default)]
    pub verbose: bool,
}

fn default_muc_service() -> String {
    DEFAULT_MUC_SERVICE.to_string()
}

impl ClientConfig {
    /// Create a configuration with the default MUC service, https and verbose off.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        xmpp_domain: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            xmpp_domain: xmpp_domain.into(),
            muc_service: default_muc_service(),
            protocol: Protocol::default(),
            verbose: false,
        }
    }

    /// Set the MUC service name.
    pub fn with_muc_service(mut self, muc_service: impl Into<String>) -> Self {
        self.muc_service = muc_service.into();
        self
    }

    /// Set the protocol.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Enable or disable body logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Load the configuration from `EJABBERD_*` environment variables.
    ///
    /// See [`env`] for the variable names. `EJABBERD_MUC_SERVICE`,
    /// `EJABBERD_PROTOCOL` and `EJABBERD_VERBOSE` are optional.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| {
                Error::from(InvalidInputError::Missing {
                    name: name.to_string(),
                })
            })
        };

        let port = required(env::PORT)?;
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| InvalidInputError::Port { value: port })?;

        let mut config = Self::new(
            required(env::HOST)?,
            port,
            required(env::USERNAME)?,
            required(env::PASSWORD)?,
            required(env::XMPP_DOMAIN)?,
        );

        if let Some(service) = lookup(env::MUC_SERVICE) {
            config.muc_service = service;
        }
        if let Some(protocol) = lookup(env::PROTOCOL) {
            config.protocol = protocol.parse()?;
        }
        if let Some(verbose) = lookup(env::VERBOSE) {
            config.verbose = matches!(
                verbose.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        Ok(config)
    }

    /// Returns `<protocol>://<host>:<port>/`.
    pub fn service_url(&self) -> Result<ServiceUrl, Error> {
        ServiceUrl::from_parts(self.protocol, &self.host, self.port)
    }

    /// Build the per-call context.
    pub fn context(&self) -> CallContext {
        CallContext::new(&self.xmpp_domain, &self.muc_service)
    }

    /// Build the per-call admin credentials.
    pub fn auth(&self) -> AuthCredentials {
        AuthCredentials::new(&self.username, &self.xmpp_domain, &self.password)
    }
}

// Hide password in Debug output
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("xmpp_domain", &self.xmpp_domain)
            .field("muc_service", &self.muc_service)
            .field("protocol", &self.protocol)
            .field("verbose", &self.verbose)
            .finish()
    }
}
