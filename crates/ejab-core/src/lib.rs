//! ejab-core - Core types, operation descriptors and dispatcher for the
//! ejabberd XML-RPC admin API.
//!
//! Every remote command is a unit struct implementing [`Operation`]. The
//! [`dispatch`] module interprets those descriptors over any [`Transport`],
//! and [`EjabberdClient`] wraps both behind the [`EjabberdApi`] contract.
//!
//! # Example
//!
//! ```no_run
//! use ejab_core::{ClientConfig, EjabberdApi, EjabberdClient, Transport};
//!
//! # async fn example<T: Transport>(transport: T) -> ejab_core::Result<()> {
//! let config = ClientConfig::new("localhost", 4560, "admin", "secret", "example.org");
//! let client = EjabberdClient::new(config, transport);
//!
//! for room in client.muc_online_rooms().await? {
//!     println!("{room}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod dispatch;
pub mod error;
pub mod operation;
pub mod traits;
pub mod types;

pub use client::EjabberdClient;
pub use error::Error;
pub use operation::{ArgumentDescriptor, Arguments, Operation, Validator};
pub use traits::{EjabberdApi, Transport};
pub use types::{AuthCredentials, CallContext, ClientConfig, Protocol, ServiceUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
