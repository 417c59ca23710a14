//! ejab-xmlrpc - XML-RPC over HTTP transport for the ejab admin client.
//!
//! # Example
//!
//! ```no_run
//! use ejab_core::{ClientConfig, EjabberdApi};
//!
//! # async fn example() -> ejab_core::Result<()> {
//! let config = ClientConfig::new("localhost", 4560, "admin", "secret", "example.org");
//! let client = ejab_xmlrpc::connect(config)?;
//!
//! assert_eq!(client.echo("ping").await?.as_deref(), Some("ping"));
//! # Ok(())
//! # }
//! ```

mod transport;
mod value;

use ejab_core::{ClientConfig, EjabberdClient, Result};

pub use transport::XmlRpcTransport;

/// A client speaking XML-RPC over HTTP.
pub type XmlRpcClient = EjabberdClient<XmlRpcTransport>;

/// Build a client for the endpoint described by `config`.
pub fn connect(config: ClientConfig) -> Result<XmlRpcClient> {
    let transport = XmlRpcTransport::new(config.service_url()?)?.with_verbose(config.verbose);
    Ok(EjabberdClient::new(config, transport))
}
