//! Configuration and per-call types.

mod config;
mod context;
mod service_url;

pub use config::{ClientConfig, DEFAULT_MUC_SERVICE, Protocol, env};
pub use context::{AuthCredentials, CallContext};
pub use service_url::ServiceUrl;
