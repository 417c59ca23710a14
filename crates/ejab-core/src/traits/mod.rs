//! Core traits for the ejab library.

mod api;
mod transport;

pub use api::EjabberdApi;
pub use transport::Transport;
