//! Error types for the ejab library.
//!
//! This module provides a unified error type with explicit variants for
//! argument, validation, domain, transport, protocol and configuration errors.
//! Argument and validation errors are always raised before any network call.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// The unified error type for ejab operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was not supplied.
    #[error("illegal argument: {0}")]
    IllegalArgument(#[from] IllegalArgumentError),

    /// An argument failed its type or range validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The server reported that the user already exists.
    #[error(transparent)]
    UserAlreadyRegistered(#[from] UserAlreadyRegisteredError),

    /// Failures below the operation layer, including XML-RPC faults.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A reply whose shape cannot be interpreted.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Invalid configuration input (service URL, protocol, port).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// A required argument is missing from the transformed arguments.
#[derive(Debug, Error)]
#[error("Missing required argument \"{argument}\"")]
pub struct IllegalArgumentError {
    /// Name of the missing argument.
    pub argument: String,
}

impl IllegalArgumentError {
    /// Create an error for the given missing argument.
    pub fn missing(argument: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
        }
    }
}

/// Argument validation errors.
///
/// Every variant carries the argument name and the offending value.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Value is not textual.
    #[error("argument \"{argument}\" must be a string, got {value}")]
    NotAString { argument: String, value: Value },

    /// Value is not an integer.
    #[error("argument \"{argument}\" must be an integer, got {value}")]
    NotAnInteger { argument: String, value: Value },

    /// Value is an integer but not strictly positive.
    #[error("argument \"{argument}\" must be a positive integer, got {value}")]
    NotPositive { argument: String, value: Value },

    /// Value is not a boolean.
    #[error("argument \"{argument}\" must be a boolean, got {value}")]
    NotABoolean { argument: String, value: Value },
}

impl ValidationError {
    /// Returns the name of the argument that failed validation.
    pub fn argument(&self) -> &str {
        match self {
            Self::NotAString { argument, .. }
            | Self::NotAnInteger { argument, .. }
            | Self::NotPositive { argument, .. }
            | Self::NotABoolean { argument, .. } => argument,
        }
    }

    /// Returns the value that failed validation.
    pub fn value(&self) -> &Value {
        match self {
            Self::NotAString { value, .. }
            | Self::NotAnInteger { value, .. }
            | Self::NotPositive { value, .. }
            | Self::NotABoolean { value, .. } => value,
        }
    }
}

/// Registration conflict reported by the server.
#[derive(Debug, Error)]
#[error("User with username {username} already exists")]
pub struct UserAlreadyRegisteredError {
    /// The username that was already taken.
    pub username: String,
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP client error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The server answered with a non-success HTTP status.
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    /// The server answered with an XML-RPC fault.
    #[error("fault {code}: {message}")]
    Fault { code: i32, message: String },

    /// The request could not be encoded.
    #[error("cannot encode request: {message}")]
    Encode { message: String },

    /// The reply body could not be decoded.
    #[error("malformed reply: {message}")]
    Decode { message: String },
}

/// A reply that does not have the shape an operation expects.
#[derive(Debug)]
pub struct ProtocolError {
    /// Remote method that produced the reply.
    pub method: String,
    /// What was wrong with the reply.
    pub reason: String,
}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.method, self.reason)
    }
}

impl std::error::Error for ProtocolError {}

/// Configuration input errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid service URL.
    #[error("invalid service URL '{value}': {reason}")]
    ServiceUrl { value: String, reason: String },

    /// Unknown protocol scheme.
    #[error("invalid protocol '{value}': expected http or https")]
    Protocol { value: String },

    /// Invalid port number.
    #[error("invalid port '{value}'")]
    Port { value: String },

    /// A required configuration value is missing.
    #[error("missing configuration value {name}")]
    Missing { name: String },
}
