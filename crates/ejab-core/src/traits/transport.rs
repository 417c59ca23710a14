//! Remote-procedure transport trait.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// A remote-procedure proxy.
///
/// Takes a method name and positional parameters and returns the decoded
/// reply. Implementations report network and protocol failures as
/// [`TransportError`](crate::error::TransportError); the dispatcher never
/// retries them.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Invoke `method` with `params` and return the reply.
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        (**self).call(method, params).await
    }
}

#[async_trait]
impl<'a, T: Transport + ?Sized> Transport for &'a T {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        (**self).call(method, params).await
    }
}
