//! Declarative descriptions of remote operations.
//!
//! Every ejabberd admin command is described by a type implementing
//! [`Operation`]: the remote method name, the ordered argument descriptors,
//! whether admin credentials accompany the call, and three hooks run around
//! the transport call by the [dispatcher](crate::dispatch).

mod arguments;
pub mod definitions;

use serde_json::{Map, Value};

use crate::Result;
use crate::types::CallContext;

pub use arguments::{ArgumentDescriptor, Validator};

/// Named arguments sent as the XML-RPC struct parameter.
pub type Arguments = Map<String, Value>;

/// Static description of one remote call.
///
/// Implementations are stateless and shared read-only across calls. All hooks
/// receive the call context; the defaults pass arguments through unchanged and
/// accept every reply.
pub trait Operation: Send + Sync {
    /// Caller-facing result of the call.
    type Output;

    /// Remote method name.
    const METHOD: &'static str;

    /// Arguments, validated in declaration order.
    const ARGUMENTS: &'static [ArgumentDescriptor];

    /// Send admin credentials as the first parameter.
    const AUTHENTICATE: bool = false;

    /// Rewrite the caller's arguments before validation.
    fn transform_arguments(&self, _context: &CallContext, arguments: Arguments) -> Arguments {
        arguments
    }

    /// Reject a reply before it is transformed.
    fn validate_response(
        &self,
        _context: &CallContext,
        _arguments: &Arguments,
        _response: &Value,
    ) -> Result<()> {
        Ok(())
    }

    /// Turn the raw reply into the caller-facing result.
    fn transform_response(
        &self,
        context: &CallContext,
        arguments: &Arguments,
        response: Value,
    ) -> Result<Self::Output>;
}

/// Look up `key` in a struct reply; non-struct replies have no fields.
pub(crate) fn field<'a>(response: &'a Value, key: &str) -> Option<&'a Value> {
    response.as_object().and_then(|object| object.get(key))
}

/// `true` when the reply's `res` status code is zero.
pub(crate) fn res_is_zero(response: &Value) -> bool {
    res_code(response) == Some(0)
}

/// The integer `res` status code of a reply, if present.
pub(crate) fn res_code(response: &Value) -> Option<i64> {
    field(response, "res").and_then(Value::as_i64)
}
