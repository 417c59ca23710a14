//! Descriptor-driven call dispatch.
//!
//! [`call`] runs one remote operation end to end:
//!
//! 1. copy the caller's arguments and run [`Operation::transform_arguments`]
//! 2. check presence and type of every declared argument, in order
//! 3. invoke the transport with `[args]`, or `[auth, args]` when the
//!    operation authenticates
//! 4. run [`Operation::validate_response`] then [`Operation::transform_response`]
//!
//! Argument errors are raised before the transport is touched. Transport
//! errors are returned unmodified.

use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::Result;
use crate::error::IllegalArgumentError;
use crate::operation::{Arguments, Operation};
use crate::traits::Transport;
use crate::types::{AuthCredentials, CallContext};

/// Dispatch `operation` over `transport`.
#[instrument(skip_all, fields(method = O::METHOD, authenticate = O::AUTHENTICATE))]
pub async fn call<O, T>(
    transport: &T,
    operation: &O,
    context: &CallContext,
    auth: &AuthCredentials,
    arguments: &Arguments,
) -> Result<O::Output>
where
    O: Operation,
    T: Transport + ?Sized,
{
    let arguments = prepare_arguments(operation, context, arguments)?;
    let params = build_params::<O>(auth, &arguments);

    debug!(params = params.len(), "dispatching");
    let response = transport.call(O::METHOD, params).await?;
    trace!(?response, "reply");

    operation.validate_response(context, &arguments, &response)?;
    operation.transform_response(context, &arguments, response)
}

/// Transform and validate a copy of the caller's arguments.
pub fn prepare_arguments<O: Operation>(
    operation: &O,
    context: &CallContext,
    arguments: &Arguments,
) -> Result<Arguments> {
    let arguments = operation.transform_arguments(context, arguments.clone());

    for descriptor in O::ARGUMENTS {
        let value = arguments.get(descriptor.name);
        if descriptor.required && value.is_none() {
            return Err(IllegalArgumentError::missing(descriptor.name).into());
        }
        descriptor.validate(value)?;
    }

    Ok(arguments)
}

/// Positional transport parameters for an operation.
pub fn build_params<O: Operation>(auth: &AuthCredentials, arguments: &Arguments) -> Vec<Value> {
    let arguments = Value::Object(arguments.clone());
    if O::AUTHENTICATE {
        vec![auth.to_value(), arguments]
    } else {
        vec![arguments]
    }
}
