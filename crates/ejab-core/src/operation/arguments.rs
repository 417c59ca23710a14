//! Argument descriptors and validators.

use serde_json::Value;

use crate::error::ValidationError;

static NULL: Value = Value::Null;

/// Type check applied to an argument value before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Textual value.
    String,
    /// Any integer.
    Integer,
    /// Integer strictly greater than zero.
    PositiveInteger,
    /// Boolean value.
    Boolean,
}

impl Validator {
    /// Validate `value` for the argument called `argument`.
    ///
    /// An absent or null value passes only when the argument is optional;
    /// required arguments are checked for presence by the dispatcher first.
    pub fn validate(
        &self,
        argument: &str,
        value: Option<&Value>,
        required: bool,
    ) -> Result<(), ValidationError> {
        let value = match value {
            None | Some(Value::Null) if !required => return Ok(()),
            None => &NULL,
            Some(value) => value,
        };

        let valid = match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::PositiveInteger => {
                if !(value.is_i64() || value.is_u64()) {
                    return Err(ValidationError::NotAnInteger {
                        argument: argument.to_string(),
                        value: value.clone(),
                    });
                }
                value.as_u64().is_some_and(|n| n > 0)
            }
            Self::Boolean => value.is_boolean(),
        };

        if valid {
            return Ok(());
        }

        let argument = argument.to_string();
        let value = value.clone();
        Err(match self {
            Self::String => ValidationError::NotAString { argument, value },
            Self::Integer => ValidationError::NotAnInteger { argument, value },
            Self::PositiveInteger => ValidationError::NotPositive { argument, value },
            Self::Boolean => ValidationError::NotABoolean { argument, value },
        })
    }
}

/// Declares one argument of a remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    /// Key of the argument in the arguments mapping.
    pub name: &'static str,
    /// Whether the dispatcher rejects calls that omit it.
    pub required: bool,
    /// Type check run on the value.
    pub validator: Validator,
}

impl ArgumentDescriptor {
    /// A required argument.
    pub const fn new(name: &'static str, validator: Validator) -> Self {
        Self {
            name,
            required: true,
            validator,
        }
    }

    /// Required string argument.
    pub const fn string(name: &'static str) -> Self {
        Self::new(name, Validator::String)
    }

    /// Required integer argument.
    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, Validator::Integer)
    }

    /// Required positive integer argument.
    pub const fn positive_integer(name: &'static str) -> Self {
        Self::new(name, Validator::PositiveInteger)
    }

    /// Required boolean argument.
    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, Validator::Boolean)
    }

    /// Mark the argument optional.
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Run the validator against a value taken from the arguments mapping.
    pub fn validate(&self, value: Option<&Value>) -> Result<(), ValidationError> {
        self.validator.validate(self.name, value, self.required)
    }
}
