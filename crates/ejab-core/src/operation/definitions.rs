//! ejabberd admin command definitions.

use std::collections::BTreeMap;

use serde_json::Value;
use sha1::{Digest, Sha1};

use crate::Result;
use crate::error::{ProtocolError, UserAlreadyRegisteredError};
use crate::types::CallContext;

use super::{ArgumentDescriptor, Arguments, Operation, field, res_code, res_is_zero};

/// Hash method tag ejabberd expects for [`format_password_hash_sha`] digests.
pub const SHA_HASH_METHOD: &str = "sha";

/// Lowercase hex SHA-1 digest of a password, as accepted by `check_password_hash`.
pub fn format_password_hash_sha(password: &str) -> String {
    hex::encode(Sha1::digest(password.as_bytes()))
}

// ============================================================================
// Diagnostics
// ============================================================================

/// `echothisnew`: the server echoes a sentence back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Echo;

impl Operation for Echo {
    type Output = Option<String>;

    const METHOD: &'static str = "echothisnew";
    const ARGUMENTS: &'static [ArgumentDescriptor] = &[ArgumentDescriptor::string("sentence")];

    fn transform_response(
        &self,
        _context: &CallContext,
        _arguments: &Arguments,
        response: Value,
    ) -> Result<Option<String>> {
        match field(&response, "repeated") {
            None => Ok(None),
            Some(Value::String(repeated)) => Ok(Some(repeated.clone())),
            Some(_) => {
                Err(ProtocolError::new(Self::METHOD, "\"repeated\" is not a string").into())
            }
        }
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// `registered_users`: list the accounts of a virtual host.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisteredUsers;

impl Operation for RegisteredUsers {
    type Output = Vec<String>;

    const METHOD: &'static str = "registered_users";
    const ARGUMENTS: &'static [ArgumentDescriptor] = &[ArgumentDescriptor::string("host")];

    fn transform_response(
        &self,
        _context: &CallContext,
        _arguments: &Arguments,
        response: Value,
    ) -> Result<Vec<String>> {
        let Some(users) = field(&response, "users").and_then(Value::as_array) else {
            return Ok(Vec::new());
        };

        // Older servers wrap each name in a {username} struct.
        Ok(users
            .iter()
            .filter_map(|user| match user {
                Value::String(name) => Some(name.clone()),
                other => field(other, "username")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
            .collect())
    }
}

/// `register`: create an account.
#[derive(Debug, Clone, Copy, Default)]
pub struct Register;

impl Operation for Register {
    type Output = bool;

    const METHOD: &'static str = "register";
    const ARGUMENTS: &'static [ArgumentDescriptor] = &[
        ArgumentDescriptor::string("user"),
        ArgumentDescriptor::string("host"),
        ArgumentDescriptor::string("password"),
    ];

    fn validate_response(
        &self,
        _context: &CallContext,
        arguments: &Arguments,
        response: &Value,
    ) -> Result<()> {
        if res_code(response) == Some(1) {
            let username = arguments
                .get("user")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(UserAlreadyRegisteredError { username }.into());
        }
        Ok(())
    }

    fn transform_response(
        &self,
        _context: &CallContext,
        _arguments: &Arguments,
        response: Value,
    ) -> Result<bool> {
        Ok(res_is_zero(&response))
    }
}

/// `unregister`: delete an account.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnRegister;

impl Operation for UnRegister {
    type Output = bool;

    const METHOD: &'static str = "unregister";
    const ARGUMENTS: &'static [ArgumentDescriptor] = &[
        ArgumentDescriptor::string("user"),
        ArgumentDescriptor::string("host"),
    ];

    fn transform_response(
        &self,
        _context: &CallContext,
        _arguments: &Arguments,
        response: Value,
    ) -> Result<bool> {
        Ok(res_is_zero(&response))
    }
}

/// `change_password`: replace an account's password.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangePassword;

impl Operation for ChangePassword {
    type Output = bool;

    const METHOD: &'static str = "change_password";
    const ARGUMENTS: &'static [ArgumentDescriptor] = &[
        ArgumentDescriptor::string("user"),
        ArgumentDescriptor::string("host"),
        ArgumentDescriptor::string("newpass"),
    ];

    fn transform_response(
        &self,
        _context: &CallContext,
        _arguments: &Arguments,
        response: Value,
    ) -> Result<bool> {
        Ok(res_is_zero(&response))
    }
}

/// `check_password_hash`: verify a password without sending it in clear.
///
/// Callers pass `password`; it is replaced by its SHA-1 digest under
/// `passwordhash` with `hashmethod` set to `"sha"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckPasswordHash;

impl Operation for CheckPasswordHash {
    type Output = bool;

    const METHOD: &'static str = "check_password_hash";
    const ARGUMENTS: &'static [ArgumentDescriptor] = &[
        ArgumentDescriptor::string("user"),
        ArgumentDescriptor::string("host"),
        ArgumentDescriptor::string("passwordhash"),
        ArgumentDescriptor::string("hashmethod"),
    ];

    fn transform_arguments(&self, _context: &CallContext, mut arguments: Arguments) -> Arguments {
        let Some(password) = arguments.remove("password") else {
            return arguments;
        };

        // Non-textual passwords are left for the validator to reject.
        let passwordhash = match password {
            Value::String(password) => Value::from(format_password_hash_sha(&password)),
            other => other,
        };
        arguments.insert("passwordhash".to_string(), passwordhash);
        arguments.insert("hashmethod".to_string(), Value::from(SHA_HASH_METHOD));
        arguments
    }

    fn transform_response(
        &self,
        _context: &CallContext,
        _arguments: &Arguments,
        response: Value,
    ) -> Result<bool> {
        Ok(res_is_zero(&response))
    }
}

/// `set_nickname`: set the nickname in a user's vCard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetNickname;

impl Operation for SetNickname {
    type Output = bool;

    const METHOD: &'static str = "set_nickname";
    const ARGUMENTS: &'static [ArgumentDescriptor] = &[
        ArgumentDescriptor::string("user"),
        ArgumentDescriptor::string("host"),
        ArgumentDescriptor::string("nickname"),
    ];

    fn transform_response(
        &self,
        _context: &CallContext,
        _arguments: &Arguments,
        response: Value,
    ) -> Result<bool> {
        Ok(res_is_zero(&response))
    }
}

// ============================================================================
// Multi-user chat
// ============================================================================

/// `muc_online_rooms`: list the rooms currently alive.
#[derive(Debug, Clone, Copy, Default)]
pub struct MucOnlineRooms;

impl Operation for MucOnlineRooms {
    type Output = Vec<String>;

    const METHOD: &'static str = "muc_online_rooms";
    const ARGUMENTS: &'static [ArgumentDescriptor] = &[ArgumentDescriptor::string("host")];

    fn transform_response(
        &self,
        _context: &CallContext,
        _arguments: &Arguments,
        response: Value,
    ) -> Result<Vec<String>> {
        let rooms = field(&response, "rooms")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(rooms
            .iter()
            .filter_map(|entry| field(entry, "room").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

/// `create_room`: create a MUC room.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateRoom;

impl Operation for CreateRoom {
    type Output = bool;

    const METHOD: &'static str = "create_room";
    const ARGUMENTS: &'static [ArgumentDescriptor] = &[
        ArgumentDescriptor::string("name"),
        ArgumentDescriptor::string("service"),
        ArgumentDescriptor::string("host"),
    ];

    fn transform_response(
        &self,
        _context: &CallContext,
        _arguments: &Arguments,
        response: Value,
    ) -> Result<bool> {
        Ok(res_is_zero(&response))
    }
}

/// `destroy_room`: destroy a MUC room.
#[derive(Debug, Clone, Copy, Default)]
pub struct DestroyRoom;

impl Operation for DestroyRoom {
    type Output = bool;

    const METHOD: &'static str = "destroy_room";
    const ARGUMENTS: &'static [ArgumentDescriptor] = &[
        ArgumentDescriptor::string("name"),
        ArgumentDescriptor::string("service"),
        ArgumentDescriptor::string("host"),
    ];

    fn transform_response(
        &self,
        _context: &CallContext,
        _arguments: &Arguments,
        response: Value,
    ) -> Result<bool> {
        Ok(res_is_zero(&response))
    }
}

/// Room options keyed by option name.
pub type RoomOptions = BTreeMap<String, Value>;

/// `get_room_options`: read the configuration of a MUC room.
///
/// The reply lists options as `{option: [{name: ..}, {value: ..}]}` entries;
/// they are folded into a single map.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetRoomOptions;

impl Operation for GetRoomOptions {
    type Output = RoomOptions;

    const METHOD: &'static str = "get_room_options";
    const ARGUMENTS: &'static [ArgumentDescriptor] = &[
        ArgumentDescriptor::string("name"),
        ArgumentDescriptor::string("service"),
    ];

    fn transform_response(
        &self,
        _context: &CallContext,
        _arguments: &Arguments,
        response: Value,
    ) -> Result<RoomOptions> {
        let mut result = RoomOptions::new();
        let Some(options) = field(&response, "options").and_then(Value::as_array) else {
            return Ok(result);
        };

        for entry in options {
            let Some(option) = field(entry, "option") else {
                continue;
            };

            let (name, value) = match option.as_array().map(Vec::as_slice) {
                Some([name, value]) => (field(name, "name"), field(value, "value")),
                _ => {
                    return Err(
                        ProtocolError::new(Self::METHOD, "option is not a [name, value] pair")
                            .into(),
                    );
                }
            };

            match (name.and_then(Value::as_str), value) {
                (Some(name), Some(value)) => {
                    result.insert(name.to_string(), value.clone());
                }
                _ => {
                    return Err(
                        ProtocolError::new(Self::METHOD, "option lacks a name or value").into(),
                    );
                }
            }
        }

        Ok(result)
    }
}
