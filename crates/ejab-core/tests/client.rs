//! Client tests against an in-memory transport.
//!
//! The transport records every call and answers from a per-method table, so
//! these tests cover argument injection, dispatch and reply handling without
//! a server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ejab_core::error::{IllegalArgumentError, TransportError};
use ejab_core::operation::definitions::{
    ChangePassword, CheckPasswordHash, CreateRoom, DestroyRoom, Echo, GetRoomOptions,
    MucOnlineRooms, Register, RegisteredUsers, SetNickname, UnRegister, format_password_hash_sha,
};
use ejab_core::{
    Arguments, ClientConfig, EjabberdApi, EjabberdClient, Error, Operation, Transport,
};
use serde_json::{Value, json};

#[derive(Default)]
struct FakeServer {
    replies: HashMap<&'static str, Value>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl FakeServer {
    fn with(mut self, method: &'static str, reply: Value) -> Self {
        self.replies.insert(method, reply);
        self
    }

    fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    fn last_arguments(&self) -> Value {
        let calls = self.calls();
        let (_, params) = calls.last().expect("no call recorded");
        assert_eq!(params.len(), 1, "unauthenticated calls send one param");
        params[0].clone()
    }
}

#[async_trait]
impl Transport for FakeServer {
    async fn call(&self, method: &str, params: Vec<Value>) -> ejab_core::Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        self.replies
            .get(method)
            .cloned()
            .ok_or_else(|| {
                TransportError::Fault {
                    code: -32601,
                    message: format!("unknown method {method}"),
                }
                .into()
            })
    }
}

fn client(server: FakeServer) -> (EjabberdClient<Arc<FakeServer>>, Arc<FakeServer>) {
    let server = Arc::new(server);
    let config = ClientConfig::new("localhost", 4560, "admin", "secret", "example.org");
    (EjabberdClient::new(config, Arc::clone(&server)), server)
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn test_echo() {
    let (client, server) =
        client(FakeServer::default().with("echothisnew", json!({"repeated": "ping"})));

    assert_eq!(client.echo("ping").await.unwrap().as_deref(), Some("ping"));
    assert_eq!(server.last_arguments(), json!({"sentence": "ping"}));
}

#[tokio::test]
async fn test_echo_without_repeated() {
    let (client, _) = client(FakeServer::default().with("echothisnew", json!({})));

    assert_eq!(client.echo("ping").await.unwrap(), None);
}

#[tokio::test]
async fn test_registered_users() {
    let (client, server) = client(
        FakeServer::default().with("registered_users", json!({"users": ["alice", "bob"]})),
    );

    let users = client.registered_users().await.unwrap();
    assert_eq!(users, vec!["alice", "bob"]);
    assert_eq!(server.last_arguments(), json!({"host": "example.org"}));
}

#[tokio::test]
async fn test_registered_users_empty_reply() {
    let (client, _) = client(FakeServer::default().with("registered_users", json!({})));
    assert!(client.registered_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_success() {
    let (client, server) = client(FakeServer::default().with("register", json!({"res": 0})));

    assert!(client.register("alice", "wonderland").await.unwrap());
    assert_eq!(
        server.last_arguments(),
        json!({"user": "alice", "host": "example.org", "password": "wonderland"})
    );
}

#[tokio::test]
async fn test_register_conflict() {
    let (client, _) = client(FakeServer::default().with("register", json!({"res": 1})));

    let err = client.register("alice", "wonderland").await.unwrap_err();
    assert!(matches!(err, Error::UserAlreadyRegistered(ref e) if e.username == "alice"));
}

#[tokio::test]
async fn test_register_other_status() {
    let (client, _) = client(FakeServer::default().with("register", json!({"res": 5})));
    assert!(!client.register("alice", "wonderland").await.unwrap());
}

#[tokio::test]
async fn test_unregister_and_change_password() {
    let (client, server) = client(
        FakeServer::default()
            .with("unregister", json!({"res": 0}))
            .with("change_password", json!({"res": 1})),
    );

    assert!(client.unregister("alice").await.unwrap());
    assert_eq!(
        server.last_arguments(),
        json!({"user": "alice", "host": "example.org"})
    );

    assert!(!client.change_password("alice", "new").await.unwrap());
    assert_eq!(
        server.last_arguments(),
        json!({"user": "alice", "host": "example.org", "newpass": "new"})
    );
}

#[tokio::test]
async fn test_check_password_hash_sends_digest() {
    let (client, server) =
        client(FakeServer::default().with("check_password_hash", json!({"res": 0})));

    assert!(client.check_password_hash("alice", "secret").await.unwrap());
    assert_eq!(
        server.last_arguments(),
        json!({
            "user": "alice",
            "host": "example.org",
            "passwordhash": format_password_hash_sha("secret"),
            "hashmethod": "sha"
        })
    );
}

#[tokio::test]
async fn test_set_nickname() {
    let (client, server) = client(FakeServer::default().with("set_nickname", json!({"res": 0})));

    assert!(client.set_nickname("alice", "Alice").await.unwrap());
    assert_eq!(
        server.last_arguments(),
        json!({"user": "alice", "host": "example.org", "nickname": "Alice"})
    );
}

// ============================================================================
// Multi-user chat
// ============================================================================

#[tokio::test]
async fn test_muc_online_rooms() {
    let (client, server) = client(FakeServer::default().with(
        "muc_online_rooms",
        json!({"rooms": [{"room": "lobby"}, {"room": "vip"}]}),
    ));

    assert_eq!(client.muc_online_rooms().await.unwrap(), vec!["lobby", "vip"]);
    assert_eq!(server.last_arguments(), json!({"host": "example.org"}));
}

#[tokio::test]
async fn test_create_and_destroy_room() {
    let (client, server) = client(
        FakeServer::default()
            .with("create_room", json!({"res": 0}))
            .with("destroy_room", json!({"res": 0})),
    );

    assert!(client.create_room("lobby").await.unwrap());
    assert_eq!(
        server.last_arguments(),
        json!({"name": "lobby", "service": "conference", "host": "example.org"})
    );

    assert!(client.destroy_room("lobby").await.unwrap());
    let methods: Vec<_> = server.calls().into_iter().map(|(m, _)| m).collect();
    assert_eq!(methods, vec!["create_room", "destroy_room"]);
}

#[tokio::test]
async fn test_get_room_options() {
    let (client, server) = client(FakeServer::default().with(
        "get_room_options",
        json!({"options": [{"option": [{"name": "title"}, {"value": "Room A"}]}]}),
    ));

    let options = client.get_room_options("lobby").await.unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options.get("title"), Some(&json!("Room A")));
    assert_eq!(
        server.last_arguments(),
        json!({"name": "lobby", "service": "conference"})
    );
}

#[tokio::test]
async fn test_muc_service_comes_from_config() {
    let server = Arc::new(FakeServer::default().with("create_room", json!({"res": 0})));
    let config = ClientConfig::new("localhost", 4560, "admin", "secret", "example.org")
        .with_muc_service("rooms.example.org");
    let client = EjabberdClient::new(config, Arc::clone(&server));

    client.create_room("lobby").await.unwrap();
    assert_eq!(server.last_arguments()["service"], json!("rooms.example.org"));
}

// ============================================================================
// Dispatch guarantees
// ============================================================================

async fn assert_missing_arguments_rejected<O: Operation>(operation: O) {
    let (client, server) = client(FakeServer::default().with(O::METHOD, json!({"res": 0})));

    let Err(err) = client.call(&operation, &Arguments::new()).await else {
        panic!("{} accepted empty arguments", O::METHOD);
    };
    match err {
        Error::IllegalArgument(IllegalArgumentError { argument }) => {
            let expected = O::ARGUMENTS.iter().find(|a| a.required).map(|a| a.name);
            assert_eq!(Some(argument.as_str()), expected, "{}", O::METHOD);
        }
        other => panic!("{}: unexpected error {other}", O::METHOD),
    }
    assert!(server.calls().is_empty(), "{} reached the transport", O::METHOD);
}

async fn assert_non_string_rejected<O: Operation>(operation: O) {
    let (client, server) = client(FakeServer::default().with(O::METHOD, json!({"res": 0})));

    let mut arguments = Arguments::new();
    for descriptor in O::ARGUMENTS {
        arguments.insert(descriptor.name.to_string(), json!(42));
    }
    if O::METHOD == CheckPasswordHash::METHOD {
        arguments.remove("passwordhash");
        arguments.remove("hashmethod");
        arguments.insert("password".to_string(), json!(42));
    }

    let Err(err) = client.call(&operation, &arguments).await else {
        panic!("{} accepted integer arguments", O::METHOD);
    };
    assert!(matches!(err, Error::Validation(_)), "{}: {err}", O::METHOD);
    assert!(server.calls().is_empty(), "{} reached the transport", O::METHOD);
}

#[tokio::test]
async fn test_missing_arguments_never_reach_transport() {
    assert_missing_arguments_rejected(Echo).await;
    assert_missing_arguments_rejected(RegisteredUsers).await;
    assert_missing_arguments_rejected(Register).await;
    assert_missing_arguments_rejected(UnRegister).await;
    assert_missing_arguments_rejected(ChangePassword).await;
    assert_missing_arguments_rejected(CheckPasswordHash).await;
    assert_missing_arguments_rejected(SetNickname).await;
    assert_missing_arguments_rejected(MucOnlineRooms).await;
    assert_missing_arguments_rejected(CreateRoom).await;
    assert_missing_arguments_rejected(DestroyRoom).await;
    assert_missing_arguments_rejected(GetRoomOptions).await;
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_transport() {
    assert_non_string_rejected(Echo).await;
    assert_non_string_rejected(RegisteredUsers).await;
    assert_non_string_rejected(Register).await;
    assert_non_string_rejected(UnRegister).await;
    assert_non_string_rejected(ChangePassword).await;
    assert_non_string_rejected(CheckPasswordHash).await;
    assert_non_string_rejected(SetNickname).await;
    assert_non_string_rejected(MucOnlineRooms).await;
    assert_non_string_rejected(CreateRoom).await;
    assert_non_string_rejected(DestroyRoom).await;
    assert_non_string_rejected(GetRoomOptions).await;
}

#[tokio::test]
async fn test_transport_errors_propagate() {
    let (client, _) = client(FakeServer::default());

    let err = client.echo("hello").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Fault { code: -32601, .. })
    ));
}
