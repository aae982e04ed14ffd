use std::sync::Arc;
use std::thread;

use bridge_agent::*;
use bridge_core::{BridgeError, Identifier, Role, StateDecodeError, Suite};
use bridge_relay::ServerCoordinator;

const SERVER_ID: &str = "auth.example.com";
const CLIENT_ID: &str = "alice@example.com";
const CREDENTIAL_ID: &str = "credential-alice";
const PASSWORD: &[u8] = b"correct horse battery staple";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Session {
    clients: ClientCoordinator,
    servers: ServerCoordinator,
    client: Identifier,
    server: Identifier,
    seed: Vec<u8>,
}

impl Session {
    fn new(suite_name: &str) -> Self {
        let clients = ClientCoordinator::new();
        let servers = ServerCoordinator::new();
        let client = clients.create();
        let server = servers.create();
        clients
            .configure(client.as_str(), suite_name, SERVER_ID)
            .unwrap();
        servers
            .configure(server.as_str(), suite_name, SERVER_ID, None)
            .unwrap();
        let seed = servers.generate_oprf_seed(server.as_str()).unwrap().to_vec();
        Self {
            clients,
            servers,
            client,
            server,
            seed,
        }
    }

    fn register(&self, password: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let start = self
            .clients
            .registration_start(self.client.as_str(), password)
            .unwrap();
        let response = self
            .servers
            .registration_eval(self.server.as_str(), &start.request, &self.seed, CREDENTIAL_ID)
            .unwrap();
        let finish = self
            .clients
            .registration_finish(self.client.as_str(), &start.state, &response, CLIENT_ID)
            .unwrap();
        (finish.record.clone(), finish.export_key.to_vec())
    }

    fn login(&self, record: &[u8], password: &[u8]) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>), BridgeError> {
        let start = self.clients.login_start(self.client.as_str(), password)?;
        let server_start = self.servers.login_start(
            self.server.as_str(),
            record,
            &start.ke1,
            &self.seed,
            CREDENTIAL_ID,
            CLIENT_ID,
        )?;
        let finish = self.clients.login_finish(
            self.client.as_str(),
            &start.state,
            &server_start.ke2,
            CLIENT_ID,
        )?;
        let server_key =
            self.servers
                .login_finish(self.server.as_str(), &server_start.state, &finish.ke3)?;
        Ok((
            finish.session_key.to_vec(),
            server_key.to_vec(),
            finish.export_key.to_vec(),
        ))
    }
}

#[test]
fn registration_and_login_agree_for_every_suite() {
    init_tracing();
    for suite_name in ["Ristretto255Suite", "P256Suite"] {
        let session = Session::new(suite_name);
        let (record, registration_export) = session.register(PASSWORD);
        let (client_key, server_key, login_export) = session.login(&record, PASSWORD).unwrap();
        assert_eq!(client_key, server_key, "{suite_name}");
        assert_eq!(registration_export, login_export, "{suite_name}");
    }
}

#[test]
fn wrong_password_fails_with_engine_error() {
    let session = Session::new("ristretto255");
    let (record, _) = session.register(PASSWORD);
    let err = session.login(&record, b"not the password").err().unwrap();
    assert!(matches!(err, BridgeError::Engine(_)), "{err:?}");
}

#[test]
fn configure_reports_initialization() {
    let clients = ClientCoordinator::new();
    let id = clients.create();
    assert!(!clients.is_initialized(id.as_str()).unwrap());
    clients.configure(id.as_str(), "p256", SERVER_ID).unwrap();
    assert!(clients.is_initialized(id.as_str()).unwrap());
}

#[test]
fn steps_before_configure_are_not_initialized() {
    let clients = ClientCoordinator::new();
    let id = clients.create();
    let expected = BridgeError::NotInitialized { role: Role::Client };

    assert_eq!(
        clients.registration_start(id.as_str(), PASSWORD).err(),
        Some(expected.clone())
    );
    assert_eq!(
        clients
            .registration_finish(id.as_str(), b"state", b"response", CLIENT_ID)
            .err(),
        Some(expected.clone())
    );
    assert_eq!(
        clients.login_start(id.as_str(), PASSWORD).err(),
        Some(expected.clone())
    );
    assert_eq!(
        clients
            .login_finish(id.as_str(), b"state", b"ke2", CLIENT_ID)
            .err(),
        Some(expected)
    );
}

#[test]
fn unknown_actor_is_not_found() {
    let clients = ClientCoordinator::new();
    clients.create();
    let not_found = |err: Option<BridgeError>| {
        matches!(err, Some(BridgeError::ActorNotFound { role: Role::Client, .. }))
    };
    assert!(not_found(clients.is_initialized("nobody00").err()));
    assert!(not_found(clients.configure("nobody00", "p256", SERVER_ID).err()));
    assert!(not_found(clients.registration_start("nobody00", PASSWORD).err()));
    assert!(not_found(clients.login_start("nobody00", PASSWORD).err()));
}

#[test]
fn unsupported_suite_leaves_actor_unconfigured() {
    let clients = ClientCoordinator::new();
    let id = clients.create();
    assert_eq!(
        clients.configure(id.as_str(), "curve448", SERVER_ID).err(),
        Some(BridgeError::UnsupportedSuite("curve448".into()))
    );
    assert!(!clients.is_initialized(id.as_str()).unwrap());
    clients.configure(id.as_str(), "ristretto255", SERVER_ID).unwrap();
}

#[test]
fn second_configure_is_rejected() {
    let clients = ClientCoordinator::new();
    let id = clients.create();
    clients.configure(id.as_str(), "ristretto255", SERVER_ID).unwrap();
    assert_eq!(
        clients.configure(id.as_str(), "p256", SERVER_ID).err(),
        Some(BridgeError::AlreadyInitialized { role: Role::Client })
    );
    let token = clients.login_start(id.as_str(), PASSWORD).unwrap();
    assert_eq!(token.state[1], Suite::Ristretto255.tag());
}

#[test]
fn empty_password_is_invalid() {
    let session = Session::new("p256");
    assert!(matches!(
        session.clients.registration_start(session.client.as_str(), b""),
        Err(BridgeError::InvalidArgument(_))
    ));
    assert!(matches!(
        session.clients.login_start(session.client.as_str(), &[0u8; 5000]),
        Err(BridgeError::InvalidArgument(_))
    ));
}

#[test]
fn finished_registration_token_cannot_be_replayed() {
    let session = Session::new("ristretto255");
    let start = session
        .clients
        .registration_start(session.client.as_str(), PASSWORD)
        .unwrap();
    let response = session
        .servers
        .registration_eval(session.server.as_str(), &start.request, &session.seed, CREDENTIAL_ID)
        .unwrap();
    session
        .clients
        .registration_finish(session.client.as_str(), &start.state, &response, CLIENT_ID)
        .unwrap();
    assert_eq!(
        session
            .clients
            .registration_finish(session.client.as_str(), &start.state, &response, CLIENT_ID)
            .err(),
        Some(BridgeError::StateConsumed)
    );
}

#[test]
fn finished_login_token_cannot_be_replayed() {
    init_tracing();
    let session = Session::new("p256");
    let (record, _) = session.register(PASSWORD);
    let start = session.clients.login_start(session.client.as_str(), PASSWORD).unwrap();
    let server_start = session
        .servers
        .login_start(
            session.server.as_str(),
            &record,
            &start.ke1,
            &session.seed,
            CREDENTIAL_ID,
            CLIENT_ID,
        )
        .unwrap();
    let finish = session
        .clients
        .login_finish(session.client.as_str(), &start.state, &server_start.ke2, CLIENT_ID)
        .unwrap();
    assert_eq!(
        session
            .clients
            .login_finish(session.client.as_str(), &start.state, &server_start.ke2, CLIENT_ID)
            .err(),
        Some(BridgeError::StateConsumed)
    );
    session
        .servers
        .login_finish(session.server.as_str(), &server_start.state, &finish.ke3)
        .unwrap();
    assert_eq!(
        session
            .servers
            .login_finish(session.server.as_str(), &server_start.state, &finish.ke3)
            .err(),
        Some(BridgeError::StateConsumed)
    );
}

#[test]
fn failed_finish_leaves_token_usable() {
    let session = Session::new("ristretto255");
    let start = session
        .clients
        .registration_start(session.client.as_str(), PASSWORD)
        .unwrap();
    let bad = session
        .clients
        .registration_finish(session.client.as_str(), &start.state, b"garbage", CLIENT_ID);
    assert!(matches!(bad, Err(BridgeError::Engine(_))));

    let response = session
        .servers
        .registration_eval(session.server.as_str(), &start.request, &session.seed, CREDENTIAL_ID)
        .unwrap();
    assert!(session
        .clients
        .registration_finish(session.client.as_str(), &start.state, &response, CLIENT_ID)
        .is_ok());
}

#[test]
fn token_from_another_suite_is_rejected() {
    let clients = ClientCoordinator::new();
    let ristretto = clients.create();
    let p256 = clients.create();
    clients.configure(ristretto.as_str(), "ristretto255", SERVER_ID).unwrap();
    clients.configure(p256.as_str(), "p256", SERVER_ID).unwrap();

    let start = clients.login_start(ristretto.as_str(), PASSWORD).unwrap();
    assert_eq!(
        clients
            .login_finish(p256.as_str(), &start.state, b"ke2", CLIENT_ID)
            .err(),
        Some(BridgeError::StateDecode(StateDecodeError::SuiteMismatch {
            expected: Suite::P256,
            found: Suite::Ristretto255,
        }))
    );
}

#[test]
fn login_token_cannot_finish_registration() {
    let session = Session::new("ristretto255");
    let start = session.clients.login_start(session.client.as_str(), PASSWORD).unwrap();
    let err = session
        .clients
        .registration_finish(session.client.as_str(), &start.state, b"response", CLIENT_ID)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        BridgeError::StateDecode(StateDecodeError::FlowMismatch { .. })
    ));
}

#[test]
fn truncated_token_is_a_decode_error() {
    let session = Session::new("p256");
    let start = session.clients.login_start(session.client.as_str(), PASSWORD).unwrap();
    let err = session
        .clients
        .login_finish(session.client.as_str(), &start.state[..10], b"ke2", CLIENT_ID)
        .err()
        .unwrap();
    assert_eq!(err, BridgeError::StateDecode(StateDecodeError::Truncated));
}

fn flip_token_id(token: &[u8]) -> Vec<u8> {
    let mut tampered = token.to_vec();
    tampered[3] ^= 0x01;
    tampered
}

#[test]
fn token_is_bound_to_the_issuing_actor() {
    let session = Session::new("ristretto255");
    let (record, _) = session.register(PASSWORD);
    let other = session.clients.create();
    session
        .clients
        .configure(other.as_str(), "ristretto255", SERVER_ID)
        .unwrap();

    let start = session.clients.login_start(session.client.as_str(), PASSWORD).unwrap();
    let server_start = session
        .servers
        .login_start(
            session.server.as_str(),
            &record,
            &start.ke1,
            &session.seed,
            CREDENTIAL_ID,
            CLIENT_ID,
        )
        .unwrap();
    assert_eq!(
        session
            .clients
            .login_finish(other.as_str(), &start.state, &server_start.ke2, CLIENT_ID)
            .err(),
        Some(BridgeError::StateConsumed)
    );

    let finish = session
        .clients
        .login_finish(session.client.as_str(), &start.state, &server_start.ke2, CLIENT_ID)
        .unwrap();
    let server_key = session
        .servers
        .login_finish(session.server.as_str(), &server_start.state, &finish.ke3)
        .unwrap();
    assert_eq!(finish.session_key, server_key);
}

#[test]
fn finished_tokens_cannot_be_replayed_on_other_actors() {
    let session = Session::new("p256");
    let (record, _) = session.register(PASSWORD);
    let other_client = session.clients.create();
    session
        .clients
        .configure(other_client.as_str(), "p256", SERVER_ID)
        .unwrap();
    let other_server = session.servers.create();
    session
        .servers
        .configure(other_server.as_str(), "p256", SERVER_ID, None)
        .unwrap();

    let start = session.clients.login_start(session.client.as_str(), PASSWORD).unwrap();
    let server_start = session
        .servers
        .login_start(
            session.server.as_str(),
            &record,
            &start.ke1,
            &session.seed,
            CREDENTIAL_ID,
            CLIENT_ID,
        )
        .unwrap();
    let finish = session
        .clients
        .login_finish(session.client.as_str(), &start.state, &server_start.ke2, CLIENT_ID)
        .unwrap();
    session
        .servers
        .login_finish(session.server.as_str(), &server_start.state, &finish.ke3)
        .unwrap();

    assert_eq!(
        session
            .clients
            .login_finish(other_client.as_str(), &start.state, &server_start.ke2, CLIENT_ID)
            .err(),
        Some(BridgeError::StateConsumed)
    );
    assert_eq!(
        session
            .servers
            .login_finish(other_server.as_str(), &server_start.state, &finish.ke3)
            .err(),
        Some(BridgeError::StateConsumed)
    );
}

#[test]
fn finished_tokens_with_edited_id_cannot_be_replayed() {
    let session = Session::new("ristretto255");

    let registration = session
        .clients
        .registration_start(session.client.as_str(), PASSWORD)
        .unwrap();
    let response = session
        .servers
        .registration_eval(
            session.server.as_str(),
            &registration.request,
            &session.seed,
            CREDENTIAL_ID,
        )
        .unwrap();
    let record = session
        .clients
        .registration_finish(session.client.as_str(), &registration.state, &response, CLIENT_ID)
        .unwrap()
        .record
        .clone();
    assert_eq!(
        session
            .clients
            .registration_finish(
                session.client.as_str(),
                &flip_token_id(&registration.state),
                &response,
                CLIENT_ID,
            )
            .err(),
        Some(BridgeError::StateConsumed)
    );

    let start = session.clients.login_start(session.client.as_str(), PASSWORD).unwrap();
    let server_start = session
        .servers
        .login_start(
            session.server.as_str(),
            &record,
            &start.ke1,
            &session.seed,
            CREDENTIAL_ID,
            CLIENT_ID,
        )
        .unwrap();
    let finish = session
        .clients
        .login_finish(session.client.as_str(), &start.state, &server_start.ke2, CLIENT_ID)
        .unwrap();
    session
        .servers
        .login_finish(session.server.as_str(), &server_start.state, &finish.ke3)
        .unwrap();

    assert_eq!(
        session
            .clients
            .login_finish(
                session.client.as_str(),
                &flip_token_id(&start.state),
                &server_start.ke2,
                CLIENT_ID,
            )
            .err(),
        Some(BridgeError::StateConsumed)
    );
    assert_eq!(
        session
            .servers
            .login_finish(
                session.server.as_str(),
                &flip_token_id(&server_start.state),
                &finish.ke3,
            )
            .err(),
        Some(BridgeError::StateConsumed)
    );
}

#[test]
fn interleaved_flows_on_one_actor_do_not_interfere() {
    let session = Session::new("ristretto255");
    let (record, _) = session.register(PASSWORD);

    let first = session.clients.login_start(session.client.as_str(), PASSWORD).unwrap();
    let second = session.clients.login_start(session.client.as_str(), PASSWORD).unwrap();
    let server_first = session
        .servers
        .login_start(session.server.as_str(), &record, &first.ke1, &session.seed, CREDENTIAL_ID, CLIENT_ID)
        .unwrap();
    let server_second = session
        .servers
        .login_start(session.server.as_str(), &record, &second.ke1, &session.seed, CREDENTIAL_ID, CLIENT_ID)
        .unwrap();

    let finish_second = session
        .clients
        .login_finish(session.client.as_str(), &second.state, &server_second.ke2, CLIENT_ID)
        .unwrap();
    let finish_first = session
        .clients
        .login_finish(session.client.as_str(), &first.state, &server_first.ke2, CLIENT_ID)
        .unwrap();

    let key_first = session
        .servers
        .login_finish(session.server.as_str(), &server_first.state, &finish_first.ke3)
        .unwrap();
    let key_second = session
        .servers
        .login_finish(session.server.as_str(), &server_second.state, &finish_second.ke3)
        .unwrap();
    assert_eq!(finish_first.session_key, key_first);
    assert_eq!(finish_second.session_key, key_second);
    assert_ne!(key_first, key_second);
}

#[test]
fn concurrent_sessions_on_many_actors() {
    let clients = Arc::new(ClientCoordinator::new());
    let servers = Arc::new(ServerCoordinator::new());
    let server = servers.create();
    servers
        .configure(server.as_str(), "ristretto255", SERVER_ID, None)
        .unwrap();
    let seed = servers.generate_oprf_seed(server.as_str()).unwrap().to_vec();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let clients = Arc::clone(&clients);
            let servers = Arc::clone(&servers);
            let server = server.clone();
            let seed = seed.clone();
            thread::spawn(move || {
                let client = clients.create();
                clients
                    .configure(client.as_str(), "ristretto255", SERVER_ID)
                    .unwrap();
                let credential = format!("credential-{i}");
                let user = format!("user-{i}");
                let password = format!("password-{i}");

                let start = clients
                    .registration_start(client.as_str(), password.as_bytes())
                    .unwrap();
                let response = servers
                    .registration_eval(server.as_str(), &start.request, &seed, &credential)
                    .unwrap();
                let record = clients
                    .registration_finish(client.as_str(), &start.state, &response, &user)
                    .unwrap()
                    .record
                    .clone();

                let start = clients.login_start(client.as_str(), password.as_bytes()).unwrap();
                let server_start = servers
                    .login_start(server.as_str(), &record, &start.ke1, &seed, &credential, &user)
                    .unwrap();
                let finish = clients
                    .login_finish(client.as_str(), &start.state, &server_start.ke2, &user)
                    .unwrap();
                let server_key = servers
                    .login_finish(server.as_str(), &server_start.state, &finish.ke3)
                    .unwrap();
                assert_eq!(finish.session_key, server_key);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(clients.len(), 8);
}
