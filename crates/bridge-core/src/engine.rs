// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

//! Adapter over the `opaque-ke` protocol engine.
//!
//! Coordinators only see the object-safe [`ClientEngine`] and [`ServerEngine`]
//! traits. Every engine value crossing the adapter is already in the engine's
//! own serialized form, so the coordinators never name a cipher suite type.

use opaque_ke::key_exchange::tripledh::TripleDh;
use opaque_ke::keypair::KeyPair;
use opaque_ke::ksf::Identity;
use opaque_ke::{
    CipherSuite, ClientLogin, ClientLoginFinishParameters, ClientRegistration,
    ClientRegistrationFinishParameters, CredentialFinalization, CredentialRequest,
    CredentialResponse, Identifiers, RegistrationRequest, RegistrationResponse,
    RegistrationUpload, Ristretto255, ServerLogin, ServerLoginStartParameters,
    ServerRegistration, ServerSetup,
};
use p256::NistP256;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::suite::Suite;
use crate::types::{BridgeError, BridgeResult, SecureBytes};

/// Output of a flow's first step: the engine's continuation state and the
/// message for the peer.
pub struct EngineStep {
    pub state: SecureBytes,
    pub message: Vec<u8>,
}

/// Output of client registration finish.
pub struct RegistrationOutput {
    pub record: Vec<u8>,
    pub export_key: SecureBytes,
}

/// Output of client login finish.
pub struct LoginOutput {
    pub ke3: Vec<u8>,
    pub session_key: SecureBytes,
    pub export_key: SecureBytes,
}

/// Client side of the engine, bound to one suite and one server identity.
pub trait ClientEngine: Send + Sync {
    fn suite(&self) -> Suite;

    fn server_id(&self) -> &str;

    /// Blinds `password` into a registration request.
    fn start_registration(&self, password: &[u8]) -> BridgeResult<EngineStep>;

    /// Unblinds the server response and seals the envelope into a
    /// registration record.
    fn finish_registration(
        &self,
        state: &[u8],
        password: &[u8],
        response: &[u8],
        client_id: &str,
    ) -> BridgeResult<RegistrationOutput>;

    /// Produces KE1.
    fn start_login(&self, password: &[u8]) -> BridgeResult<EngineStep>;

    /// Consumes KE2 and produces KE3 plus the session and export keys.
    fn finish_login(
        &self,
        state: &[u8],
        password: &[u8],
        ke2: &[u8],
        client_id: &str,
    ) -> BridgeResult<LoginOutput>;
}

/// Server side of the engine, bound to one suite, identity, and static key.
pub trait ServerEngine: Send + Sync {
    fn suite(&self) -> Suite;

    fn server_id(&self) -> &str;

    /// Serialized static public key.
    fn public_key(&self) -> Vec<u8>;

    /// Fresh random OPRF seed of [`Suite::oprf_seed_len`] bytes.
    fn generate_oprf_seed(&self) -> SecureBytes;

    /// Evaluates a registration request under the per-credential OPRF key.
    fn evaluate_registration(
        &self,
        request: &[u8],
        oprf_seed: &[u8],
        credential_id: &str,
    ) -> BridgeResult<Vec<u8>>;

    /// Consumes KE1 against a stored record and produces KE2.
    fn start_login(
        &self,
        record: &[u8],
        ke1: &[u8],
        oprf_seed: &[u8],
        credential_id: &str,
        client_id: &str,
    ) -> BridgeResult<EngineStep>;

    /// Verifies KE3 and returns the session key.
    fn finish_login(&self, state: &[u8], ke3: &[u8]) -> BridgeResult<SecureBytes>;
}

/// `opaque-ke` parameters for [`Suite::Ristretto255`].
pub struct Ristretto255Suite;

impl CipherSuite for Ristretto255Suite {
    type OprfCs = Ristretto255;
    type KeGroup = Ristretto255;
    type KeyExchange = TripleDh;
    type Ksf = Identity;
}

/// `opaque-ke` parameters for [`Suite::P256`].
pub struct P256Suite;

impl CipherSuite for P256Suite {
    type OprfCs = NistP256;
    type KeGroup = NistP256;
    type KeyExchange = TripleDh;
    type Ksf = Identity;
}

fn identifiers<'a>(client_id: &'a str, server_id: &'a str) -> Identifiers<'a> {
    Identifiers {
        client: Some(client_id.as_bytes()),
        server: Some(server_id.as_bytes()),
    }
}

// `deserialize` reads a fixed-size prefix and ignores anything after it, so
// the parsed value is re-serialized and its length checked against the input.
macro_rules! deserialize_exact {
    ($ty:ty, $bytes:expr, $what:literal) => {{
        let bytes: &[u8] = $bytes;
        let value = <$ty>::deserialize(bytes).map_err(BridgeError::engine)?;
        let expected = value.serialize().len();
        if bytes.len() != expected {
            return Err(BridgeError::Engine(format!(
                "{} must be {expected} bytes, got {}",
                $what,
                bytes.len()
            )));
        }
        value
    }};
}

// The engine's generic APIs carry suite-specific where clauses, so each suite
// gets concrete impls instead of one generic one.
macro_rules! opaque_engine {
    ($suite:expr, $cs:ty, $group:ty, $client:ident, $server:ident) => {
        /// Engine client for one suite.
        pub struct $client {
            server_id: String,
        }

        impl $client {
            pub fn new(server_id: &str) -> Self {
                Self {
                    server_id: server_id.to_owned(),
                }
            }
        }

        impl ClientEngine for $client {
            fn suite(&self) -> Suite {
                $suite
            }

            fn server_id(&self) -> &str {
                &self.server_id
            }

            fn start_registration(&self, password: &[u8]) -> BridgeResult<EngineStep> {
                let start = ClientRegistration::<$cs>::start(&mut OsRng, password)
                    .map_err(BridgeError::engine)?;
                Ok(EngineStep {
                    state: SecureBytes::from_slice(&start.state.serialize()),
                    message: start.message.serialize().to_vec(),
                })
            }

            fn finish_registration(
                &self,
                state: &[u8],
                password: &[u8],
                response: &[u8],
                client_id: &str,
            ) -> BridgeResult<RegistrationOutput> {
                let state = deserialize_exact!(ClientRegistration<$cs>, state, "registration state");
                let response =
                    deserialize_exact!(RegistrationResponse<$cs>, response, "registration response");
                let finish = state
                    .finish(
                        &mut OsRng,
                        password,
                        response,
                        ClientRegistrationFinishParameters::new(
                            identifiers(client_id, &self.server_id),
                            None,
                        ),
                    )
                    .map_err(BridgeError::engine)?;
                Ok(RegistrationOutput {
                    record: finish.message.serialize().to_vec(),
                    export_key: SecureBytes::from_slice(&finish.export_key),
                })
            }

            fn start_login(&self, password: &[u8]) -> BridgeResult<EngineStep> {
                let start =
                    ClientLogin::<$cs>::start(&mut OsRng, password).map_err(BridgeError::engine)?;
                Ok(EngineStep {
                    state: SecureBytes::from_slice(&start.state.serialize()),
                    message: start.message.serialize().to_vec(),
                })
            }

            fn finish_login(
                &self,
                state: &[u8],
                password: &[u8],
                ke2: &[u8],
                client_id: &str,
            ) -> BridgeResult<LoginOutput> {
                let state = deserialize_exact!(ClientLogin<$cs>, state, "login state");
                let ke2 = deserialize_exact!(CredentialResponse<$cs>, ke2, "ke2");
                let finish = state
                    .finish(
                        password,
                        ke2,
                        ClientLoginFinishParameters::new(
                            None,
                            identifiers(client_id, &self.server_id),
                            None,
                        ),
                    )
                    .map_err(BridgeError::engine)?;
                Ok(LoginOutput {
                    ke3: finish.message.serialize().to_vec(),
                    session_key: SecureBytes::from_slice(&finish.session_key),
                    export_key: SecureBytes::from_slice(&finish.export_key),
                })
            }
        }

        /// Engine server for one suite.
        pub struct $server {
            server_id: String,
            setup: ServerSetup<$cs>,
        }

        impl $server {
            pub fn new(server_id: &str, private_key: Option<&[u8]>) -> BridgeResult<Self> {
                let setup = match private_key {
                    Some(key) => {
                        let keypair = KeyPair::<$group>::from_private_key_slice(key)
                            .map_err(BridgeError::engine)?;
                        ServerSetup::<$cs>::new_with_key(&mut OsRng, keypair)
                    }
                    None => ServerSetup::<$cs>::new(&mut OsRng),
                };
                Ok(Self {
                    server_id: server_id.to_owned(),
                    setup,
                })
            }

            /// The configured setup with its OPRF seed replaced by the
            /// caller-held one. The seed is the leading field of the
            /// serialized setup.
            fn setup_with_seed(&self, oprf_seed: &[u8]) -> BridgeResult<ServerSetup<$cs>> {
                let seed_length = $suite.oprf_seed_len();
                if oprf_seed.len() != seed_length {
                    return Err(BridgeError::InvalidArgument(format!(
                        "oprfSeed must be {seed_length} bytes for {}",
                        $suite
                    )));
                }
                let mut raw = SecureBytes::from_slice(&self.setup.serialize());
                raw.data_mut()[..seed_length].copy_from_slice(oprf_seed);
                ServerSetup::<$cs>::deserialize(raw.data()).map_err(BridgeError::engine)
            }
        }

        impl ServerEngine for $server {
            fn suite(&self) -> Suite {
                $suite
            }

            fn server_id(&self) -> &str {
                &self.server_id
            }

            fn public_key(&self) -> Vec<u8> {
                self.setup.keypair().public().serialize().to_vec()
            }

            fn generate_oprf_seed(&self) -> SecureBytes {
                let mut seed = SecureBytes::from(vec![0u8; $suite.oprf_seed_len()]);
                OsRng.fill_bytes(seed.data_mut());
                seed
            }

            fn evaluate_registration(
                &self,
                request: &[u8],
                oprf_seed: &[u8],
                credential_id: &str,
            ) -> BridgeResult<Vec<u8>> {
                let setup = self.setup_with_seed(oprf_seed)?;
                let request =
                    deserialize_exact!(RegistrationRequest<$cs>, request, "registration request");
                let start =
                    ServerRegistration::<$cs>::start(&setup, request, credential_id.as_bytes())
                        .map_err(BridgeError::engine)?;
                Ok(start.message.serialize().to_vec())
            }

            fn start_login(
                &self,
                record: &[u8],
                ke1: &[u8],
                oprf_seed: &[u8],
                credential_id: &str,
                client_id: &str,
            ) -> BridgeResult<EngineStep> {
                let setup = self.setup_with_seed(oprf_seed)?;
                let upload = deserialize_exact!(RegistrationUpload<$cs>, record, "registration record");
                let password_file = ServerRegistration::<$cs>::finish(upload);
                let ke1 = deserialize_exact!(CredentialRequest<$cs>, ke1, "ke1");
                let start = ServerLogin::<$cs>::start(
                    &mut OsRng,
                    &setup,
                    Some(password_file),
                    ke1,
                    credential_id.as_bytes(),
                    ServerLoginStartParameters {
                        context: None,
                        identifiers: identifiers(client_id, &self.server_id),
                    },
                )
                .map_err(BridgeError::engine)?;
                Ok(EngineStep {
                    state: SecureBytes::from_slice(&start.state.serialize()),
                    message: start.message.serialize().to_vec(),
                })
            }

            fn finish_login(&self, state: &[u8], ke3: &[u8]) -> BridgeResult<SecureBytes> {
                let state = deserialize_exact!(ServerLogin<$cs>, state, "server login state");
                let ke3 = deserialize_exact!(CredentialFinalization<$cs>, ke3, "ke3");
                let finish = state.finish(ke3).map_err(BridgeError::engine)?;
                Ok(SecureBytes::from_slice(&finish.session_key))
            }
        }
    };
}

opaque_engine!(
    Suite::Ristretto255,
    Ristretto255Suite,
    Ristretto255,
    Ristretto255Client,
    Ristretto255Server
);
opaque_engine!(Suite::P256, P256Suite, NistP256, P256Client, P256Server);
