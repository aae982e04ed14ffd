// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use bridge_core::{BridgeResult, Identifier, Registry, Role, SecureBytes, ServerConfig};
use tracing::debug;

use crate::state::{LoginStart, ServerActor};
use crate::{authentication, registration};

/// Server side of the bridge: a registry of server actors and the steps they
/// answer.
pub struct ServerCoordinator {
    actors: Registry<ServerActor>,
}

impl Default for ServerCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerCoordinator {
    pub fn new() -> Self {
        Self {
            actors: Registry::new(Role::Server),
        }
    }

    pub fn create(&self) -> Identifier {
        self.actors.create()
    }

    /// Configures an actor from boundary values. `private_key` of `None`
    /// generates a fresh static key pair.
    pub fn configure(
        &self,
        id: &str,
        suite_name: &str,
        server_id: &str,
        private_key: Option<&[u8]>,
    ) -> BridgeResult<()> {
        let actor = self.actors.get(id)?;
        let config = ServerConfig::new(suite_name, server_id, private_key)?;
        actor.configure(&config)?;
        debug!(
            actor = id,
            suite = %config.suite,
            supplied_key = private_key.is_some(),
            "server configured"
        );
        Ok(())
    }

    pub fn configure_with(&self, id: &str, config: &ServerConfig) -> BridgeResult<()> {
        self.actors.get(id)?.configure(config)?;
        debug!(actor = id, suite = %config.suite, "server configured");
        Ok(())
    }

    pub fn is_initialized(&self, id: &str) -> BridgeResult<bool> {
        Ok(self.actors.get(id)?.is_initialized())
    }

    pub fn public_key(&self, id: &str) -> BridgeResult<Vec<u8>> {
        self.actors.get(id)?.public_key()
    }

    pub fn generate_oprf_seed(&self, id: &str) -> BridgeResult<SecureBytes> {
        let actor = self.actors.get(id)?;
        registration::generate_oprf_seed(&actor)
    }

    pub fn registration_eval(
        &self,
        id: &str,
        registration_request: &[u8],
        oprf_seed: &[u8],
        credential_id: &str,
    ) -> BridgeResult<Vec<u8>> {
        let actor = self.actors.get(id)?;
        let response = registration::evaluate_registration(
            &actor,
            registration_request,
            oprf_seed,
            credential_id,
        )?;
        debug!(actor = id, suite = ?actor.suite(), "registration evaluated");
        Ok(response)
    }

    pub fn login_start(
        &self,
        id: &str,
        record: &[u8],
        ke1: &[u8],
        oprf_seed: &[u8],
        credential_id: &str,
        client_id: &str,
    ) -> BridgeResult<LoginStart> {
        let actor = self.actors.get(id)?;
        let out =
            authentication::start_login(&actor, record, ke1, oprf_seed, credential_id, client_id)?;
        debug!(actor = id, suite = ?actor.suite(), "login started");
        Ok(out)
    }

    pub fn login_finish(&self, id: &str, login_state: &[u8], ke3: &[u8]) -> BridgeResult<SecureBytes> {
        let actor = self.actors.get(id)?;
        let session_key = authentication::finish_login(&actor, login_state, ke3)?;
        debug!(actor = id, suite = ?actor.suite(), "login finished");
        Ok(session_key)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
