// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use bridge_core::{BridgeResult, ClientConfig, Identifier, Registry, Role};
use tracing::debug;

use crate::state::{ClientActor, LoginFinish, LoginStart, RegistrationFinish, RegistrationStart};
use crate::{authentication, registration};

/// Client side of the bridge: a registry of client actors and the protocol
/// steps they can be driven through.
///
/// Every method takes the actor identifier first and fails with
/// [`BridgeError::ActorNotFound`](bridge_core::BridgeError::ActorNotFound)
/// for identifiers this coordinator never created. Protocol steps fail with
/// [`BridgeError::NotInitialized`](bridge_core::BridgeError::NotInitialized)
/// until the actor is configured.
pub struct ClientCoordinator {
    actors: Registry<ClientActor>,
}

impl Default for ClientCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientCoordinator {
    pub fn new() -> Self {
        Self {
            actors: Registry::new(Role::Client),
        }
    }

    /// Creates an unconfigured client actor.
    pub fn create(&self) -> Identifier {
        self.actors.create()
    }

    /// Configures an actor from boundary strings.
    pub fn configure(&self, id: &str, suite_name: &str, server_id: &str) -> BridgeResult<()> {
        let actor = self.actors.get(id)?;
        let config = ClientConfig::new(suite_name, server_id)?;
        actor.configure(&config)?;
        debug!(actor = id, suite = %config.suite, "client configured");
        Ok(())
    }

    pub fn configure_with(&self, id: &str, config: &ClientConfig) -> BridgeResult<()> {
        self.actors.get(id)?.configure(config)?;
        debug!(actor = id, suite = %config.suite, "client configured");
        Ok(())
    }

    pub fn is_initialized(&self, id: &str) -> BridgeResult<bool> {
        Ok(self.actors.get(id)?.is_initialized())
    }

    pub fn registration_start(&self, id: &str, password: &[u8]) -> BridgeResult<RegistrationStart> {
        let actor = self.actors.get(id)?;
        let out = registration::start_registration(&actor, password)?;
        debug!(actor = id, suite = ?actor.suite(), "registration started");
        Ok(out)
    }

    pub fn registration_finish(
        &self,
        id: &str,
        registration_state: &[u8],
        registration_response: &[u8],
        client_id: &str,
    ) -> BridgeResult<RegistrationFinish> {
        let actor = self.actors.get(id)?;
        let out = registration::finish_registration(
            &actor,
            registration_state,
            registration_response,
            client_id,
        )?;
        debug!(actor = id, suite = ?actor.suite(), "registration finished");
        Ok(out)
    }

    pub fn login_start(&self, id: &str, password: &[u8]) -> BridgeResult<LoginStart> {
        let actor = self.actors.get(id)?;
        let out = authentication::start_login(&actor, password)?;
        debug!(actor = id, suite = ?actor.suite(), "login started");
        Ok(out)
    }

    pub fn login_finish(
        &self,
        id: &str,
        login_state: &[u8],
        ke2: &[u8],
        client_id: &str,
    ) -> BridgeResult<LoginFinish> {
        let actor = self.actors.get(id)?;
        let out = authentication::finish_login(&actor, login_state, ke2, client_id)?;
        debug!(actor = id, suite = ?actor.suite(), "login finished");
        Ok(out)
    }

    /// Number of actors created so far.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
