// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use bridge_core::engine::ClientEngine;
use bridge_core::ledger::IssuedTokens;
use bridge_core::{BridgeError, BridgeResult, ClientConfig, Role, SecureBytes, Suite};
use once_cell::sync::OnceCell;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One client actor. Holds its engine once configured and the ids of the
/// session tokens it issued that have not completed; the protocol state itself
/// lives in those tokens.
#[derive(Default)]
pub struct ClientActor {
    engine: OnceCell<Box<dyn ClientEngine>>,
    tokens: IssuedTokens,
}

impl ClientActor {
    /// Binds the actor to a suite and server identity.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::AlreadyInitialized`] if the actor was already
    /// configured; the existing configuration is kept.
    pub fn configure(&self, config: &ClientConfig) -> BridgeResult<()> {
        if self.engine.get().is_some() {
            return Err(BridgeError::AlreadyInitialized { role: Role::Client });
        }
        self.engine
            .set(config.suite.client_engine(&config.server_id))
            .map_err(|_| BridgeError::AlreadyInitialized { role: Role::Client })
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.get().is_some()
    }

    pub fn suite(&self) -> Option<Suite> {
        self.engine.get().map(|engine| engine.suite())
    }

    pub(crate) fn engine(&self) -> BridgeResult<&dyn ClientEngine> {
        self.engine
            .get()
            .map(|engine| engine.as_ref())
            .ok_or(BridgeError::NotInitialized { role: Role::Client })
    }

    pub(crate) fn tokens(&self) -> &IssuedTokens {
        &self.tokens
    }
}

/// Output of registration start. `state` embeds the password and must be
/// presented back unchanged to registration finish.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RegistrationStart {
    pub state: Vec<u8>,
    pub request: Vec<u8>,
}

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RegistrationFinish {
    pub record: Vec<u8>,
    pub export_key: SecureBytes,
}

/// Output of login start. `state` embeds the password and must be presented
/// back unchanged to login finish.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct LoginStart {
    pub state: Vec<u8>,
    pub ke1: Vec<u8>,
}

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct LoginFinish {
    pub ke3: Vec<u8>,
    pub session_key: SecureBytes,
    pub export_key: SecureBytes,
}
