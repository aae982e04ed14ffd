// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use bridge_core::engine::ServerEngine;
use bridge_core::ledger::IssuedTokens;
use bridge_core::{BridgeError, BridgeResult, Role, ServerConfig, Suite};
use once_cell::sync::OnceCell;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One server actor: its engine once configured, plus the ledger of login
/// tokens it issued that have not completed.
#[derive(Default)]
pub struct ServerActor {
    engine: OnceCell<Box<dyn ServerEngine>>,
    tokens: IssuedTokens,
}

impl ServerActor {
    /// Binds the actor to a suite, server identity, and static key. A key pair
    /// is generated when the configuration carries no private key.
    ///
    /// # Errors
    ///
    /// [`BridgeError::AlreadyInitialized`] on a second call, or
    /// [`BridgeError::Engine`] if the private key is rejected.
    pub fn configure(&self, config: &ServerConfig) -> BridgeResult<()> {
        if self.engine.get().is_some() {
            return Err(BridgeError::AlreadyInitialized { role: Role::Server });
        }
        let engine = config
            .suite
            .server_engine(&config.server_id, config.private_key.as_deref())?;
        self.engine
            .set(engine)
            .map_err(|_| BridgeError::AlreadyInitialized { role: Role::Server })
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.get().is_some()
    }

    pub fn suite(&self) -> Option<Suite> {
        self.engine.get().map(|engine| engine.suite())
    }

    /// Serialized static public key.
    pub fn public_key(&self) -> BridgeResult<Vec<u8>> {
        Ok(self.engine()?.public_key())
    }

    pub(crate) fn engine(&self) -> BridgeResult<&dyn ServerEngine> {
        self.engine
            .get()
            .map(|engine| engine.as_ref())
            .ok_or(BridgeError::NotInitialized { role: Role::Server })
    }

    pub(crate) fn tokens(&self) -> &IssuedTokens {
        &self.tokens
    }
}

/// Output of server login start.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct LoginStart {
    pub state: Vec<u8>,
    pub ke2: Vec<u8>,
}
