// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::suite::Suite;
use crate::types::BridgeResult;

/// Configuration applied once to a client actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub suite: Suite,
    /// Identity of the server this client registers with and logs in to.
    pub server_id: String,
}

impl ClientConfig {
    /// Parses a suite name as received at the boundary.
    pub fn new(suite_name: &str, server_id: &str) -> BridgeResult<Self> {
        Ok(Self {
            suite: suite_name.parse()?,
            server_id: server_id.to_owned(),
        })
    }
}

/// Configuration applied once to a server actor.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub suite: Suite,
    pub server_id: String,
    /// Long-term private key; the engine generates one when absent.
    #[serde(default)]
    pub private_key: Option<Vec<u8>>,
}

impl ServerConfig {
    pub fn new(suite_name: &str, server_id: &str, private_key: Option<&[u8]>) -> BridgeResult<Self> {
        Ok(Self {
            suite: suite_name.parse()?,
            server_id: server_id.to_owned(),
            private_key: private_key.map(<[u8]>::to_vec),
        })
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("suite", &self.suite)
            .field("server_id", &self.server_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.private_key.zeroize();
    }
}
