// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::{self, ClientEngine, ServerEngine};
use crate::types::{BridgeError, BridgeResult};

/// The fixed set of cipher suites an actor can be configured with.
///
/// A suite fixes the OPRF group, the key-exchange group, and the hash used for
/// derivations. Session tokens record the suite they were produced under and
/// are rejected by actors configured with any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Suite {
    /// OPRF and TripleDH over Ristretto255 with SHA-512.
    Ristretto255,
    /// OPRF and TripleDH over NIST P-256 with SHA-256.
    P256,
}

impl Suite {
    /// Every supported suite, in tag order.
    pub const ALL: [Suite; 2] = [Suite::Ristretto255, Suite::P256];

    /// Canonical suite name.
    pub fn name(self) -> &'static str {
        match self {
            Suite::Ristretto255 => "ristretto255",
            Suite::P256 => "p256",
        }
    }

    /// One-byte tag written into session tokens.
    pub fn tag(self) -> u8 {
        match self {
            Suite::Ristretto255 => 0x01,
            Suite::P256 => 0x02,
        }
    }

    /// Inverse of [`Suite::tag`].
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|suite| suite.tag() == tag)
    }

    /// Length of an OPRF seed for this suite (the OPRF hash output size).
    pub fn oprf_seed_len(self) -> usize {
        match self {
            Suite::Ristretto255 => 64,
            Suite::P256 => 32,
        }
    }

    /// Builds the engine client for an actor talking to `server_id`.
    pub fn client_engine(self, server_id: &str) -> Box<dyn ClientEngine> {
        match self {
            Suite::Ristretto255 => Box::new(engine::Ristretto255Client::new(server_id)),
            Suite::P256 => Box::new(engine::P256Client::new(server_id)),
        }
    }

    /// Builds the engine server, generating a static key pair when
    /// `private_key` is `None`.
    pub fn server_engine(
        self,
        server_id: &str,
        private_key: Option<&[u8]>,
    ) -> BridgeResult<Box<dyn ServerEngine>> {
        Ok(match self {
            Suite::Ristretto255 => Box::new(engine::Ristretto255Server::new(server_id, private_key)?),
            Suite::P256 => Box::new(engine::P256Server::new(server_id, private_key)?),
        })
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Suite {
    type Err = BridgeError;

    /// Accepts the canonical names and the `...Suite` names used by existing
    /// hosts, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ristretto255" | "ristretto255suite" => Ok(Suite::Ristretto255),
            "p256" | "p-256" | "p256suite" => Ok(Suite::P256),
            _ => Err(BridgeError::UnsupportedSuite(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Suite {
    type Error = BridgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Suite> for String {
    fn from(suite: Suite) -> Self {
        suite.name().to_owned()
    }
}
