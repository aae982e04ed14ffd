// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec::FlowKind;
use crate::suite::Suite;

/// Maximum accepted password length in bytes.
pub const MAX_PASSWORD_LENGTH: usize = 4096;

/// The two actor roles. Each role has its own registry and identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Password holder driving registration and login.
    Client,
    /// Credential store answering registration and login.
    Server,
}

impl Role {
    /// Lower-case role name as used in boundary call names.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Server => "server",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "server" => Ok(Role::Server),
            other => Err(BridgeError::InvalidArgument(format!("unknown role `{other}`"))),
        }
    }
}

/// Reasons a session token is rejected by the codec.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateDecodeError {
    /// The token ends before a declared field does.
    #[error("state token is truncated")]
    Truncated,
    /// The format version byte is not one this build understands.
    #[error("unsupported state token version {0}")]
    UnsupportedVersion(u8),
    /// The suite tag does not name a known suite.
    #[error("unknown suite tag {0:#04x}")]
    UnknownSuite(u8),
    /// The token was produced under a different suite than the actor uses.
    #[error("state token was produced for suite {found}, actor uses {expected}")]
    SuiteMismatch { expected: Suite, found: Suite },
    /// The flow tag does not name a known flow.
    #[error("unknown flow tag {0:#04x}")]
    UnknownFlow(u8),
    /// The token belongs to a different flow than the step it was given to.
    #[error("state token belongs to {found}, expected {expected}")]
    FlowMismatch { expected: FlowKind, found: FlowKind },
    /// The embedded secret exceeds [`MAX_PASSWORD_LENGTH`].
    #[error("embedded secret of {0} bytes exceeds the limit")]
    SecretTooLong(usize),
    /// Bytes remain after the last declared field.
    #[error("{0} trailing bytes after state token")]
    TrailingBytes(usize),
}

/// Enumerates every failure a coordinator step can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A protocol step was invoked before the actor was configured.
    #[error("{role} must be initialized first")]
    NotInitialized { role: Role },
    /// The actor was already configured.
    #[error("{role} is already initialized")]
    AlreadyInitialized { role: Role },
    /// No actor with this identifier exists in the role's registry.
    #[error("{role} `{id}` not found")]
    ActorNotFound { role: Role, id: String },
    /// The suite name is not one of the supported suites.
    #[error("unsupported suite `{0}`")]
    UnsupportedSuite(String),
    /// An argument is missing, of the wrong type, or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The session token could not be decoded for this actor and step.
    #[error("invalid state token: {0}")]
    StateDecode(#[from] StateDecodeError),
    /// The session token is not outstanding on this actor: it already
    /// completed its flow or was never issued here.
    #[error("state token has already been consumed or was not issued by this actor")]
    StateConsumed,
    /// The protocol engine rejected the step.
    #[error("protocol engine error: {0}")]
    Engine(String),
    /// The worker running the step terminated without reporting.
    #[error("worker failed: {0}")]
    Worker(String),
}

impl BridgeError {
    /// Stable negative status code for hosts that cannot carry typed errors.
    pub fn code(&self) -> i32 {
        match self {
            BridgeError::NotInitialized { .. } => -1,
            BridgeError::AlreadyInitialized { .. } => -2,
            BridgeError::ActorNotFound { .. } => -3,
            BridgeError::UnsupportedSuite(_) => -4,
            BridgeError::InvalidArgument(_) => -5,
            BridgeError::StateDecode(_) => -6,
            BridgeError::StateConsumed => -7,
            BridgeError::Engine(_) => -8,
            BridgeError::Worker(_) => -9,
        }
    }

    pub(crate) fn engine(err: impl fmt::Debug) -> Self {
        BridgeError::Engine(format!("{err:?}"))
    }
}

/// Convenience alias for `Result<T, BridgeError>`.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Rejects empty passwords and passwords longer than [`MAX_PASSWORD_LENGTH`].
pub fn validate_password(password: &[u8]) -> BridgeResult<()> {
    if password.is_empty() {
        return Err(BridgeError::InvalidArgument("password must not be empty".into()));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(BridgeError::InvalidArgument(format!(
            "password exceeds {MAX_PASSWORD_LENGTH} bytes"
        )));
    }
    Ok(())
}

/// A heap-allocated byte buffer that is zeroized on drop.
///
/// Holds session keys, export keys, OPRF seeds and decoded token secrets.
/// The `Debug` implementation redacts the contents.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureBytes(Vec<u8>);

impl SecureBytes {
    /// Creates a buffer by copying the given slice.
    pub fn from_slice(data: &[u8]) -> Self {
        Self(data.to_vec())
    }

    /// Returns an immutable reference to the underlying bytes.
    pub fn data(&self) -> &[u8] {
        &self.0
    }

    /// Returns a mutable reference to the underlying bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Returns the number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the buffer contains no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies the contents out into a plain vector for transport.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.clone()
    }
}

impl std::ops::Deref for SecureBytes {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for SecureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureBytes([REDACTED; {}])", self.0.len())
    }
}
