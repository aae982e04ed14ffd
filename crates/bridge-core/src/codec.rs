// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

//! Session token wire format.
//!
//! ```text
//! offset  size  field
//! 0       1     format version
//! 1       1     suite tag
//! 2       1     flow tag
//! 3       16    token id
//! 19      2     secret length S (big endian)
//! 21      S     secret
//! 21+S    4     engine state length E (big endian)
//! 25+S    E     engine state
//! ```

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::warn;

use crate::suite::Suite;
use crate::types::{
    BridgeError, BridgeResult, SecureBytes, StateDecodeError, MAX_PASSWORD_LENGTH,
};

/// Current token format version.
pub const TOKEN_FORMAT_VERSION: u8 = 0x01;
/// Length of the random token id in bytes.
pub const TOKEN_ID_LENGTH: usize = 16;

const VERSION_OFFSET: usize = 0;
const SUITE_OFFSET: usize = 1;
const FLOW_OFFSET: usize = 2;
const TOKEN_ID_OFFSET: usize = 3;
const SECRET_LENGTH_OFFSET: usize = TOKEN_ID_OFFSET + TOKEN_ID_LENGTH;
const SECRET_LENGTH_SIZE: usize = 2;
const SECRET_OFFSET: usize = SECRET_LENGTH_OFFSET + SECRET_LENGTH_SIZE;
const STATE_LENGTH_SIZE: usize = 4;

/// Length of the fixed header preceding the secret.
pub const TOKEN_HEADER_LENGTH: usize = SECRET_OFFSET;
/// Length of the smallest structurally valid token.
pub const MIN_TOKEN_LENGTH: usize = TOKEN_HEADER_LENGTH + STATE_LENGTH_SIZE;

const _: () = assert!(TOKEN_HEADER_LENGTH == 21);
const _: () = assert!(MAX_PASSWORD_LENGTH <= u16::MAX as usize);

/// Random identity of one issued token, used by the outstanding-token ledger.
pub type TokenId = [u8; TOKEN_ID_LENGTH];

/// The two-step flow a token continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    ClientRegistration,
    ClientLogin,
    ServerLogin,
}

impl FlowKind {
    /// Byte written at offset 2 of the token.
    pub fn tag(self) -> u8 {
        match self {
            FlowKind::ClientRegistration => 0x01,
            FlowKind::ClientLogin => 0x02,
            FlowKind::ServerLogin => 0x03,
        }
    }

    /// Inverse of [`FlowKind::tag`]; `None` for unknown tags.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(FlowKind::ClientRegistration),
            0x02 => Some(FlowKind::ClientLogin),
            0x03 => Some(FlowKind::ServerLogin),
            _ => None,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlowKind::ClientRegistration => "client registration",
            FlowKind::ClientLogin => "client login",
            FlowKind::ServerLogin => "server login",
        })
    }
}

/// Borrowed view of a structurally valid token. Tags are not yet interpreted.
pub struct SessionTokenRef<'a> {
    pub version: u8,
    pub suite_tag: u8,
    pub flow_tag: u8,
    pub token_id: &'a [u8],
    pub secret: &'a [u8],
    pub engine_state: &'a [u8],
}

fn read_length<const N: usize>(data: &[u8], offset: usize) -> Result<usize, StateDecodeError> {
    let field: [u8; N] = data
        .get(offset..offset + N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(StateDecodeError::Truncated)?;
    Ok(field.iter().fold(0usize, |acc, &b| (acc << 8) | usize::from(b)))
}

/// Splits a token into its fields, checking only lengths.
pub fn parse_session_token(data: &[u8]) -> Result<SessionTokenRef<'_>, StateDecodeError> {
    if data.len() < MIN_TOKEN_LENGTH {
        return Err(StateDecodeError::Truncated);
    }

    let secret_length = read_length::<SECRET_LENGTH_SIZE>(data, SECRET_LENGTH_OFFSET)?;
    if secret_length > MAX_PASSWORD_LENGTH {
        return Err(StateDecodeError::SecretTooLong(secret_length));
    }
    let state_length_offset = SECRET_OFFSET + secret_length;
    let state_offset = state_length_offset + STATE_LENGTH_SIZE;
    let state_length = read_length::<STATE_LENGTH_SIZE>(data, state_length_offset)?;
    let end = state_offset
        .checked_add(state_length)
        .ok_or(StateDecodeError::Truncated)?;
    if data.len() < end {
        return Err(StateDecodeError::Truncated);
    }
    if data.len() > end {
        return Err(StateDecodeError::TrailingBytes(data.len() - end));
    }

    Ok(SessionTokenRef {
        version: data[VERSION_OFFSET],
        suite_tag: data[SUITE_OFFSET],
        flow_tag: data[FLOW_OFFSET],
        token_id: &data[TOKEN_ID_OFFSET..SECRET_LENGTH_OFFSET],
        secret: &data[SECRET_OFFSET..state_length_offset],
        engine_state: &data[state_offset..end],
    })
}

/// Serializes token fields into a fresh buffer.
pub fn write_session_token(
    suite: Suite,
    flow: FlowKind,
    token_id: &TokenId,
    secret: &[u8],
    engine_state: &[u8],
) -> BridgeResult<Vec<u8>> {
    if secret.len() > MAX_PASSWORD_LENGTH {
        return Err(BridgeError::InvalidArgument(format!(
            "secret exceeds {MAX_PASSWORD_LENGTH} bytes"
        )));
    }
    let secret_length = u16::try_from(secret.len())
        .map_err(|_| BridgeError::InvalidArgument("secret length overflow".into()))?;
    let state_length = u32::try_from(engine_state.len())
        .map_err(|_| BridgeError::InvalidArgument("engine state length overflow".into()))?;

    let mut out = Vec::with_capacity(MIN_TOKEN_LENGTH + secret.len() + engine_state.len());
    out.push(TOKEN_FORMAT_VERSION);
    out.push(suite.tag());
    out.push(flow.tag());
    out.extend_from_slice(token_id);
    out.extend_from_slice(&secret_length.to_be_bytes());
    out.extend_from_slice(secret);
    out.extend_from_slice(&state_length.to_be_bytes());
    out.extend_from_slice(engine_state);
    Ok(out)
}

/// Continuation state of one two-step flow, as carried by the caller.
///
/// The secret is whatever the engine needs again at the finishing step that
/// it does not keep in its own state (the password, for client flows).
#[derive(Debug, Clone)]
pub struct SessionState {
    suite: Suite,
    flow: FlowKind,
    id: TokenId,
    secret: SecureBytes,
    engine_state: SecureBytes,
}

impl SessionState {
    /// Wraps fresh engine state under a new random token id.
    pub fn new(suite: Suite, flow: FlowKind, secret: &[u8], engine_state: SecureBytes) -> Self {
        let mut id = [0u8; TOKEN_ID_LENGTH];
        OsRng.fill_bytes(&mut id);
        Self {
            suite,
            flow,
            id,
            secret: SecureBytes::from_slice(secret),
            engine_state,
        }
    }

    pub fn suite(&self) -> Suite {
        self.suite
    }

    pub fn flow(&self) -> FlowKind {
        self.flow
    }

    pub fn id(&self) -> &TokenId {
        &self.id
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.data()
    }

    pub fn engine_state(&self) -> &[u8] {
        self.engine_state.data()
    }

    /// Produces the transportable token.
    pub fn encode(&self) -> BridgeResult<Vec<u8>> {
        write_session_token(
            self.suite,
            self.flow,
            &self.id,
            self.secret.data(),
            self.engine_state.data(),
        )
    }

    /// Reads a token back for an actor configured with `suite` at a step
    /// finishing `flow`.
    ///
    /// # Errors
    ///
    /// Returns a [`StateDecodeError`] if the token is malformed, was written
    /// under another suite, or belongs to another flow.
    pub fn decode(data: &[u8], suite: Suite, flow: FlowKind) -> Result<Self, StateDecodeError> {
        let token = parse_session_token(data)?;
        if token.version != TOKEN_FORMAT_VERSION {
            return Err(StateDecodeError::UnsupportedVersion(token.version));
        }
        let found_suite =
            Suite::from_tag(token.suite_tag).ok_or(StateDecodeError::UnknownSuite(token.suite_tag))?;
        if found_suite != suite {
            warn!(expected = %suite, found = %found_suite, "state token suite mismatch");
            return Err(StateDecodeError::SuiteMismatch {
                expected: suite,
                found: found_suite,
            });
        }
        let found_flow =
            FlowKind::from_tag(token.flow_tag).ok_or(StateDecodeError::UnknownFlow(token.flow_tag))?;
        if found_flow != flow {
            warn!(expected = %flow, found = %found_flow, "state token flow mismatch");
            return Err(StateDecodeError::FlowMismatch {
                expected: flow,
                found: found_flow,
            });
        }

        let mut id = [0u8; TOKEN_ID_LENGTH];
        id.copy_from_slice(token.token_id);
        Ok(Self {
            suite,
            flow,
            id,
            secret: SecureBytes::from_slice(token.secret),
            engine_state: SecureBytes::from_slice(token.engine_state),
        })
    }
}
