// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

//! Core library for the OPAQUE session bridge.
//!
//! The bridge exposes OPAQUE client and server actors to a host that can only
//! exchange byte buffers and keeps no affinity between calls. Intermediate
//! protocol state is never held by the bridge: it is sealed into a session
//! token, handed to the caller, and presented back on the completing call.
//!
//! # Crate layout
//!
//! * [`types`] -- constants, error types, and secure byte containers.
//! * [`suite`] -- supported cipher suites and their engine constructors.
//! * [`config`] -- typed actor configuration.
//! * [`identifier`] -- random actor identifiers.
//! * [`registry`] -- per-role actor registries.
//! * [`codec`] -- session token wire format.
//! * [`ledger`] -- single-use enforcement for session tokens.
//! * [`engine`] -- adapter over the `opaque-ke` protocol engine.

/// Typed client and server configuration.
pub mod config;
/// Session token encoding and decoding.
pub mod codec;
/// Protocol engine adapter over `opaque-ke`.
pub mod engine;
/// Random, collision-checked actor identifiers.
pub mod identifier;
/// Outstanding-token ledger.
pub mod ledger;
/// Actor registries.
pub mod registry;
/// Supported cipher suites.
pub mod suite;
/// Shared constants, error types, and secure byte containers.
pub mod types;

pub use codec::{FlowKind, SessionState};
pub use config::{ClientConfig, ServerConfig};
pub use identifier::Identifier;
pub use registry::Registry;
pub use suite::Suite;
pub use types::{BridgeError, BridgeResult, Role, SecureBytes, StateDecodeError};
