// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge (Relay)
// Licensed under the MIT License

//! Server (responder) side of the OPAQUE session bridge.
//!
//! A server actor answers registration requests and runs the two-step login
//! exchange. OPRF seeds are held by the caller and supplied per call, so the
//! actor keeps nothing per credential; login state travels back to the caller
//! as a session token.

/// Login exchange for the responder.
mod authentication;
/// Registry-backed entry points.
mod coordinator;
/// OPRF seeds and registration evaluation.
mod registration;
/// Server actor and step outputs.
mod state;

pub use authentication::{finish_login, start_login};
pub use coordinator::ServerCoordinator;
pub use registration::{evaluate_registration, generate_oprf_seed};
pub use state::{LoginStart, ServerActor};
