// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge Host Boundary
// Licensed under the MIT License

//! Asynchronous, name-dispatched boundary over the client and server
//! coordinators.
//!
//! A host that can only pass untyped values and keeps no per-session context
//! drives the bridge through [`Host::invoke`]: a call name such as
//! `"client.loginStart"` plus positional [`Value`] arguments. Each call runs
//! on a blocking worker and resolves exactly once. Failures carry a
//! [`BridgeError`] whose [`code`](BridgeError::code) is stable for hosts that
//! only see integers.

mod client_calls;
mod server_calls;
mod value;

use std::sync::Arc;

use bridge_agent::ClientCoordinator;
use bridge_core::{BridgeError, BridgeResult, Role};
use bridge_relay::ServerCoordinator;
use tracing::debug;

pub use value::Value;

/// Converts a call result into a host status code.
///
/// Returns `0` on success or the error's negative code.
pub fn result_code(result: &BridgeResult<Value>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => err.code(),
    }
}

/// Shared handle to one client and one server coordinator.
#[derive(Clone, Default)]
pub struct Host {
    clients: Arc<ClientCoordinator>,
    servers: Arc<ServerCoordinator>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coordinators(clients: Arc<ClientCoordinator>, servers: Arc<ServerCoordinator>) -> Self {
        Self { clients, servers }
    }

    pub fn clients(&self) -> &ClientCoordinator {
        &self.clients
    }

    pub fn servers(&self) -> &ServerCoordinator {
        &self.servers
    }

    /// Runs a call on the current thread.
    ///
    /// # Errors
    ///
    /// [`BridgeError::InvalidArgument`] for an unknown call name or malformed
    /// arguments, otherwise whatever the coordinator step reports.
    pub fn call(&self, call: &str, args: &[Value]) -> BridgeResult<Value> {
        let (role, method) = call
            .split_once('.')
            .ok_or_else(|| BridgeError::InvalidArgument(format!("unknown call `{call}`")))?;
        let role: Role = role
            .parse()
            .map_err(|_| BridgeError::InvalidArgument(format!("unknown call `{call}`")))?;
        match role {
            Role::Client => client_calls::dispatch(&self.clients, method, args),
            Role::Server => server_calls::dispatch(&self.servers, method, args),
        }
    }

    /// Runs a call on a blocking worker thread and resolves once it finishes.
    ///
    /// Must be awaited inside a tokio runtime.
    pub async fn invoke(&self, call: &str, args: Vec<Value>) -> BridgeResult<Value> {
        let host = self.clone();
        let name = call.to_owned();
        let result = tokio::task::spawn_blocking(move || host.call(&name, &args))
            .await
            .map_err(|err| BridgeError::Worker(err.to_string()))?;
        if let Err(err) = &result {
            debug!(call, code = err.code(), error = %err, "call rejected");
        }
        result
    }
}
