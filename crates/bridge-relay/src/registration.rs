// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use bridge_core::{BridgeResult, SecureBytes};

use crate::state::ServerActor;

pub fn generate_oprf_seed(actor: &ServerActor) -> BridgeResult<SecureBytes> {
    Ok(actor.engine()?.generate_oprf_seed())
}

/// Single-step registration response. Deterministic for a given request,
/// seed, and credential identifier.
pub fn evaluate_registration(
    actor: &ServerActor,
    registration_request: &[u8],
    oprf_seed: &[u8],
    credential_id: &str,
) -> BridgeResult<Vec<u8>> {
    actor
        .engine()?
        .evaluate_registration(registration_request, oprf_seed, credential_id)
}
