// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use bridge_core::{BridgeResult, FlowKind, SecureBytes, SessionState};

use crate::state::{LoginStart, ServerActor};

pub fn start_login(
    actor: &ServerActor,
    record: &[u8],
    ke1: &[u8],
    oprf_seed: &[u8],
    credential_id: &str,
    client_id: &str,
) -> BridgeResult<LoginStart> {
    let engine = actor.engine()?;
    let step = engine.start_login(record, ke1, oprf_seed, credential_id, client_id)?;
    let state = SessionState::new(engine.suite(), FlowKind::ServerLogin, &[], step.state);

    let token = state.encode()?;
    actor.tokens().issue(state.id());

    Ok(LoginStart {
        state: token,
        ke2: step.message,
    })
}

/// Verifies KE3 against a token issued by [`start_login`] and returns the
/// session key. The token must be outstanding on this actor, and only a
/// successful call retires it.
pub fn finish_login(actor: &ServerActor, login_state: &[u8], ke3: &[u8]) -> BridgeResult<SecureBytes> {
    let engine = actor.engine()?;
    let state = SessionState::decode(login_state, engine.suite(), FlowKind::ServerLogin)?;
    let claim = actor.tokens().claim(state.id())?;

    let session_key = engine.finish_login(state.engine_state(), ke3)?;
    claim.commit();
    Ok(session_key)
}
