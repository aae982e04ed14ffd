// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use bridge_core::types::validate_password;
use bridge_core::{BridgeResult, FlowKind, SessionState};

use crate::state::{ClientActor, LoginFinish, LoginStart};

pub fn start_login(actor: &ClientActor, password: &[u8]) -> BridgeResult<LoginStart> {
    let engine = actor.engine()?;
    validate_password(password)?;

    let step = engine.start_login(password)?;
    let state = SessionState::new(engine.suite(), FlowKind::ClientLogin, password, step.state);

    let token = state.encode()?;
    actor.tokens().issue(state.id());

    Ok(LoginStart {
        state: token,
        ke1: step.message,
    })
}

pub fn finish_login(
    actor: &ClientActor,
    login_state: &[u8],
    ke2: &[u8],
    client_id: &str,
) -> BridgeResult<LoginFinish> {
    let engine = actor.engine()?;
    let state = SessionState::decode(login_state, engine.suite(), FlowKind::ClientLogin)?;
    let claim = actor.tokens().claim(state.id())?;

    let output = engine.finish_login(state.engine_state(), state.secret(), ke2, client_id)?;
    claim.commit();

    Ok(LoginFinish {
        ke3: output.ke3,
        session_key: output.session_key,
        export_key: output.export_key,
    })
}
