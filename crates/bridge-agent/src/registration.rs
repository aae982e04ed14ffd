// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use bridge_core::types::validate_password;
use bridge_core::{BridgeResult, FlowKind, SessionState};

use crate::state::{ClientActor, RegistrationFinish, RegistrationStart};

pub fn start_registration(actor: &ClientActor, password: &[u8]) -> BridgeResult<RegistrationStart> {
    let engine = actor.engine()?;
    validate_password(password)?;

    let step = engine.start_registration(password)?;
    let state = SessionState::new(
        engine.suite(),
        FlowKind::ClientRegistration,
        password,
        step.state,
    );

    let token = state.encode()?;
    actor.tokens().issue(state.id());

    Ok(RegistrationStart {
        state: token,
        request: step.message,
    })
}

/// Completes registration from a token issued by [`start_registration`].
///
/// Only a token this actor issued and has not completed is accepted. It is
/// retired only if the engine accepts the response; on any failure it can be
/// presented again.
pub fn finish_registration(
    actor: &ClientActor,
    registration_state: &[u8],
    registration_response: &[u8],
    client_id: &str,
) -> BridgeResult<RegistrationFinish> {
    let engine = actor.engine()?;
    let state = SessionState::decode(
        registration_state,
        engine.suite(),
        FlowKind::ClientRegistration,
    )?;
    let claim = actor.tokens().claim(state.id())?;

    let output = engine.finish_registration(
        state.engine_state(),
        state.secret(),
        registration_response,
        client_id,
    )?;
    claim.commit();

    Ok(RegistrationFinish {
        record: output.record,
        export_key: output.export_key,
    })
}
