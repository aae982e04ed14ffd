// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use std::mem;

use bridge_agent::ClientCoordinator;
use bridge_core::{BridgeError, BridgeResult};

use crate::value::{Args, Value};

/// Runs one `client.*` call. Older call names are accepted alongside the
/// current ones.
pub(crate) fn dispatch(clients: &ClientCoordinator, method: &str, args: &[Value]) -> BridgeResult<Value> {
    let call = format!("client.{method}");
    match method {
        "create" | "newClient" => {
            Args::expect(&call, args, 0)?;
            Ok(clients.create().into())
        }
        "configure" | "initClient" => {
            let args = Args::expect(&call, args, 3)?;
            clients.configure(
                args.text(0, "identifier")?,
                args.text(1, "suiteName")?,
                args.text(2, "serverID")?,
            )?;
            Ok(Value::Null)
        }
        "isInitialized" => {
            let args = Args::expect(&call, args, 1)?;
            Ok(clients.is_initialized(args.text(0, "identifier")?)?.into())
        }
        "registrationStart" | "registrationInit" => {
            let args = Args::expect(&call, args, 2)?;
            let mut out =
                clients.registration_start(args.text(0, "identifier")?, args.secret(1, "password")?)?;
            Ok(Value::map([
                ("registrationState", mem::take(&mut out.state).into()),
                ("registrationRequest", mem::take(&mut out.request).into()),
            ]))
        }
        "registrationFinish" | "registrationFinalize" => {
            let args = Args::expect(&call, args, 4)?;
            let mut out = clients.registration_finish(
                args.text(0, "identifier")?,
                args.bytes(1, "registrationState")?,
                args.bytes(2, "registrationResponse")?,
                args.text(3, "clientIdentity")?,
            )?;
            Ok(Value::map([
                ("registrationRecord", mem::take(&mut out.record).into()),
                ("exportKey", (&out.export_key).into()),
            ]))
        }
        "loginStart" | "loginInit" => {
            let args = Args::expect(&call, args, 2)?;
            let mut out = clients.login_start(args.text(0, "identifier")?, args.secret(1, "password")?)?;
            Ok(Value::map([
                ("loginState", mem::take(&mut out.state).into()),
                ("ke1", mem::take(&mut out.ke1).into()),
            ]))
        }
        "loginFinish" => {
            let args = Args::expect(&call, args, 4)?;
            let mut out = clients.login_finish(
                args.text(0, "identifier")?,
                args.bytes(1, "loginState")?,
                args.bytes(2, "ke2")?,
                args.text(3, "clientIdentity")?,
            )?;
            Ok(Value::map([
                ("ke3", mem::take(&mut out.ke3).into()),
                ("sessionKey", (&out.session_key).into()),
                ("exportKey", (&out.export_key).into()),
            ]))
        }
        _ => Err(BridgeError::InvalidArgument(format!("unknown call `{call}`"))),
    }
}
