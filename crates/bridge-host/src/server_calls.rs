// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use std::mem;

use bridge_core::{BridgeError, BridgeResult};
use bridge_relay::ServerCoordinator;

use crate::value::{Args, Value};

pub(crate) fn dispatch(servers: &ServerCoordinator, method: &str, args: &[Value]) -> BridgeResult<Value> {
    let call = format!("server.{method}");
    match method {
        "create" | "newServer" => {
            Args::expect(&call, args, 0)?;
            Ok(servers.create().into())
        }
        "configure" | "initServer" => {
            let args = Args::expect(&call, args, 4)?;
            servers.configure(
                args.text(0, "identifier")?,
                args.text(1, "suiteName")?,
                args.text(2, "serverID")?,
                args.optional_bytes(3, "privKey")?,
            )?;
            Ok(Value::Null)
        }
        "isInitialized" => {
            let args = Args::expect(&call, args, 1)?;
            Ok(servers.is_initialized(args.text(0, "identifier")?)?.into())
        }
        "publicKey" => {
            let args = Args::expect(&call, args, 1)?;
            Ok(servers.public_key(args.text(0, "identifier")?)?.into())
        }
        "generateOprfSeed" => {
            let args = Args::expect(&call, args, 1)?;
            let seed = servers.generate_oprf_seed(args.text(0, "identifier")?)?;
            Ok((&seed).into())
        }
        "registrationEval" => {
            let args = Args::expect(&call, args, 4)?;
            let response = servers.registration_eval(
                args.text(0, "identifier")?,
                args.bytes(1, "registrationRequest")?,
                args.bytes(2, "oprfSeed")?,
                args.text(3, "credentialIdentifier")?,
            )?;
            Ok(response.into())
        }
        "loginStart" | "loginInit" => {
            let args = Args::expect(&call, args, 6)?;
            let mut out = servers.login_start(
                args.text(0, "identifier")?,
                args.bytes(1, "record")?,
                args.bytes(2, "ke1")?,
                args.bytes(3, "oprfSeed")?,
                args.text(4, "credentialID")?,
                args.text(5, "clientIdentity")?,
            )?;
            Ok(Value::map([
                ("loginState", mem::take(&mut out.state).into()),
                ("ke2", mem::take(&mut out.ke2).into()),
            ]))
        }
        "loginFinish" => {
            let args = Args::expect(&call, args, 3)?;
            let session_key = servers.login_finish(
                args.text(0, "identifier")?,
                args.bytes(1, "loginState")?,
                args.bytes(2, "ke3")?,
            )?;
            Ok((&session_key).into())
        }
        _ => Err(BridgeError::InvalidArgument(format!("unknown call `{call}`"))),
    }
}
