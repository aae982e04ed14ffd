// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge (Agent)
// Licensed under the MIT License

mod authentication;
mod coordinator;
mod registration;
mod state;

pub use authentication::{finish_login, start_login};
pub use coordinator::ClientCoordinator;
pub use registration::{finish_registration, start_registration};
pub use state::{ClientActor, LoginFinish, LoginStart, RegistrationFinish, RegistrationStart};
