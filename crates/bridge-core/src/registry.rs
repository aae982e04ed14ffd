// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::debug;

use crate::identifier::{Identifier, IdentifierGenerator};
use crate::types::{BridgeError, BridgeResult, Role};

struct RegistryInner<A, R> {
    actors: HashMap<Identifier, Arc<A>>,
    generator: IdentifierGenerator<R>,
}

/// Owns every actor of one role and hands out identifiers for them.
///
/// Identifier generation and insertion happen under one lock, so two
/// concurrent [`Registry::create`] calls can never be given the same
/// identifier. Actors are handed out as shared references; their own
/// interior state carries whatever synchronisation they need.
pub struct Registry<A, R = StdRng> {
    role: Role,
    inner: Mutex<RegistryInner<A, R>>,
}

impl<A: Default> Registry<A, StdRng> {
    /// Creates an empty registry drawing identifiers from an entropy-seeded RNG.
    pub fn new(role: Role) -> Self {
        Self::with_rng(role, StdRng::from_entropy())
    }
}

impl<A: Default, R: RngCore> Registry<A, R> {
    /// Creates an empty registry drawing identifiers from `rng`.
    pub fn with_rng(role: Role, rng: R) -> Self {
        Self {
            role,
            inner: Mutex::new(RegistryInner {
                actors: HashMap::new(),
                generator: IdentifierGenerator::new(rng),
            }),
        }
    }

    /// Stores a fresh, unconfigured actor and returns its identifier.
    pub fn create(&self) -> Identifier {
        let mut guard = self.inner.lock();
        let RegistryInner { actors, generator } = &mut *guard;
        let id = generator.generate(|candidate| actors.contains_key(candidate));
        actors.insert(id.clone(), Arc::new(A::default()));
        debug!(role = %self.role, actor = %id, "actor created");
        id
    }
}

impl<A, R> Registry<A, R> {
    /// Looks an actor up by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ActorNotFound`] for identifiers this registry
    /// never handed out.
    pub fn get(&self, id: &str) -> BridgeResult<Arc<A>> {
        self.inner
            .lock()
            .actors
            .get(id)
            .cloned()
            .ok_or_else(|| BridgeError::ActorNotFound {
                role: self.role,
                id: id.to_owned(),
            })
    }

    /// Number of actors created so far; actors are never removed.
    pub fn len(&self) -> usize {
        self.inner.lock().actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
