// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::warn;

use crate::codec::TokenId;
use crate::types::{BridgeError, BridgeResult};

/// Upper bound on tokens one actor keeps outstanding before evicting the
/// oldest.
pub const MAX_OUTSTANDING_TOKENS: usize = 1024;

struct Outstanding {
    tokens: HashMap<TokenId, u64>,
    next_sequence: u64,
}

/// Ids of session tokens an actor has issued and not yet seen complete.
///
/// A starting step issues its token id here. A finishing step claims the id
/// before calling the engine, which removes it: an id this actor never issued,
/// or one whose flow already completed, cannot be claimed. A claim is put back
/// if the step fails, leaving the token usable, and dropped for good if the
/// step commits.
///
/// Memory follows outstanding flows, not completed ones. Past `capacity`
/// outstanding tokens the oldest is evicted, and presenting it later fails
/// like a replay.
pub struct IssuedTokens {
    capacity: usize,
    outstanding: Mutex<Outstanding>,
}

impl Default for IssuedTokens {
    fn default() -> Self {
        Self::with_capacity(MAX_OUTSTANDING_TOKENS)
    }
}

impl IssuedTokens {
    /// Creates a ledger keeping at most `capacity` outstanding tokens
    /// (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            outstanding: Mutex::new(Outstanding {
                tokens: HashMap::new(),
                next_sequence: 0,
            }),
        }
    }

    /// Records a freshly issued token id.
    pub fn issue(&self, id: &TokenId) {
        let mut outstanding = self.outstanding.lock();
        if outstanding.tokens.len() >= self.capacity {
            let oldest = outstanding
                .tokens
                .iter()
                .min_by_key(|(_, sequence)| **sequence)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                outstanding.tokens.remove(&oldest);
                warn!(capacity = self.capacity, "evicted oldest outstanding state token");
            }
        }
        let sequence = outstanding.next_sequence;
        outstanding.next_sequence += 1;
        outstanding.tokens.insert(*id, sequence);
    }

    /// Atomically takes `id` out of the outstanding set.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::StateConsumed`] if the id is not outstanding:
    /// never issued by this actor, already completed, evicted, or held by a
    /// step still in progress.
    pub fn claim(&self, id: &TokenId) -> BridgeResult<TokenClaim<'_>> {
        let Some(sequence) = self.outstanding.lock().tokens.remove(id) else {
            warn!("rejected state token that is not outstanding");
            return Err(BridgeError::StateConsumed);
        };
        Ok(TokenClaim {
            ledger: self,
            id: *id,
            sequence,
            committed: false,
        })
    }

    /// Number of outstanding tokens.
    pub fn len(&self) -> usize {
        self.outstanding.lock().tokens.len()
    }

    /// Whether no token is outstanding.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of outstanding tokens kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Reservation of one outstanding token; put back on drop unless committed.
#[must_use = "a claim is released immediately unless committed"]
pub struct TokenClaim<'a> {
    ledger: &'a IssuedTokens,
    id: TokenId,
    sequence: u64,
    committed: bool,
}

impl TokenClaim<'_> {
    /// Retires the token for good.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for TokenClaim<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.ledger
                .outstanding
                .lock()
                .tokens
                .insert(self.id, self.sequence);
        }
    }
}
