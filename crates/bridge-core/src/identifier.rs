// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use std::borrow::Borrow;
use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Number of symbols in an actor identifier.
pub const IDENTIFIER_LENGTH: usize = 8;
/// Symbols an identifier is drawn from.
pub const IDENTIFIER_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Bits consumed per symbol candidate.
const SYMBOL_BITS: u32 = 6;
const SYMBOL_MASK: u64 = (1 << SYMBOL_BITS) - 1;
/// Random bits taken from each draw.
const DRAW_BITS: u32 = 63;
/// Symbol candidates extracted from one draw before refilling.
const SYMBOLS_PER_DRAW: u32 = DRAW_BITS / SYMBOL_BITS;

const _: () = assert!(IDENTIFIER_ALPHABET.len() <= 1 << SYMBOL_BITS);
const _: () = assert!(SYMBOLS_PER_DRAW == 10);

/// Name of an actor inside one registry.
///
/// Any string can be used to look an actor up; only the generator produces
/// identifiers for new actors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Wraps an existing identifier string, as received from a host.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The identifier as used for registry lookups.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwraps the identifier for hosts that pass plain strings.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Produces identifiers from a uniform random bit source.
///
/// Each 63-bit draw is split into 6-bit groups. A group that does not index
/// into [`IDENTIFIER_ALPHABET`] is skipped rather than reduced, so every symbol
/// is equally likely.
pub struct IdentifierGenerator<R> {
    rng: R,
}

impl<R: RngCore> IdentifierGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn draw(&mut self) -> u64 {
        self.rng.next_u64() >> (u64::BITS - DRAW_BITS)
    }

    /// Assembles one identifier without checking it against anything.
    pub fn candidate(&mut self) -> Identifier {
        let mut symbols = String::with_capacity(IDENTIFIER_LENGTH);
        let mut cache = self.draw();
        let mut remain = SYMBOLS_PER_DRAW;

        while symbols.len() < IDENTIFIER_LENGTH {
            if remain == 0 {
                cache = self.draw();
                remain = SYMBOLS_PER_DRAW;
            }
            let index = (cache & SYMBOL_MASK) as usize;
            if let Some(&symbol) = IDENTIFIER_ALPHABET.get(index) {
                symbols.push(char::from(symbol));
            }
            cache >>= SYMBOL_BITS;
            remain -= 1;
        }

        Identifier(symbols)
    }

    /// Returns the first candidate for which `is_taken` is false.
    ///
    /// Collisions are retried with fresh draws and never surface to the
    /// caller.
    pub fn generate(&mut self, is_taken: impl Fn(&str) -> bool) -> Identifier {
        loop {
            let candidate = self.candidate();
            if !is_taken(candidate.as_str()) {
                return candidate;
            }
            trace!(identifier = %candidate, "identifier collision, drawing again");
        }
    }
}
