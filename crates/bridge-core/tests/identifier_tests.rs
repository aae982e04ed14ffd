use std::collections::{HashSet, VecDeque};

use bridge_core::identifier::{IdentifierGenerator, IDENTIFIER_ALPHABET, IDENTIFIER_LENGTH};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Replays a fixed list of 64-bit draws.
struct ScriptedRng(VecDeque<u64>);

impl ScriptedRng {
    fn new(draws: &[u64]) -> Self {
        Self(draws.iter().copied().collect())
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0.pop_front().expect("scripted rng exhausted")
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// The draw the generator sees is the top 63 bits of `next_u64`.
fn raw(draw: u64) -> u64 {
    draw << 1
}

#[test]
fn alphabet_is_lower_then_upper_latin() {
    assert_eq!(IDENTIFIER_ALPHABET.len(), 52);
    assert_eq!(IDENTIFIER_ALPHABET[0], b'a');
    assert_eq!(IDENTIFIER_ALPHABET[25], b'z');
    assert_eq!(IDENTIFIER_ALPHABET[26], b'A');
    assert_eq!(IDENTIFIER_ALPHABET[51], b'Z');
}

#[test]
fn zero_draw_yields_first_symbol() {
    let mut generator = IdentifierGenerator::new(ScriptedRng::new(&[0]));
    assert_eq!(generator.candidate().as_str(), "aaaaaaaa");
}

#[test]
fn low_bits_fill_first_symbol() {
    let mut generator = IdentifierGenerator::new(ScriptedRng::new(&[raw(1)]));
    assert_eq!(generator.candidate().as_str(), "baaaaaaa");
}

#[test]
fn out_of_range_groups_are_skipped() {
    // Group 0 is 63 (outside the alphabet), group 1 is 3 ('d').
    let draw = 63 | (3 << 6);
    let mut generator = IdentifierGenerator::new(ScriptedRng::new(&[raw(draw)]));
    assert_eq!(generator.candidate().as_str(), "daaaaaaa");
}

#[test]
fn last_alphabet_index_is_accepted() {
    let mut generator = IdentifierGenerator::new(ScriptedRng::new(&[raw(51)]));
    assert_eq!(generator.candidate().as_str(), "Zaaaaaaa");
}

#[test]
fn index_just_past_alphabet_is_skipped() {
    let draw = 52 | (27 << 6);
    let mut generator = IdentifierGenerator::new(ScriptedRng::new(&[raw(draw)]));
    assert_eq!(generator.candidate().as_str(), "Baaaaaaa");
}

#[test]
fn exhausted_draw_is_refilled() {
    // Every group of the first draw is 63, so all ten are discarded.
    let mut generator = IdentifierGenerator::new(ScriptedRng::new(&[u64::MAX, 0]));
    assert_eq!(generator.candidate().as_str(), "aaaaaaaa");
}

#[test]
fn collision_is_retried_transparently() {
    let mut generator = IdentifierGenerator::new(ScriptedRng::new(&[0, raw(1)]));
    let id = generator.generate(|candidate| candidate == "aaaaaaaa");
    assert_eq!(id.as_str(), "baaaaaaa");
}

#[test]
fn repeated_collisions_are_retried() {
    let mut generator = IdentifierGenerator::new(ScriptedRng::new(&[0, 0, 0, raw(2)]));
    let id = generator.generate(|candidate| candidate == "aaaaaaaa");
    assert_eq!(id.as_str(), "caaaaaaa");
}

#[test]
fn many_generated_identifiers_are_distinct() {
    let mut generator = IdentifierGenerator::new(StdRng::seed_from_u64(7));
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        let id = generator.generate(|candidate| seen.contains(candidate));
        assert!(seen.insert(id.into_string()));
    }
    assert_eq!(seen.len(), 10_000);
}

proptest! {
    #[test]
    fn identifiers_have_fixed_length_and_alphabet(seed in any::<u64>()) {
        let mut generator = IdentifierGenerator::new(StdRng::seed_from_u64(seed));
        for _ in 0..16 {
            let id = generator.candidate();
            prop_assert_eq!(id.as_str().len(), IDENTIFIER_LENGTH);
            prop_assert!(id.as_str().bytes().all(|b| IDENTIFIER_ALPHABET.contains(&b)));
        }
    }
}
