//! Short, unguessable paste identifiers.

use crate::constants::{ID_ALPHABET, ID_LENGTH};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::OsRng;
use rand::Rng;

/// Source of candidate paste ids.
///
/// The store asks for a fresh id on every create attempt; collisions are
/// detected by the store, never by the source.
pub trait IdSource: Send + Sync {
    /// Produce a new candidate id.
    fn next_id(&self) -> String;
}

/// Ids drawn from the operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> String {
        generate_id()
    }
}

/// Generate a fresh id using the operating system random source.
///
/// # Returns
/// A [`ID_LENGTH`]-character string over the 62-symbol alphanumeric alphabet.
pub fn generate_id() -> String {
    generate_id_with(&mut OsRng)
}

/// Generate an id from the supplied random source.
pub fn generate_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let index = Uniform::from(0..ID_ALPHABET.len());
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[index.sample(rng)] as char)
        .collect()
}

/// Check that `candidate` has the exact length and alphabet of a paste id.
pub fn is_valid_id(candidate: &str) -> bool {
    candidate.len() == ID_LENGTH && candidate.bytes().all(|b| ID_ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_have_fixed_length_and_alphabet() {
        for _ in 0..200 {
            let id = generate_id();
            assert_eq!(id.len(), ID_LENGTH);
            assert!(is_valid_id(&id), "unexpected id: {}", id);
        }
    }

    #[test]
    fn generated_ids_do_not_repeat_in_a_large_sample() {
        let ids: HashSet<String> = (0..10_000).map(|_| RandomIds.next_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn seeded_generation_covers_the_whole_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();
        for _ in 0..2_000 {
            seen.extend(generate_id_with(&mut rng).bytes());
        }
        assert_eq!(seen.len(), ID_ALPHABET.len());
    }

    #[test]
    fn is_valid_id_rejects_wrong_length_and_symbols() {
        assert!(is_valid_id("abcDEF0123"));
        assert!(!is_valid_id("abcDEF012"));
        assert!(!is_valid_id("abcDEF01234"));
        assert!(!is_valid_id("abcDEF-123"));
        assert!(!is_valid_id("abcDEF012é"));
        assert!(!is_valid_id(""));
    }
}
