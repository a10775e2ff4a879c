use std::collections::HashSet;

use rand::Rng;

use crate::core::WordpackError;

/// ASCII letters, digits and punctuation.
pub const GUID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ\
0123456789!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

pub const GUID_LENGTH: usize = 10;
pub const MAX_GUID_ATTEMPTS: usize = 32;

#[derive(Debug, Clone)]
pub struct GuidGenerator {
    length: usize,
    max_attempts: usize,
}

impl Default for GuidGenerator {
    fn default() -> Self {
        Self { length: GUID_LENGTH, max_attempts: MAX_GUID_ATTEMPTS }
    }
}

impl GuidGenerator {
    pub fn new(length: usize, max_attempts: usize) -> Self {
        Self { length, max_attempts }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        (0..self.length)
            .map(|_| GUID_ALPHABET[rng.random_range(0..GUID_ALPHABET.len())] as char)
            .collect()
    }

    /// Draws a guid that is not in `existing`. The caller records the result
    /// in `existing` before asking for the next one.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        existing: &HashSet<String>,
        rng: &mut R,
    ) -> Result<String, WordpackError> {
        for _ in 0..self.max_attempts {
            let candidate = self.draw(rng);
            if !existing.contains(&candidate) {
                return Ok(candidate);
            }
        }
        Err(WordpackError::GuidExhausted { attempts: self.max_attempts })
    }
}

#[cfg(test)]
mod tests {
    use rand::{
        rngs::StdRng,
        SeedableRng,
    };

    use super::*;

    #[test]
    fn test_alphabet() {
        assert_eq!(GUID_ALPHABET.len(), 94);
        let unique: HashSet<&u8> = GUID_ALPHABET.iter().collect();
        assert_eq!(unique.len(), GUID_ALPHABET.len());
        assert!(!GUID_ALPHABET.contains(&0x1f));
        assert!(!GUID_ALPHABET.contains(&b' '));
    }

    #[test]
    fn test_guid_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let guid = GuidGenerator::default().generate(&HashSet::new(), &mut rng).unwrap();
        assert_eq!(guid.len(), GUID_LENGTH);
        assert!(guid.bytes().all(|b| GUID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_redraws_on_collision() {
        let generator = GuidGenerator::default();

        // Same seed yields the same first draw, so it can be planted as taken.
        let first = generator.generate(&HashSet::new(), &mut StdRng::seed_from_u64(11)).unwrap();
        let existing: HashSet<String> = [first.clone()].into_iter().collect();

        let second = generator.generate(&existing, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_ne!(first, second);
        assert!(!existing.contains(&second));
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let generator = GuidGenerator::new(1, 50);
        let existing: HashSet<String> =
            GUID_ALPHABET.iter().map(|&b| (b as char).to_string()).collect();
        let mut rng = StdRng::seed_from_u64(3);

        match generator.generate(&existing, &mut rng) {
            Err(WordpackError::GuidExhausted { attempts }) => assert_eq!(attempts, 50),
            other => panic!("Expected GuidExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_of_guids_is_distinct() {
        let generator = GuidGenerator::default();
        let mut rng = StdRng::seed_from_u64(99);
        let mut existing = HashSet::new();
        for _ in 0..500 {
            let guid = generator.generate(&existing, &mut rng).unwrap();
            assert!(existing.insert(guid));
        }
        assert_eq!(existing.len(), 500);
    }
}
