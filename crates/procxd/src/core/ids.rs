//! Identifier and seed generation
//!
//! Ids look like the host application's own: 21 characters drawn from a
//! URL-safe alphabet. Everything random in a sketch comes from the one
//! [`IdGenerator`], so a fixed seed makes the whole output reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::element::{ElementId, GroupId};

const ID_ALPHABET: &[u8] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

/// Length of generated ids
pub const ID_LENGTH: usize = 21;

/// Seeded source of ids, element seeds and colours
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: StdRng,
}

impl IdGenerator {
    /// A generator seeded from `seed`, or from the OS when `None`
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self { rng }
    }

    fn next_id(&mut self) -> String {
        (0..ID_LENGTH)
            .map(|_| ID_ALPHABET[self.rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }

    pub fn element_id(&mut self) -> ElementId {
        ElementId::new(self.next_id())
    }

    pub fn group_id(&mut self) -> GroupId {
        GroupId::new(self.next_id())
    }

    /// Seed for stroke jitter, kept within the host's 31-bit range
    pub fn seed(&mut self) -> u32 {
        self.rng.random_range(1..i32::MAX as u32)
    }

    /// The underlying generator, for colour sampling and layouts
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_shape() {
        let mut ids = IdGenerator::new(Some(1));
        let id = ids.element_id();
        assert_eq!(id.as_str().len(), ID_LENGTH);
        assert!(id.as_str().bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_seeded_generators_agree() {
        let mut a = IdGenerator::new(Some(42));
        let mut b = IdGenerator::new(Some(42));
        for _ in 0..10 {
            assert_eq!(a.element_id(), b.element_id());
            assert_eq!(a.seed(), b.seed());
        }
    }

    #[test]
    fn test_ids_do_not_repeat() {
        let mut ids = IdGenerator::new(Some(5));
        let seen: HashSet<_> = (0..1000).map(|_| ids.element_id()).collect();
        assert_eq!(seen.len(), 1000);
    }
}
