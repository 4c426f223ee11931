use std::collections::VecDeque;

use rand::{Rng as _, SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::PieceKind;

/// How the next piece kind is drawn.
///
/// Parses case-insensitively from the variant name (`uniform`, `bag7`).
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::FromStr,
)]
#[serde(rename_all = "kebab-case")]
pub enum PieceRule {
    /// Each kind independently and uniformly at random.
    #[default]
    Uniform,
    /// Shuffled bags holding one of each of the seven kinds.
    Bag7,
}

/// Deterministic source of piece kinds.
///
/// The same seed and rule always yield the same sequence.
///
/// # Example
///
/// ```
/// use stackwise_engine::{PieceGenerator, PieceRule};
///
/// let mut a = PieceGenerator::new(PieceRule::Bag7, 42);
/// let mut b = PieceGenerator::new(PieceRule::Bag7, 42);
/// for _ in 0..20 {
///     assert_eq!(a.pop_next(), b.pop_next());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rule: PieceRule,
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
}

impl PieceGenerator {
    #[must_use]
    pub fn new(rule: PieceRule, seed: u64) -> Self {
        Self {
            rule,
            rng: Pcg32::seed_from_u64(seed),
            bag: VecDeque::with_capacity(PieceKind::LEN),
        }
    }

    /// Draws the next piece kind.
    ///
    /// # Panics
    ///
    /// Panics if the bag is empty after a refill (should never happen).
    pub fn pop_next(&mut self) -> PieceKind {
        match self.rule {
            PieceRule::Uniform => self.rng.random(),
            PieceRule::Bag7 => {
                if self.bag.is_empty() {
                    let mut new_bag = PieceKind::ALL;
                    new_bag.shuffle(&mut self.rng);
                    self.bag.extend(new_bag);
                }
                self.bag.pop_front().expect("piece bag should never be empty")
            }
        }
    }
}
