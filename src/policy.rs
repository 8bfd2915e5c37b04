//! Move selection.
//!
//! There is no search or evaluation: a policy only picks one move out of the
//! legal move list handed to it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::board::{Move, MoveList, Position};

/// Chooses the move to play from a list of legal moves.
pub trait MovePolicy {
    /// Pick one of `moves`, or `None` when the list is empty.
    fn select(&mut self, pos: &Position, moves: &MoveList) -> Option<Move>;

    /// Restart any randomness from `seed`, or from OS entropy for `None`.
    fn reseed(&mut self, _seed: Option<u64>) {}
}

/// Uniform random choice among the legal moves.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    #[must_use]
    pub fn from_entropy() -> Self {
        RandomPolicy {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible choices for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        RandomPolicy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl MovePolicy for RandomPolicy {
    fn select(&mut self, _pos: &Position, moves: &MoveList) -> Option<Move> {
        moves.as_slice().choose(&mut self.rng).copied()
    }

    fn reseed(&mut self, seed: Option<u64>) {
        *self = match seed {
            Some(seed) => RandomPolicy::seeded(seed),
            None => RandomPolicy::from_entropy(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_policy_picks_a_legal_move() {
        let pos = Position::startpos();
        let moves = pos.generate_legal();
        let mut policy = RandomPolicy::from_entropy();
        for _ in 0..32 {
            let m = policy.select(&pos, &moves).unwrap();
            assert!(moves.contains(m));
        }
    }

    #[test]
    fn test_empty_list_yields_none() {
        let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let moves = pos.generate_legal();
        assert!(moves.is_empty());
        assert_eq!(RandomPolicy::seeded(1).select(&pos, &moves), None);
    }

    #[test]
    fn test_same_seed_same_choices() {
        let pos = Position::startpos();
        let moves = pos.generate_legal();
        let mut a = RandomPolicy::seeded(42);
        let mut b = RandomPolicy::from_entropy();
        b.reseed(Some(42));
        let first: Vec<_> = (0..10).map(|_| a.select(&pos, &moves)).collect();
        let second: Vec<_> = (0..10).map(|_| b.select(&pos, &moves)).collect();
        assert_eq!(first, second);
    }
}
