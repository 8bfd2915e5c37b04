//! Castling rights type.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;

/// Castling rights represented as a bitmask.
///
/// Bit `n` corresponds to [`CastlingRights::slot`] `n`, so per-right tables
/// (rook square, path) are indexed by the same number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const WHITE_OO: CastlingRights = CastlingRights(1 << 0);
    pub const WHITE_OOO: CastlingRights = CastlingRights(1 << 1);
    pub const BLACK_OO: CastlingRights = CastlingRights(1 << 2);
    pub const BLACK_OOO: CastlingRights = CastlingRights(1 << 3);

    /// The four single rights in slot order
    pub const EACH: [CastlingRights; 4] = [
        CastlingRights::WHITE_OO,
        CastlingRights::WHITE_OOO,
        CastlingRights::BLACK_OO,
        CastlingRights::BLACK_OOO,
    ];

    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(0b1111)
    }

    /// The single right for `color` on the given wing
    #[inline]
    #[must_use]
    pub const fn of(color: Color, kingside: bool) -> Self {
        CastlingRights(1 << Self::slot(color, kingside))
    }

    /// Table slot (0..4) of a single right
    #[inline]
    #[must_use]
    pub const fn slot(color: Color, kingside: bool) -> usize {
        color.index() * 2 + if kingside { 0 } else { 1 }
    }

    /// Both rights belonging to `color`
    #[inline]
    #[must_use]
    pub const fn both(color: Color) -> Self {
        CastlingRights(0b11 << (color.index() * 2))
    }

    /// Check if any of the rights in `other` is held
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: CastlingRights) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.intersects(Self::of(color, kingside))
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: CastlingRights) -> Self {
        CastlingRights(self.0 | other.0)
    }

    #[inline]
    pub fn insert(&mut self, other: CastlingRights) {
        self.0 |= other.0;
    }

    /// Revoke every right in `other`; rights are never granted back during play.
    #[inline]
    pub fn remove(&mut self, other: CastlingRights) {
        self.0 &= !other.0;
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for CastlingRights {
    /// Standard `KQkq` letters; exact rook files are written by the FEN encoder.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (right, c) in CastlingRights::EACH.iter().zip(['K', 'Q', 'k', 'q']) {
            if self.intersects(*right) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_match_bits() {
        for color in Color::BOTH {
            for kingside in [true, false] {
                let slot = CastlingRights::slot(color, kingside);
                assert_eq!(CastlingRights::EACH[slot], CastlingRights::of(color, kingside));
            }
        }
    }

    #[test]
    fn test_revocation() {
        let mut rights = CastlingRights::all();
        rights.remove(CastlingRights::both(Color::White));
        assert!(!rights.has(Color::White, true));
        assert!(!rights.has(Color::White, false));
        assert!(rights.has(Color::Black, true));
        assert_eq!(rights.to_string(), "kq");
        rights.remove(CastlingRights::all());
        assert_eq!(rights.to_string(), "-");
    }
}
