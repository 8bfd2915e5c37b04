//! Move generation.
//!
//! Every generator writes into a caller-owned [`MoveList`] and is restricted to
//! a `target` set of destination squares, which is how evasions reuse the
//! ordinary piece and pawn generators.

mod kings;
mod pawns;
mod pieces;

use super::attacks::between;
use super::state::Position;
use super::types::{Bitboard, MoveList};

/// Which moves to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenType {
    /// Every pseudo-legal move, castling included. King moves onto attacked
    /// squares are already left out.
    NonEvasions,
    /// Replies to a check: king moves, plus captures of a single checker and
    /// interpositions on its ray.
    Evasions,
    /// Fully legal moves.
    Legal,
}

impl Position {
    #[must_use]
    pub fn generate(&self, gen: GenType) -> MoveList {
        let mut moves = MoveList::new();
        match gen {
            GenType::NonEvasions => self.generate_non_evasions(&mut moves),
            GenType::Evasions => self.generate_evasions(&mut moves),
            GenType::Legal => {
                if self.in_check() {
                    self.generate_evasions(&mut moves);
                } else {
                    self.generate_non_evasions(&mut moves);
                }
                moves.retain(|m| self.legal(m));
            }
        }
        moves
    }

    /// All legal moves for the side to move.
    #[must_use]
    pub fn generate_legal(&self) -> MoveList {
        self.generate(GenType::Legal)
    }

    fn generate_non_evasions(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        let target = !self.pieces_of(us);
        self.generate_pawn_moves(us, target, moves);
        self.generate_piece_moves(us, target, moves);
        self.generate_king_moves(us, moves);
        self.generate_castling(us, moves);
    }

    fn generate_evasions(&self, moves: &mut MoveList) {
        let us = self.side_to_move;
        self.generate_king_moves(us, moves);

        let checkers = self.checkers();
        if checkers.more_than_one() {
            return;
        }
        let Some(checker) = checkers.lsb() else {
            return;
        };
        let target: Bitboard = between(self.king_square(us), checker) | checker;
        self.generate_pawn_moves(us, target, moves);
        self.generate_piece_moves(us, target, moves);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::{Move, Square};

    #[test]
    fn test_startpos_has_twenty_moves() {
        let pos = Position::startpos();
        assert_eq!(pos.generate(GenType::NonEvasions).len(), 20);
        assert_eq!(pos.generate_legal().len(), 20);
    }

    #[test]
    fn test_evasions_include_blocks_and_captures() {
        // Rook on e8 checks the king on e1; the knight can block on e5 and
        // the bishop on e2.
        let pos = Position::from_fen("4r1k1/8/8/8/8/5N2/8/3BK3 w - - 0 1").unwrap();
        assert!(pos.in_check());
        let moves = pos.generate_legal();
        assert!(moves.contains(Move::new(Square::F3, Square::E5)));
        assert!(moves.contains(Move::new(Square::D1, Square::E2)));
        assert!(moves.contains(Move::new(Square::E1, Square::F2)));
        assert!(!moves.contains(Move::new(Square::E1, Square::E2)));
        assert!(!moves.contains(Move::new(Square::F3, Square::G5)));
    }

    #[test]
    fn test_double_check_allows_only_king_moves() {
        // Rook and bishop both check; the c2 knight could take the bishop but may not.
        let pos = Position::from_fen("4r1k1/8/8/8/1b6/8/2N5/4K3 w - - 0 1").unwrap();
        assert!(pos.checkers().more_than_one());
        assert!(!pos.generate_legal().is_empty());
        for m in pos.generate_legal().iter() {
            assert_eq!(m.from(), Square::E1);
        }
    }

    #[test]
    fn test_en_passant_removes_checking_pawn() {
        // The d5 pawn just advanced two squares and gives check to the e4 king.
        let pos = Position::from_fen("8/8/8/2Pp4/4K3/8/8/7k w - d6 0 1").unwrap();
        assert!(pos.in_check());
        assert!(pos.generate_legal().contains(Move::new(Square::C5, Square::D6)));
    }
}
