//! Pawn pushes, captures, en passant and promotions.

use crate::board::attacks::pawn_attacks;
use crate::board::state::Position;
use crate::board::types::{
    Bitboard, Color, Direction, Move, MoveList, Piece, Square, PROMOTION_PIECES,
};

impl Position {
    /// Pushes, double pushes, captures and en passant for every `us` pawn,
    /// keeping only moves whose destination lies in `target`. An en-passant
    /// capture also qualifies when the pawn it removes is in `target`.
    pub(crate) fn generate_pawn_moves(&self, us: Color, target: Bitboard, moves: &mut MoveList) {
        let occupied = self.pieces();
        let enemies = self.pieces_of(!us);
        let up = Direction::up(us);
        let ep = self.ep_square();

        for &from in self.squares(us, Piece::Pawn) {
            if let Some(one) = from.shift(up) {
                if !occupied.contains(one) {
                    if target.contains(one) {
                        push_pawn_move(us, from, one, moves);
                    }
                    if from.relative_rank(us) == 1 {
                        if let Some(two) = one.shift(up) {
                            if !occupied.contains(two) && target.contains(two) {
                                moves.push(Move::new(from, two));
                            }
                        }
                    }
                }
            }

            for to in pawn_attacks(us, from) {
                if enemies.contains(to) {
                    if target.contains(to) {
                        push_pawn_move(us, from, to, moves);
                    }
                } else if ep == Some(to) {
                    let captured = Square::from_coords(to.file(), from.rank());
                    if target.contains(to) || target.contains(captured) {
                        moves.push(Move::new(from, to));
                    }
                }
            }
        }
    }
}

/// Push a pawn move, expanding it into the four promotions on the last rank.
fn push_pawn_move(us: Color, from: Square, to: Square, moves: &mut MoveList) {
    if to.relative_rank(us) == 7 {
        for piece in PROMOTION_PIECES {
            moves.push(Move::new_promotion(from, to, piece));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}
