//! King steps and castling.

use crate::board::attacks::king_attacks;
use crate::board::state::{castling_king_destination, Position};
use crate::board::types::{Color, Move, MoveList};

impl Position {
    /// King steps onto squares that are free of friendly pieces, attacked by
    /// no enemy piece, and not behind the king on an enemy slider's ray.
    pub(crate) fn generate_king_moves(&self, us: Color, moves: &mut MoveList) {
        let from = self.king_square(us);
        let them = !us;
        for to in king_attacks(from) & !self.pieces_of(us) {
            if self.attackers_count(them, to) == 0 && !self.behind_king(us).contains(to) {
                moves.push(Move::new(from, to));
            }
        }
    }

    /// Castling moves, written as the king's origin and destination squares.
    ///
    /// A right is skipped when it is not held, its path is occupied, the king
    /// is in check, or any square the king crosses is attacked. A castle that
    /// would read as a one-file king step onto an empty square is not
    /// generated.
    pub(crate) fn generate_castling(&self, us: Color, moves: &mut MoveList) {
        if self.in_check() {
            return;
        }
        let from = self.king_square(us);
        for kingside in [true, false] {
            if !self.can_castle(us, kingside) || self.castling_impeded(us, kingside) {
                continue;
            }
            let to = castling_king_destination(us, kingside);
            if self.castling_is_distinct(us, kingside, from)
                && self.castling_is_safe(us, kingside)
            {
                moves.push(Move::new(from, to));
            }
        }
    }
}
