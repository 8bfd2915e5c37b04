//! Knight and slider moves.

use crate::board::attacks::attacks_from;
use crate::board::state::Position;
use crate::board::types::{Bitboard, Color, Move, MoveList, Piece};

const NON_PAWN_PIECES: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

impl Position {
    /// Knight, bishop, rook and queen moves into `target`, never onto a
    /// friendly piece.
    pub(crate) fn generate_piece_moves(&self, us: Color, target: Bitboard, moves: &mut MoveList) {
        let occupied = self.pieces();
        let allowed = target & !self.pieces_of(us);
        for piece in NON_PAWN_PIECES {
            for &from in self.squares(us, piece) {
                for to in attacks_from(piece, us, from, occupied) & allowed {
                    moves.push(Move::new(from, to));
                }
            }
        }
    }
}
