//! Applying and reverting moves, and perft node counting.

use super::state::{
    castling_king_destination, castling_rook_destination, MoveKind, Position, StateInfo,
};
use super::types::{Bitboard, Color, Move, Piece, Square};

impl Position {
    /// Apply a move, working out whether it gives check first.
    ///
    /// The move must be at least pseudo-legal for the side to move. Nothing is
    /// validated here: a stale or illegal move leaves the board inconsistent.
    pub fn do_move(&mut self, m: Move) {
        let gives_check = self.gives_check(m);
        self.do_move_with_check(m, gives_check);
    }

    /// Apply a pseudo-legal move whose checking status the caller already knows.
    pub fn do_move_with_check(&mut self, m: Move, gives_check: bool) {
        let us = self.side_to_move;
        let them = !us;
        let from = m.from();
        let to = m.to();
        let Some((mover, piece)) = self.piece_on(from) else {
            debug_assert!(false, "do_move {m} from an empty square");
            return;
        };
        debug_assert_eq!(mover, us, "do_move {m} moves an enemy piece");

        let kind = self.move_kind(m);
        let prev = *self.state();
        let mut st = StateInfo {
            castling_rights: prev.castling_rights,
            rule50: prev.rule50 + 1,
            plies_from_null: prev.plies_from_null + 1,
            ep_square: None,
            captured: None,
            kind,
            checkers: Bitboard::EMPTY,
            blockers_for_king: [Bitboard::EMPTY; 2],
            pinners: [Bitboard::EMPTY; 2],
        };
        self.game_ply += 1;

        if kind != MoveKind::Castling {
            let capture_sq = if kind == MoveKind::EnPassant {
                Square::from_coords(to.file(), from.rank())
            } else {
                to
            };
            if let Some(captured) = self.remove_piece(capture_sq) {
                debug_assert!(captured.0 == them && captured.1 != Piece::King);
                st.captured = Some(captured);
                st.rule50 = 0;
            }
        }

        if piece == Piece::Pawn {
            st.rule50 = 0;
            if from.index().abs_diff(to.index()) == 16 {
                st.ep_square = Some(Square::from_index((from.index() + to.index()) / 2));
            }
        }

        st.castling_rights.remove(
            self.castling_rights_mask[from.index()].union(self.castling_rights_mask[to.index()]),
        );
        self.states.push(st);

        match kind {
            MoveKind::Castling => {
                let kingside = to == castling_king_destination(us, true);
                self.do_castling(us, from, kingside, true);
            }
            MoveKind::Promotion => {
                self.remove_piece(from);
                self.put_piece(us, m.promotion().unwrap_or(Piece::Queen), to);
            }
            MoveKind::Normal | MoveKind::EnPassant => self.move_piece(from, to),
        }

        self.side_to_move = them;
        self.refresh_derived();
        debug_assert_eq!(gives_check, self.in_check(), "gives_check disagrees for {m}");
    }

    /// Revert `m`, which must be the last move applied.
    pub fn undo_move(&mut self, m: Move) {
        if self.states.len() < 2 {
            debug_assert!(false, "undo_move {m} with no move to undo");
            return;
        }
        let Some(st) = self.states.pop() else {
            return;
        };
        let us = !self.side_to_move;
        let from = m.from();
        let to = m.to();
        self.side_to_move = us;

        match st.kind {
            MoveKind::Castling => {
                let kingside = to == castling_king_destination(us, true);
                self.do_castling(us, from, kingside, false);
            }
            MoveKind::Promotion => {
                self.remove_piece(to);
                self.put_piece(us, Piece::Pawn, from);
            }
            MoveKind::Normal | MoveKind::EnPassant => self.move_piece(to, from),
        }

        if let Some((color, piece)) = st.captured {
            let capture_sq = if st.kind == MoveKind::EnPassant {
                Square::from_coords(to.file(), from.rank())
            } else {
                to
            };
            self.put_piece(color, piece, capture_sq);
        }

        self.game_ply -= 1;
        self.refresh_derived();
    }

    /// Move king and rook between their origin and castled squares.
    ///
    /// Both pieces are lifted before either is placed, so origin and
    /// destination squares may overlap (king and rook swapping, or a king
    /// that does not move at all).
    fn do_castling(&mut self, us: Color, king_from: Square, kingside: bool, forward: bool) {
        let Some(rook_from) = self.castling_rook_square(us, kingside) else {
            debug_assert!(false, "castling without a rook square");
            return;
        };
        let king_to = castling_king_destination(us, kingside);
        let rook_to = castling_rook_destination(us, kingside);
        let (king_src, king_dst, rook_src, rook_dst) = if forward {
            (king_from, king_to, rook_from, rook_to)
        } else {
            (king_to, king_from, rook_to, rook_from)
        };
        self.remove_piece(king_src);
        self.remove_piece(rook_src);
        self.put_piece(us, Piece::King, king_dst);
        self.put_piece(us, Piece::Rook, rook_dst);
    }

    /// Count leaf nodes of the legal move tree to `depth`.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_legal();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for m in moves {
            self.do_move(m);
            nodes += self.perft(depth - 1);
            self.undo_move(m);
        }
        nodes
    }

    /// Per-root-move perft counts, in generation order. Empty at depth 0,
    /// where no move is played.
    pub fn perft_divide(&mut self, depth: u32) -> Vec<(Move, u64)> {
        if depth == 0 {
            return Vec::new();
        }
        let moves = self.generate_legal();
        let mut out = Vec::with_capacity(moves.len());
        for m in moves {
            self.do_move(m);
            let nodes = self.perft(depth - 1);
            self.undo_move(m);
            out.push((m, nodes));
        }
        out
    }
}
