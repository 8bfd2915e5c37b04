//! Attack bookkeeping, check detection and legality.

use super::attacks::{
    aligned, attacks_behind_king, attacks_from, between, bishop_attacks, king_attacks,
    knight_attacks, pawn_attacks, rook_attacks,
};
use super::state::{castling_king_destination, castling_rook_destination, MoveKind, Position};
use super::types::{Bitboard, Color, Move, Piece, Square};

impl Position {
    /// Recompute every derived view after the board changed.
    pub(crate) fn refresh_derived(&mut self) {
        self.update_squares_attackers_count();
        self.update_attacked_king_squares();
        self.update_blockers();
    }

    /// Rebuild the attacker-count grid from scratch, recording the pieces
    /// that attack the side to move's king as checkers.
    pub(crate) fn update_squares_attackers_count(&mut self) {
        self.attackers_count = [[0; 64]; 2];
        let occupied = self.pieces();
        let them = !self.side_to_move;
        let our_king = self.king_square(self.side_to_move);
        let mut checkers = Bitboard::EMPTY;

        for sq in occupied {
            let Some((color, piece)) = self.piece_on(sq) else {
                continue;
            };
            let attacks = attacks_from(piece, color, sq, occupied);
            for target in attacks {
                self.attackers_count[color.index()][target.index()] += 1;
            }
            if color == them && attacks.contains(our_king) {
                checkers |= sq;
            }
        }
        self.state_mut().checkers = checkers;
    }

    /// Record, for each king, the squares behind it on enemy slider rays.
    pub(crate) fn update_attacked_king_squares(&mut self) {
        let occupied = self.pieces();
        for color in Color::BOTH {
            let king = self.king_square(color);
            let mut behind = Bitboard::EMPTY;
            for piece in Piece::SLIDERS {
                for &sq in self.squares(!color, piece) {
                    behind |= attacks_behind_king(piece, sq, occupied, king);
                }
            }
            self.behind_king[color.index()] = behind;
        }
    }

    fn update_blockers(&mut self) {
        for color in Color::BOTH {
            let (blockers, pinners) = self.blockers_and_pinners(color);
            let st = self.state_mut();
            st.blockers_for_king[color.index()] = blockers;
            st.pinners[color.index()] = pinners;
        }
    }

    /// Pieces standing alone between `color`'s king and an enemy slider, and
    /// the sliders that pin one of `color`'s own pieces that way.
    fn blockers_and_pinners(&self, color: Color) -> (Bitboard, Bitboard) {
        let king = self.king_square(color);
        let snipers = (rook_attacks(king, Bitboard::EMPTY) & self.straight_sliders(!color))
            | (bishop_attacks(king, Bitboard::EMPTY) & self.diagonal_sliders(!color));
        let mut blockers = Bitboard::EMPTY;
        let mut pinners = Bitboard::EMPTY;
        for sniper in snipers {
            let between_pieces = self.slider_blockers(sniper, king);
            if !between_pieces.is_empty() && !between_pieces.more_than_one() {
                blockers |= between_pieces;
                if !(between_pieces & self.pieces_of(color)).is_empty() {
                    pinners |= sniper;
                }
            }
        }
        (blockers, pinners)
    }

    /// Occupied squares strictly between a slider on `from` and `to`.
    ///
    /// Empty when the two squares do not share a rank, file or diagonal.
    /// A single blocker in front of a king is pinned along that line.
    #[must_use]
    pub fn slider_blockers(&self, from: Square, to: Square) -> Bitboard {
        between(from, to) & self.pieces()
    }

    /// True when the side to move's king is attacked.
    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move;
        self.attackers_count(!us, self.king_square(us)) > 0
    }

    /// Pieces of `color` attacking `sq` with the given occupancy, computed
    /// directly from the attack tables.
    #[must_use]
    pub fn attackers_to(&self, sq: Square, color: Color, occupied: Bitboard) -> Bitboard {
        (pawn_attacks(!color, sq) & self.pieces_of_type(color, Piece::Pawn))
            | (knight_attacks(sq) & self.pieces_of_type(color, Piece::Knight))
            | (king_attacks(sq) & self.pieces_of_type(color, Piece::King))
            | (rook_attacks(sq, occupied) & self.straight_sliders(color))
            | (bishop_attacks(sq, occupied) & self.diagonal_sliders(color))
    }

    /// Exact legality test for a pseudo-legal move of the side to move.
    ///
    /// King moves must land on a square no enemy piece attacks, including the
    /// square behind the king on a checking ray. Castling additionally needs
    /// every square the king crosses to be safe. Other moves may not leave a
    /// check unanswered, may not move a pinned piece off its line, and an
    /// en-passant capture may not expose the king along the vacated rank.
    #[must_use]
    pub fn legal(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let them = !us;
        let from = m.from();
        let to = m.to();
        let king = self.king_square(us);

        let Some((color, piece)) = self.piece_on(from) else {
            return false;
        };
        if color != us {
            return false;
        }

        if piece == Piece::King {
            return match self.castling_side(us, m) {
                Some(kingside) => self.castling_is_safe(us, kingside),
                None => {
                    self.attackers_count(them, to) == 0 && !self.behind_king(us).contains(to)
                }
            };
        }

        let checkers = self.checkers();
        let kind = self.move_kind(m);
        if !checkers.is_empty() {
            if checkers.more_than_one() {
                return false;
            }
            let block = between(king, checkers.lsb().unwrap_or(king)) | checkers;
            let captured_checker = kind == MoveKind::EnPassant
                && checkers.contains(Square::from_coords(to.file(), from.rank()));
            if !block.contains(to) && !captured_checker {
                return false;
            }
        }

        if kind == MoveKind::EnPassant {
            let captured = Square::from_coords(to.file(), from.rank());
            let occupied = (self.pieces() ^ from ^ captured) | to;
            return (rook_attacks(king, occupied) & self.straight_sliders(them)).is_empty()
                && (bishop_attacks(king, occupied) & self.diagonal_sliders(them)).is_empty();
        }

        !self.blockers_for_king(us).contains(from) || aligned(from, to, king)
    }

    /// Squares the king crosses while castling, destination included, are
    /// unattacked, and the rook leaving its square uncovers no rank attack.
    pub(crate) fn castling_is_safe(&self, us: Color, kingside: bool) -> bool {
        if self.in_check() {
            return false;
        }
        let them = !us;
        let king_from = self.king_square(us);
        let king_to = castling_king_destination(us, kingside);
        let step: i8 = if king_to > king_from { -1 } else { 1 };
        let mut sq = king_to;
        while sq != king_from {
            if self.attackers_count(them, sq) > 0 {
                return false;
            }
            match sq.offset(step, 0) {
                Some(next) => sq = next,
                None => break,
            }
        }
        let Some(rook_from) = self.castling_rook_square(us, kingside) else {
            return false;
        };
        let occupied = (self.pieces() ^ king_from ^ rook_from)
            | king_to
            | castling_rook_destination(us, kingside);
        (rook_attacks(king_to, occupied) & self.straight_sliders(them)).is_empty()
    }

    /// Whether the pseudo-legal move `m` puts the opponent in check.
    ///
    /// Covers direct checks by the moved or promoted piece and discovered
    /// checks, including those opened by the castling rook or by the pawn an
    /// en-passant capture removes.
    #[must_use]
    pub fn gives_check(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let from = m.from();
        let to = m.to();
        let Some((_, piece)) = self.piece_on(from) else {
            return false;
        };
        let their_king = self.king_square(!us);

        let mut occupied = self.pieces() ^ from;
        let mut straight = self.straight_sliders(us) & !Bitboard::from_square(from);
        let mut diagonal = self.diagonal_sliders(us) & !Bitboard::from_square(from);

        let (landed_piece, landed_on) = match self.move_kind(m) {
            MoveKind::Castling => {
                let kingside = to == castling_king_destination(us, true);
                let Some(rook_from) = self.castling_rook_square(us, kingside) else {
                    return false;
                };
                let rook_to = castling_rook_destination(us, kingside);
                occupied &= !Bitboard::from_square(rook_from);
                occupied |= to;
                straight &= !Bitboard::from_square(rook_from);
                (Piece::Rook, rook_to)
            }
            MoveKind::EnPassant => {
                occupied ^= Square::from_coords(to.file(), from.rank());
                (Piece::Pawn, to)
            }
            MoveKind::Promotion => (m.promotion().unwrap_or(Piece::Queen), to),
            MoveKind::Normal => (piece, to),
        };
        occupied |= landed_on;
        if landed_piece.attacks_straight() {
            straight |= landed_on;
        }
        if landed_piece.attacks_diagonally() {
            diagonal |= landed_on;
        }

        let direct = match landed_piece {
            Piece::Pawn => pawn_attacks(us, landed_on).contains(their_king),
            Piece::Knight => knight_attacks(landed_on).contains(their_king),
            _ => false,
        };
        direct
            || !(rook_attacks(their_king, occupied) & straight).is_empty()
            || !(bishop_attacks(their_king, occupied) & diagonal).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn test_startpos_attack_counts() {
        let p = Position::startpos();
        // f3 is covered by the g1 knight and the e2 and g2 pawns.
        assert_eq!(p.attackers_count(Color::White, Square::F3), 3);
        assert_eq!(p.attackers_count(Color::White, Square::E4), 0);
        assert_eq!(p.attackers_count(Color::Black, Square::C6), 3);
        assert!(!p.in_check());
        assert!(p.checkers().is_empty());
    }

    #[test]
    fn test_checkers_and_in_check() {
        let p = pos("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1");
        assert!(p.in_check());
        assert_eq!(p.checkers(), Bitboard::from_square(Square::E2));
    }

    #[test]
    fn test_pins_and_slider_blockers() {
        // The e2 bishop is pinned by the e8 rook.
        let p = pos("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1");
        assert_eq!(p.blockers_for_king(Color::White), Bitboard::from_square(Square::E2));
        assert_eq!(p.pinners(Color::White), Bitboard::from_square(Square::E8));
        assert_eq!(
            p.slider_blockers(Square::E8, Square::E1),
            Bitboard::from_square(Square::E2)
        );
        assert!(!p.legal(Move::new(Square::E2, Square::D3)));
        assert!(p.slider_blockers(Square::E8, Square::D1).is_empty());
    }

    #[test]
    fn test_pinned_piece_may_slide_along_the_pin() {
        let p = pos("4r1k1/8/8/8/8/8/4R3/4K3 w - - 0 1");
        assert!(p.legal(Move::new(Square::E2, Square::E5)));
        assert!(p.legal(Move::new(Square::E2, Square::E8)));
        assert!(!p.legal(Move::new(Square::E2, Square::D2)));
    }

    #[test]
    fn test_king_cannot_retreat_along_checking_ray() {
        let p = pos("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
        assert!(p.in_check());
        assert!(p.behind_king(Color::White).contains(Square::F1));
        assert!(!p.legal(Move::new(Square::E1, Square::F1)));
        assert!(p.legal(Move::new(Square::E1, Square::E2)));
    }

    #[test]
    fn test_en_passant_discovered_check_is_illegal() {
        // Capturing on d6 would clear the fifth rank between the h5 rook and a5 king.
        let p = pos("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
        let ep = Move::new(Square::E5, Square::D6);
        assert_eq!(p.move_kind(ep), MoveKind::EnPassant);
        assert!(!p.legal(ep));
        assert!(p.legal(Move::new(Square::E5, Square::E6)));
    }

    #[test]
    fn test_gives_check_direct_and_discovered() {
        let p = pos("4k3/8/8/8/8/8/4B3/4R1K1 w - - 0 1");
        // Moving the bishop off the e-file uncovers the rook.
        assert!(p.gives_check(Move::new(Square::E2, Square::D3)));
        // The bishop itself checks from b5.
        assert!(p.gives_check(Move::new(Square::E2, Square::B5)));
        assert!(!p.gives_check(Move::new(Square::G1, Square::G2)));

        let p = pos("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        assert!(!p.gives_check(Move::new(Square::E1, Square::G1)));
        let p = pos("5k2/8/8/8/8/8/8/4K2R w K - 0 1");
        // The rook lands on f1, facing the king on f8.
        assert!(p.gives_check(Move::new(Square::E1, Square::G1)));
    }

    #[test]
    fn test_gives_check_by_promotion() {
        let p = pos("3k4/1P6/8/8/8/8/8/4K3 w - - 0 1");
        assert!(p.gives_check(Move::new_promotion(Square::B7, Square::B8, Piece::Queen)));
        assert!(p.gives_check(Move::new_promotion(Square::B7, Square::B8, Piece::Rook)));
        assert!(!p.gives_check(Move::new_promotion(Square::B7, Square::B8, Piece::Bishop)));
        assert!(!p.gives_check(Move::new_promotion(Square::B7, Square::B8, Piece::Knight)));
    }

    #[test]
    fn test_attackers_to_matches_count() {
        let p = pos("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        for sq in Square::all() {
            for color in Color::BOTH {
                assert_eq!(
                    p.attackers_to(sq, color, p.pieces()).popcount(),
                    u32::from(p.attackers_count(color, sq)),
                    "{color} attackers of {sq}"
                );
            }
        }
    }
}
