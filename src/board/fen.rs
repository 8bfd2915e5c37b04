use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::state::{
    castling_king_destination, castling_rook_destination, Position, MAX_PIECES_PER_KIND,
};
use super::types::{piece_code, Bitboard, CastlingRights, Color, Move, Piece, Square};

impl Position {
    /// Parse a position from FEN notation.
    ///
    /// Accepts standard `KQkq`, Shredder (`HAha`) and X-FEN castling fields.
    /// Missing halfmove/fullmove fields default to `0` and `1`, a fullmove
    /// number of `0` is read as `1`, and an en-passant square on the wrong
    /// rank is ignored. Everything else that cannot describe a position is
    /// rejected.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut pos = Position::empty();
        pos.parse_placement(parts[0])?;

        for color in Color::BOTH {
            let kings = pos.count(color, Piece::King);
            if kings != 1 {
                return Err(FenError::KingCount {
                    color,
                    found: kings,
                });
            }
        }

        pos.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        for c in parts[2].chars() {
            if c == '-' {
                continue;
            }
            let rook_sq = pos.castling_rook_for_token(c)?;
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            pos.set_castling_right(color, rook_sq);
        }

        if parts[3] != "-" {
            let ep: Square = parts[3].parse().map_err(|_| FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            })?;
            // Only the square a pawn of the side not to move just skipped counts.
            if ep.relative_rank(pos.side_to_move) == 5 {
                pos.state_mut().ep_square = Some(ep);
            }
        }

        let rule50 = parse_counter(parts.get(4), "halfmove clock", 0)?;
        let fullmove = parse_counter(parts.get(5), "fullmove number", 1)?;
        pos.state_mut().rule50 = rule50;
        pos.game_ply =
            2 * fullmove.saturating_sub(1) + u32::from(pos.side_to_move == Color::Black);

        pos.refresh_derived();
        Ok(pos)
    }

    /// Replace this position with the one described by `fen`.
    ///
    /// On error the position is left untouched.
    pub fn set(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Position::from_fen(fen)?;
        Ok(())
    }

    fn parse_placement(&mut self, placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRankCount { found: ranks.len() });
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    if !(1..=8).contains(&run) {
                        return Err(FenError::InvalidPiece { char: c });
                    }
                    file += run as usize;
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if file >= 8 {
                    return Err(FenError::InvalidRankWidth {
                        rank: rank + 1,
                        files: file + 1,
                    });
                }
                let sq = Square::from_coords(file, rank);
                if piece == Piece::Pawn && (rank == 0 || rank == 7) {
                    return Err(FenError::PawnOnBackRank {
                        square: sq.to_string(),
                    });
                }
                if self.piece_count[piece_code(color, piece)] >= MAX_PIECES_PER_KIND {
                    return Err(FenError::TooManyPieces { char: c });
                }
                self.put_piece(color, piece, sq);
                file += 1;
            }
            if file != 8 {
                return Err(FenError::InvalidRankWidth {
                    rank: rank + 1,
                    files: file,
                });
            }
        }
        Ok(())
    }

    /// Resolve one castling letter to its rook's square.
    ///
    /// `K`/`Q` take the outermost rook on that side of the king, scanning
    /// inward from the corner; a file letter names the rook's file directly.
    fn castling_rook_for_token(&self, c: char) -> Result<Square, FenError> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let own_rook = |file: usize| {
            let sq = Square::from_coords(file, 0).relative(color);
            (self.piece_on(sq) == Some((color, Piece::Rook))).then_some(sq)
        };
        let king = self.king_square(color);
        let found = match c.to_ascii_uppercase() {
            'K' => (king.file() + 1..8).rev().find_map(own_rook),
            'Q' => (0..king.file()).find_map(own_rook),
            f @ 'A'..='H' => own_rook(f as usize - 'A' as usize),
            _ => return Err(FenError::InvalidCastling { char: c }),
        };
        if king.relative_rank(color) != 0 {
            return Err(FenError::MissingCastlingRook { char: c });
        }
        found.ok_or(FenError::MissingCastlingRook { char: c })
    }

    /// Grant `color` the right to castle with the rook on `rook_from`.
    ///
    /// The wing is king-side when the rook stands on a higher square than the
    /// king. Both the king and rook squares revoke the right when touched,
    /// and the path is every square either piece crosses on its way to its
    /// destination, apart from the two origin squares.
    pub(crate) fn set_castling_right(&mut self, color: Color, rook_from: Square) {
        let king_from = self.king_square(color);
        let kingside = king_from < rook_from;
        let right = CastlingRights::of(color, kingside);
        let slot = CastlingRights::slot(color, kingside);

        self.state_mut().castling_rights.insert(right);
        self.castling_rights_mask[king_from.index()].insert(right);
        self.castling_rights_mask[rook_from.index()].insert(right);
        self.castling_rook_square[slot] = Some(rook_from);

        let king_to = castling_king_destination(color, kingside);
        let rook_to = castling_rook_destination(color, kingside);
        let mut path = span(rook_from, rook_to) | span(king_from, king_to);
        path &= !(Bitboard::from_square(king_from) | rook_from);
        self.castling_path[slot] = path;
    }

    /// Write the position as FEN.
    ///
    /// Castling rights use `KQkq` when the rook starts on its corner and the
    /// rook's file letter otherwise.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_on(Square::from_coords(file, rank)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.side_to_move == Color::White { 'w' } else { 'b' });
        fen.push(' ');

        let rights = self.castling_rights();
        if rights.is_empty() {
            fen.push('-');
        }
        for color in Color::BOTH {
            for kingside in [true, false] {
                if !rights.has(color, kingside) {
                    continue;
                }
                let Some(rook_sq) = self.castling_rook_square(color, kingside) else {
                    continue;
                };
                let letter = match (kingside, rook_sq.file()) {
                    (true, 7) => 'K',
                    (false, 0) => 'Q',
                    (_, file) => (b'A' + file as u8) as char,
                };
                fen.push(if color == Color::White {
                    letter
                } else {
                    letter.to_ascii_lowercase()
                });
            }
        }

        let ep = self.ep_square().map_or_else(|| "-".to_string(), |sq| sq.to_string());
        fen.push_str(&format!(
            " {} {} {}",
            ep,
            self.rule50(),
            self.fullmove_number()
        ));
        fen
    }

    /// Parse a move in coordinate notation (e.g., "e2e4", "e7e8q").
    ///
    /// Returns the matching legal move, or an error describing why parsing
    /// failed. Castling is written as the king's move (`e1g1`).
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Position;
    ///
    /// let pos = Position::startpos();
    /// let mv = pos.parse_move("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() < 4 || chars.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: chars.len() });
        }

        let square = |f: char, r: char| -> Result<Square, MoveParseError> {
            format!("{f}{r}")
                .parse()
                .map_err(|_| MoveParseError::InvalidSquare {
                    notation: text.to_string(),
                })
        };
        let from = square(chars[0], chars[1])?;
        let to = square(chars[2], chars[3])?;

        let promotion = match chars.get(4) {
            None => None,
            Some(&c) => match Piece::from_char(c) {
                Some(piece @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => {
                    Some(piece)
                }
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
        };

        self.generate_legal()
            .into_iter()
            .find(|m| m.from() == from && m.to() == to && m.promotion() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: text.to_string(),
            })
    }

    /// Parse a coordinate move and apply it in one call.
    pub fn do_move_str(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(text)?;
        self.do_move(mv);
        Ok(mv)
    }
}

/// Squares from `a` to `b` inclusive; both lie on the same rank.
fn span(a: Square, b: Square) -> Bitboard {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (lo.index()..=hi.index()).fold(Bitboard::EMPTY, |bb, i| bb | Square::from_index(i))
}

fn parse_counter(field: Option<&&str>, name: &'static str, default: u32) -> Result<u32, FenError> {
    match field {
        None => Ok(default),
        Some(text) => text.parse().map_err(|_| FenError::InvalidCounter {
            field: name,
            found: (*text).to_string(),
        }),
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}
