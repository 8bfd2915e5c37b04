//! Text dumps of the board and attacker counts.

use std::fmt::Write as _;

use super::state::Position;
use super::types::{Bitboard, Color, Square};

impl Position {
    /// Board diagram followed by FEN and checkers, as printed by the `d` command.
    #[must_use]
    pub fn print(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.grid(|sq| match self.piece_on(sq) {
            Some((color, piece)) => piece.to_fen_char(color),
            None => ' ',
        }));
        let _ = writeln!(out, "\nFen: {}", self.to_fen());
        let checkers: Vec<String> = self.checkers().iter().map(|sq| sq.to_string()).collect();
        let _ = writeln!(out, "Checkers: {}", checkers.join(" "));
        out
    }

    /// Attacker counts of `color` for every square, drawn like the board.
    #[must_use]
    pub fn attackers_count_table(&self, color: Color) -> String {
        self.grid(|sq| match self.attackers_count(color, sq) {
            0 => '.',
            n => char::from_digit(u32::from(n.min(9)), 10).unwrap_or('+'),
        })
    }

    /// Dump the board and both attacker-count grids to the log at trace level.
    pub fn log_position(&self) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        log::trace!("position\n{}", self.print());
        for color in Color::BOTH {
            log::trace!("{color} attackers\n{}", self.attackers_count_table(color));
        }
    }

    fn grid(&self, cell: impl Fn(Square) -> char) -> String {
        let mut out = String::from(" +---+---+---+---+---+---+---+---+\n");
        for rank in (0..8).rev() {
            out.push(' ');
            out.push('|');
            for file in 0..8 {
                let _ = write!(out, " {} |", cell(Square::from_coords(file, rank)));
            }
            let _ = writeln!(out, " {}", rank + 1);
            out.push_str(" +---+---+---+---+---+---+---+---+\n");
        }
        out.push_str("   a   b   c   d   e   f   g   h\n");
        out
    }
}

/// One bitboard drawn as a grid of `1` and `.`, for ad hoc inspection.
#[must_use]
pub fn bitboard_grid(bb: Bitboard) -> String {
    let mut out = String::new();
    for rank in (0..8).rev() {
        for file in 0..8 {
            out.push(if bb.contains(Square::from_coords(file, rank)) {
                '1'
            } else {
                '.'
            });
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_contains_fen_and_pieces() {
        let pos = Position::startpos();
        let text = pos.print();
        assert!(text.contains("Fen: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert!(text.contains("| R | N | B | Q | K | B | N | R | 1"));
        assert!(text.contains("Checkers: \n"));
    }

    #[test]
    fn test_attackers_table_rows() {
        let pos = Position::startpos();
        let table = pos.attackers_count_table(Color::White);
        // Third rank: a3 b3 c3 d3 e3 f3 g3 h3 are covered 2 2 3 2 2 3 2 2 times.
        assert!(table.contains("| 2 | 2 | 3 | 2 | 2 | 3 | 2 | 2 | 3"));
    }

    #[test]
    fn test_bitboard_grid() {
        let grid = bitboard_grid(Bitboard::RANK_1 | Square::H8);
        assert!(grid.starts_with(".......1\n"));
        assert!(grid.ends_with("11111111\n"));
    }
}
