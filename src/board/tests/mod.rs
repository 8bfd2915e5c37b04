//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move generator node counts on reference positions
//! - `make_unmake.rs` - do_move/undo_move correctness
//! - `edge_cases.rs` - Special positions and rules corner cases
//! - `proptest.rs` - Property-based tests over random playouts

mod make_unmake;

use crate::board::{Color, Move, Piece, Position, Square};

pub(super) fn find_move(pos: &Position, text: &str) -> Move {
    pos.parse_move(text)
        .unwrap_or_else(|err| panic!("{text} should be legal here: {err}"))
}

/// Every view of the board agrees with the square array.
pub(super) fn assert_views_in_sync(pos: &Position) {
    let mut occupied = 0u64;
    for sq in Square::all() {
        let on_board = pos.piece_on(sq);
        match on_board {
            Some((color, piece)) => {
                occupied |= 1 << sq.index();
                assert!(pos.pieces_of_type(color, piece).contains(sq), "{sq} missing from bitboards");
                assert!(pos.squares(color, piece).contains(&sq), "{sq} missing from piece list");
            }
            None => assert!(!pos.pieces().contains(sq), "{sq} empty but set in bitboards"),
        }
    }
    assert_eq!(pos.pieces().0, occupied);
    for color in Color::BOTH {
        for piece in Piece::ALL {
            let listed = pos.squares(color, piece);
            assert_eq!(listed.len(), pos.pieces_of_type(color, piece).popcount() as usize);
            for &sq in listed {
                assert_eq!(pos.piece_on(sq), Some((color, piece)));
                assert_eq!(pos.squares(color, piece)[pos.index[sq.index()]], sq);
            }
        }
        assert_eq!(pos.count(color, Piece::King), 1);
    }
}

/// Squares attacked by the piece on `from`, walked square by square.
fn brute_force_attacks(pos: &Position, from: Square) -> Vec<Square> {
    let Some((color, piece)) = pos.piece_on(from) else {
        return Vec::new();
    };
    let forward: i8 = if color == Color::White { 1 } else { -1 };
    let (steps, slides): (Vec<(i8, i8)>, bool) = match piece {
        Piece::Pawn => (vec![(-1, forward), (1, forward)], false),
        Piece::Knight => (
            vec![(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)],
            false,
        ),
        Piece::King => (
            vec![(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)],
            false,
        ),
        Piece::Bishop => (vec![(1, 1), (1, -1), (-1, 1), (-1, -1)], true),
        Piece::Rook => (vec![(1, 0), (-1, 0), (0, 1), (0, -1)], true),
        Piece::Queen => (
            vec![(1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1)],
            true,
        ),
    };
    let mut out = Vec::new();
    for (df, dr) in steps {
        let mut current = from;
        while let Some(next) = current.offset(df, dr) {
            out.push(next);
            if !slides || pos.piece_on(next).is_some() {
                break;
            }
            current = next;
        }
    }
    out
}

/// The attacker-count grid matches a brute-force recount.
pub(super) fn assert_attackers_count_consistent(pos: &Position) {
    let mut expected = [[0u8; 64]; 2];
    for from in Square::all() {
        if let Some((color, _)) = pos.piece_on(from) {
            for sq in brute_force_attacks(pos, from) {
                expected[color.index()][sq.index()] += 1;
            }
        }
    }
    for color in Color::BOTH {
        for sq in Square::all() {
            assert_eq!(
                pos.attackers_count(color, sq),
                expected[color.index()][sq.index()],
                "{color} attackers of {sq} in {}",
                pos.to_fen()
            );
        }
    }
}
