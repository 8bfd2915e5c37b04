//! Attack generation for every piece type.
//!
//! Leaper attacks (pawn, knight, king) come from tables built once from
//! bounds-checked deltas. Slider attacks walk their rays over the given
//! occupancy and include the first blocker, since a piece attacks the square
//! of the piece that stops it.

use once_cell::sync::Lazy;

use super::types::{Bitboard, Color, Direction, Piece, Square};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    for sq in Square::all() {
        for &(df, dr) in deltas {
            if let Some(to) = sq.offset(df, dr) {
                table[sq.index()] |= to;
            }
        }
    }
    table
}

static KNIGHT_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| leaper_table(&KNIGHT_DELTAS));

static KING_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let deltas: Vec<(i8, i8)> = Direction::ALL.iter().map(|d| d.delta()).collect();
    leaper_table(&deltas)
});

static PAWN_ATTACKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    [
        leaper_table(&[(-1, 1), (1, 1)]),
        leaper_table(&[(-1, -1), (1, -1)]),
    ]
});

/// Squares strictly between two aligned squares, empty otherwise
static BETWEEN: Lazy<Box<[[Bitboard; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[Bitboard::EMPTY; 64]; 64]);
    for from in Square::all() {
        for dir in Direction::ALL {
            let mut path = Bitboard::EMPTY;
            let mut cur = from;
            while let Some(next) = cur.shift(dir) {
                table[from.index()][next.index()] = path;
                path |= next;
                cur = next;
            }
        }
    }
    table
});

/// Whole board line through two aligned squares (both included), empty otherwise
static LINE: Lazy<Box<[[Bitboard; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[Bitboard::EMPTY; 64]; 64]);
    for from in Square::all() {
        for dir in Direction::ALL {
            let (df, dr) = dir.delta();
            let full = ray(from, df, dr) | ray(from, -df, -dr) | from;
            for to in ray(from, df, dr) {
                table[from.index()][to.index()] = full;
            }
        }
    }
    table
});

fn ray(from: Square, df: i8, dr: i8) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    let mut cur = from;
    while let Some(next) = cur.offset(df, dr) {
        bb |= next;
        cur = next;
    }
    bb
}

#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index()]
}

#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

/// Ray directions of a slider; empty for leapers.
#[must_use]
pub fn slider_directions(piece: Piece) -> &'static [Direction] {
    match piece {
        Piece::Bishop => &Direction::DIAGONAL,
        Piece::Rook => &Direction::ORTHOGONAL,
        Piece::Queen => &Direction::ALL,
        _ => &[],
    }
}

/// Walk one ray from `sq`, stopping on (and including) the first occupied square.
#[inline]
fn ray_attacks(sq: Square, dir: Direction, occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    let mut cur = sq;
    while let Some(next) = cur.shift(dir) {
        attacks |= next;
        if occupied.contains(next) {
            break;
        }
        cur = next;
    }
    attacks
}

/// Attacks of a bishop, rook or queen on `sq` given the board occupancy.
#[must_use]
pub fn sliding_attacks(piece: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
    slider_directions(piece)
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_attacks(sq, dir, occupied))
}

#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    sliding_attacks(Piece::Bishop, sq, occupied)
}

#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    sliding_attacks(Piece::Rook, sq, occupied)
}

/// Squares attacked by a `color` `piece` standing on `sq`.
#[must_use]
pub fn attacks_from(piece: Piece, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece {
        Piece::Pawn => pawn_attacks(color, sq),
        Piece::Knight => knight_attacks(sq),
        Piece::King => king_attacks(sq),
        Piece::Bishop | Piece::Rook | Piece::Queen => sliding_attacks(piece, sq, occupied),
    }
}

/// Squares directly behind `king_sq` on the rays of the slider on `sq`.
///
/// A square is recorded only when the ray's first occupied square is the king
/// and the ray continues on the board past it. If the king stepped there it
/// would still stand on the slider's line, which the plain attack set misses
/// because the king itself blocks the ray.
#[must_use]
pub fn attacks_behind_king(piece: Piece, sq: Square, occupied: Bitboard, king_sq: Square) -> Bitboard {
    let mut behind = Bitboard::EMPTY;
    for &dir in slider_directions(piece) {
        let mut cur = sq;
        while let Some(next) = cur.shift(dir) {
            if occupied.contains(next) {
                if next == king_sq {
                    if let Some(past) = next.shift(dir) {
                        behind |= past;
                    }
                }
                break;
            }
            cur = next;
        }
    }
    behind
}

#[inline]
#[must_use]
pub fn between(a: Square, b: Square) -> Bitboard {
    BETWEEN[a.index()][b.index()]
}

#[inline]
#[must_use]
pub fn line(a: Square, b: Square) -> Bitboard {
    LINE[a.index()][b.index()]
}

/// True when the three squares lie on one rank, file or diagonal.
#[inline]
#[must_use]
pub fn aligned(a: Square, b: Square, c: Square) -> bool {
    line(a, b).contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaper_counts_at_corners_and_center() {
        assert_eq!(knight_attacks(Square::A1).popcount(), 2);
        assert_eq!(knight_attacks(Square::D4).popcount(), 8);
        assert_eq!(king_attacks(Square::H8).popcount(), 3);
        assert_eq!(king_attacks(Square::E4).popcount(), 8);
    }

    #[test]
    fn test_pawn_attacks_respect_color_and_edges() {
        assert_eq!(
            pawn_attacks(Color::White, Square::A2),
            Bitboard::from_square(Square::B3)
        );
        assert_eq!(
            pawn_attacks(Color::Black, Square::E5),
            Bitboard::EMPTY | Square::D4 | Square::F4
        );
        assert!(pawn_attacks(Color::White, Square::C8).is_empty());
    }

    #[test]
    fn test_slider_stops_on_first_blocker() {
        let occ = Bitboard::EMPTY | Square::D6 | Square::F4;
        let attacks = rook_attacks(Square::D4, occ);
        assert!(attacks.contains(Square::D5));
        assert!(attacks.contains(Square::D6));
        assert!(!attacks.contains(Square::D7));
        assert!(attacks.contains(Square::F4));
        assert!(!attacks.contains(Square::G4));
        assert!(attacks.contains(Square::A4));
        assert!(attacks.contains(Square::D1));
        assert_eq!(attacks.popcount(), 2 + 2 + 3 + 3);
    }

    #[test]
    fn test_queen_is_rook_plus_bishop() {
        let occ = Bitboard::EMPTY | Square::B2 | Square::E7 | Square::G4;
        for sq in [Square::E4, Square::A1, Square::H5] {
            assert_eq!(
                sliding_attacks(Piece::Queen, sq, occ),
                rook_attacks(sq, occ) | bishop_attacks(sq, occ)
            );
        }
    }

    #[test]
    fn test_behind_king_all_directions() {
        // Rook on a4, king on d4: stepping to e4 keeps the king on the rank.
        let occ = Bitboard::EMPTY | Square::A4 | Square::D4;
        assert_eq!(
            attacks_behind_king(Piece::Rook, Square::A4, occ, Square::D4),
            Bitboard::from_square(Square::E4)
        );
        // Westward ray from h4 toward the king on d4.
        let occ = Bitboard::EMPTY | Square::H4 | Square::D4;
        assert_eq!(
            attacks_behind_king(Piece::Rook, Square::H4, occ, Square::D4),
            Bitboard::from_square(Square::C4)
        );
        // Bishops contribute too.
        let occ = Bitboard::EMPTY | Square::B2 | Square::D4;
        assert_eq!(
            attacks_behind_king(Piece::Bishop, Square::B2, occ, Square::D4),
            Bitboard::from_square(Square::E5)
        );
        // Nothing when something else blocks first, or the king is on the edge.
        let occ = Bitboard::EMPTY | Square::A4 | Square::B4 | Square::D4;
        assert!(attacks_behind_king(Piece::Rook, Square::A4, occ, Square::D4).is_empty());
        let occ = Bitboard::EMPTY | Square::A4 | Square::H4;
        assert!(attacks_behind_king(Piece::Rook, Square::A4, occ, Square::H4).is_empty());
    }

    #[test]
    fn test_between_and_line() {
        assert_eq!(
            between(Square::A1, Square::D4),
            Bitboard::EMPTY | Square::B2 | Square::C3
        );
        assert_eq!(between(Square::A1, Square::B3), Bitboard::EMPTY);
        assert_eq!(between(Square::E1, Square::E2), Bitboard::EMPTY);
        assert!(aligned(Square::A1, Square::C3, Square::H8));
        assert!(!aligned(Square::A1, Square::C3, Square::H7));
        assert_eq!(line(Square::A1, Square::A5).popcount(), 8);
    }
}
