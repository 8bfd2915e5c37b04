//! Chess position representation and move legality.
//!
//! A [`Position`] keeps a square-indexed board, bitboards, piece lists and a
//! per-color attacker-count grid in sync, together with a stack of
//! [`StateInfo`] records so every move can be taken back.
//!
//! # Example
//! ```
//! use chess_core::board::Position;
//!
//! let mut pos = Position::startpos();
//! let moves = pos.generate_legal();
//! assert_eq!(moves.len(), 20);
//! pos.do_move_str("e2e4").unwrap();
//! assert_eq!(pos.perft(1), 20);
//! ```

pub mod attacks;
mod checks;
mod debug;
mod error;
mod fen;
mod make_unmake;
mod movegen;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use debug::bitboard_grid;
pub use error::{FenError, MoveParseError, SquareError};
pub use movegen::GenType;
pub use state::{
    castling_king_destination, castling_rook_destination, MoveKind, Position, StateInfo, START_FEN,
};
pub use types::{
    relative_rank, Bitboard, BitboardIter, CastlingRights, Color, Direction, Move, MoveList,
    MoveListIntoIter, Piece, Square,
};
