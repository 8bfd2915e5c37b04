//! Core chess types.
//!
//! This module contains the fundamental value types used by the board:
//! - `Piece` and `Color` - chess piece types and colors
//! - `Square` and `Direction` - board squares and step arithmetic
//! - `Bitboard` - 64-bit square sets
//! - `Move` and `MoveList` - move representation
//! - `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::{Move, MoveList, MoveListIntoIter};
pub use piece::{Color, Piece};
pub use square::{relative_rank, Direction, Square};

pub(crate) use piece::{piece_code, PIECE_CODES, PROMOTION_PIECES};
