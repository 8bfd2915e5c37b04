//! Board and rules core of a UCI chess engine.
//!
//! [`board`] holds the position, attack bookkeeping and move generation,
//! [`uci`] speaks the text protocol, [`policy`] picks a move and [`logger`]
//! writes the diagnostic log.

pub mod board;
pub mod logger;
pub mod policy;
pub mod uci;

pub use board::{Color, GenType, Move, MoveList, Piece, Position, Square};
pub use policy::{MovePolicy, RandomPolicy};
