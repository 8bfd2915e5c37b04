//! Position state: the piece array and every view derived from it.
//!
//! A `Position` keeps four representations of the same board in step:
//! the 8x8 piece array, per-type and per-color bitboards, per-piece square
//! lists with a reverse index, and the per-color attacker-count grid. Only
//! the primitives in this file touch the first three, and the derived views
//! are recomputed after each of them has run.

use super::types::{
    piece_code, Bitboard, CastlingRights, Color, Move, Piece, Square, PIECE_CODES,
};

/// Capacity of each piece list. A side can never hold more than 16 pieces.
pub(crate) const MAX_PIECES_PER_KIND: usize = 16;

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// How the move that produced a state was applied, so it can be reverted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    Castling,
    EnPassant,
    Promotion,
}

/// Per-ply record. The position keeps these in a stack; the last one is current.
#[derive(Clone, Copy, Debug)]
pub struct StateInfo {
    pub(crate) castling_rights: CastlingRights,
    pub(crate) rule50: u32,
    pub(crate) plies_from_null: u32,
    pub(crate) ep_square: Option<Square>,
    pub(crate) captured: Option<(Color, Piece)>,
    pub(crate) kind: MoveKind,
    /// Enemy pieces giving check to the side to move
    pub(crate) checkers: Bitboard,
    /// Pieces of either color shielding each king from an enemy slider
    pub(crate) blockers_for_king: [Bitboard; 2],
    /// Enemy sliders pinning a piece to each king
    pub(crate) pinners: [Bitboard; 2],
}

impl StateInfo {
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[must_use]
    pub fn rule50(&self) -> u32 {
        self.rule50
    }

    #[must_use]
    pub fn plies_from_null(&self) -> u32 {
        self.plies_from_null
    }

    #[must_use]
    pub fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// Piece removed by the move that led to this state
    #[must_use]
    pub fn captured(&self) -> Option<(Color, Piece)> {
        self.captured
    }

    #[must_use]
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        self.checkers
    }
}

impl Default for StateInfo {
    fn default() -> Self {
        StateInfo {
            castling_rights: CastlingRights::none(),
            rule50: 0,
            plies_from_null: 0,
            ep_square: None,
            captured: None,
            kind: MoveKind::Normal,
            checkers: Bitboard::EMPTY,
            blockers_for_king: [Bitboard::EMPTY; 2],
            pinners: [Bitboard::EMPTY; 2],
        }
    }
}

/// The single authoritative board of the engine.
///
/// Deliberately not `Clone`: a position owns its state history, and two
/// copies evolving separately are never what a caller wants. Rebuild from
/// [`Position::to_fen`] instead.
#[derive(Debug)]
pub struct Position {
    /// Indexed `[file][rank]`
    pub(crate) board: [[Option<(Color, Piece)>; 8]; 8],
    pub(crate) by_type: [Bitboard; 6],
    pub(crate) by_color: [Bitboard; 2],
    pub(crate) piece_count: [usize; PIECE_CODES],
    pub(crate) piece_list: [[Square; MAX_PIECES_PER_KIND]; PIECE_CODES],
    /// Slot of the piece on each square inside its piece list
    pub(crate) index: [usize; 64],
    pub(crate) castling_rights_mask: [CastlingRights; 64],
    pub(crate) castling_rook_square: [Option<Square>; 4],
    pub(crate) castling_path: [Bitboard; 4],
    /// `attackers_count[c][sq]`: number of `c` pieces attacking `sq`
    pub(crate) attackers_count: [[u8; 64]; 2],
    /// Squares behind each king on an enemy slider's ray
    pub(crate) behind_king: [Bitboard; 2],
    pub(crate) side_to_move: Color,
    pub(crate) game_ply: u32,
    pub(crate) states: Vec<StateInfo>,
}

impl Position {
    pub(crate) fn empty() -> Self {
        Position {
            board: [[None; 8]; 8],
            by_type: [Bitboard::EMPTY; 6],
            by_color: [Bitboard::EMPTY; 2],
            piece_count: [0; PIECE_CODES],
            piece_list: [[Square::A1; MAX_PIECES_PER_KIND]; PIECE_CODES],
            index: [0; 64],
            castling_rights_mask: [CastlingRights::none(); 64],
            castling_rook_square: [None; 4],
            castling_path: [Bitboard::EMPTY; 4],
            attackers_count: [[0; 64]; 2],
            behind_king: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            game_ply: 0,
            states: vec![StateInfo::default()],
        }
    }

    /// The standard starting position.
    #[must_use]
    pub fn startpos() -> Self {
        const BACK_RANK: [Piece; 8] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        let mut pos = Position::empty();
        for (file, &piece) in BACK_RANK.iter().enumerate() {
            pos.put_piece(Color::White, piece, Square::from_coords(file, 0));
            pos.put_piece(Color::White, Piece::Pawn, Square::from_coords(file, 1));
            pos.put_piece(Color::Black, Piece::Pawn, Square::from_coords(file, 6));
            pos.put_piece(Color::Black, piece, Square::from_coords(file, 7));
        }
        for color in Color::BOTH {
            pos.set_castling_right(color, Square::H1.relative(color));
            pos.set_castling_right(color, Square::A1.relative(color));
        }
        pos.refresh_derived();
        pos
    }

    // --- board primitives -------------------------------------------------

    pub(crate) fn put_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        debug_assert!(self.piece_on(sq).is_none(), "put_piece on occupied {sq}");
        let code = piece_code(color, piece);
        self.board[sq.file()][sq.rank()] = Some((color, piece));
        self.by_type[piece.index()] |= sq;
        self.by_color[color.index()] |= sq;
        self.index[sq.index()] = self.piece_count[code];
        self.piece_list[code][self.piece_count[code]] = sq;
        self.piece_count[code] += 1;
    }

    /// Remove whatever stands on `sq`, filling the hole in its piece list
    /// with the list's last entry.
    pub(crate) fn remove_piece(&mut self, sq: Square) -> Option<(Color, Piece)> {
        let (color, piece) = self.board[sq.file()][sq.rank()].take()?;
        let code = piece_code(color, piece);
        self.by_type[piece.index()] ^= sq;
        self.by_color[color.index()] ^= sq;
        self.piece_count[code] -= 1;
        let last = self.piece_list[code][self.piece_count[code]];
        let slot = self.index[sq.index()];
        self.index[last.index()] = slot;
        self.piece_list[code][slot] = last;
        Some((color, piece))
    }

    /// Relocate a piece to an empty square, keeping its piece-list slot.
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        let Some((color, piece)) = self.board[from.file()][from.rank()].take() else {
            debug_assert!(false, "move_piece from empty {from}");
            return;
        };
        debug_assert!(self.piece_on(to).is_none(), "move_piece onto occupied {to}");
        let code = piece_code(color, piece);
        let both = Bitboard::from_square(from) | to;
        self.board[to.file()][to.rank()] = Some((color, piece));
        self.by_type[piece.index()] ^= both;
        self.by_color[color.index()] ^= both;
        let slot = self.index[from.index()];
        self.index[to.index()] = slot;
        self.piece_list[code][slot] = to;
    }

    // --- queries ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn piece_on(&self, sq: Square) -> Option<(Color, Piece)> {
        self.board[sq.file()][sq.rank()]
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_on(sq).is_none()
    }

    /// All occupied squares
    #[inline]
    #[must_use]
    pub fn pieces(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    #[inline]
    #[must_use]
    pub fn pieces_of(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces_by_type(&self, piece: Piece) -> Bitboard {
        self.by_type[piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces_of_type(&self, color: Color, piece: Piece) -> Bitboard {
        self.by_color[color.index()] & self.by_type[piece.index()]
    }

    /// Rooks and queens of `color`
    #[inline]
    #[must_use]
    pub fn straight_sliders(&self, color: Color) -> Bitboard {
        self.pieces_of(color) & (self.by_type[Piece::Rook.index()] | self.by_type[Piece::Queen.index()])
    }

    /// Bishops and queens of `color`
    #[inline]
    #[must_use]
    pub fn diagonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces_of(color)
            & (self.by_type[Piece::Bishop.index()] | self.by_type[Piece::Queen.index()])
    }

    /// Squares of every `color` `piece`, in piece-list order
    #[inline]
    #[must_use]
    pub fn squares(&self, color: Color, piece: Piece) -> &[Square] {
        let code = piece_code(color, piece);
        &self.piece_list[code][..self.piece_count[code]]
    }

    #[inline]
    #[must_use]
    pub fn count(&self, color: Color, piece: Piece) -> usize {
        self.piece_count[piece_code(color, piece)]
    }

    /// Square of `color`'s king.
    ///
    /// Every constructed position has exactly one king per side; calling this
    /// on anything else is a programming error.
    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        debug_assert_eq!(self.count(color, Piece::King), 1);
        self.piece_list[piece_code(color, Piece::King)][0]
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Plies since the start of the game (0 = White's first move)
    #[inline]
    #[must_use]
    pub fn game_ply(&self) -> u32 {
        self.game_ply
    }

    /// Fullmove number as written in FEN
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        1 + (self.game_ply - u32::from(self.side_to_move == Color::Black)) / 2
    }

    /// The current (top) state record
    #[inline]
    #[must_use]
    pub fn state(&self) -> &StateInfo {
        // The stack always holds the root state.
        &self.states[self.states.len() - 1]
    }

    #[inline]
    pub(crate) fn state_mut(&mut self) -> &mut StateInfo {
        let top = self.states.len() - 1;
        &mut self.states[top]
    }

    /// Number of moves applied since the position was set up
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.states.len() - 1
    }

    #[inline]
    #[must_use]
    pub fn rule50(&self) -> u32 {
        self.state().rule50
    }

    #[inline]
    #[must_use]
    pub fn ep_square(&self) -> Option<Square> {
        self.state().ep_square
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.state().castling_rights
    }

    #[inline]
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        self.state().checkers
    }

    #[inline]
    #[must_use]
    pub fn blockers_for_king(&self, color: Color) -> Bitboard {
        self.state().blockers_for_king[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn pinners(&self, color: Color) -> Bitboard {
        self.state().pinners[color.index()]
    }

    /// Number of `color` pieces attacking `sq`
    #[inline]
    #[must_use]
    pub fn attackers_count(&self, color: Color, sq: Square) -> u8 {
        self.attackers_count[color.index()][sq.index()]
    }

    /// Squares behind `color`'s king along an enemy slider ray
    #[inline]
    #[must_use]
    pub fn behind_king(&self, color: Color) -> Bitboard {
        self.behind_king[color.index()]
    }

    /// Origin square of the rook for a castling right, if the right was ever set up
    #[inline]
    #[must_use]
    pub fn castling_rook_square(&self, color: Color, kingside: bool) -> Option<Square> {
        self.castling_rook_square[CastlingRights::slot(color, kingside)]
    }

    /// Squares that must be empty for the castle
    #[inline]
    #[must_use]
    pub fn castling_path(&self, color: Color, kingside: bool) -> Bitboard {
        self.castling_path[CastlingRights::slot(color, kingside)]
    }

    #[inline]
    #[must_use]
    pub fn can_castle(&self, color: Color, kingside: bool) -> bool {
        self.castling_rights().has(color, kingside)
    }

    #[inline]
    #[must_use]
    pub fn castling_impeded(&self, color: Color, kingside: bool) -> bool {
        !(self.castling_path(color, kingside) & self.pieces()).is_empty()
    }

    /// If `m` is a castling move for `color`, the wing it castles to.
    ///
    /// Castling is a king move onto its wing's destination while the right is
    /// held, unless it reads as an ordinary king step (see
    /// [`Position::castling_is_distinct`]).
    #[must_use]
    pub(crate) fn castling_side(&self, color: Color, m: Move) -> Option<bool> {
        let to = m.to();
        [true, false].into_iter().find(|&kingside| {
            self.can_castle(color, kingside)
                && to == castling_king_destination(color, kingside)
                && self.castling_is_distinct(color, kingside, m.from())
        })
    }

    /// Whether a castle by the king on `king_from` can be told apart from a
    /// plain king move.
    ///
    /// A king already on its destination (`g1g1`), or one landing on its own
    /// castling rook, cannot be making an ordinary step. A one-file step onto
    /// an empty destination is read as an ordinary king move, so that castle
    /// is never generated.
    #[must_use]
    pub(crate) fn castling_is_distinct(
        &self,
        color: Color,
        kingside: bool,
        king_from: Square,
    ) -> bool {
        let to = castling_king_destination(color, kingside);
        king_from.file().abs_diff(to.file()) != 1
            || self.castling_rook_square(color, kingside) == Some(to)
    }

    /// Classify `m` against the current position.
    #[must_use]
    pub fn move_kind(&self, m: Move) -> MoveKind {
        match self.piece_on(m.from()) {
            Some((_, Piece::Pawn)) if m.is_promotion() => MoveKind::Promotion,
            Some((_, Piece::Pawn))
                if self.ep_square() == Some(m.to()) && m.from().file() != m.to().file() =>
            {
                MoveKind::EnPassant
            }
            Some((color, Piece::King)) if self.castling_side(color, m).is_some() => {
                MoveKind::Castling
            }
            _ => MoveKind::Normal,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}

/// King destination of a castle: g-file king-side, c-file queen-side.
#[inline]
#[must_use]
pub fn castling_king_destination(color: Color, kingside: bool) -> Square {
    let sq = if kingside { Square::G1 } else { Square::C1 };
    sq.relative(color)
}

/// Rook destination of a castle: f-file king-side, d-file queen-side.
#[inline]
#[must_use]
pub fn castling_rook_destination(color: Color, kingside: bool) -> Square {
    let sq = if kingside { Square::F1 } else { Square::D1 };
    sq.relative(color)
}
