//! Make/unmake move tests.

use super::{assert_attackers_count_consistent, assert_views_in_sync, find_move};
use crate::board::{Bitboard, CastlingRights, Color, MoveKind, Piece, Position, Square};
use rand::prelude::*;

#[test]
fn test_kingside_castle_moves_king_and_rook() {
    let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    let m = find_move(&pos, "e1g1");
    assert_eq!(pos.move_kind(m), MoveKind::Castling);

    pos.do_move(m);
    assert_eq!(pos.piece_on(Square::G1), Some((Color::White, Piece::King)));
    assert_eq!(pos.piece_on(Square::F1), Some((Color::White, Piece::Rook)));
    assert!(pos.is_empty(Square::E1));
    assert!(pos.is_empty(Square::H1));
    assert!(!pos.castling_rights().intersects(CastlingRights::WHITE_OO));
    assert_eq!(pos.side_to_move(), Color::Black);
    assert_eq!(pos.king_square(Color::White), Square::G1);
    assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");
    assert_views_in_sync(&pos);

    pos.undo_move(m);
    assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/8/4K2R w K - 0 1");
    assert_views_in_sync(&pos);
}

#[test]
fn test_queenside_castle_and_undo() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 3 10";
    let mut pos = Position::from_fen(fen).unwrap();
    let m = find_move(&pos, "e8c8");
    pos.do_move(m);
    assert_eq!(pos.piece_on(Square::C8), Some((Color::Black, Piece::King)));
    assert_eq!(pos.piece_on(Square::D8), Some((Color::Black, Piece::Rook)));
    assert!(pos.is_empty(Square::A8));
    assert_eq!(pos.castling_rights().to_string(), "KQ");
    assert_eq!(pos.rule50(), 4);
    assert_eq!(pos.fullmove_number(), 11);

    pos.undo_move(m);
    assert_eq!(pos.to_fen(), fen);
}

#[test]
fn test_double_push_sets_en_passant_square() {
    let mut pos = Position::startpos();
    pos.do_move_str("e2e4").unwrap();
    assert_eq!(pos.ep_square(), Some(Square::E3));
    pos.do_move_str("g8f6").unwrap();
    assert_eq!(pos.ep_square(), None);
}

#[test]
fn test_en_passant_removes_pawn_behind_target() {
    let mut pos =
        Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
    let fen = pos.to_fen();
    let m = find_move(&pos, "e5f6");
    assert_eq!(pos.move_kind(m), MoveKind::EnPassant);

    pos.do_move(m);
    assert_eq!(pos.piece_on(Square::F6), Some((Color::White, Piece::Pawn)));
    assert!(pos.is_empty(Square::F5), "captured pawn sits on the origin rank");
    assert!(pos.is_empty(Square::E5));
    assert_eq!(pos.state().captured(), Some((Color::Black, Piece::Pawn)));
    assert_eq!(pos.count(Color::Black, Piece::Pawn), 7);
    assert_views_in_sync(&pos);
    assert_attackers_count_consistent(&pos);

    pos.undo_move(m);
    assert_eq!(pos.to_fen(), fen);
    assert_views_in_sync(&pos);
}

#[test]
fn test_fifty_move_counter() {
    let mut pos = Position::from_fen("4k3/8/8/3p4/8/8/4P3/R3K3 w - - 7 30").unwrap();
    pos.do_move_str("a1a4").unwrap();
    assert_eq!(pos.rule50(), 8, "quiet piece move increments");
    pos.do_move_str("e8d7").unwrap();
    assert_eq!(pos.rule50(), 9);
    pos.do_move_str("e2e3").unwrap();
    assert_eq!(pos.rule50(), 0, "pawn move resets");
    pos.do_move_str("d7c6").unwrap();
    assert_eq!(pos.rule50(), 1);
    pos.do_move_str("a4d4").unwrap();
    assert_eq!(pos.rule50(), 2);
    pos.do_move_str("c6c5").unwrap();
    pos.do_move_str("d4d5").unwrap();
    assert_eq!(pos.rule50(), 0, "capture resets");
    assert_eq!(pos.state().captured(), Some((Color::Black, Piece::Pawn)));
}

#[test]
fn test_promotion_make_unmake() {
    let mut pos = Position::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
    let fen = pos.to_fen();
    let m = find_move(&pos, "a7a8n");
    assert_eq!(pos.move_kind(m), MoveKind::Promotion);
    pos.do_move(m);
    assert_eq!(pos.piece_on(Square::A8), Some((Color::White, Piece::Knight)));
    assert_eq!(pos.count(Color::White, Piece::Pawn), 0);
    pos.undo_move(m);
    assert_eq!(pos.to_fen(), fen);
    assert_eq!(pos.piece_on(Square::A7), Some((Color::White, Piece::Pawn)));
}

#[test]
fn test_capture_promotion_restores_captured_piece() {
    let mut pos = Position::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let fen = pos.to_fen();
    let m = find_move(&pos, "a7b8q");
    pos.do_move(m);
    assert_eq!(pos.piece_on(Square::B8), Some((Color::White, Piece::Queen)));
    assert!(pos.in_check());
    pos.undo_move(m);
    assert_eq!(pos.to_fen(), fen);
    assert_eq!(pos.piece_on(Square::B8), Some((Color::Black, Piece::Rook)));
}

#[test]
fn test_rook_moves_and_captures_revoke_rights() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    pos.do_move_str("h1h8").unwrap();
    assert_eq!(pos.castling_rights().to_string(), "Qq");
    pos.do_move_str("e8d7").unwrap();
    assert_eq!(pos.castling_rights().to_string(), "Q");
    pos.do_move_str("e1d1").unwrap();
    assert!(pos.castling_rights().is_empty());
    assert_eq!(pos.castling_rights().to_string(), "-");
}

#[test]
fn test_check_bookkeeping_after_move() {
    let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
    let m = find_move(&pos, "a1a8");
    assert!(pos.gives_check(m));
    pos.do_move(m);
    assert!(pos.in_check());
    assert_eq!(pos.checkers(), Bitboard::from_square(Square::A8));
    pos.undo_move(m);
    assert!(!pos.in_check());
    assert!(pos.checkers().is_empty());
}

#[test]
fn test_history_len_tracks_moves() {
    let mut pos = Position::startpos();
    assert_eq!(pos.history_len(), 0);
    let moves = ["e2e4", "e7e5", "g1f3"];
    let applied: Vec<_> = moves.iter().map(|m| pos.do_move_str(m).unwrap()).collect();
    assert_eq!(pos.history_len(), 3);
    assert_eq!(pos.game_ply(), 3);
    for m in applied.into_iter().rev() {
        pos.undo_move(m);
    }
    assert_eq!(pos.history_len(), 0);
    assert_eq!(pos.to_fen(), Position::startpos().to_fen());
}

#[test]
fn test_legal_moves_stable_after_make_unmake() {
    let mut pos =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    let mut before: Vec<String> = pos.generate_legal().iter().map(|m| m.to_string()).collect();
    before.sort();

    for m in pos.generate_legal() {
        pos.do_move(m);
        pos.undo_move(m);
    }

    let mut after: Vec<String> = pos.generate_legal().iter().map(|m| m.to_string()).collect();
    after.sort();
    assert_eq!(before, after);
}

#[test]
fn test_random_playout_keeps_views_consistent() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..8 {
        let mut pos = Position::startpos();
        let mut played = Vec::new();
        for _ in 0..60 {
            let moves = pos.generate_legal();
            let Some(&m) = moves.as_slice().choose(&mut rng) else {
                break;
            };
            pos.do_move(m);
            played.push(m);
            assert_views_in_sync(&pos);
            assert_attackers_count_consistent(&pos);
        }
        while let Some(m) = played.pop() {
            pos.undo_move(m);
        }
        assert_eq!(pos.to_fen(), Position::startpos().to_fen());
    }
}
