use super::*;

#[test]
fn fen_round_trip_from_start() {
    let mut board = Board::new();
    let fen = board.to_fen();
    board.set_from_fen(&fen);
    assert_eq!(board.to_fen(), fen);
}

#[test]
fn fen_round_trip_after_moves() {
    let mut board = Board::new();
    board.make_algeb_move("e2e4");
    board.make_algeb_move("d7d5");
    board.make_algeb_move("e4d5");
    let fen = board.to_fen();
    let mut reparsed = Board::empty();
    reparsed.set_from_fen(&fen);
    assert_eq!(reparsed.to_fen(), fen);
}

#[test]
fn parses_start_position() {
    let mut board = Board::empty();
    board.set_from_fen(START_FEN);

    let non_empty = board
        .squares
        .iter()
        .filter(|p| p.kind != PieceKind::Empty)
        .count();
    assert_eq!(non_empty, 32);

    for file in 0..8 {
        // rank 2 (white pawns): j = 6
        assert_eq!(board.squares[6 * 8 + file].color, Color::White);
        // rank 7 (black pawns): j = 1
        assert_eq!(board.squares[8 + file].color, Color::Black);
    }
    assert_eq!(board.turn, Color::White);
    assert_eq!(board.castling, "KQkq");
    assert_eq!(board.ep, "-");
}

#[test]
fn atomic_capture_explodes_surrounding_non_pawns() {
    let mut board = Board::new();
    board.make_algeb_move("e2e4");
    board.make_algeb_move("d7d5");
    board.make_algeb_move("e4d5");

    // d5 (capture square) and the capturing pawn are both gone.
    let d5 = cell_index(3, 3);
    assert_eq!(board.squares[d5].kind, PieceKind::Empty);

    // Non-pawn pieces on the 8 surrounding squares are destroyed; the
    // black queen on d8 is one of them.
    let d8 = cell_index(3, 0);
    assert_eq!(board.squares[d8].kind, PieceKind::Empty);

    // Pawns on the blast radius survive: c6, d6, e6 still hold pawns.
    for (i, j) in [(2, 2), (3, 2), (4, 2)] {
        let idx = cell_index(i, j);
        assert_eq!(board.squares[idx].kind, PieceKind::Pawn, "square ({i},{j})");
    }
}

#[test]
fn castling_moves_rook_and_revokes_rights() {
    let mut board = Board::empty();
    board.set_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    board.make_algeb_move("e1g1");

    assert_eq!(board.castling, "kq");
    let f1 = cell_index(5, 7);
    let g1 = cell_index(6, 7);
    let h1 = cell_index(7, 7);
    assert_eq!(board.squares[f1].kind, PieceKind::Rook);
    assert_eq!(board.squares[f1].color, Color::White);
    assert_eq!(board.squares[g1].kind, PieceKind::King);
    assert_eq!(board.squares[h1].kind, PieceKind::Empty);
}

#[test]
fn two_square_pawn_advance_sets_en_passant_square() {
    let mut board = Board::new();
    // Put a black pawn on d4 so the e2e4 advance lands adjacent to it.
    let d4 = cell_index(3, 4);
    board.squares[d4] = Piece {
        kind: PieceKind::Pawn,
        color: Color::Black,
    };
    board.make_algeb_move("e2e4");
    assert_eq!(board.ep, "e3");
}

#[test]
fn square_index_round_trips_through_ij_to_algeb() {
    for sq in ["a8", "h8", "e4", "a1", "h1"] {
        let (i, j) = square_index(sq);
        assert_eq!(ij_to_algeb(i, j), sq);
    }
}
