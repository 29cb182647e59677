use super::{cell_index, ij_ok, ij_to_algeb, square_index, Board, Color, Piece, PieceKind};

impl Board {
    /// Apply a 4- or 5-character UCI move (`"e2e4"`, `"e7e8q"`) in place.
    ///
    /// Total and side-effect-local: no legality check is performed, so
    /// callers must only pass moves the engine itself reported as legal.
    /// Implements, in order: en-passant target update, piece relocation,
    /// side-to-move toggle, castling rook relocation, promotion, Atomic
    /// exploding capture, and castling-right bookkeeping.
    pub fn make_algeb_move(&mut self, algeb: &str) {
        let (from_i, from_j) = square_index(&algeb[0..2]);
        let (to_i, to_j) = square_index(&algeb[2..4]);
        let from_idx = cell_index(from_i, from_j);
        let to_idx = cell_index(to_i, to_j);
        let from_piece = self.squares[from_idx];
        let to_piece = self.squares[to_idx];

        // En-passant target update: only ever set here, never cleared.
        // Reproduces the source's stale-EP behavior (see design notes).
        if from_piece.kind == PieceKind::Pawn {
            if from_j - to_j == 2 {
                self.maybe_set_ep_from_white_advance(to_i, to_j);
            }
            if to_j - from_j == 2 {
                self.maybe_set_ep_from_black_advance(to_i, to_j);
            }
        }

        // Relocate the piece and flip the side to move.
        self.squares[from_idx] = Piece::EMPTY;
        self.squares[to_idx] = from_piece;
        self.turn = self.turn.flip();

        let mut c_k = self.castling.contains('K');
        let mut c_q = self.castling.contains('Q');
        let mut c_k2 = self.castling.contains('k');
        let mut c_q2 = self.castling.contains('q');

        // Castling execution: move the rook, revoke both rights for that side.
        if from_piece.kind == PieceKind::King {
            match algeb {
                "e1g1" => {
                    self.squares[63] = Piece::EMPTY;
                    self.squares[61] = Piece {
                        kind: PieceKind::Rook,
                        color: Color::White,
                    };
                    c_k = false;
                    c_q = false;
                }
                "e1c1" => {
                    self.squares[56] = Piece::EMPTY;
                    self.squares[59] = Piece {
                        kind: PieceKind::Rook,
                        color: Color::White,
                    };
                    c_k = false;
                    c_q = false;
                }
                "e8g8" => {
                    self.squares[7] = Piece::EMPTY;
                    self.squares[5] = Piece {
                        kind: PieceKind::Rook,
                        color: Color::Black,
                    };
                    c_k2 = false;
                    c_q2 = false;
                }
                "e8c8" => {
                    self.squares[0] = Piece::EMPTY;
                    self.squares[3] = Piece {
                        kind: PieceKind::Rook,
                        color: Color::Black,
                    };
                    c_k2 = false;
                    c_q2 = false;
                }
                _ => {}
            }
        }

        // Promotion.
        if algeb.len() == 5 {
            let promo = algeb.as_bytes()[4] as char;
            self.squares[to_idx] = Piece {
                kind: PieceKind::from_char(promo),
                color: from_piece.color,
            };
        }

        // Atomic capture: the capturing piece and all non-pawn pieces on
        // the 8 surrounding squares are destroyed.
        if to_piece.kind != PieceKind::Empty {
            self.squares[to_idx] = Piece::EMPTY;
            for di in -1..=1 {
                for dj in -1..=1 {
                    if di == 0 && dj == 0 {
                        continue;
                    }
                    let (ni, nj) = (to_i + di, to_j + dj);
                    if ij_ok(ni, nj) {
                        let idx = cell_index(ni, nj);
                        let cp = self.squares[idx];
                        if cp.kind != PieceKind::Empty && cp.kind != PieceKind::Pawn {
                            self.squares[idx] = Piece::EMPTY;
                        }
                    }
                }
            }
        }

        // Castling-right revocation by rook absence (covers explosions too).
        if self.squares[63].kind == PieceKind::Empty {
            c_k = false;
        }
        if self.squares[56].kind == PieceKind::Empty {
            c_q = false;
        }
        if self.squares[7].kind == PieceKind::Empty {
            c_k2 = false;
        }
        if self.squares[0].kind == PieceKind::Empty {
            c_q2 = false;
        }

        let mut castling = String::new();
        if c_k {
            castling.push('K');
        }
        if c_q {
            castling.push('Q');
        }
        if c_k2 {
            castling.push('k');
        }
        if c_q2 {
            castling.push('q');
        }
        self.castling = if castling.is_empty() {
            "-".to_string()
        } else {
            castling
        };
    }

    fn maybe_set_ep_from_white_advance(&mut self, to_i: i32, to_j: i32) {
        for di in [-1, 1] {
            if ij_ok(to_i + di, to_j) {
                let tp = self.squares[cell_index(to_i + di, to_j)];
                if tp.kind == PieceKind::Pawn && tp.color == Color::Black {
                    self.ep = ij_to_algeb(to_i, to_j + 1);
                }
            }
        }
    }

    fn maybe_set_ep_from_black_advance(&mut self, to_i: i32, to_j: i32) {
        for di in [-1, 1] {
            if ij_ok(to_i + di, to_j) {
                let tp = self.squares[cell_index(to_i + di, to_j)];
                if tp.kind == PieceKind::Pawn && tp.color == Color::White {
                    self.ep = ij_to_algeb(to_i, to_j - 1);
                }
            }
        }
    }
}
