use super::{Board, Color, Piece, PieceKind, BOARD_SIZE};

/// The standard chess starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Populate this board from `fen`.
    ///
    /// Total and non-panicking: this mirrors FEN strings reported by the
    /// external search engine, which are always well-formed, but malformed
    /// input still yields an arbitrary (not necessarily sensible) board
    /// rather than crashing — no legality or shape validation is performed.
    /// The optional halfmove/fullmove fields are ignored on read.
    pub fn set_from_fen(&mut self, fen: &str) {
        *self = Board::empty();
        let fenparts: Vec<&str> = fen.split(' ').collect();
        let rawfen = fenparts.first().copied().unwrap_or("");
        self.turn = match fenparts.get(1) {
            Some(&"b") => Color::Black,
            _ => Color::White,
        };
        self.castling = fenparts.get(2).copied().unwrap_or("-").to_string();
        self.ep = fenparts.get(3).copied().unwrap_or("-").to_string();

        let mut cnt = 0usize;
        'rows: for row in rawfen.split('/') {
            for c in row.chars() {
                if cnt >= BOARD_SIZE {
                    break 'rows;
                }
                if c.is_ascii_digit() {
                    let n = c.to_digit(10).unwrap_or(0) as usize;
                    for _ in 0..n {
                        if cnt >= BOARD_SIZE {
                            break;
                        }
                        self.squares[cnt] = Piece::EMPTY;
                        cnt += 1;
                    }
                } else {
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    self.squares[cnt] = Piece {
                        kind: PieceKind::from_char(c),
                        color,
                    };
                    cnt += 1;
                }
            }
        }
    }

    /// Serialize this board back to FEN, fixing the halfmove/fullmove
    /// fields to `0 1` as the source does on write.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(8);
        for rank in 0..8 {
            let mut s = String::new();
            let mut empty = 0u32;
            for file in 0..8 {
                let p = self.squares[rank * 8 + file];
                if p.kind == PieceKind::Empty {
                    empty += 1;
                } else {
                    if empty > 0 {
                        s.push_str(&empty.to_string());
                        empty = 0;
                    }
                    s.push(p.to_fen_char());
                }
            }
            if empty > 0 {
                s.push_str(&empty.to_string());
            }
            ranks.push(s);
        }
        let turn = if self.turn == Color::White { "w" } else { "b" };
        format!(
            "{} {} {} {} 0 1",
            ranks.join("/"),
            turn,
            self.castling,
            self.ep
        )
    }
}
