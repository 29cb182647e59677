//! Wire format for book positions and moves, plus the two FEN-keyed
//! canonicalization functions that tie the book to persistence: position
//! ids (cache keys) and booklet indices (document sharding).

use super::{BookMove, BookPosition, INFINITE_MINIMAX_DEPTH};

/// Canonical position id: the FEN's board field with `/` stripped,
/// concatenated with turn, castling rights and en-passant square. The
/// halfmove and fullmove clocks are deliberately excluded, so positions
/// that differ only by move count collide to the same id.
#[must_use]
pub fn fen_to_posid(fen: &str) -> String {
    let mut parts = fen.split(' ');
    let board = parts.next().unwrap_or("").replace('/', "");
    let turn = parts.next().unwrap_or("");
    let castling = parts.next().unwrap_or("");
    let ep = parts.next().unwrap_or("");
    format!("{board}{turn}{castling}{ep}")
}

/// `(Σᵢ (i+1)·codepoint(keyᵢ)) mod modulus`, computed over `key`'s chars.
/// `key` may be a raw FEN or a position id; the function only cares about
/// the characters, so identical keys always produce identical indices.
#[must_use]
pub fn fen_to_booklet_index(key: &str, modulus: i32) -> i32 {
    if modulus <= 0 {
        return 0;
    }
    let mut sum: i64 = 0;
    for (i, c) in key.chars().enumerate() {
        sum += (i as i64 + 1) * i64::from(c as u32);
    }
    i32::try_from(sum.rem_euclid(i64::from(modulus))).unwrap_or(0)
}

/// Booklet document id for `key` under `modulus`.
#[must_use]
pub fn booklet_id(key: &str, modulus: i32) -> String {
    format!("booklet{}", fen_to_booklet_index(key, modulus))
}

fn str2int(field: Option<&str>, default: i32) -> i32 {
    field.and_then(|s| s.parse().ok()).unwrap_or(default)
}

impl BookMove {
    /// `<algeb>;<score>;<eval>;<minimaxdepth>;<haspv>` with `haspv` as `0`
    /// or `1`.
    #[must_use]
    pub fn to_blob(&self) -> String {
        format!(
            "{};{};{};{};{}",
            self.algeb,
            self.score,
            self.eval,
            self.minimaxdepth,
            i32::from(self.haspv)
        )
    }

    /// Parse a move blob. Missing or unparsable fields fall back to `0`
    /// (`score`/`eval`), [`INFINITE_MINIMAX_DEPTH`] (`minimaxdepth`), or
    /// `false` (`haspv`), rather than rejecting the whole record. `haspv`
    /// is read from field index 4, the position the field actually
    /// occupies in the blob.
    #[must_use]
    pub fn from_blob(blob: &str) -> BookMove {
        let parts: Vec<&str> = blob.split(';').collect();
        BookMove {
            algeb: parts.first().copied().unwrap_or("").to_string(),
            score: str2int(parts.get(1).copied(), 0),
            eval: str2int(parts.get(2).copied(), 0),
            minimaxdepth: str2int(parts.get(3).copied(), INFINITE_MINIMAX_DEPTH),
            haspv: parts.get(4).copied() == Some("1"),
        }
    }
}

impl BookPosition {
    /// `<fen>;;<enginedepth>;;<move1>|<move2>|…`, moves in insertion order.
    #[must_use]
    pub fn to_blob(&self) -> String {
        let moves_blob = self
            .moves
            .values()
            .map(BookMove::to_blob)
            .collect::<Vec<_>>()
            .join("|");
        format!("{};;{};;{}", self.fen, self.enginedepth, moves_blob)
    }

    /// Parse a position blob. An empty moves segment yields no moves
    /// rather than one move with an empty `algeb`.
    #[must_use]
    pub fn from_blob(blob: &str) -> BookPosition {
        let mut parts = blob.splitn(3, ";;");
        let fen = parts.next().unwrap_or("").to_string();
        let enginedepth = str2int(parts.next(), 0);
        let moves_blob = parts.next().unwrap_or("");

        let mut pos = BookPosition::new(fen);
        pos.enginedepth = enginedepth;
        if !moves_blob.is_empty() {
            for mv_blob in moves_blob.split('|') {
                let mv = BookMove::from_blob(mv_blob);
                pos.moves.insert(mv.algeb.clone(), mv);
            }
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;

    #[test]
    fn posid_strips_slashes_and_clocks() {
        let posid = fen_to_posid(START_FEN);
        assert_eq!(posid, "rnbqkbnrpppppppp88888PPPPPPPPRNBQKBNRwKQkq-");
    }

    #[test]
    fn posid_ignores_move_clocks() {
        let a = fen_to_posid("8/8/8/8/8/8/8/8 w - - 0 1");
        let b = fen_to_posid("8/8/8/8/8/8/8/8 w - - 12 40");
        assert_eq!(a, b);
    }

    #[test]
    fn booklet_index_is_deterministic() {
        let a = fen_to_booklet_index(START_FEN, 10);
        let b = fen_to_booklet_index(START_FEN, 10);
        assert_eq!(a, b);
        assert!((0..10).contains(&a));
    }

    #[test]
    fn move_blob_round_trips() {
        let mv = BookMove {
            algeb: "e2e4".to_string(),
            score: 37,
            eval: -12,
            minimaxdepth: 3,
            haspv: true,
        };
        let parsed = BookMove::from_blob(&mv.to_blob());
        assert_eq!(parsed, mv);
    }

    #[test]
    fn position_blob_round_trips_with_multiple_moves() {
        let mut pos = BookPosition::new("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        pos.enginedepth = 20;
        pos.moves.insert("e2e4".to_string(), BookMove::new("e2e4", 40));
        pos.moves.insert("d2d4".to_string(), BookMove::new("d2d4", 35));

        let parsed = BookPosition::from_blob(&pos.to_blob());
        assert_eq!(parsed.fen, pos.fen);
        assert_eq!(parsed.enginedepth, 20);
        assert_eq!(
            parsed.moves.keys().collect::<Vec<_>>(),
            vec!["e2e4", "d2d4"]
        );
        assert_eq!(parsed.moves["e2e4"].score, 40);
    }

    #[test]
    fn position_blob_with_no_moves_parses_to_empty_map() {
        let pos = BookPosition::new("8/8/8/8/8/8/8/8 w - - 0 1");
        let parsed = BookPosition::from_blob(&pos.to_blob());
        assert!(parsed.moves.is_empty());
    }

    #[test]
    fn malformed_move_fields_fall_back_to_documented_defaults() {
        let mv = BookMove::from_blob("e2e4;not-a-number;;;");
        assert_eq!(mv.score, 0);
        assert_eq!(mv.eval, 0);
        assert_eq!(mv.minimaxdepth, INFINITE_MINIMAX_DEPTH);
        assert!(!mv.haspv);
    }
}
