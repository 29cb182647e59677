//! Negamax backpropagation over the position cache. This walks cached
//! positions only — it never calls the engine — overwriting each visited
//! move's `eval`/`minimaxdepth`/`haspv` with a fresher estimate once a
//! deeper pass has been run.

use crate::board::Board;

use super::{fen_to_posid, Book, INF_SCORE};

/// A value below `-INF_SCORE` can never be a real score; used as the
/// "this branch couldn't be evaluated" sentinel so it's always replaced
/// by the move's own `score` rather than poisoning the parent's max.
const UNREACHABLE: i32 = 2 * -INF_SCORE;

/// Running totals from one [`Book::minimaxout`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinimaxStats {
    pub seldepth: i32,
    pub nodes: i64,
}

impl Book {
    /// Run one minimax pass from `rootfen`, writing back over the cache,
    /// and return the root's own negamax value (from the side to move's
    /// perspective) plus node/depth stats. No new cache entries are
    /// created; positions outside the cache bottom out at `UNREACHABLE`.
    pub fn minimaxout(&mut self) -> (i32, MinimaxStats) {
        let rootfen = self.rootfen.clone();
        let maxdepth = self.analysisdepth;
        let cutoff = self.cutoff;
        let mut stats = MinimaxStats::default();
        let mut path = Vec::new();
        let value = self.minimax_recursive(&rootfen, &mut path, 0, maxdepth, cutoff, &mut stats);
        log::info!(
            "minimaxing done: value={} seldepth={} nodes={}",
            -value,
            stats.seldepth,
            stats.nodes
        );
        (value, stats)
    }

    /// `path` holds the position ids of every ancestor on the current
    /// recursion line (not including this call's own position); a repeat
    /// anywhere in it means this line has cycled back on itself, which is
    /// scored as a draw.
    #[allow(clippy::too_many_arguments)]
    fn minimax_recursive(
        &mut self,
        fen: &str,
        path: &mut Vec<String>,
        depth: i32,
        maxdepth: i32,
        cutoff: i32,
        stats: &mut MinimaxStats,
    ) -> i32 {
        if depth > maxdepth {
            return UNREACHABLE;
        }
        let posid = fen_to_posid(fen);
        if path.contains(&posid) {
            return 0;
        }
        if !self.poscache.contains_key(&posid) {
            return UNREACHABLE;
        }

        if depth > stats.seldepth {
            stats.seldepth = depth;
        }
        stats.nodes += 1;

        let algebs: Vec<String> = self.poscache[&posid]
            .moves_by_eval_desc()
            .into_iter()
            .map(|mv| mv.algeb.clone())
            .collect();

        path.push(posid.clone());

        let mut max = -INF_SCORE;
        for algeb in algebs {
            let (score, minimaxdepth) = {
                let mv = &self.poscache[&posid].moves[&algeb];
                (mv.score, mv.minimaxdepth)
            };

            let mut value = score;
            let mut haspv = false;
            if score >= -cutoff && score <= cutoff {
                let mut board = Board::empty();
                board.set_from_fen(fen);
                board.make_algeb_move(&algeb);
                let newfen = board.to_fen();
                value = self.minimax_recursive(&newfen, path, depth + 1, maxdepth, cutoff, stats);
                haspv = value >= -INF_SCORE;
                if value < -INF_SCORE {
                    value = score;
                }
            }

            // Only overwrite if this pass reached the move at a shallower
            // (or equally fresh) depth than whatever wrote it last, so a
            // narrow follow-up pass never clobbers a deeper pass's result.
            if depth < minimaxdepth {
                if let Some(pos) = self.poscache.get_mut(&posid) {
                    if let Some(mv) = pos.moves.get_mut(&algeb) {
                        mv.eval = value;
                        mv.minimaxdepth = depth;
                        mv.haspv = haspv;
                    }
                }
            }

            if value > max {
                max = value;
            }
        }

        path.pop();
        -max
    }
}
