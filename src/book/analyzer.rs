//! Turns one `go` result set into a [`BookPosition`], normalizing engine
//! scores into the book's fixed-point scale.

use crate::uci::{Engine, EngineError, Options, HIGHEST_DEPTH_ONLY};

use super::{BookMove, BookPosition};

/// Normalized score for a position no move can escape (paired with
/// [`MATE_SCORE`] for clamping near-forced mates).
pub const INF_SCORE: i32 = 10_000;
/// Any normalized score whose magnitude exceeds this is a mate score.
pub const MATE_SCORE: i32 = 9_000;

/// How many candidate moves to request per position (the source always
/// asks for every legal move via a generous `multipv`).
const ANALYSIS_MULTIPV: i32 = 250;
const ANALYSIS_HASH_MB: i32 = 64;
const ANALYSIS_THREADS: i32 = 1;

/// Drives a single engine instance to analyze positions.
pub struct Analyzer {
    engine: Engine,
}

impl Analyzer {
    #[must_use]
    pub fn new(engine: Engine) -> Analyzer {
        Analyzer { engine }
    }

    /// Hand the underlying engine back to the caller (e.g. to shut it down).
    #[must_use]
    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Set the variant and position, run `go depth`, and fold the
    /// resulting multi-PV lines into a [`BookPosition`] with normalized
    /// scores. Mate scores are folded into `±(INF_SCORE - pliesToMate)`;
    /// centipawn scores whose magnitude already exceeds [`MATE_SCORE`] are
    /// clamped to it so minimax never has to reason about raw mate
    /// distances from a position it didn't compute them at.
    pub fn analyze(
        &mut self,
        fen: &str,
        depth: i32,
        variantkey: &str,
    ) -> Result<BookPosition, EngineError> {
        self.engine.set_options(&Options {
            uci_variant: variantkey.to_string(),
            multipv: ANALYSIS_MULTIPV,
            hash: ANALYSIS_HASH_MB,
            threads: ANALYSIS_THREADS,
            own_book: false,
            ponder: false,
        })?;
        self.engine.set_fen(fen)?;
        let results = self.engine.go_depth(depth, HIGHEST_DEPTH_ONLY)?;

        let mut pos = BookPosition::new(fen);
        for line in &results.results {
            let Some(algeb) = line.best_moves.first() else {
                continue;
            };
            pos.enginedepth = line.depth;
            let score = normalize_score(line.score, line.mate);
            pos.moves
                .insert(algeb.clone(), BookMove::new(algeb.clone(), score));
        }
        Ok(pos)
    }
}

fn normalize_score(score: i32, mate: bool) -> i32 {
    if mate {
        if score < 0 {
            -(INF_SCORE + score)
        } else {
            INF_SCORE - score
        }
    } else if score > MATE_SCORE {
        MATE_SCORE
    } else if score < -MATE_SCORE {
        -MATE_SCORE
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_in_favor_folds_toward_inf_score() {
        assert_eq!(normalize_score(3, true), INF_SCORE - 3);
    }

    #[test]
    fn mate_against_folds_toward_negative_inf_score() {
        assert_eq!(normalize_score(-3, true), -(INF_SCORE + (-3)));
        assert_eq!(normalize_score(-3, true), -(INF_SCORE - 3));
    }

    #[test]
    fn ordinary_centipawn_scores_pass_through() {
        assert_eq!(normalize_score(150, false), 150);
        assert_eq!(normalize_score(-150, false), -150);
    }

    #[test]
    fn oversized_centipawn_scores_clamp_to_mate_score() {
        assert_eq!(normalize_score(15_000, false), MATE_SCORE);
        assert_eq!(normalize_score(-15_000, false), -MATE_SCORE);
    }
}
