//! Width-bounded random leaf selection: walk down from the book's root
//! through already-analyzed positions, weighting by eval rank at each
//! ply, until an unanalyzed leaf or a cutoff/depth limit is reached.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::uci::EngineError;

use super::{fen_to_posid, Analyzer, Book};

/// Picks the next leaf to analyze and feeds it through an [`Analyzer`].
/// Owns its own seeded RNG so a run's selection sequence is reproducible
/// given the seed, without any shared global random state.
pub struct Selector {
    rng: StdRng,
}

impl Selector {
    /// Seed from the OS entropy source — the normal constructor for a
    /// live run.
    #[must_use]
    pub fn from_entropy() -> Selector {
        Selector {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seed explicitly, for reproducible tests and replay.
    #[must_use]
    pub fn from_seed(seed: u64) -> Selector {
        Selector {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Walk from `book.rootfen`, returning the FEN of the first position
    /// not yet cached, or `None` if the walk bottoms out at the depth
    /// limit, an empty move list, or a cutoff score before finding one.
    #[must_use]
    pub fn select(&mut self, book: &Book) -> Option<String> {
        let rootfen = book.rootfen.clone();
        self.select_recursive(book, &rootfen, 0)
    }

    fn select_recursive(&mut self, book: &Book, fen: &str, depth: i32) -> Option<String> {
        if depth > book.analysisdepth {
            return None;
        }
        let posid = fen_to_posid(fen);
        let Some(pos) = book.poscache.get(&posid) else {
            return Some(fen.to_string());
        };

        let items = pos.moves_by_eval_desc();
        if items.is_empty() {
            return None;
        }
        // The source indexes the top-`width` moves without checking the
        // width against how many moves actually exist; clamp here so a
        // wide configuration never indexes past a short move list.
        let width = book.width_for_depth(depth).min(items.len());
        if width == 0 {
            return None;
        }
        let chosen = items[self.rng.gen_range(0..width)];
        if chosen.score < -book.cutoff || chosen.score > book.cutoff {
            return None;
        }

        let mut board = Board::empty();
        board.set_from_fen(fen);
        board.make_algeb_move(&chosen.algeb);
        self.select_recursive(book, &board.to_fen(), depth + 1)
    }

    /// Select a leaf, analyze it, and cache the result. Returns the FEN
    /// analyzed, or `None` if this cycle found no work to do.
    pub fn add_one(
        &mut self,
        book: &mut Book,
        analyzer: &mut Analyzer,
    ) -> Result<Option<String>, EngineError> {
        let Some(fen) = self.select(book) else {
            log::info!("select found no work for {}", book.id());
            return Ok(None);
        };
        log::info!("analyzing {fen}");
        let pos = analyzer.analyze(&fen, book.enginedepth, &book.variantkey)?;
        log::debug!("caching {}", fen_to_posid(&pos.fen));
        book.store_position(pos);
        Ok(Some(fen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;
    use crate::book::BookMove;
    use std::collections::HashMap;

    fn empty_book(rootfen: &str) -> Book {
        Book {
            name: "test".to_string(),
            variantkey: "atomic".to_string(),
            rootfen: rootfen.to_string(),
            modulus: 10,
            analysisdepth: 4,
            enginedepth: 12,
            numcycles: 1,
            batchsize: 1,
            minimaxafter: 10,
            cutoff: 9000,
            widths: vec![3, 2],
            poscache: HashMap::new(),
        }
    }

    #[test]
    fn selects_root_itself_when_uncached() {
        let book = empty_book(START_FEN);
        let mut selector = Selector::from_seed(1);
        assert_eq!(selector.select(&book), Some(START_FEN.to_string()));
    }

    #[test]
    fn never_descends_past_configured_width() {
        let mut book = empty_book(START_FEN);
        let mut root = super::super::BookPosition::new(START_FEN);
        // Five ranked moves at depth 0; width 3 must confine selection to
        // the top 3 (e2e4, d2d4, g1f3). None of the children are cached,
        // so `select` returns right after applying the chosen root move.
        for (algeb, score) in [
            ("e2e4", 50),
            ("d2d4", 40),
            ("g1f3", 30),
            ("c2c4", 20),
            ("b2b3", 10),
        ] {
            root.moves
                .insert(algeb.to_string(), BookMove::new(algeb, score));
        }
        book.store_position(root);

        let allowed = ["e2e4", "d2d4", "g1f3"];
        let expected_fens: Vec<String> = allowed
            .iter()
            .map(|algeb| {
                let mut board = Board::new();
                board.make_algeb_move(algeb);
                board.to_fen()
            })
            .collect();

        let mut selector = Selector::from_seed(7);
        for _ in 0..50 {
            let fen = selector.select(&book).expect("width > 0, cutoff wide open");
            assert!(
                expected_fens.contains(&fen),
                "selected {fen}, outside the top-3 width bound"
            );
        }
    }

    #[test]
    fn cutoff_stops_the_walk() {
        let mut book = empty_book(START_FEN);
        book.cutoff = 100;
        let mut root = super::super::BookPosition::new(START_FEN);
        root.moves
            .insert("e2e4".to_string(), BookMove::new("e2e4", 9000));
        book.store_position(root);

        let mut selector = Selector::from_seed(3);
        assert_eq!(selector.select(&book), None);
    }
}
