//! The opening book proper: analyzed positions keyed by a canonical
//! position id, plus the selector and minimax passes that grow and refine
//! them.
//!
//! [`Book`] owns the in-memory position cache (`poscache`); [`Analyzer`]
//! drives the engine to produce a [`BookPosition`] from a FEN;
//! [`Selector`] walks the cache to pick the next leaf to analyze; the
//! `minimax` submodule backpropagates evals once enough of the tree below
//! a position is cached.

mod analyzer;
mod blob;
mod minimax;
mod selector;


pub use analyzer::{Analyzer, INF_SCORE, MATE_SCORE};
pub use blob::{booklet_id, fen_to_booklet_index, fen_to_posid};
pub use minimax::MinimaxStats;
pub use selector::Selector;

use indexmap::IndexMap;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `minimaxdepth` sentinel meaning "this move's eval has never been
/// overwritten by a minimax pass" — any real pass depth is smaller.
pub const INFINITE_MINIMAX_DEPTH: i32 = i32::MAX;

/// One candidate move reported for a [`BookPosition`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookMove {
    pub algeb: String,
    /// Raw, normalized engine score for this move.
    pub score: i32,
    /// Current best estimate: `score` until a minimax pass overwrites it.
    pub eval: i32,
    pub minimaxdepth: i32,
    pub haspv: bool,
}

impl BookMove {
    #[must_use]
    pub fn new(algeb: impl Into<String>, score: i32) -> BookMove {
        BookMove {
            algeb: algeb.into(),
            score,
            eval: score,
            minimaxdepth: INFINITE_MINIMAX_DEPTH,
            haspv: false,
        }
    }
}

/// One analyzed position: its FEN, the engine depth reached, and every
/// candidate move the engine reported, keyed by algebraic move.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookPosition {
    pub fen: String,
    pub enginedepth: i32,
    pub moves: IndexMap<String, BookMove>,
}

impl BookPosition {
    #[must_use]
    pub fn new(fen: impl Into<String>) -> BookPosition {
        BookPosition {
            fen: fen.into(),
            enginedepth: 0,
            moves: IndexMap::new(),
        }
    }

    /// Moves ordered by `eval` descending; ties keep insertion order
    /// (the order the engine reported them in).
    #[must_use]
    pub fn moves_by_eval_desc(&self) -> Vec<&BookMove> {
        let mut items: Vec<&BookMove> = self.moves.values().collect();
        items.sort_by(|a, b| b.eval.cmp(&a.eval));
        items
    }
}

/// An opening book: identity, analysis parameters, and the growing cache
/// of analyzed positions.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Book {
    pub name: String,
    pub variantkey: String,
    pub rootfen: String,
    /// Sharding modulus for booklet documents (the source's `mod` field).
    pub modulus: i32,
    pub analysisdepth: i32,
    pub enginedepth: i32,
    pub numcycles: i32,
    pub batchsize: i32,
    pub minimaxafter: i32,
    pub cutoff: i32,
    /// Per-ply branching width; the last entry repeats for any deeper ply.
    pub widths: Vec<i32>,
    pub poscache: HashMap<String, BookPosition>,
}

impl Book {
    /// Document id this book is stored under: `name` + `variantkey`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}{}", self.name, self.variantkey)
    }

    /// Look up a cached position by FEN (canonicalized internally).
    #[must_use]
    pub fn get_position(&self, fen: &str) -> Option<&BookPosition> {
        self.poscache.get(&fen_to_posid(fen))
    }

    /// Insert or replace a position, keyed by its canonical position id.
    pub fn store_position(&mut self, pos: BookPosition) {
        let posid = fen_to_posid(&pos.fen);
        self.poscache.insert(posid, pos);
    }

    /// Serialize the cache to the wire blob format, keyed by position id.
    #[must_use]
    pub fn to_document(&self) -> HashMap<String, String> {
        self.poscache
            .iter()
            .map(|(posid, pos)| (posid.clone(), pos.to_blob()))
            .collect()
    }

    /// The branching width to use at `depth`: `widths[depth]` if present,
    /// else the last configured width, else `1` if `widths` is empty.
    #[must_use]
    pub fn width_for_depth(&self, depth: i32) -> usize {
        let depth = usize::try_from(depth).unwrap_or(0);
        if let Some(&w) = self.widths.get(depth) {
            usize::try_from(w).unwrap_or(0)
        } else if let Some(&w) = self.widths.last() {
            usize::try_from(w).unwrap_or(0)
        } else {
            1
        }
    }
}
