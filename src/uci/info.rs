//! Token-level parsing of UCI `info` lines into deduplicated, filterable
//! [`ScoreResult`] records.

use std::collections::HashMap;

/// Only keep the highest-depth records.
pub const HIGHEST_DEPTH_ONLY: u32 = 1 << 0;
/// Include records marked `upperbound`.
pub const INCLUDE_UPPERBOUNDS: u32 = 1 << 1;
/// Include records marked `lowerbound`.
pub const INCLUDE_LOWERBOUNDS: u32 = 1 << 2;

/// One `info` record as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreResult {
    pub time: i32,
    pub depth: i32,
    pub seldepth: i32,
    pub nodes: i32,
    pub nodes_per_second: i32,
    pub multipv: i32,
    pub lowerbound: bool,
    pub upperbound: bool,
    pub score: i32,
    pub mate: bool,
    pub best_moves: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScoreKey {
    depth: i32,
    multipv: i32,
    upperbound: bool,
    lowerbound: bool,
}

/// Accumulates `info` lines from a single `go` and produces the final,
/// deduplicated, filtered result set plus the `bestmove` reported.
#[derive(Debug, Default)]
pub struct Results {
    pub best_move: String,
    pub results: Vec<ScoreResult>,
    records: HashMap<ScoreKey, ScoreResult>,
}

impl Results {
    /// Feed one line of engine stdout. Non-`info` lines are ignored; lines
    /// with `currmove` (progress reports) and lines with no usable `depth`
    /// are dropped. Malformed integer fields are logged and treated as
    /// zero rather than rejecting the whole line.
    pub(crate) fn record_info_line(&mut self, line: &str) {
        let Some(result) = parse_info_line(line) else {
            return;
        };
        let key = ScoreKey {
            depth: result.depth,
            multipv: result.multipv,
            upperbound: result.upperbound,
            lowerbound: result.lowerbound,
        };
        self.records.insert(key, result);
    }

    /// Apply the caller's filter flags and sort ascending by
    /// `(depth, multipv, lowerbound, upperbound)`.
    pub(crate) fn finalize(&mut self, requested_depth: i32, flags: u32) {
        let mut out: Vec<ScoreResult> = self
            .records
            .values()
            .filter(|r| flags & HIGHEST_DEPTH_ONLY == 0 || r.depth == requested_depth)
            .filter(|r| flags & INCLUDE_UPPERBOUNDS != 0 || !r.upperbound)
            .filter(|r| flags & INCLUDE_LOWERBOUNDS != 0 || !r.lowerbound)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            (a.depth, a.multipv, a.lowerbound, a.upperbound).cmp(&(
                b.depth,
                b.multipv,
                b.lowerbound,
                b.upperbound,
            ))
        });
        self.results = out;
    }
}

fn parse_info_line(line: &str) -> Option<ScoreResult> {
    if !line.starts_with("info") {
        return None;
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mut r = ScoreResult::default();
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "currmove" => return None,
            "depth" => {
                i += 1;
                r.depth = parse_field(tokens.get(i), "depth");
            }
            "seldepth" => {
                i += 1;
                r.seldepth = parse_field(tokens.get(i), "seldepth");
            }
            "time" => {
                i += 1;
                r.time = parse_field(tokens.get(i), "time");
            }
            "nodes" => {
                i += 1;
                r.nodes = parse_field(tokens.get(i), "nodes");
            }
            "nps" => {
                i += 1;
                r.nodes_per_second = parse_field(tokens.get(i), "nps");
            }
            "multipv" => {
                i += 1;
                r.multipv = parse_field(tokens.get(i), "multipv");
            }
            "lowerbound" => r.lowerbound = true,
            "upperbound" => r.upperbound = true,
            "score" => {
                i += 1;
                match tokens.get(i) {
                    Some(&"cp") => i += 1,
                    Some(&"mate") => {
                        r.mate = true;
                        i += 1;
                    }
                    _ => {}
                }
                let mut sign = 1;
                if tokens.get(i) == Some(&"-") {
                    sign = -1;
                    i += 1;
                }
                r.score = sign * parse_field(tokens.get(i), "score");
            }
            "pv" => {
                r.best_moves = tokens[i + 1..].iter().map(|s| (*s).to_string()).collect();
                break;
            }
            _ => {}
        }
        i += 1;
    }
    if r.depth > 0 {
        Some(r)
    } else {
        None
    }
}

fn parse_field(tok: Option<&&str>, field: &str) -> i32 {
    match tok.and_then(|t| t.parse::<i32>().ok()) {
        Some(v) => v,
        None => {
            log::warn!("could not parse UCI info field '{field}', defaulting to 0");
            0
        }
    }
}
