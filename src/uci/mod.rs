//! UCI engine driver: a line-oriented subprocess protocol that issues
//! `setoption`, `position`, `go` commands and parses streamed `info`
//! records into a deduplicated, filterable result set.

mod driver;
mod info;

pub use driver::{Engine, EngineError, Options};
pub use info::{
    Results, ScoreResult, HIGHEST_DEPTH_ONLY, INCLUDE_LOWERBOUNDS, INCLUDE_UPPERBOUNDS,
};
