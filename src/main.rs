//! Outer batch driver: sync the cache, then repeatedly grow and
//! periodically consolidate the book, uploading after every cycle.
//!
//! This binary is deliberately thin — all of the interesting logic lives
//! in the library crate (`board`, `uci`, `book`, `persistence`,
//! `config`). It exists only to wire those pieces together the way a
//! long-running batch job would.

use std::env;
use std::thread;
use std::time::Duration;

use bookbuilder::book::{Analyzer, Selector};
use bookbuilder::config::BookConfig;
use bookbuilder::persistence::{BookStore, MemoryStore};
use bookbuilder::uci::Engine;

/// Non-semantic pacing between cycles; purely to avoid hammering the
/// persistence backend and to make progress legible in logs.
const CYCLE_PAUSE: Duration = Duration::from_secs(2);

fn main() {
    env_logger::init();

    let enginepath = env::var("ENGINEPATH").unwrap_or_else(|_| "stockfish".to_string());
    let mut book = BookConfig::from_env().into_book();
    log::info!(
        "starting book {} rootfen={} analysisdepth={} numcycles={} batchsize={}",
        book.id(),
        book.rootfen,
        book.analysisdepth,
        book.numcycles,
        book.batchsize
    );

    let store = MemoryStore::new();
    if let Err(e) = store.sync_cache(&mut book) {
        log::error!("sync_cache failed: {e}");
    }
    log::info!("synced {} cached positions", book.poscache.len());

    let engine = match Engine::spawn(&enginepath) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("failed to spawn engine at {enginepath:?}: {e}");
            return;
        }
    };
    let mut analyzer = Analyzer::new(engine);
    let mut selector = Selector::from_entropy();

    let mut added_since_minimax = 0;
    for cycle in 0..book.numcycles {
        log::info!("cycle {}/{}", cycle + 1, book.numcycles);
        for _ in 0..book.batchsize {
            match selector.add_one(&mut book, &mut analyzer) {
                Ok(Some(fen)) => {
                    added_since_minimax += 1;
                    log::debug!("added {fen}");
                }
                Ok(None) => log::info!("no work found this round"),
                Err(e) => {
                    log::error!("engine error during add_one, recycling engine: {e}");
                    match Engine::spawn(&enginepath) {
                        Ok(engine) => analyzer = Analyzer::new(engine),
                        Err(e) => {
                            log::error!("failed to respawn engine at {enginepath:?}: {e}");
                        }
                    }
                    continue;
                }
            }
            if added_since_minimax >= book.minimaxafter {
                let (value, stats) = book.minimaxout();
                log::info!(
                    "minimaxout: value={value} seldepth={} nodes={}",
                    stats.seldepth,
                    stats.nodes
                );
                added_since_minimax = 0;
            }
        }

        if let Err(e) = store.upload_cache(&book) {
            log::error!("upload_cache failed: {e}");
        }
        if let Err(e) = store.store_book(&book) {
            log::error!("store_book failed: {e}");
        }

        if cycle + 1 < book.numcycles {
            thread::sleep(CYCLE_PAUSE);
        }
    }

    analyzer.into_engine().shutdown();
    log::info!("done: {} positions cached", book.poscache.len());
}
