//! Subprocess lifecycle and command framing for a single engine instance.
//!
//! The driver is single-threaded: each public operation writes a command
//! then reads stdout until a terminating token, never interleaving commands
//! (see the crate's concurrency model). No async runtime is used — the
//! protocol is strictly request/response over blocking pipes.

use std::fmt;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use super::info::Results;

/// Options sent to the engine at startup via `setoption`.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub uci_variant: String,
    pub multipv: i32,
    pub hash: i32,
    pub threads: i32,
    pub own_book: bool,
    pub ponder: bool,
}

/// Errors from driving the engine subprocess.
#[derive(Debug)]
pub enum EngineError {
    Io(std::io::Error),
    /// The engine process exited (or its pipes closed) mid-exchange. Per
    /// the driver's failure model, the caller must discard this `Engine`
    /// and spawn a fresh one rather than continue using it.
    EngineExited,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io(e) => write!(f, "engine I/O error: {e}"),
            EngineError::EngineExited => write!(f, "engine process exited unexpectedly"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e)
    }
}

/// A running engine subprocess, communicating over line-buffered UTF-8
/// stdin/stdout.
pub struct Engine {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Engine {
    /// Spawn the engine executable at `path` and connect its stdio pipes.
    pub fn spawn(path: &str) -> Result<Engine, EngineError> {
        Engine::spawn_with_args(path, &[])
    }

    /// Spawn `path` with `args` and connect its stdio pipes. Exposed
    /// separately from [`Engine::spawn`] for driving non-engine
    /// executables (e.g. a scripted test double) through the same pipe
    /// plumbing.
    pub fn spawn_with_args(path: &str, args: &[&str]) -> Result<Engine, EngineError> {
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;
        let stdin = child.stdin.take().ok_or(EngineError::EngineExited)?;
        let stdout = child.stdout.take().ok_or(EngineError::EngineExited)?;
        Ok(Engine {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    fn write_line(&mut self, line: &str) -> Result<(), EngineError> {
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Emit `setoption` commands for each recognized option, in the fixed
    /// order `UCI_Variant, multipv, hash, threads, ownbook, ponder`.
    /// `multipv`/`hash`/`threads` are only sent when positive.
    pub fn set_options(&mut self, opt: &Options) -> Result<(), EngineError> {
        self.send_option("UCI_Variant", &opt.uci_variant)?;
        if opt.multipv > 0 {
            self.send_option("multipv", &opt.multipv.to_string())?;
        }
        if opt.hash > 0 {
            self.send_option("hash", &opt.hash.to_string())?;
        }
        if opt.threads > 0 {
            self.send_option("threads", &opt.threads.to_string())?;
        }
        self.send_option("ownbook", &opt.own_book.to_string())?;
        self.send_option("ponder", &opt.ponder.to_string())?;
        Ok(())
    }

    fn send_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        self.write_line(&format!("setoption name {name} value {value}"))
    }

    /// Tell the engine to set the position from `fen`.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), EngineError> {
        self.write_line(&format!("position fen {fen}"))
    }

    /// Run `go`, optionally bounded by `depth`/`searchmoves`/`movetime`,
    /// reading `info` lines until `bestmove` and returning the filtered,
    /// deduplicated result set per `flags`.
    pub fn go(
        &mut self,
        depth: i32,
        searchmoves: &str,
        movetime: i32,
        flags: u32,
    ) -> Result<Results, EngineError> {
        let mut cmd = String::from("go");
        if depth != 0 {
            cmd.push_str(&format!(" depth {depth}"));
        }
        if !searchmoves.is_empty() {
            cmd.push_str(&format!(" searchmoves {searchmoves}"));
        }
        if movetime != 0 {
            cmd.push_str(&format!(" movetime {movetime}"));
        }
        self.write_line(&cmd)?;

        let mut results = Results::default();
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = self.stdout.read_line(&mut line)?;
            if bytes_read == 0 {
                return Err(EngineError::EngineExited);
            }
            let trimmed = line.trim_end_matches(['\n', '\r']);
            if let Some(rest) = trimmed.strip_prefix("bestmove") {
                results.best_move = rest.split_whitespace().next().unwrap_or("").to_string();
                break;
            }
            results.record_info_line(trimmed);
        }
        results.finalize(depth, flags);
        Ok(results)
    }

    /// `Go` with only a depth bound and result filter flags.
    pub fn go_depth(&mut self, depth: i32, flags: u32) -> Result<Results, EngineError> {
        self.go(depth, "", 0, flags)
    }

    /// Send `stop`, terminate the child, and wait for its exit. Errors
    /// during shutdown are logged, not propagated — a process that refuses
    /// to die cleanly is still gone as far as the caller is concerned.
    pub fn shutdown(mut self) {
        if let Err(e) = self.write_line("stop") {
            log::warn!("failed to send stop to engine: {e}");
        }
        if let Err(e) = self.child.kill() {
            log::warn!("failed to kill engine process: {e}");
        }
        if let Err(e) = self.child.wait() {
            log::warn!("failed waiting on engine process: {e}");
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
