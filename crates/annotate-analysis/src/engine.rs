//! UCI engine subprocess wrapper with MultiPV analysis.

use annotate_core::{AnalysisLine, Score};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;
use thiserror::Error;

/// Maximum number of lines to read before giving up on a UCI response.
/// MultiPV searches at long time controls emit thousands of info lines.
pub const MAX_UCI_LINES: usize = 100_000;

/// Errors that can occur when working with the analysis engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to spawn the engine process or communicate with it.
    #[error("Failed to spawn engine: {0}")]
    SpawnError(#[from] std::io::Error),
    /// Engine executable was not found at the specified path.
    #[error("Engine not found at path: {0}")]
    NotFound(String),
    /// Engine failed to initialize properly (UCI handshake failed).
    #[error("Engine initialization failed")]
    InitFailed,
    /// Engine returned an invalid or unexpected response.
    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),
}

/// Engine resource limits, applied once per process acquisition.
#[derive(Debug, Clone, Copy)]
pub struct ResourceLimits {
    /// Search threads ("Threads" UCI option).
    pub threads: u32,
    /// Hash table size in MB ("Hash" UCI option).
    pub hash_mb: u32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            threads: 12,
            hash_mb: 2048,
        }
    }
}

/// Search limits for one analysis call.
///
/// The engine stops at whichever of `time_budget` or `depth_cap` is
/// reached first.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    /// Number of principal variations to request (MultiPV).
    pub line_count: usize,
    /// Wall-clock budget for the search.
    pub time_budget: Duration,
    /// Maximum search depth.
    pub depth_cap: u32,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            line_count: 3,
            time_budget: Duration::from_millis(2000),
            depth_cap: 30,
        }
    }
}

/// One parsed `info` line from the engine.
#[derive(Debug, Clone, PartialEq)]
struct InfoLine {
    depth: u32,
    /// 1-based MultiPV rank. Engines omit the token in single-PV mode.
    multipv: usize,
    score: Score,
    pv: Vec<String>,
}

/// Wrapper for UCI-compatible analysis engines like Stockfish.
///
/// Manages the subprocess and the UCI protocol: handshake, option
/// configuration, and MultiPV search. Dropping the wrapper sends `quit`
/// and waits for the process, so the handle is released on every exit
/// path, including errors mid-analysis.
pub struct AnalysisEngine {
    /// The engine process handle.
    process: Child,
    /// Writer for sending commands to the engine.
    stdin: ChildStdin,
    /// Reader for receiving responses from the engine.
    stdout: BufReader<ChildStdout>,
    /// The engine's name (reported via UCI id).
    name: String,
}

impl AnalysisEngine {
    /// Spawns the engine process and performs the UCI handshake.
    ///
    /// # Errors
    ///
    /// - `EngineError::NotFound` if the engine path doesn't exist
    /// - `EngineError::SpawnError` if the engine process fails to start
    /// - `EngineError::InitFailed` if UCI initialization fails
    pub fn new(engine_path: &str) -> Result<Self, EngineError> {
        if !std::path::Path::new(engine_path).exists() {
            return Err(EngineError::NotFound(engine_path.to_string()));
        }

        let mut process = Command::new(engine_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = process.stdin.take().ok_or(EngineError::InitFailed)?;
        let stdout = process.stdout.take().ok_or(EngineError::InitFailed)?;
        let stdout = BufReader::new(stdout);

        let mut engine = Self {
            process,
            stdin,
            stdout,
            name: String::new(),
        };

        engine.init_uci()?;

        Ok(engine)
    }

    /// Initialize the UCI protocol with the engine.
    fn init_uci(&mut self) -> Result<(), EngineError> {
        self.send_command("uci")?;

        let mut name = String::new();
        let mut lines_read = 0;
        loop {
            if lines_read > MAX_UCI_LINES {
                return Err(EngineError::InitFailed);
            }
            lines_read += 1;
            let line = self.read_line()?;
            if line.starts_with("id name ") {
                name = line.strip_prefix("id name ").unwrap_or("").to_string();
            } else if line == "uciok" {
                break;
            }
        }

        self.name = if name.is_empty() {
            "Unknown Engine".to_string()
        } else {
            name
        };

        self.wait_ready()
    }

    /// Returns the engine's name as reported via UCI protocol.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies resource limits and the MultiPV line count.
    ///
    /// Called once per process acquisition, before any search.
    pub fn configure(
        &mut self,
        limits: &ResourceLimits,
        line_count: usize,
    ) -> Result<(), EngineError> {
        self.send_command(&format!("setoption name Threads value {}", limits.threads))?;
        self.send_command(&format!("setoption name Hash value {}", limits.hash_mb))?;
        self.send_command(&format!("setoption name MultiPV value {}", line_count))?;
        self.wait_ready()
    }

    /// Analyzes a position given in FEN notation, returning the engine's
    /// ranked principal variations.
    ///
    /// The search runs under the combined limit in `options`; the engine
    /// stops at whichever of time or depth is reached first and reports
    /// `bestmove`, so hitting the time budget is not an error. Info
    /// reports without a move sequence are dropped, and the result may be
    /// shorter than `options.line_count` if the engine prunes early.
    pub fn analyse(
        &mut self,
        fen: &str,
        options: &AnalysisOptions,
    ) -> Result<Vec<AnalysisLine>, EngineError> {
        self.send_command(&format!("position fen {}", fen))?;
        self.send_command(&format!(
            "go depth {} movetime {}",
            options.depth_cap,
            options.time_budget.as_millis()
        ))?;

        // Latest report per MultiPV slot; later (deeper) reports replace
        // earlier ones.
        let mut slots: Vec<Option<InfoLine>> = vec![None; options.line_count];

        let mut lines_read = 0;
        loop {
            if lines_read > MAX_UCI_LINES {
                return Err(EngineError::InvalidResponse(
                    "Too many lines without bestmove".to_string(),
                ));
            }
            lines_read += 1;
            let line = self.read_line()?;

            if line.starts_with("info ") {
                if let Some(info) = Self::parse_info_line(&line) {
                    if info.multipv >= 1 && info.multipv <= slots.len() {
                        let slot = &mut slots[info.multipv - 1];
                        let stale = slot.as_ref().is_some_and(|prev| prev.depth > info.depth);
                        if !stale {
                            *slot = Some(info);
                        }
                    }
                }
            } else if line.starts_with("bestmove") {
                break;
            }
        }

        let lines: Vec<AnalysisLine> = slots
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(i, info)| AnalysisLine {
                rank: i + 1,
                score: info.score,
                moves: info.pv,
            })
            .collect();

        log::debug!(
            "engine {} returned {} line(s) for {}",
            self.name,
            lines.len(),
            fen
        );

        Ok(lines)
    }

    /// Parse a UCI info line to extract depth, multipv rank, score, and PV.
    ///
    /// Format: "info depth X multipv N score cp Y ... pv move1 move2 ..."
    /// or: "info depth X multipv N score mate Y ... pv move1 move2 ..."
    ///
    /// Returns `None` for lines missing depth, score, or a non-empty PV
    /// (e.g., currmove chatter or upperbound-only reports).
    fn parse_info_line(line: &str) -> Option<InfoLine> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        let mut depth: Option<u32> = None;
        let mut multipv: usize = 1;
        let mut score: Option<Score> = None;
        let mut pv: Vec<String> = Vec::new();
        let mut in_pv = false;

        let mut i = 0;
        while i < parts.len() {
            match parts[i] {
                "depth" => {
                    if i + 1 < parts.len() {
                        depth = parts[i + 1].parse().ok();
                        i += 1;
                    }
                }
                "multipv" => {
                    if i + 1 < parts.len() {
                        multipv = parts[i + 1].parse().unwrap_or(1);
                        i += 1;
                    }
                }
                "score" => {
                    if i + 2 < parts.len() {
                        match parts[i + 1] {
                            "cp" => {
                                score = parts[i + 2].parse().ok().map(Score::Cp);
                                i += 2;
                            }
                            "mate" => {
                                score = parts[i + 2].parse().ok().map(Score::Mate);
                                i += 2;
                            }
                            _ => {}
                        }
                    }
                }
                "pv" => {
                    in_pv = true;
                }
                _ => {
                    if in_pv {
                        pv.push(parts[i].to_string());
                    }
                }
            }
            i += 1;
        }

        if pv.is_empty() {
            return None;
        }

        Some(InfoLine {
            depth: depth?,
            multipv,
            score: score?,
            pv,
        })
    }

    /// Send a command to the engine.
    fn send_command(&mut self, command: &str) -> Result<(), EngineError> {
        writeln!(self.stdin, "{}", command)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Send "isready" and block until "readyok".
    fn wait_ready(&mut self) -> Result<(), EngineError> {
        self.send_command("isready")?;
        let mut lines_read = 0;
        loop {
            if lines_read > MAX_UCI_LINES {
                return Err(EngineError::InitFailed);
            }
            lines_read += 1;
            let line = self.read_line()?;
            if line == "readyok" {
                break;
            }
        }
        Ok(())
    }

    /// Read a line from the engine's output.
    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        let bytes = self.stdout.read_line(&mut line)?;
        if bytes == 0 {
            return Err(EngineError::InvalidResponse(
                "Engine closed unexpectedly".to_string(),
            ));
        }
        Ok(line.trim().to_string())
    }
}

impl Drop for AnalysisEngine {
    fn drop(&mut self) {
        // Try to send quit for a graceful exit, then reap the process.
        let _ = self.send_command("quit");
        let _ = self.process.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_not_found() {
        let result = AnalysisEngine::new("/nonexistent/path/to/stockfish");
        assert!(result.is_err());
        match result {
            Err(EngineError::NotFound(path)) => {
                assert_eq!(path, "/nonexistent/path/to/stockfish");
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_engine_error_display() {
        let spawn_err = EngineError::SpawnError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(spawn_err.to_string().contains("Failed to spawn engine"));

        let not_found = EngineError::NotFound("/path/to/engine".to_string());
        assert!(not_found.to_string().contains("/path/to/engine"));

        let init_failed = EngineError::InitFailed;
        assert_eq!(init_failed.to_string(), "Engine initialization failed");

        let invalid = EngineError::InvalidResponse("bad response".to_string());
        assert!(invalid.to_string().contains("bad response"));
    }

    #[test]
    fn test_parse_info_line_multipv_centipawn() {
        let line = "info depth 20 seldepth 28 multipv 2 score cp 15 nodes 500000 pv d2d4 d7d5";
        let info = AnalysisEngine::parse_info_line(line).unwrap();
        assert_eq!(info.depth, 20);
        assert_eq!(info.multipv, 2);
        assert_eq!(info.score, Score::Cp(15));
        assert_eq!(info.pv, vec!["d2d4", "d7d5"]);
    }

    #[test]
    fn test_parse_info_line_mate() {
        let line = "info depth 12 multipv 1 score mate 3 nodes 10000 pv d1h5 g6h5 f3h5";
        let info = AnalysisEngine::parse_info_line(line).unwrap();
        assert_eq!(info.score, Score::Mate(3));
        assert_eq!(info.pv.len(), 3);
    }

    #[test]
    fn test_parse_info_line_negative_mate() {
        let line = "info depth 10 multipv 1 score mate -2 pv e8d8";
        let info = AnalysisEngine::parse_info_line(line).unwrap();
        assert_eq!(info.score, Score::Mate(-2));
    }

    #[test]
    fn test_parse_info_line_defaults_to_rank_1() {
        // Single-PV engines omit the multipv token.
        let line = "info depth 15 score cp 35 nodes 50000 pv e2e4 e7e5";
        let info = AnalysisEngine::parse_info_line(line).unwrap();
        assert_eq!(info.multipv, 1);
        assert_eq!(info.score, Score::Cp(35));
    }

    #[test]
    fn test_parse_info_line_without_pv_is_dropped() {
        let line = "info depth 5 multipv 1 score cp 0 nodes 1000";
        assert!(AnalysisEngine::parse_info_line(line).is_none());
    }

    #[test]
    fn test_parse_info_line_currmove_chatter_is_dropped() {
        let line = "info depth 18 currmove e2e4 currmovenumber 1";
        assert!(AnalysisEngine::parse_info_line(line).is_none());
    }

    #[test]
    fn test_parse_info_line_missing_score_is_dropped() {
        let line = "info depth 15 multipv 1 nodes 50000 pv e2e4";
        assert!(AnalysisEngine::parse_info_line(line).is_none());
    }

    #[test]
    fn test_defaults_match_fixed_run_configuration() {
        let limits = ResourceLimits::default();
        assert_eq!(limits.threads, 12);
        assert_eq!(limits.hash_mb, 2048);

        let options = AnalysisOptions::default();
        assert_eq!(options.line_count, 3);
        assert_eq!(options.time_budget, Duration::from_millis(2000));
        assert_eq!(options.depth_cap, 30);
    }
}
