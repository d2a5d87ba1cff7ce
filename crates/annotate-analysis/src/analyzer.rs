//! Scoped per-call position analysis.

use crate::engine::{AnalysisEngine, AnalysisOptions, EngineError, ResourceLimits};
use annotate_core::AnalysisLine;

/// Trait for anything that can produce ranked analysis lines for a FEN.
///
/// Batch drivers program against this seam so tests can substitute stub
/// analyzers with canned (or failing) results.
pub trait MultiLineAnalyzer {
    /// Analyzes a position and returns its lines in rank order (best
    /// first). The result may be shorter than the configured line count.
    fn analyze(&self, fen: &str) -> Result<Vec<AnalysisLine>, EngineError>;
}

/// Stockfish-backed analyzer with per-call process acquisition.
///
/// Each [`analyze`](MultiLineAnalyzer::analyze) call spawns a fresh engine
/// process, configures it, runs one search, and releases the process. The
/// handle never outlives the call, so a crashed or timed-out analysis
/// cannot leak into the next position. Limits and search options are
/// fixed at construction.
pub struct StockfishAnalyzer {
    engine_path: String,
    limits: ResourceLimits,
    options: AnalysisOptions,
}

impl StockfishAnalyzer {
    pub fn new(
        engine_path: impl Into<String>,
        limits: ResourceLimits,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            engine_path: engine_path.into(),
            limits,
            options,
        }
    }

    /// The fixed search options this analyzer applies to every position.
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Spawns the engine once and performs the UCI handshake, returning
    /// the engine's reported name.
    ///
    /// Used as a preflight check so a bad engine path fails the run
    /// before any position is processed.
    pub fn probe(&self) -> Result<String, EngineError> {
        let engine = AnalysisEngine::new(&self.engine_path)?;
        Ok(engine.name().to_string())
    }
}

impl MultiLineAnalyzer for StockfishAnalyzer {
    fn analyze(&self, fen: &str) -> Result<Vec<AnalysisLine>, EngineError> {
        // The engine handle is scoped to this call: dropped (quit + wait)
        // on success and on every error path below.
        let mut engine = AnalysisEngine::new(&self.engine_path)?;
        engine.configure(&self.limits, self.options.line_count)?;
        engine.analyse(fen, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_with_missing_engine_fails_cleanly() {
        let analyzer = StockfishAnalyzer::new(
            "/nonexistent/engine",
            ResourceLimits::default(),
            AnalysisOptions::default(),
        );
        let result = analyzer.analyze(annotate_core::Fen::STARTPOS);
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }

    #[test]
    fn probe_with_missing_engine_fails() {
        let analyzer = StockfishAnalyzer::new(
            "/nonexistent/engine",
            ResourceLimits::default(),
            AnalysisOptions::default(),
        );
        assert!(analyzer.probe().is_err());
    }

    #[test]
    fn options_are_fixed_at_construction() {
        let options = AnalysisOptions {
            line_count: 5,
            ..AnalysisOptions::default()
        };
        let analyzer =
            StockfishAnalyzer::new("stockfish", ResourceLimits::default(), options);
        assert_eq!(analyzer.options().line_count, 5);
    }
}
