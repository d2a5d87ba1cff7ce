//! Multi-line chess position analysis with Stockfish.
//!
//! This crate wraps a UCI engine subprocess and asks it for the top-N
//! principal variations of a position (MultiPV). The engine process is a
//! scoped resource: one analysis call acquires it, configures it, runs the
//! search, and releases it on every exit path.
//!
//! # Overview
//!
//! - [`AnalysisEngine`] - UCI subprocess wrapper with MultiPV parsing
//! - [`StockfishAnalyzer`] - per-call scoped acquisition around it
//! - [`MultiLineAnalyzer`] - trait seam so batch drivers can be tested
//!   with stub analyzers
//!
//! # Example
//!
//! ```ignore
//! use annotate_analysis::{AnalysisOptions, MultiLineAnalyzer, ResourceLimits, StockfishAnalyzer};
//!
//! let analyzer = StockfishAnalyzer::new(
//!     "stockfish",
//!     ResourceLimits::default(),
//!     AnalysisOptions::default(),
//! );
//! let lines = analyzer.analyze("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")?;
//! println!("best: {:?}", lines[0].first_move());
//! ```

pub mod analyzer;
pub mod engine;

pub use analyzer::{MultiLineAnalyzer, StockfishAnalyzer};
pub use engine::{AnalysisEngine, AnalysisOptions, EngineError, ResourceLimits};
