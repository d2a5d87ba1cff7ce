//! Core types for the chess annotation pipeline.
//!
//! This crate holds the pure, deterministic half of the pipeline:
//!
//! - [`Fen`] - FEN string validation
//! - [`render_board`] - FEN to fixed-width ASCII board diagram
//! - [`Score`] / [`AnalysisLine`] - engine evaluation types
//! - [`PromptComposer`] - deterministic prompt text rendering
//!
//! Nothing in here touches the filesystem, the clock, or a process;
//! everything is a pure function of its inputs so prompt output can be
//! diffed byte-for-byte in tests.

pub mod board;
pub mod fen;
pub mod prompt;
pub mod score;

pub use board::render_board;
pub use fen::{Fen, FenError, Side};
pub use prompt::{PromptComposer, PromptError};
pub use score::{AnalysisLine, Score};
