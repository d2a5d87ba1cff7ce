//! Annotator - batch generation of move-reasoning annotations.
//!
//! Reads FEN positions from a CSV dataset, runs each sampled position
//! through Stockfish multipv analysis and a reasoning model, and writes
//! (FEN, prompt, reasoning) rows for downstream fine-tuning.
//!
//! # Modules
//!
//! - [`config`] - TOML configuration (engine, model, sampling)
//! - [`dataset`] - CSV input/output
//! - [`model`] - Ollama chat client
//! - [`orchestrator`] - sampling and per-position pipeline

pub mod config;
pub mod dataset;
pub mod model;
pub mod orchestrator;
