//! Batch orchestration: sampling, the per-position pipeline, and
//! failure accounting.

use crate::model::{ModelError, ReasoningModel};
use annotate_analysis::{EngineError, MultiLineAnalyzer};
use annotate_core::{render_board, Fen, FenError, PromptComposer, PromptError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

/// Fixed system instruction sent with every reasoning request.
pub const SYSTEM_PROMPT: &str = "\
You are a professional chess reasoning agent.
Answer only as a paragraph without any bullet points or any emotes.
Never mention centipawn scores or any other information provided for guiding you, only use them to guide you into a good reasoning.

When reasoning, use the ASCII board provided by the user to reason why a move is good.

Be concise and informative, explaining why a best move is played, analyzing both tactically and positionally.
Answer with \"Reasoning\" : <reason>";

/// Why a single position was skipped.
///
/// Every variant is fatal to its position only; the batch continues.
#[derive(Error, Debug)]
pub enum AnnotateError {
    /// The FEN failed validation before analysis.
    #[error("malformed position: {0}")]
    MalformedPosition(#[from] FenError),
    /// The engine process could not start or died mid-analysis.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(#[from] EngineError),
    /// The engine returned fewer lines than the prompt template requires.
    #[error("insufficient analysis: {0}")]
    InsufficientLines(#[from] PromptError),
    /// The reasoning model errored or returned empty content.
    #[error("model call failed: {0}")]
    ModelCallFailure(#[from] ModelError),
}

/// One completed (position, prompt, reasoning) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRecord {
    pub fen: String,
    pub prompt: String,
    pub reasoning: String,
}

/// A skipped position and the stage it failed at.
#[derive(Debug)]
pub struct PositionFailure {
    pub fen: String,
    pub error: AnnotateError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Successful records, in selection order.
    pub records: Vec<AnnotationRecord>,
    /// Skipped positions with their per-stage errors.
    pub failures: Vec<PositionFailure>,
}

/// Deterministically samples `sample_size` indices out of `len` using
/// `seed`. The same seed over the same input always selects the same
/// slice, so dataset runs are reproducible. A sample size larger than the
/// input is clamped.
pub fn sample_indices(len: usize, sample_size: usize, seed: u64) -> Vec<usize> {
    let amount = sample_size.min(len);
    let mut rng = StdRng::seed_from_u64(seed);
    rand::seq::index::sample(&mut rng, len, amount).into_vec()
}

/// Drives sampled positions through analyze -> compose -> reason.
///
/// Strictly sequential: each position's pipeline runs to completion
/// before the next begins, and no state is shared between positions.
pub struct Orchestrator<A, M> {
    analyzer: A,
    model: M,
    composer: PromptComposer,
}

impl<A: MultiLineAnalyzer, M: ReasoningModel> Orchestrator<A, M> {
    pub fn new(analyzer: A, model: M, composer: PromptComposer) -> Self {
        Self {
            analyzer,
            model,
            composer,
        }
    }

    /// Runs the batch over a seeded sample of `positions`.
    ///
    /// Failed positions are logged, recorded in the report, and skipped;
    /// they never abort the remaining batch. Record order matches
    /// selection order.
    pub fn run(&self, positions: &[String], sample_size: usize, seed: u64) -> RunReport {
        let selected = sample_indices(positions.len(), sample_size, seed);
        log::info!(
            "annotating {} of {} position(s) (seed {})",
            selected.len(),
            positions.len(),
            seed
        );

        let mut report = RunReport::default();
        for (done, idx) in selected.iter().enumerate() {
            let fen = &positions[*idx];
            match self.annotate_one(fen) {
                Ok(record) => {
                    log::info!("[{}/{}] annotated {}", done + 1, selected.len(), fen);
                    report.records.push(record);
                }
                Err(error) => {
                    log::warn!("skipping position '{}': {}", fen, error);
                    report.failures.push(PositionFailure {
                        fen: fen.clone(),
                        error,
                    });
                }
            }
        }
        report
    }

    /// Runs one position through the full pipeline.
    ///
    /// The stage progression is the error variant: a failure maps to
    /// exactly one of validate / analyze / compose / reason.
    pub fn annotate_one(&self, fen: &str) -> Result<AnnotationRecord, AnnotateError> {
        let fen = Fen::parse(fen)?;
        let lines = self.analyzer.analyze(fen.as_str())?;
        let board = render_board(fen.placement())?;
        let prompt = self.composer.compose(fen.as_str(), &board, &lines)?;
        let reasoning = self.model.chat(SYSTEM_PROMPT, &prompt)?;
        Ok(AnnotationRecord {
            fen: fen.as_str().to_string(),
            prompt,
            reasoning,
        })
    }
}
