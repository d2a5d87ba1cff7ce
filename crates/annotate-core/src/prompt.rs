//! Deterministic prompt composition.
//!
//! The composer is a pure function of its inputs: no clock, no randomness,
//! no global configuration. Identical inputs produce byte-identical text,
//! which the tests rely on.

use crate::score::AnalysisLine;
use thiserror::Error;

/// Errors that can occur when composing a prompt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    /// The analysis produced fewer lines than the template requires.
    #[error("insufficient analysis lines: required {required}, got {available}")]
    InsufficientLines { required: usize, available: usize },

    /// The top-ranked line carried no moves, so no best move exists.
    #[error("top-ranked line has an empty move sequence")]
    EmptyMoveSequence,
}

/// Composes the model-facing prompt from a position and its analysis.
///
/// Thresholds are explicit fields rather than globals so callers (and
/// tests) control them directly.
#[derive(Debug, Clone, Copy)]
pub struct PromptComposer {
    /// How many analysis lines to render, at most.
    pub lines_shown: usize,
    /// Minimum number of lines required; below this, composition fails.
    pub min_lines: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self {
            lines_shown: 3,
            min_lines: 3,
        }
    }
}

impl PromptComposer {
    /// Builds the prompt text for one position.
    ///
    /// Lines are rendered in the order given (rank order from the
    /// analyzer), up to `lines_shown`. If fewer than `lines_shown` but at
    /// least `min_lines` are available, only the available ones are
    /// rendered. The best move is the first token of the top-ranked line.
    ///
    /// # Errors
    ///
    /// - [`PromptError::InsufficientLines`] if fewer than `min_lines`
    ///   lines are available.
    /// - [`PromptError::EmptyMoveSequence`] if the top line has no moves.
    pub fn compose(
        &self,
        fen: &str,
        board: &str,
        lines: &[AnalysisLine],
    ) -> Result<String, PromptError> {
        if lines.len() < self.min_lines {
            return Err(PromptError::InsufficientLines {
                required: self.min_lines,
                available: lines.len(),
            });
        }

        let best_move = lines[0]
            .first_move()
            .ok_or(PromptError::EmptyMoveSequence)?;

        let mut prompt = String::new();
        prompt.push_str("Given a board's FEN string: \n");
        prompt.push_str(fen);
        prompt.push_str("\n\nThe ASCII board for the given FEN string is:\n");
        prompt.push_str(board);
        prompt.push_str(
            "\n\nUse the below Centipawn loss (Cp) and move sequence to guide your reasoning:\n",
        );

        for (i, line) in lines.iter().take(self.lines_shown).enumerate() {
            prompt.push_str(&format!(
                "\nLine {}; {}: {}",
                i + 1,
                line.score,
                line.joined_moves()
            ));
        }

        prompt.push_str(&format!("\n\nThe best move is : {}\n\n", best_move));
        prompt.push_str(
            "Give reasoning explaining why this is the best move basing your answer on the given information",
        );

        Ok(prompt)
    }
}
