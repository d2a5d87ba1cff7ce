//! Engine evaluation types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An engine evaluation, relative to the side to move.
///
/// Every valid engine score is exactly one of the two forms: a centipawn
/// value for normal positions, or a signed mate distance when a forced
/// mate is found (positive = side to move mates, negative = side to move
/// is mated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    /// Centipawn evaluation.
    Cp(i32),
    /// Mate in N, signed.
    Mate(i32),
}

impl fmt::Display for Score {
    /// Renders the prompt-facing encoding: `Cp(v)` or `Mate(n)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Cp(v) => write!(f, "Cp({})", v),
            Score::Mate(n) => write!(f, "Mate({})", n),
        }
    }
}

/// One ranked principal variation from a multipv analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisLine {
    /// 1-based rank by the engine's own preference ordering (1 = best).
    pub rank: usize,
    /// Evaluation of the line, relative to the side to move.
    pub score: Score,
    /// Move sequence in engine notation. Never empty; lines the engine
    /// reported without a move sequence are dropped before this type is
    /// constructed.
    pub moves: Vec<String>,
}

impl AnalysisLine {
    /// The move sequence as a single space-joined string.
    pub fn joined_moves(&self) -> String {
        self.moves.join(" ")
    }

    /// The first move of the line, if any.
    pub fn first_move(&self) -> Option<&str> {
        self.moves.first().map(String::as_str)
    }
}
