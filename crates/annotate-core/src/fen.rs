//! FEN (Forsyth-Edwards Notation) validation.
//!
//! Positions arrive as raw FEN strings from the input dataset and must be
//! rejected before any engine process is spawned for them.

use thiserror::Error;

/// Errors that can occur when validating FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid side to move: expected 'w' or 'b', got '{0}'")]
    InvalidSideToMove(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid move counter: {0}")]
    InvalidMoveCounter(String),
}

/// The side to move, from the second FEN field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// Lowercase English name, as used in prose prompts.
    pub fn name(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }
}

/// A validated FEN position.
///
/// Holds the original string plus the two fields the pipeline actually
/// consumes: the piece placement (for board rendering) and the side to
/// move. The remaining fields are validated and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    text: String,
    placement: String,
    side_to_move: Side,
}

impl Fen {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Validates a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        validate_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Side::White,
            "b" => Side::Black,
            other => return Err(FenError::InvalidSideToMove(other.to_string())),
        };

        validate_castling(fields[2])?;
        validate_en_passant(fields[3])?;

        for counter in &fields[4..6] {
            counter
                .parse::<u32>()
                .map_err(|_| FenError::InvalidMoveCounter(counter.to_string()))?;
        }

        Ok(Fen {
            text: fields.join(" "),
            placement: fields[0].to_string(),
            side_to_move,
        })
    }

    /// The normalized FEN string (fields joined by single spaces).
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The piece placement field (e.g., "rnbqkbnr/pppppppp/8/...").
    pub fn placement(&self) -> &str {
        &self.placement
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }
}

impl std::fmt::Display for Fen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

fn validate_placement(placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    for (i, rank) in ranks.iter().enumerate() {
        let mut squares = 0;
        for c in rank.chars() {
            if let Some(d) = c.to_digit(10) {
                squares += d;
            } else if "pnbrqkPNBRQK".contains(c) {
                squares += 1;
            } else {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "invalid character '{}' in rank {}",
                    c,
                    8 - i
                )));
            }
        }
        if squares != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} has {} squares, expected 8",
                8 - i,
                squares
            )));
        }
    }

    Ok(())
}

fn validate_castling(castling: &str) -> Result<(), FenError> {
    if castling == "-" {
        return Ok(());
    }
    for c in castling.chars() {
        if !"KQkq".contains(c) {
            return Err(FenError::InvalidCastlingRights(format!(
                "invalid character '{}'",
                c
            )));
        }
    }
    Ok(())
}

fn validate_en_passant(ep: &str) -> Result<(), FenError> {
    if ep == "-" {
        return Ok(());
    }
    let chars: Vec<char> = ep.chars().collect();
    if chars.len() != 2 || !('a'..='h').contains(&chars[0]) || !(chars[1] == '3' || chars[1] == '6')
    {
        return Err(FenError::InvalidEnPassantSquare(ep.to_string()));
    }
    Ok(())
}
