//! ASCII board rendering from FEN piece placement.

use crate::fen::FenError;

/// Marker for an empty square in the rendered diagram.
const EMPTY_SQUARE: char = '.';

/// Renders the piece placement of a FEN string as a bordered ASCII grid.
///
/// Accepts either a full FEN string or a bare piece-placement field; only
/// the first whitespace-separated token is consumed. Ranks are printed in
/// FEN order (rank 8 first), each digit expanded to that many empty-square
/// markers.
///
/// # Errors
///
/// Returns [`FenError::InvalidPiecePlacement`] if the placement does not
/// expand to exactly 8 ranks of 8 squares.
pub fn render_board(fen: &str) -> Result<String, FenError> {
    let placement = fen
        .split_whitespace()
        .next()
        .ok_or_else(|| FenError::InvalidPiecePlacement("empty input".to_string()))?;

    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let border = "+---".repeat(8) + "+";
    let mut out = String::new();

    for (i, rank) in ranks.iter().enumerate() {
        let mut squares: Vec<char> = Vec::with_capacity(8);
        for c in rank.chars() {
            if let Some(d) = c.to_digit(10) {
                for _ in 0..d {
                    squares.push(EMPTY_SQUARE);
                }
            } else {
                squares.push(c);
            }
        }
        if squares.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} expands to {} squares, expected 8",
                8 - i,
                squares.len()
            )));
        }

        out.push_str(&border);
        out.push_str("\n| ");
        for (j, square) in squares.iter().enumerate() {
            if j > 0 {
                out.push_str(" | ");
            }
            out.push(*square);
        }
        out.push_str(" |\n");
    }
    out.push_str(&border);

    Ok(out)
}
