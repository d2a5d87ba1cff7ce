//! CSV dataset input and output.
//!
//! Input: any CSV with a `FEN` column (other columns are ignored).
//! Output: one `FEN,prompt,reasoning` row per successful annotation,
//! written once at the end of a run. Prompt and reasoning fields are
//! multi-line, so quoting is left to the csv crate.

use crate::orchestrator::AnnotationRecord;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when reading or writing datasets.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Failed to read or write the dataset file.
    #[error("Dataset I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid CSV.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    /// The input dataset has no FEN column.
    #[error("Input dataset has no FEN column")]
    MissingFenColumn,
}

/// Reads all FEN strings from a CSV file.
///
/// The header row must contain a `FEN` column (matched case-insensitively);
/// additional columns are ignored. Rows with an empty FEN cell are
/// skipped.
pub fn read_fens<P: AsRef<Path>>(path: P) -> Result<Vec<String>, DatasetError> {
    let mut reader = csv::Reader::from_path(path)?;
    let fen_column = reader
        .headers()?
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("fen"))
        .ok_or(DatasetError::MissingFenColumn)?;

    let mut fens = Vec::new();
    for row in reader.records() {
        let row = row?;
        if let Some(fen) = row.get(fen_column) {
            let fen = fen.trim();
            if !fen.is_empty() {
                fens.push(fen.to_string());
            }
        }
    }
    Ok(fens)
}

/// Writes annotation records as a `FEN,prompt,reasoning` CSV file.
pub fn write_records<P: AsRef<Path>>(
    path: P,
    records: &[AnnotationRecord],
) -> Result<(), DatasetError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["FEN", "prompt", "reasoning"])?;
    for record in records {
        writer.write_record([&record.fen, &record.prompt, &record.reasoning])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_fen_column() {
        let file = write_temp(
            "FEN,best_move\n\
             rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1,e2e4\n\
             4k3/8/8/8/8/8/8/4K3 w - - 0 1,e1e2\n",
        );
        let fens = read_fens(file.path()).unwrap();
        assert_eq!(fens.len(), 2);
        assert!(fens[0].starts_with("rnbqkbnr"));
    }

    #[test]
    fn fen_column_is_found_anywhere_in_header() {
        let file = write_temp(
            "id,rating,fen\n\
             1,1500,4k3/8/8/8/8/8/8/4K3 w - - 0 1\n",
        );
        let fens = read_fens(file.path()).unwrap();
        assert_eq!(fens, vec!["4k3/8/8/8/8/8/8/4K3 w - - 0 1"]);
    }

    #[test]
    fn missing_fen_column_is_an_error() {
        let file = write_temp("position,move\nabc,e2e4\n");
        let err = read_fens(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingFenColumn));
    }

    #[test]
    fn empty_fen_cells_are_skipped() {
        let file = write_temp("FEN\n4k3/8/8/8/8/8/8/4K3 w - - 0 1\n\"\"\n");
        let fens = read_fens(file.path()).unwrap();
        assert_eq!(fens.len(), 1);
    }

    #[test]
    fn written_records_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.csv");

        let records = vec![AnnotationRecord {
            fen: "4k3/8/8/8/8/8/8/4K3 w - - 0 1".to_string(),
            prompt: "line one\nline two, with a comma\nand \"quotes\"".to_string(),
            reasoning: "Reasoning: multi\nline answer".to_string(),
        }];
        write_records(&path, &records).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers, csv::StringRecord::from(vec!["FEN", "prompt", "reasoning"]));

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(0).unwrap(), records[0].fen);
        assert_eq!(rows[0].get(1).unwrap(), records[0].prompt);
        assert_eq!(rows[0].get(2).unwrap(), records[0].reasoning);
    }

    #[test]
    fn writes_header_even_for_empty_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_records(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "FEN,prompt,reasoning\n");
    }
}
