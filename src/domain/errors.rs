use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Spreadsheet index {index} out of range (have {len})")]
    SpreadsheetIndexOutOfRange { index: usize, len: usize },
    #[error("Cell ({row}, {col}) outside a {rows}x{cols} grid")]
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Preview has already been closed")]
    PreviewClosed,
}

pub type DomainResult<T> = Result<T, DomainError>;
