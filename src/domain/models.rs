use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};

/// Title given to the spreadsheet that exists at startup.
pub const DEFAULT_SPREADSHEET_TITLE: &str = "Spreadsheet 1";

/// Title used when a confirmed proposal has no usable title.
pub const UNTITLED_SPREADSHEET_TITLE: &str = "Untitled Spreadsheet";

const MIN_COLUMN_WIDTH: usize = 3;
const MAX_COLUMN_WIDTH: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: String,
}

impl Cell {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

pub type Row = Vec<Cell>;

/// A rectangular block of cells.
///
/// Every row has exactly `col_count()` cells. The only ways to build a grid
/// are the sized constructors, the canonicalizer, and `from_rows`, which
/// rejects ragged input, so the shape invariant holds for any value of this
/// type. Serialized as a plain array of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Row>", into = "Vec<Row>")]
pub struct Grid {
    rows: Vec<Row>,
    cols: usize,
}

impl Grid {
    /// Creates a grid of `rows` x `cols` empty cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![vec![Cell::default(); cols]; rows],
            cols,
        }
    }

    /// Builds a grid from rows that must all have the same length.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::RaggedGrid`] naming the first row whose length
    /// differs from the first row's.
    pub fn from_rows(rows: Vec<Row>) -> DomainResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(DomainError::RaggedGrid {
                row,
                expected: cols,
                found,
            });
        }
        Ok(Self { rows, cols })
    }

    /// Builds a grid from rows of differing lengths by padding every row
    /// with empty cells up to `cols`. Rows longer than `cols` are kept whole
    /// and widen the grid.
    pub(crate) fn padded(mut rows: Vec<Row>, cols: usize) -> Self {
        let cols = rows.iter().map(Vec::len).fold(cols, usize::max);
        for row in &mut rows {
            row.resize(cols, Cell::default());
        }
        Self { rows, cols }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols == 0
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Returns the value at `(row, col)`, or an empty string outside the grid.
    pub fn value(&self, row: usize, col: usize) -> &str {
        self.get(row, col).map_or("", |cell| cell.value.as_str())
    }

    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) -> DomainResult<()> {
        let (rows, cols) = (self.row_count(), self.col_count());
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(DomainError::CellOutOfRange { row, col, rows, cols })?;
        cell.value = value.into();
        Ok(())
    }

    /// Appends a row of empty cells.
    pub fn push_row(&mut self) {
        self.rows.push(vec![Cell::default(); self.cols]);
    }

    /// Appends an empty cell to every row.
    pub fn push_column(&mut self) {
        self.cols += 1;
        for row in &mut self.rows {
            row.push(Cell::default());
        }
    }

    /// Grows the grid with empty cells until it is at least `rows` x `cols`.
    pub fn ensure_size(&mut self, rows: usize, cols: usize) {
        while self.cols < cols {
            self.push_column();
        }
        while self.rows.len() < rows {
            self.push_row();
        }
    }

    /// Width needed to display column `col`, clamped to a readable range.
    pub fn display_width(&self, col: usize) -> usize {
        let header_width = Spreadsheet::column_label(col).len();
        self.rows
            .iter()
            .filter_map(|row| row.get(col))
            .map(|cell| cell.value.chars().count())
            .fold(header_width, usize::max)
            .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
    }
}

impl TryFrom<Vec<Row>> for Grid {
    type Error = DomainError;

    fn try_from(rows: Vec<Row>) -> DomainResult<Self> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Row> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spreadsheet {
    pub title: String,
    pub rows: Grid,
}

impl Default for Spreadsheet {
    fn default() -> Self {
        Self {
            title: DEFAULT_SPREADSHEET_TITLE.to_string(),
            rows: Grid::new(3, 3),
        }
    }
}

impl Spreadsheet {
    pub fn new(title: impl Into<String>, rows: Grid) -> Self {
        Self {
            title: title.into(),
            rows,
        }
    }

    /// Converts a zero-based column index into its letter label (0 -> A, 26 -> AA).
    pub fn column_label(col: usize) -> String {
        let mut result = String::new();
        let mut c = col;
        loop {
            result.insert(0, char::from(b'A' + (c % 26) as u8));
            if c < 26 {
                break;
            }
            c = c / 26 - 1;
        }
        result
    }
}
