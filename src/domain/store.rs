use super::errors::{DomainError, DomainResult};
use super::models::{Grid, Spreadsheet};

/// In-memory list of spreadsheets with a selected entry.
///
/// The store is never empty, and `selected_index()` always points at an
/// existing spreadsheet.
///
/// # Examples
///
/// ```
/// use chatsheet::domain::{Grid, SpreadsheetStore};
///
/// let mut store = SpreadsheetStore::default();
/// let index = store.create_spreadsheet("Budget", Grid::new(2, 2));
/// assert_eq!(index, 1);
/// assert_eq!(store.selected_index(), 1);
/// assert_eq!(store.selected().title, "Budget");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetStore {
    spreadsheets: Vec<Spreadsheet>,
    selected: usize,
}

impl Default for SpreadsheetStore {
    fn default() -> Self {
        Self {
            spreadsheets: vec![Spreadsheet::default()],
            selected: 0,
        }
    }
}

impl SpreadsheetStore {
    pub fn len(&self) -> usize {
        self.spreadsheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spreadsheets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spreadsheet> {
        self.spreadsheets.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Spreadsheet> {
        self.spreadsheets.get(index)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &Spreadsheet {
        &self.spreadsheets[self.selected]
    }

    /// Appends a new spreadsheet, selects it, and returns its index.
    pub fn create_spreadsheet(&mut self, title: impl Into<String>, rows: Grid) -> usize {
        self.spreadsheets.push(Spreadsheet::new(title, rows));
        self.selected = self.spreadsheets.len() - 1;
        self.selected
    }

    /// Replaces the spreadsheet at `index`. The selection does not move.
    pub fn update_spreadsheet(&mut self, index: usize, spreadsheet: Spreadsheet) -> DomainResult<()> {
        let len = self.spreadsheets.len();
        let slot = self
            .spreadsheets
            .get_mut(index)
            .ok_or(DomainError::SpreadsheetIndexOutOfRange { index, len })?;
        *slot = spreadsheet;
        Ok(())
    }

    pub fn select(&mut self, index: usize) -> DomainResult<()> {
        if index >= self.spreadsheets.len() {
            return Err(DomainError::SpreadsheetIndexOutOfRange {
                index,
                len: self.spreadsheets.len(),
            });
        }
        self.selected = index;
        Ok(())
    }

    /// Selects the next spreadsheet, wrapping around.
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.spreadsheets.len();
    }

    /// Selects the previous spreadsheet, wrapping around.
    pub fn select_previous(&mut self) {
        let len = self.spreadsheets.len();
        self.selected = (self.selected + len - 1) % len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_starts_with_default_sheet() {
        let store = SpreadsheetStore::default();
        assert_eq!(store.len(), 1);
        assert_eq!(store.selected_index(), 0);
        assert_eq!(store.selected(), &Spreadsheet::default());
    }

    #[test]
    fn test_create_appends_and_selects() {
        let mut store = SpreadsheetStore::default();
        store.create_spreadsheet("One", Grid::new(1, 1));
        store.create_spreadsheet("Two", Grid::new(1, 1));
        assert_eq!(store.len(), 3);
        assert_eq!(store.selected_index(), 2);
        assert_eq!(store.selected().title, "Two");
    }

    #[test]
    fn test_update_replaces_only_target() {
        let mut store = SpreadsheetStore::default();
        store.create_spreadsheet("One", Grid::new(1, 1));
        store.create_spreadsheet("Two", Grid::new(1, 1));
        store.select(1).unwrap();
        let before: Vec<Spreadsheet> = store.iter().cloned().collect();

        let mut grid = Grid::new(1, 1);
        grid.set(0, 0, "changed").unwrap();
        store.update_spreadsheet(1, Spreadsheet::new("One", grid.clone())).unwrap();

        assert_eq!(store.selected_index(), 1);
        assert_eq!(store.get(0), Some(&before[0]));
        assert_eq!(store.get(2), Some(&before[2]));
        assert_eq!(store.get(1).map(|s| &s.rows), Some(&grid));
    }

    #[test]
    fn test_update_out_of_range() {
        let mut store = SpreadsheetStore::default();
        assert_eq!(
            store.update_spreadsheet(4, Spreadsheet::default()),
            Err(DomainError::SpreadsheetIndexOutOfRange { index: 4, len: 1 })
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_selection_wraps() {
        let mut store = SpreadsheetStore::default();
        store.create_spreadsheet("One", Grid::new(1, 1));
        store.select_next();
        assert_eq!(store.selected_index(), 0);
        store.select_previous();
        assert_eq!(store.selected_index(), 1);
        assert!(store.select(2).is_err());
        assert_eq!(store.selected_index(), 1);
    }
}
