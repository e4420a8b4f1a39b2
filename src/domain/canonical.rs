//! Canonicalization of assistant-generated tabular data.
//!
//! Action arguments arrive as loosely typed JSON. This module validates them
//! into typed values first and then builds a strict rectangular [`Grid`]
//! from them. Nothing in here fails: malformed pieces turn into empty rows
//! or empty cells.

use serde_json::Value;

use super::models::{Cell, Grid, Row};

/// A row as supplied by the assistant, after validation.
///
/// Each entry is the cell's value if it was a JSON string, `None` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<Option<String>>,
}

impl RawRow {
    /// Reads one row-like JSON value.
    ///
    /// Anything other than an object with a `cells` array yields a row with
    /// no cells. A cell contributes `Some(value)` only when it is an object
    /// whose `value` field is a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use chatsheet::domain::RawRow;
    /// use serde_json::json;
    ///
    /// let row = RawRow::from_value(&json!({"cells": [{"value": "A"}, {"value": 3}, {}]}));
    /// assert_eq!(row.cells, vec![Some("A".to_string()), None, None]);
    /// assert!(RawRow::from_value(&json!("not a row")).cells.is_empty());
    /// ```
    pub fn from_value(value: &Value) -> Self {
        let cells = value
            .get("cells")
            .and_then(Value::as_array)
            .map(|cells| cells.iter().map(cell_value).collect())
            .unwrap_or_default();
        Self { cells }
    }
}

fn cell_value(cell: &Value) -> Option<String> {
    cell.get("value").and_then(Value::as_str).map(str::to_owned)
}

/// Validated arguments of the `createSpreadsheet` action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateSpreadsheetArgs {
    pub rows: Vec<RawRow>,
    pub title: Option<String>,
}

impl CreateSpreadsheetArgs {
    /// Reads the `{ rows, title }` argument object.
    ///
    /// A `rows` field that is missing or not an array gives no rows; a
    /// `title` that is missing or not a string gives `None`.
    pub fn from_value(args: &Value) -> Self {
        let rows = args
            .get("rows")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().map(RawRow::from_value).collect())
            .unwrap_or_default();
        let title = args.get("title").and_then(Value::as_str).map(str::to_owned);
        Self { rows, title }
    }
}

/// Normalizes validated rows into a rectangular grid.
///
/// The grid is as wide as the longest input row; shorter rows are padded
/// with empty cells and missing values become empty strings.
///
/// # Examples
///
/// ```
/// use chatsheet::domain::{canonicalize, RawRow};
///
/// let rows = vec![
///     RawRow { cells: vec![Some("A".into())] },
///     RawRow { cells: vec![Some("B".into()), Some("C".into())] },
/// ];
/// let grid = canonicalize(&rows);
/// assert_eq!(grid.col_count(), 2);
/// assert_eq!(grid.value(0, 1), "");
/// assert_eq!(grid.value(1, 1), "C");
/// ```
pub fn canonicalize(rows: &[RawRow]) -> Grid {
    let width = rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    let rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|value| Cell::new(value.clone().unwrap_or_default()))
                .collect()
        })
        .collect();
    Grid::padded(rows, width)
}

/// Validates and canonicalizes a JSON array of row-likes in one step.
/// Non-array input gives an empty grid.
pub fn canonicalize_value(rows: &Value) -> Grid {
    let rows: Vec<RawRow> = rows
        .as_array()
        .map(|rows| rows.iter().map(RawRow::from_value).collect())
        .unwrap_or_default();
    canonicalize(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn values(grid: &Grid) -> Vec<Vec<&str>> {
        grid.rows()
            .iter()
            .map(|row| row.iter().map(|c| c.value.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let grid = canonicalize_value(&json!([
            {"cells": [{"value": "A"}]},
            {"cells": [{"value": "B"}, {"value": "C"}]}
        ]));
        assert_eq!(values(&grid), vec![vec!["A", ""], vec!["B", "C"]]);
    }

    #[test]
    fn test_non_string_values_become_empty() {
        let grid = canonicalize_value(&json!([
            {"cells": [{"value": 12}, {"value": null}, {}, "raw", {"value": true}, {"value": "ok"}]}
        ]));
        assert_eq!(values(&grid), vec![vec!["", "", "", "", "", "ok"]]);
    }

    #[test]
    fn test_malformed_rows_become_empty_rows() {
        let grid = canonicalize_value(&json!([
            null,
            {"cells": "nope"},
            {"other": []},
            {"cells": [{"value": "x"}, {"value": "y"}]}
        ]));
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.col_count(), 2);
        assert_eq!(values(&grid)[0], vec!["", ""]);
        assert_eq!(values(&grid)[3], vec!["x", "y"]);
    }

    #[test]
    fn test_no_rows_gives_empty_grid() {
        assert!(canonicalize(&[]).is_empty());
        assert_eq!(canonicalize_value(&json!({"rows": 1})).row_count(), 0);
        assert_eq!(canonicalize_value(&Value::Null), Grid::default());
    }

    #[test]
    fn test_create_spreadsheet_args() {
        let args = CreateSpreadsheetArgs::from_value(&json!({
            "title": "Groceries",
            "rows": [{"cells": [{"value": "Milk"}]}]
        }));
        assert_eq!(args.title.as_deref(), Some("Groceries"));
        assert_eq!(args.rows, vec![RawRow { cells: vec![Some("Milk".into())] }]);

        let args = CreateSpreadsheetArgs::from_value(&json!({"title": 5, "rows": {}}));
        assert_eq!(args, CreateSpreadsheetArgs::default());
    }

    fn arb_cell() -> impl Strategy<Value = Value> {
        prop_oneof![
            ".*".prop_map(|s| json!({"value": s})),
            any::<i64>().prop_map(|n| json!({"value": n})),
            Just(json!({"value": null})),
            Just(json!({})),
            Just(json!("bare")),
        ]
    }

    fn arb_rows() -> impl Strategy<Value = Vec<Vec<Value>>> {
        prop::collection::vec(prop::collection::vec(arb_cell(), 0..8), 0..8)
    }

    proptest! {
        #[test]
        fn prop_rows_have_max_input_width(rows in arb_rows()) {
            let input: Vec<Value> = rows.iter().map(|cells| json!({"cells": cells})).collect();
            let grid = canonicalize_value(&Value::Array(input));
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            prop_assert_eq!(grid.row_count(), rows.len());
            prop_assert_eq!(grid.col_count(), width);
            prop_assert!(grid.rows().iter().all(|r| r.len() == width));
        }

        #[test]
        fn prop_only_string_values_survive(rows in arb_rows()) {
            let input: Vec<Value> = rows.iter().map(|cells| json!({"cells": cells})).collect();
            let grid = canonicalize_value(&Value::Array(input));
            for (r, cells) in rows.iter().enumerate() {
                for (c, cell) in cells.iter().enumerate() {
                    let expected = cell.get("value").and_then(Value::as_str).unwrap_or("");
                    prop_assert_eq!(grid.value(r, c), expected);
                }
            }
        }
    }
}
