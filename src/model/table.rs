//! Table grid types.

use serde::{Deserialize, Serialize};

/// A table cell grid as produced by table extraction.
///
/// Cells are nullable: merged or empty regions come through as `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableGrid {
    rows: Vec<Vec<Option<String>>>,
}

impl TableGrid {
    /// Create a grid from rows of nullable cells.
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    /// Create a grid where every cell is present.
    pub fn from_strings<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(|cell| Some(cell.into())).collect())
                .collect(),
        )
    }

    /// Get all rows.
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check that every row has the same number of cells.
    pub fn is_rectangular(&self) -> bool {
        let columns = self.column_count();
        self.rows.iter().all(|r| r.len() == columns)
    }

    /// Get the header row.
    pub fn header(&self) -> Option<&[Option<String>]> {
        self.rows.first().map(|r| r.as_slice())
    }

    /// Get body rows (everything after the header).
    pub fn body(&self) -> &[Vec<Option<String>>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Text of the first row: present cells joined by spaces, trimmed.
    pub fn first_row_text(&self) -> String {
        self.rows.first().map(|r| row_text(r)).unwrap_or_default()
    }

    /// Text of the last row: present cells joined by spaces, trimmed.
    pub fn last_row_text(&self) -> String {
        self.rows.last().map(|r| row_text(r)).unwrap_or_default()
    }

    /// Mutable access to every present cell.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.rows
            .iter_mut()
            .flat_map(|r| r.iter_mut())
            .filter_map(|c| c.as_mut())
    }
}

fn row_text(row: &[Option<String>]) -> String {
    row.iter()
        .filter_map(|c| c.as_deref())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_new() {
        let grid = TableGrid::default();
        assert!(grid.is_empty());
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.column_count(), 0);
        assert!(grid.header().is_none());
        assert!(grid.body().is_empty());
    }

    #[test]
    fn test_grid_with_data() {
        let grid = TableGrid::from_strings([["Name", "Age"], ["Alice", "30"], ["Bob", "25"]]);

        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.body().len(), 2);
        assert!(grid.is_rectangular());
    }

    #[test]
    fn test_ragged_grid() {
        let grid = TableGrid::new(vec![
            vec![Some("a".into()), Some("b".into())],
            vec![Some("c".into())],
        ]);
        assert!(!grid.is_rectangular());
    }

    #[test]
    fn test_row_text_skips_nulls() {
        let grid = TableGrid::new(vec![
            vec![Some(" x".into()), None, Some("y ".into())],
            vec![None, Some("z".into()), None],
        ]);
        assert_eq!(grid.first_row_text(), "x y");
        assert_eq!(grid.last_row_text(), "z");
    }

    #[test]
    fn test_serde_transparent() {
        let json = r#"[["a", null], ["b", "c"]]"#;
        let grid: TableGrid = serde_json::from_str(json).unwrap();
        assert_eq!(grid.rows()[0][1], None);
        assert_eq!(grid.rows()[1][1].as_deref(), Some("c"));
    }
}
