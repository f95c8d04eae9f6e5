//! Tabular data read from table and chart assets.

use serde::{Deserialize, Serialize};

/// A header row plus data rows, all stringified.
///
/// Every data row has exactly as many cells as there are headers. The width
/// is that of the widest row; header cells that are missing or blank are
/// named `Unnamed: <column>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularData {
    /// Column headers in original order
    pub headers: Vec<String>,
    /// Data rows in original order
    pub rows: Vec<Vec<String>>,
}

impl TabularData {
    /// Create tabular data, widening the header and every row to the widest row.
    pub fn new(mut headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).fold(headers.len(), usize::max);
        headers.resize(width, String::new());
        for (index, header) in headers.iter_mut().enumerate() {
            if header.trim().is_empty() {
                *header = format!("Unnamed: {}", index);
            }
        }
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The full grid: headers as row 0, followed by the data rows.
    pub fn grid(&self) -> Vec<Vec<String>> {
        std::iter::once(self.headers.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }

    /// Values of one column, header excluded.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rows_normalized_to_widest_row() {
        let data = TabularData::new(
            strings(&["a", "b", "c"]),
            vec![strings(&["1"]), strings(&["1", "2", "3", "4"])],
        );

        assert_eq!(data.column_count(), 4);
        assert_eq!(data.headers, strings(&["a", "b", "c", "Unnamed: 3"]));
        assert_eq!(data.rows[0], strings(&["1", "", "", ""]));
        assert_eq!(data.rows[1], strings(&["1", "2", "3", "4"]));
    }

    #[test]
    fn test_blank_headers_are_named() {
        let data = TabularData::new(strings(&["", "score"]), vec![strings(&["ann", "3"])]);
        assert_eq!(data.headers, strings(&["Unnamed: 0", "score"]));
        assert_eq!(data.column_count(), 2);
    }

    #[test]
    fn test_grid() {
        let data = TabularData::new(
            strings(&["name", "score"]),
            vec![strings(&["ann", "3"]), strings(&["bob", "5"])],
        );

        let grid = data.grid();
        assert_eq!(grid.len(), data.row_count() + 1);
        assert_eq!(grid[0], strings(&["name", "score"]));
        assert_eq!(grid[2], strings(&["bob", "5"]));
        assert_eq!(data.column(1).collect::<Vec<_>>(), vec!["3", "5"]);
    }
}
