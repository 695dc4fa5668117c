//! Raw Grid Module
//! Positional string-cell view of the survey export, before normalization.

use polars::prelude::*;

/// An ordered grid of optional string cells.
///
/// Rows and columns mirror the source file exactly; `None` marks an empty
/// or absent cell. The loader reads header rows and data rows from this
/// view by position only.
#[derive(Debug, Clone)]
pub struct RawGrid {
    columns: Vec<Vec<Option<String>>>,
    height: usize,
}

impl RawGrid {
    /// Build a grid from a headerless DataFrame, one cell per value.
    ///
    /// Every column is cast to String first so the grid is uniform even if
    /// schema inference typed some column numerically.
    pub fn from_dataframe(df: &DataFrame) -> PolarsResult<Self> {
        let height = df.height();
        let mut columns = Vec::with_capacity(df.width());

        for col in df.get_columns() {
            let text = col.cast(&DataType::String)?;
            let ca = text.str()?;
            let cells: Vec<Option<String>> =
                ca.into_iter().map(|v| v.map(str::to_string)).collect();
            columns.push(cells);
        }

        Ok(Self { columns, height })
    }

    /// Build a grid from in-memory rows; an empty string marks a missing
    /// cell. Short rows are padded with missing cells on the right.
    pub fn from_rows(rows: &[Vec<&str>]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut columns = vec![vec![None; height]; width];
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    columns[c][r] = Some((*cell).to_string());
                }
            }
        }

        Self { columns, height }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell content at (row, column); `None` for missing cells and
    /// out-of-range positions.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.columns
            .get(col)
            .and_then(|c| c.get(row))
            .and_then(|v| v.as_deref())
    }
}
