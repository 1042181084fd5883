//! Aggregation services for the calculation grid.
//!
//! Totals are never stored: every call walks the current rows, so a result can
//! not go stale after an edit.

use super::models::Grid;

/// Sum of one column across all rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSum {
    pub column_index: usize,
    pub sum: f64,
}

/// Computes totals over a borrowed grid.
///
/// # Examples
///
/// ```
/// use tcalc::domain::{Grid, GridCalculator};
///
/// let mut grid = Grid::new(2).unwrap();
/// grid.set_cell(0, 0, "1.5").unwrap();
/// grid.set_cell(0, 1, "2").unwrap();
///
/// let calculator = GridCalculator::new(&grid);
/// assert_eq!(calculator.column_sum(0), 1.5);
/// assert_eq!(calculator.grand_total(), 3.5);
/// ```
pub struct GridCalculator<'a> {
    grid: &'a Grid,
}

impl<'a> GridCalculator<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Sum of a single column; empty cells count as zero.
    pub fn column_sum(&self, column_index: usize) -> f64 {
        self.grid
            .rows()
            .iter()
            .map(|row| row.value(column_index).unwrap_or(0.0))
            .sum()
    }

    /// One [`ColumnSum`] per configured column, in column order.
    pub fn column_sums(&self) -> Vec<ColumnSum> {
        (0..self.grid.column_count())
            .map(|column_index| ColumnSum {
                column_index,
                sum: self.column_sum(column_index),
            })
            .collect()
    }

    /// Sum of all column sums.
    pub fn grand_total(&self) -> f64 {
        self.column_sums().iter().map(|column| column.sum).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_grid() -> Grid {
        let mut grid = Grid::new(3).unwrap();
        grid.set_cell(0, 0, "10").unwrap();
        grid.set_cell(0, 1, "20").unwrap();
        grid.add_row();
        grid.set_cell(1, 0, "5").unwrap();
        grid.set_cell(1, 1, "-7.5").unwrap();
        grid.add_row();
        grid
    }

    #[test]
    fn test_column_sums() {
        let grid = create_test_grid();
        let calculator = GridCalculator::new(&grid);

        assert_eq!(calculator.column_sum(0), 15.0);
        assert_eq!(calculator.column_sum(1), 12.5);
        assert_eq!(calculator.column_sum(2), 0.0);
        assert_eq!(calculator.column_sums().len(), 3);
    }

    #[test]
    fn test_grand_total() {
        let grid = create_test_grid();
        assert_eq!(GridCalculator::new(&grid).grand_total(), 27.5);
    }

    #[test]
    fn test_column_outside_grid_sums_to_zero() {
        let grid = create_test_grid();
        assert_eq!(GridCalculator::new(&grid).column_sum(9), 0.0);
    }

    #[test]
    fn test_totals_follow_edits() {
        let mut grid = create_test_grid();
        assert_eq!(grid.grand_total(), 27.5);

        grid.set_cell(0, 0, "").unwrap();
        assert_eq!(grid.grand_total(), 17.5);

        grid.remove_row(1).unwrap();
        assert_eq!(grid.grand_total(), 20.0);
        assert_eq!(grid.column_sums()[1].sum, 20.0);
    }

    #[test]
    fn test_empty_grid_totals_are_zero() {
        let grid = Grid::new(4).unwrap();
        let sums = grid.column_sums();
        assert_eq!(sums.len(), 4);
        assert!(sums.iter().all(|column| column.sum == 0.0));
        assert_eq!(grid.grand_total(), 0.0);
    }
}
