use super::errors::{GridError, GridResult};
use super::parser::{normalize_value, parse_cell_input};
use super::services::{ColumnSum, GridCalculator};
use super::snapshot::{Snapshot, SnapshotRow};
use std::fmt;

/// Column count used when nothing else is configured.
pub const DEFAULT_COLUMN_COUNT: usize = 5;

/// Largest supported column count (`A` through `ZZ`).
pub const MAX_COLUMN_COUNT: usize = 702;

/// Stable identity of a row, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

/// Identity of a cell: its owning row plus its column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId {
    pub row: RowId,
    pub column: usize,
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell-{}-{}", self.row.0, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub column_index: usize,
    /// `None` marks an empty cell; a stored number is always finite.
    pub value: Option<f64>,
}

impl Cell {
    fn empty(row: RowId, column_index: usize) -> Self {
        Self {
            id: CellId { row, column: column_index },
            column_index,
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RowId,
    /// Current zero-based position in the grid.
    pub index: usize,
    pub label: String,
    pub cells: Vec<Cell>,
}

impl Row {
    fn new(id: RowId, index: usize, label: String, column_count: usize) -> Self {
        Self {
            id,
            index,
            label,
            cells: (0..column_count).map(|col| Cell::empty(id, col)).collect(),
        }
    }

    /// Label used when exporting: the row's own label, or `Row N` if empty.
    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            format!("Row {}", self.index + 1)
        } else {
            self.label.clone()
        }
    }

    pub fn value(&self, column_index: usize) -> Option<f64> {
        self.cells.get(column_index).and_then(|cell| cell.value)
    }

    /// Sum of the row's cells, empty cells counting as zero.
    pub fn total(&self) -> f64 {
        self.cells.iter().filter_map(|cell| cell.value).sum()
    }

    fn resize(&mut self, column_count: usize) {
        let id = self.id;
        self.cells.truncate(column_count);
        let start = self.cells.len();
        self.cells
            .extend((start..column_count).map(|col| Cell::empty(id, col)));
    }
}

/// In-memory calculation grid: labeled rows of lettered numeric columns.
///
/// A grid always has at least one row and every row always has exactly
/// `column_count` cells. Operations that would break either rule leave the
/// grid untouched and report why through [`GridError`].
///
/// # Examples
///
/// ```
/// use tcalc::domain::Grid;
///
/// let mut grid = Grid::new(2).unwrap();
/// grid.set_cell(0, 0, "1").unwrap();
/// grid.add_row();
/// grid.set_cell(1, 0, "3").unwrap();
/// grid.set_cell(0, 1, "2").unwrap();
///
/// assert_eq!(grid.grand_total(), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    column_count: usize,
    rows: Vec<Row>,
    next_row_id: u64,
}

impl Default for Grid {
    fn default() -> Self {
        let mut grid = Self {
            column_count: DEFAULT_COLUMN_COUNT,
            rows: Vec::new(),
            next_row_id: 0,
        };
        grid.add_row();
        grid
    }
}

impl Grid {
    /// Creates a grid with `column_count` columns, seeded with one empty row.
    pub fn new(column_count: usize) -> GridResult<Self> {
        if column_count == 0 {
            return Err(GridError::InvalidColumnCount);
        }

        let mut grid = Self {
            column_count,
            rows: Vec::new(),
            next_row_id: 0,
        };
        grid.add_row();
        Ok(grid)
    }

    /// Column letters (`A`..`Z`, `AA`, ...) for a zero-based column index.
    ///
    /// `0 -> A`, `25 -> Z`, `26 -> AA`, `701 -> ZZ`, `702 -> AAA`.
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

    /// Inverse of [`Grid::column_label`] for the supported range `A..=ZZ`.
    ///
    /// Only uppercase letters are accepted, so ordinary words such as `Jan`
    /// or `Total` are not mistaken for column letters.
    pub fn column_index(label: &str) -> Option<usize> {
        if label.is_empty() || label.len() > 2 {
            return None;
        }

        let mut result = 0;
        for ch in label.chars() {
            if !ch.is_ascii_uppercase() {
                return None;
            }
            result = result * 26 + (ch as usize - 'A' as usize + 1);
        }
        Some(result - 1)
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, row_index: usize) -> Option<&Row> {
        self.rows.get(row_index)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column header letters for every configured column.
    pub fn column_headers(&self) -> Vec<String> {
        (0..self.column_count).map(Self::column_label).collect()
    }

    /// Sets the number of numeric columns.
    ///
    /// Existing rows are truncated or padded with empty cells so every row
    /// keeps exactly `column_count` cells.
    pub fn configure(&mut self, column_count: usize) -> GridResult<()> {
        if column_count == 0 {
            return Err(GridError::InvalidColumnCount);
        }

        self.column_count = column_count;
        for row in &mut self.rows {
            row.resize(column_count);
        }
        Ok(())
    }

    /// Appends an empty row and returns its identity.
    pub fn add_row(&mut self) -> RowId {
        self.push_row(String::new())
    }

    /// Removes the row at `row_index` and renumbers the rows after it.
    ///
    /// The last remaining row can never be removed.
    pub fn remove_row(&mut self, row_index: usize) -> GridResult<RowId> {
        self.check_row(row_index)?;
        if self.rows.len() <= 1 {
            return Err(GridError::LastRow);
        }

        let removed = self.rows.remove(row_index);
        for (index, row) in self.rows.iter_mut().enumerate().skip(row_index) {
            row.index = index;
        }
        Ok(removed.id)
    }

    pub fn set_label(&mut self, row_index: usize, text: &str) -> GridResult<()> {
        self.check_row(row_index)?;
        self.rows[row_index].label = text.to_string();
        Ok(())
    }

    /// Stores `raw_text` in a cell. Text that is not a finite number leaves
    /// the cell empty.
    pub fn set_cell(&mut self, row_index: usize, column_index: usize, raw_text: &str) -> GridResult<()> {
        self.check_row(row_index)?;
        self.check_column(column_index)?;
        self.rows[row_index].cells[column_index].value = parse_cell_input(raw_text);
        Ok(())
    }

    /// Value of a cell, `None` when the cell is empty or does not exist.
    pub fn value(&self, row_index: usize, column_index: usize) -> Option<f64> {
        self.rows.get(row_index).and_then(|row| row.value(column_index))
    }

    pub fn column_sums(&self) -> Vec<ColumnSum> {
        GridCalculator::new(self).column_sums()
    }

    pub fn grand_total(&self) -> f64 {
        GridCalculator::new(self).grand_total()
    }

    /// Exports every row, in order, keyed by its display label.
    ///
    /// Rows whose key is already taken get a ` (n)` suffix so that no row is
    /// dropped from the export.
    pub fn export(&self) -> Snapshot {
        let headers = self.column_headers();
        let mut snapshot = Snapshot::new();

        for row in &self.rows {
            let values: SnapshotRow = headers
                .iter()
                .zip(&row.cells)
                .map(|(letter, cell)| (letter.clone(), cell.value))
                .collect();
            snapshot.insert_unique(row.display_label(), values);
        }

        snapshot
    }

    /// Replaces all rows with the snapshot's rows, in snapshot order.
    ///
    /// Columns missing from a snapshot row are left empty; letters beyond
    /// the configured column count are ignored. Row identities restart at 0.
    /// An empty snapshot leaves a single empty row.
    pub fn import(&mut self, snapshot: &Snapshot) {
        self.rows.clear();
        self.next_row_id = 0;

        let headers = self.column_headers();
        for (label, values) in snapshot.iter() {
            self.push_row(label.to_string());
            if let Some(row) = self.rows.last_mut() {
                for (cell, letter) in row.cells.iter_mut().zip(&headers) {
                    cell.value = normalize_value(values.get(letter));
                }
            }
        }

        if self.rows.is_empty() {
            self.add_row();
        }
    }

    fn push_row(&mut self, label: String) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        self.rows
            .push(Row::new(id, self.rows.len(), label, self.column_count));
        id
    }

    fn check_row(&self, row_index: usize) -> GridResult<()> {
        if row_index < self.rows.len() {
            Ok(())
        } else {
            Err(GridError::RowOutOfRange {
                index: row_index,
                len: self.rows.len(),
            })
        }
    }

    fn check_column(&self, column_index: usize) -> GridResult<()> {
        if column_index < self.column_count {
            Ok(())
        } else {
            Err(GridError::ColumnOutOfRange {
                index: column_index,
                len: self.column_count,
            })
        }
    }
}
