//! Grid store: the single owner of a grid and the entry point for edits.
//!
//! Every successful edit bumps the store's revision and pushes the full
//! exported snapshot to all subscribed listeners. Rejected edits leave the
//! grid untouched and notify nobody.

use crate::domain::{ColumnSum, Grid, GridResult, Row, RowId, Snapshot};
use std::fmt;

/// Callback receiving the full grid snapshot after each successful edit.
pub type ChangeListener = Box<dyn FnMut(&Snapshot)>;

pub struct GridStore {
    grid: Grid,
    listeners: Vec<ChangeListener>,
    revision: u64,
}

impl fmt::Debug for GridStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridStore")
            .field("grid", &self.grid)
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl Default for GridStore {
    fn default() -> Self {
        Self::from_grid(Grid::default())
    }
}

impl GridStore {
    /// Creates a store around a fresh grid with `column_count` columns.
    pub fn new(column_count: usize) -> GridResult<Self> {
        Ok(Self::from_grid(Grid::new(column_count)?))
    }

    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            listeners: Vec::new(),
            revision: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rows(&self) -> &[Row] {
        self.grid.rows()
    }

    pub fn column_headers(&self) -> Vec<String> {
        self.grid.column_headers()
    }

    pub fn column_sums(&self) -> Vec<ColumnSum> {
        self.grid.column_sums()
    }

    pub fn grand_total(&self) -> f64 {
        self.grid.grand_total()
    }

    /// Number of successful content changes since the store was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a listener for change notifications.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Snapshot) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Current content as a snapshot.
    pub fn data(&self) -> Snapshot {
        self.grid.export()
    }

    /// Replaces the content with `snapshot`. `None` leaves the grid as is.
    ///
    /// Loading data is not an edit, so listeners are not notified.
    pub fn set_data(&mut self, snapshot: Option<&Snapshot>) {
        let Some(snapshot) = snapshot else {
            tracing::debug!("ignoring absent snapshot");
            return;
        };

        self.grid.import(snapshot);
        self.revision += 1;
        tracing::info!(
            rows = self.grid.row_count(),
            columns = self.grid.column_count(),
            "imported snapshot"
        );
    }

    pub fn configure(&mut self, column_count: usize) -> GridResult<()> {
        let result = self.grid.configure(column_count);
        self.finish("configure", result)
    }

    pub fn add_row(&mut self) -> RowId {
        let id = self.grid.add_row();
        tracing::debug!(row = %id, rows = self.grid.row_count(), "added row");
        self.changed();
        id
    }

    pub fn remove_row(&mut self, row_index: usize) -> GridResult<RowId> {
        let result = self.grid.remove_row(row_index);
        self.finish("remove_row", result)
    }

    pub fn set_label(&mut self, row_index: usize, text: &str) -> GridResult<()> {
        let result = self.grid.set_label(row_index, text);
        self.finish("set_label", result)
    }

    pub fn set_cell(&mut self, row_index: usize, column_index: usize, raw_text: &str) -> GridResult<()> {
        let result = self.grid.set_cell(row_index, column_index, raw_text);
        if result.is_ok() {
            tracing::debug!(
                row = row_index,
                column = %Grid::column_label(column_index),
                value = ?self.grid.value(row_index, column_index),
                "set cell"
            );
        }
        self.finish("set_cell", result)
    }

    fn finish<T>(&mut self, operation: &'static str, result: GridResult<T>) -> GridResult<T> {
        match &result {
            Ok(_) => {
                tracing::debug!(operation, rows = self.grid.row_count(), "applied edit");
                self.changed();
            }
            Err(err) => {
                tracing::debug!(operation, error = %err, "edit rejected");
            }
        }
        result
    }

    fn changed(&mut self) {
        self.revision += 1;
        if self.listeners.is_empty() {
            return;
        }

        let snapshot = self.grid.export();
        for listener in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GridError;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_store(columns: usize) -> (GridStore, Rc<RefCell<Vec<Snapshot>>>) {
        let mut store = GridStore::new(columns).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.clone()));
        (store, seen)
    }

    #[test]
    fn test_default_store() {
        let store = GridStore::default();
        assert_eq!(store.rows().len(), 1);
        assert_eq!(store.column_headers(), vec!["A", "B", "C", "D", "E"]);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_every_edit_notifies_with_full_snapshot() {
        let (mut store, seen) = recording_store(2);

        store.add_row();
        store.set_label(0, "Revenue").unwrap();
        store.set_cell(0, 1, "42").unwrap();
        store.remove_row(1).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0].len(), 2);
        assert!(seen[1].contains_label("Revenue"));
        assert_eq!(seen[2].get("Revenue").unwrap().get("B"), Some(42.0));
        assert_eq!(seen[3], store.data());
        assert_eq!(store.revision(), 4);
    }

    #[test]
    fn test_rejected_edits_do_not_notify() {
        let (mut store, seen) = recording_store(2);

        assert_eq!(store.remove_row(0), Err(GridError::LastRow));
        assert!(store.set_label(3, "x").is_err());
        assert!(store.set_cell(0, 7, "1").is_err());
        assert!(store.configure(0).is_err());

        assert!(seen.borrow().is_empty());
        assert_eq!(store.revision(), 0);
        assert_eq!(store.rows()[0].id, RowId(0));
    }

    #[test]
    fn test_invalid_cell_text_still_counts_as_edit() {
        let (mut store, seen) = recording_store(1);
        store.set_cell(0, 0, "5").unwrap();
        store.set_cell(0, 0, "abc").unwrap();

        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(store.grid().value(0, 0), None);
    }

    #[test]
    fn test_set_data_replaces_without_notifying() {
        let (mut store, seen) = recording_store(3);
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"Revenue":{"A":1000,"B":2000,"C":3000}}"#).unwrap();

        store.set_data(Some(&snapshot));
        assert!(seen.borrow().is_empty());
        assert_eq!(store.revision(), 1);
        assert_eq!(store.grand_total(), 6000.0);
        assert_eq!(store.data(), snapshot);
    }

    #[test]
    fn test_set_data_none_is_noop() {
        let mut store = GridStore::new(2).unwrap();
        store.set_label(0, "Keep").unwrap();
        let before = store.data();

        store.set_data(None);
        assert_eq!(store.data(), before);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_multiple_listeners() {
        let mut store = GridStore::new(1).unwrap();
        let count = Rc::new(RefCell::new(0));
        for _ in 0..3 {
            let count = Rc::clone(&count);
            store.subscribe(move |_| *count.borrow_mut() += 1);
        }

        store.add_row();
        assert_eq!(*count.borrow(), 3);
    }

    #[test]
    fn test_column_sums_through_store() {
        let mut store = GridStore::new(2).unwrap();
        store.set_cell(0, 0, "1").unwrap();
        store.set_cell(0, 1, "2").unwrap();
        store.add_row();
        store.set_cell(1, 0, "3").unwrap();
        store.set_cell(1, 1, "").unwrap();

        let sums: Vec<f64> = store.column_sums().iter().map(|c| c.sum).collect();
        assert_eq!(sums, vec![4.0, 2.0]);
        assert_eq!(store.grand_total(), 6.0);
    }
}
