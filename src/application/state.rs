//! Application state management for the terminal calculation sheet.
//!
//! This module contains the main application state and mode management
//! for the terminal user interface. All grid edits go through the
//! [`GridStore`]; this layer only tracks what the user is looking at and
//! typing.

use crate::application::store::GridStore;
use crate::domain::{format_cell_value, Grid, GridResult, Snapshot};
use std::fmt::Display;

pub const DEFAULT_SHEET_FILENAME: &str = "sheet.json";
pub const DEFAULT_CSV_EXPORT_FILENAME: &str = "sheet.csv";
pub const DEFAULT_CSV_IMPORT_FILENAME: &str = "data.csv";

/// Represents the current mode of the application.
///
/// The mode determines how key presses are interpreted and which
/// UI elements are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Navigation between rows and columns
    Normal,
    /// Typing into the selected label or cell
    Editing,
    /// Help screen is displayed
    Help,
    /// Save dialog is open
    SaveAs,
    /// Load dialog is open
    LoadFile,
    /// CSV export dialog is open
    ExportCsv,
    /// CSV import dialog is open
    ImportCsv,
}

/// Main application state: the grid store plus everything the UI needs.
///
/// Column 0 of the selection is the label column; columns `1..=column_count`
/// are the numeric columns `A`, `B`, ...
///
/// # Examples
///
/// ```
/// use tcalc::application::App;
///
/// let app = App::default();
/// assert_eq!(app.selected_row, 0);
/// assert_eq!(app.selected_col, 0);
/// assert_eq!(app.store.rows().len(), 1);
/// ```
#[derive(Debug)]
pub struct App {
    /// Owner of the grid data
    pub store: GridStore,
    /// Currently selected row (zero-based)
    pub selected_row: usize,
    /// Currently selected column; 0 is the label column
    pub selected_col: usize,
    /// Top row visible in the viewport
    pub scroll_row: usize,
    /// Current application mode
    pub mode: AppMode,
    /// Input buffer for editing mode
    pub input: String,
    /// Cursor position, in characters, within the active input buffer
    pub cursor_position: usize,
    /// Current filename (if data has been saved or loaded)
    pub filename: Option<String>,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Input buffer for filename entry
    pub filename_input: String,
    /// Store revision at the last save or load
    pub saved_revision: u64,
    /// Number of grid rows that fit on screen
    pub viewport_rows: usize,
}

impl Default for App {
    fn default() -> Self {
        Self::with_store(GridStore::default())
    }
}

impl App {
    /// Creates an application around a fresh grid with `column_count` columns.
    pub fn new(column_count: usize) -> GridResult<Self> {
        Ok(Self::with_store(GridStore::new(column_count)?))
    }

    pub fn with_store(store: GridStore) -> Self {
        let saved_revision = store.revision();
        Self {
            store,
            selected_row: 0,
            selected_col: 0,
            scroll_row: 0,
            mode: AppMode::Normal,
            input: String::new(),
            cursor_position: 0,
            filename: None,
            help_scroll: 0,
            status_message: None,
            filename_input: String::new(),
            saved_revision,
            viewport_rows: 20,
        }
    }

    /// Whether the grid changed since the last save or load.
    pub fn is_modified(&self) -> bool {
        self.store.revision() != self.saved_revision
    }

    /// Whether the label column is selected.
    pub fn is_label_selected(&self) -> bool {
        self.selected_col == 0
    }

    /// Grid column index of the selection, `None` on the label column.
    pub fn selected_grid_column(&self) -> Option<usize> {
        self.selected_col.checked_sub(1)
    }

    /// Human-readable reference of the selection, e.g. `B3` or `Label 3`.
    pub fn selection_reference(&self) -> String {
        match self.selected_grid_column() {
            Some(col) => format!("{}{}", Grid::column_label(col), self.selected_row + 1),
            None => format!("Label {}", self.selected_row + 1),
        }
    }

    /// Text currently stored in the selected label or cell.
    pub fn selected_text(&self) -> String {
        let Some(row) = self.store.grid().row(self.selected_row) else {
            return String::new();
        };
        match self.selected_grid_column() {
            Some(col) => format_cell_value(row.value(col)),
            None => row.label.clone(),
        }
    }

    pub fn move_up(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
            self.ensure_cursor_visible();
        }
    }

    pub fn move_down(&mut self) {
        if self.selected_row + 1 < self.store.rows().len() {
            self.selected_row += 1;
            self.ensure_cursor_visible();
        }
    }

    pub fn move_left(&mut self) {
        self.selected_col = self.selected_col.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.selected_col < self.store.grid().column_count() {
            self.selected_col += 1;
        }
    }

    /// Switches to editing mode for the selected label or cell.
    ///
    /// Loads the current text into the input buffer and puts the cursor
    /// at the end.
    pub fn start_editing(&mut self) {
        self.mode = AppMode::Editing;
        self.input = self.selected_text();
        self.cursor_position = self.input.chars().count();
        self.status_message = None;
    }

    /// Writes the input buffer into the selected label or cell and moves
    /// down one row.
    pub fn finish_editing(&mut self) {
        let input = std::mem::take(&mut self.input);
        let result = match self.selected_grid_column() {
            Some(col) => self.store.set_cell(self.selected_row, col, &input),
            None => self.store.set_label(self.selected_row, &input),
        };
        if let Err(err) = result {
            self.status_message = Some(err.to_string());
        }

        self.move_down();
        self.mode = AppMode::Normal;
        self.cursor_position = 0;
    }

    /// Cancels editing and returns to normal mode without saving changes.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Empties the selected label or cell.
    pub fn clear_selected(&mut self) {
        let result = match self.selected_grid_column() {
            Some(col) => self.store.set_cell(self.selected_row, col, ""),
            None => self.store.set_label(self.selected_row, ""),
        };
        if let Err(err) = result {
            self.status_message = Some(err.to_string());
        }
    }

    /// Appends a row and selects it.
    pub fn add_row(&mut self) {
        self.store.add_row();
        self.selected_row = self.store.rows().len() - 1;
        self.ensure_cursor_visible();
        self.status_message = Some(format!("Added row {}", self.selected_row + 1));
    }

    /// Removes the selected row. The last remaining row is kept.
    pub fn remove_selected_row(&mut self) {
        match self.store.remove_row(self.selected_row) {
            Ok(_) => {
                self.status_message = Some(format!("Removed row {}", self.selected_row + 1));
                let last = self.store.rows().len() - 1;
                self.selected_row = self.selected_row.min(last);
                self.ensure_cursor_visible();
            }
            Err(err) => {
                self.status_message = Some(err.to_string());
            }
        }
    }

    /// Mutable access to the buffer the current mode types into.
    pub fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.mode {
            AppMode::Editing => Some(&mut self.input),
            AppMode::SaveAs | AppMode::LoadFile | AppMode::ExportCsv | AppMode::ImportCsv => {
                Some(&mut self.filename_input)
            }
            AppMode::Normal | AppMode::Help => None,
        }
    }

    /// Inserts a character at the cursor of the active buffer.
    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor_position;
        if let Some(buffer) = self.active_input_mut() {
            let at = byte_offset(buffer, cursor);
            buffer.insert(at, c);
            self.cursor_position += 1;
        }
    }

    /// Deletes the character before the cursor.
    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor = self.cursor_position - 1;
        if let Some(buffer) = self.active_input_mut() {
            let at = byte_offset(buffer, cursor);
            if at < buffer.len() {
                buffer.remove(at);
                self.cursor_position = cursor;
            }
        }
    }

    /// Deletes the character under the cursor.
    pub fn delete_at_cursor(&mut self) {
        let cursor = self.cursor_position;
        if let Some(buffer) = self.active_input_mut() {
            let at = byte_offset(buffer, cursor);
            if at < buffer.len() {
                buffer.remove(at);
            }
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let len = self.active_input_len();
        if self.cursor_position < len {
            self.cursor_position += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.active_input_len();
    }

    fn active_input_len(&mut self) -> usize {
        self.active_input_mut()
            .map(|buffer| buffer.chars().count())
            .unwrap_or(0)
    }

    fn start_filename_input(&mut self, mode: AppMode, filename: String) {
        self.mode = mode;
        self.cursor_position = filename.chars().count();
        self.filename_input = filename;
        self.status_message = None;
    }

    /// Switches to save-as mode, prefilled with the current filename.
    pub fn start_save_as(&mut self) {
        let filename = self
            .filename
            .clone()
            .unwrap_or_else(|| DEFAULT_SHEET_FILENAME.to_string());
        self.start_filename_input(AppMode::SaveAs, filename);
    }

    /// Switches to load-file mode, prefilled with the current filename.
    pub fn start_load_file(&mut self) {
        let filename = self
            .filename
            .clone()
            .unwrap_or_else(|| DEFAULT_SHEET_FILENAME.to_string());
        self.start_filename_input(AppMode::LoadFile, filename);
    }

    /// Switches to CSV export mode, deriving the name from the current file.
    pub fn start_csv_export(&mut self) {
        let filename = self
            .filename
            .as_ref()
            .map(|f| f.replace(".json", ".csv"))
            .unwrap_or_else(|| DEFAULT_CSV_EXPORT_FILENAME.to_string());
        self.start_filename_input(AppMode::ExportCsv, filename);
    }

    pub fn start_csv_import(&mut self) {
        self.start_filename_input(AppMode::ImportCsv, DEFAULT_CSV_IMPORT_FILENAME.to_string());
    }

    /// Cancels filename input and returns to normal mode.
    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    /// Filename typed by the user, or the default for the current mode.
    pub fn target_filename(&self) -> String {
        if !self.filename_input.is_empty() {
            return self.filename_input.clone();
        }
        let default = match self.mode {
            AppMode::ExportCsv => DEFAULT_CSV_EXPORT_FILENAME,
            AppMode::ImportCsv => DEFAULT_CSV_IMPORT_FILENAME,
            _ => DEFAULT_SHEET_FILENAME,
        };
        default.to_string()
    }

    fn close_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    fn reset_view(&mut self) {
        self.selected_row = 0;
        self.selected_col = 0;
        self.scroll_row = 0;
    }

    /// Processes the result of a save operation.
    pub fn set_save_result<E: Display>(&mut self, result: Result<String, E>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Saved to {}", filename));
                self.filename = Some(filename);
                self.saved_revision = self.store.revision();
            }
            Err(error) => {
                self.status_message = Some(format!("Save failed: {}", error));
            }
        }
        self.close_filename_input();
    }

    /// Processes the result of a load operation.
    ///
    /// A file containing JSON `null` loads nothing and keeps the grid.
    pub fn set_load_result<E: Display>(&mut self, result: Result<(Option<Snapshot>, String), E>) {
        match result {
            Ok((Some(snapshot), filename)) => {
                self.store.set_data(Some(&snapshot));
                self.saved_revision = self.store.revision();
                self.reset_view();
                self.status_message = Some(format!("Loaded from {}", filename));
                self.filename = Some(filename);
            }
            Ok((None, filename)) => {
                self.status_message = Some(format!("{} contains no data", filename));
                self.filename = Some(filename);
            }
            Err(error) => {
                self.status_message = Some(format!("Load failed: {}", error));
            }
        }
        self.close_filename_input();
    }

    /// Applies the load of the file named on the command line.
    ///
    /// That file stays the save target even when it could not be read.
    pub fn set_startup_load_result<E: Display>(
        &mut self,
        filename: String,
        result: Result<(Option<Snapshot>, String), E>,
    ) {
        self.set_load_result(result);
        if self.filename.is_none() {
            self.filename = Some(filename);
        }
    }

    /// Starts a new sheet that will be saved to `filename`.
    pub fn start_new_file(&mut self, filename: String) {
        self.status_message = Some(format!("New file {}", filename));
        self.filename = Some(filename);
    }

    /// Processes the result of a CSV export operation.
    pub fn set_csv_export_result<E: Display>(&mut self, result: Result<String, E>) {
        self.status_message = Some(match result {
            Ok(filename) => format!("Exported to {}", filename),
            Err(error) => format!("Export failed: {}", error),
        });
        self.close_filename_input();
    }

    /// Processes the result of a CSV import operation.
    ///
    /// The filename is not remembered since imported data has not been saved.
    pub fn set_csv_import_result<E: Display>(&mut self, result: Result<Snapshot, E>) {
        match result {
            Ok(snapshot) => {
                self.store.set_data(Some(&snapshot));
                self.reset_view();
                self.status_message = Some(format!("Imported {} rows", snapshot.len()));
            }
            Err(error) => {
                self.status_message = Some(format!("Import failed: {}", error));
            }
        }
        self.close_filename_input();
    }

    /// Updates the number of grid rows that fit on screen.
    pub fn update_viewport_size(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
        self.ensure_cursor_visible();
    }

    /// Scrolls so that the selected row is visible.
    pub fn ensure_cursor_visible(&mut self) {
        if self.selected_row < self.scroll_row {
            self.scroll_row = self.selected_row;
        } else if self.selected_row >= self.scroll_row + self.viewport_rows {
            self.scroll_row = self.selected_row + 1 - self.viewport_rows;
        }
    }
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
