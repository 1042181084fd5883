use crate::application::{App, AppMode};
use crate::infrastructure::{CsvExporter, FileRepository};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::SaveAs | AppMode::LoadFile | AppMode::ExportCsv | AppMode::ImportCsv => {
                Self::handle_filename_input_mode(app, key)
            }
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => app.start_save_as(),
                KeyCode::Char('o') => app.start_load_file(),
                KeyCode::Char('e') => app.start_csv_export(),
                KeyCode::Char('i') | KeyCode::Char('l') => app.start_csv_import(),
                KeyCode::Char('n') => app.add_row(),
                _ => {}
            }
            return;
        }

        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_up(),
            KeyCode::Down | KeyCode::Char('j') => app.move_down(),
            KeyCode::Left | KeyCode::Char('h') => app.move_left(),
            KeyCode::Right | KeyCode::Char('l') => app.move_right(),
            KeyCode::Enter | KeyCode::F(2) => app.start_editing(),
            KeyCode::Backspace => app.clear_selected(),
            // Most terminals deliver Ctrl+I as Tab.
            KeyCode::Tab => app.start_csv_import(),
            KeyCode::Char('a') => app.add_row(),
            KeyCode::Char('d') | KeyCode::Delete => app.remove_selected_row(),
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_editing(),
            KeyCode::Esc => app.cancel_editing(),
            _ => Self::handle_text_key(app, key),
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_filename_input_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let filename = app.target_filename();
                match app.mode {
                    AppMode::SaveAs => {
                        let result = FileRepository::save_snapshot(&app.store.data(), &filename);
                        app.set_save_result(result);
                    }
                    AppMode::LoadFile => {
                        let result = FileRepository::load_snapshot(&filename);
                        app.set_load_result(result);
                    }
                    AppMode::ExportCsv => {
                        let result = CsvExporter::export_to_csv(app.store.grid(), &filename);
                        app.set_csv_export_result(result);
                    }
                    AppMode::ImportCsv => {
                        let result = CsvExporter::import_from_csv(&filename);
                        app.set_csv_import_result(result);
                    }
                    AppMode::Normal | AppMode::Editing | AppMode::Help => {}
                }
            }
            KeyCode::Esc => app.cancel_filename_input(),
            _ => Self::handle_text_key(app, key),
        }
    }

    /// Cursor movement and character input shared by every text prompt.
    fn handle_text_key(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Backspace => app.delete_before_cursor(),
            KeyCode::Delete => app.delete_at_cursor(),
            KeyCode::Left => app.cursor_left(),
            KeyCode::Right => app.cursor_right(),
            KeyCode::Home => app.cursor_home(),
            KeyCode::End => app.cursor_end(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{App, AppMode};
    use tempfile::tempdir;

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_edit_label_and_cells_with_keys() {
        let mut app = App::new(3).unwrap();

        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Revenue");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "1000");
        press(&mut app, KeyCode::Enter);

        let grid = app.store.grid();
        assert_eq!(grid.rows()[0].label, "Revenue");
        assert_eq!(grid.value(0, 0), Some(1000.0));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_vim_keys_type_text_while_editing() {
        let mut app = App::new(1).unwrap();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "hjkl adq");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.store.rows()[0].label, "hjkl adq");
        assert_eq!(app.store.rows().len(), 1);
    }

    #[test]
    fn test_escape_cancels_edit() {
        let mut app = App::new(1).unwrap();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Draft");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.store.rows()[0].label.is_empty());
    }

    #[test]
    fn test_add_and_remove_row_keys() {
        let mut app = App::new(2).unwrap();
        press(&mut app, KeyCode::Char('a'));
        InputHandler::handle_key_event(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(app.store.rows().len(), 3);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.store.rows().len(), 1);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.store.rows().len(), 1);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_backspace_clears_selected_cell() {
        let mut app = App::new(2).unwrap();
        app.store.set_cell(0, 1, "9").unwrap();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Backspace);

        assert_eq!(app.store.grid().value(0, 1), None);
    }

    #[test]
    fn test_help_toggle() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.help_scroll, 1);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_csv_import_key_binding() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('i'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::ImportCsv);
        assert_eq!(app.filename_input, "data.csv");
    }

    #[test]
    fn test_ctrl_i_sent_as_tab_starts_csv_import() {
        let mut app = App::default();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.mode, AppMode::ImportCsv);
        assert_eq!(app.filename_input, "data.csv");
    }

    #[test]
    fn test_csv_import_alternative_key_binding() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::ImportCsv);
    }

    #[test]
    fn test_csv_export_key_binding() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::ExportCsv);
        assert_eq!(app.filename_input, "sheet.csv");
    }

    #[test]
    fn test_filename_input_editing() {
        let mut app = App::default();
        app.start_csv_import();

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.filename_input, "data.csvm");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.filename_input, "data.csv");
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.filename_input, "ata.csv");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.filename_input.is_empty());
    }

    #[test]
    fn test_save_then_load_through_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keys.json");
        let filename = path.to_str().unwrap().to_string();

        let mut app = App::new(2).unwrap();
        app.store.set_label(0, "Revenue").unwrap();
        app.store.set_cell(0, 0, "1000").unwrap();

        InputHandler::handle_key_event(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
        app.filename_input.clear();
        app.cursor_position = 0;
        type_text(&mut app, &filename);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.filename.as_deref(), Some(filename.as_str()));
        assert!(!app.is_modified());

        app.store.set_label(0, "Changed").unwrap();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('o'), KeyModifiers::CONTROL);
        assert_eq!(app.filename_input, filename);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.store.rows()[0].label, "Revenue");
        assert_eq!(app.store.grand_total(), 1000.0);
    }

    #[test]
    fn test_csv_export_then_import_through_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keys.csv");
        let filename = path.to_str().unwrap().to_string();

        let mut app = App::new(2).unwrap();
        app.store.set_cell(0, 1, "4").unwrap();
        app.store.add_row();
        app.store.set_cell(1, 1, "6").unwrap();

        app.start_csv_export();
        app.filename_input = filename.clone();
        press(&mut app, KeyCode::Enter);
        assert!(app.status_message.as_deref().unwrap().starts_with("Exported"));

        let mut other = App::new(2).unwrap();
        other.start_csv_import();
        other.filename_input = filename;
        press(&mut other, KeyCode::Enter);

        assert_eq!(other.store.rows().len(), 2);
        assert_eq!(other.store.grand_total(), 10.0);
    }
}
