use crate::application::{App, AppMode};
use crate::domain::{format_cell_value, Grid};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

const ROW_NUMBER_WIDTH: u16 = 4;
const LABEL_WIDTH: u16 = 16;
const VALUE_WIDTH: u16 = 10;

/// Rows of the table area not available for grid rows: borders, header, totals.
const TABLE_CHROME_HEIGHT: u16 = 4;

pub fn render_ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    app.update_viewport_size(chunks[1].height.saturating_sub(TABLE_CHROME_HEIGHT) as usize);

    render_header(f, app, chunks[0]);
    render_grid(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if app.mode == AppMode::Help {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let filename = app.filename.as_deref().unwrap_or("unsaved");
    let modified = if app.is_modified() { " [+]" } else { "" };
    let header = Paragraph::new(format!(
        "tcalc - Calculation Sheet | {}{} | {} | Rows: {}",
        filename,
        modified,
        app.selection_reference(),
        app.store.rows().len()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

/// Number of value columns that fit next to the row number and label columns.
fn visible_value_columns(app: &App, width: u16) -> usize {
    let fixed = ROW_NUMBER_WIDTH + LABEL_WIDTH + 2 + 2;
    let available = width.saturating_sub(fixed) as usize;
    let fit = available / (VALUE_WIDTH as usize + 1);
    fit.clamp(1, app.store.grid().column_count())
}

/// First value column to draw so the selected column stays on screen.
fn first_value_column(app: &App, visible: usize) -> usize {
    match app.selected_grid_column() {
        Some(col) if col >= visible => col + 1 - visible,
        _ => 0,
    }
}

fn render_grid(f: &mut Frame, app: &App, area: Rect) {
    let grid = app.store.grid();
    let visible_cols = visible_value_columns(app, area.width);
    let first_col = first_value_column(app, visible_cols);
    let columns = first_col..first_col + visible_cols;

    let header_style = |selected: bool| {
        if selected {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        }
    };

    let mut headers = vec![
        Cell::from(""),
        Cell::from("Label").style(header_style(app.is_label_selected())),
    ];
    for col in columns.clone() {
        let selected = app.selected_grid_column() == Some(col);
        headers.push(Cell::from(Grid::column_label(col)).style(header_style(selected)));
    }
    let mut rows = vec![Row::new(headers).height(1)];

    let last_row = (app.scroll_row + app.viewport_rows).min(grid.row_count());
    for row in &grid.rows()[app.scroll_row.min(last_row)..last_row] {
        let is_selected_row = row.index == app.selected_row;
        let mut cells = vec![Cell::from(format!("{}", row.index + 1)).style(header_style(is_selected_row))];

        let cell_style = |selected: bool| {
            if selected {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            }
        };

        let label_text = if row.label.is_empty() { " ".to_string() } else { row.label.clone() };
        cells.push(Cell::from(label_text).style(cell_style(is_selected_row && app.is_label_selected())));

        for col in columns.clone() {
            let selected = is_selected_row && app.selected_grid_column() == Some(col);
            let text = format_cell_value(row.value(col));
            cells.push(Cell::from(format!("{:>width$}", text, width = VALUE_WIDTH as usize)).style(cell_style(selected)));
        }

        rows.push(Row::new(cells).height(1));
    }

    let total_style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let sums = grid.column_sums();
    let mut totals = vec![
        Cell::from(""),
        Cell::from(format!("Total: {}", format_cell_value(Some(grid.grand_total())))).style(total_style),
    ];
    for col in columns {
        let text = format_cell_value(Some(sums[col].sum));
        totals.push(Cell::from(format!("{:>width$}", text, width = VALUE_WIDTH as usize)).style(total_style));
    }
    rows.push(Row::new(totals).height(1));

    let mut widths = vec![Constraint::Length(ROW_NUMBER_WIDTH), Constraint::Length(LABEL_WIDTH)];
    widths.extend(std::iter::repeat_n(Constraint::Length(VALUE_WIDTH), visible_cols));

    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title("Sheet"))
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "Enter: edit | a: add row | d: remove row | Ctrl+S: save | Ctrl+O: load | Ctrl+E: export CSV | Ctrl+L: import CSV | F1/?: help | q: quit".to_string()
            }
        }
        AppMode::Editing => format!("Editing {}: {} (Enter to save, Esc to cancel)", app.selection_reference(), app.input),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::SaveAs => format!("Save as: {} (Enter to save, Esc to cancel)", app.filename_input),
        AppMode::LoadFile => format!("Load file: {} (Enter to load, Esc to cancel)", app.filename_input),
        AppMode::ExportCsv => format!("Export CSV as: {} (Enter to export, Esc to cancel)", app.filename_input),
        AppMode::ImportCsv => format!("Import CSV from: {} (Enter to import, Esc to cancel)", app.filename_input),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::SaveAs | AppMode::LoadFile => Style::default().fg(Color::Yellow),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
            AppMode::ImportCsv => Style::default().fg(Color::Green),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("tcalc Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"TCALC CALCULATION SHEET

=== BASIC CONCEPTS ===
• Every row has a free-text label followed by numeric columns A, B, C, ...
• Cells hold a number or nothing; text that is not a number empties the cell
• Numbers can be integers, decimals or exponents (42, -3.5, 1e3)
• Column totals and the grand total are shown in the bottom row
• The sheet always keeps at least one row

=== EDITING ===
Enter/F2        Edit the selected label or cell
Enter           (while editing) Save and move down
Esc             (while editing) Cancel
Backspace       Clear the selected label or cell
a or Ctrl+N     Add a row at the end
d or Delete     Remove the selected row

=== FILE OPERATIONS ===
Ctrl+S          Save sheet as JSON
Ctrl+O          Load sheet from JSON
Ctrl+E          Export sheet to CSV (with row and column totals)
Ctrl+L/Ctrl+I   Import rows from CSV (Tab also works)
                JSON files map row labels to column values:
                {"Revenue": {"A": 1000, "B": null}}
                Rows without a label are saved as "Row N"

=== NAVIGATION ===
F1 or ?         Show this help (scroll with ↑↓, PgUp/PgDn, Home)
Arrow keys      Move between rows and columns (hjkl also work)
q               Quit application

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#;
