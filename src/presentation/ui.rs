use crate::application::{App, AppMode, TextInput};
use crate::domain::{Grid, Spreadsheet};
use crate::infrastructure::ChatRole;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 42;
const ROW_LABEL_WIDTH: usize = 4;

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    if app.chat.visible {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
            .split(chunks[1]);
        render_spreadsheet(f, app, body[0]);
        render_chat(f, app, body[1]);
    } else {
        render_spreadsheet(f, app, chunks[1]);
    }

    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Preview | AppMode::PreviewEditing) {
        render_preview_popup(f, app);
    }
    if app.mode == AppMode::Help {
        render_help_popup(f, app.help_scroll);
    }
}

/// Rows and columns of the spreadsheet that fit in a terminal of the given size.
pub fn viewport_for(width: u16, height: u16, sidebar_visible: bool) -> (usize, usize) {
    let width = if sidebar_visible { width.saturating_sub(SIDEBAR_WIDTH) } else { width };
    // header + status bar + table borders + column header row
    let rows = (height as usize).saturating_sub(1 + 3 + 2 + 1).max(1);
    let cols = ((width as usize).saturating_sub(2 + ROW_LABEL_WIDTH) / 9).max(1);
    (rows, cols)
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut text = format!(
        "chatsheet | {} ({}/{}) | Cell: {}{}",
        app.spreadsheet().title,
        app.store.selected_index() + 1,
        app.store.len(),
        Spreadsheet::column_label(app.selected_col),
        app.selected_row + 1
    );
    let reviewing = matches!(app.mode, AppMode::Preview | AppMode::PreviewEditing);
    if app.proposal.is_some() && !reviewing {
        text.push_str(" | Proposal waiting (p)");
    }
    let header = Paragraph::new(text).style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

/// Builds a table showing the part of `grid` that fits in `area`, starting
/// at `scroll` and highlighting `cursor`.
fn grid_table<'a>(
    grid: &'a Grid,
    area: Rect,
    scroll: (usize, usize),
    cursor: (usize, usize),
) -> Table<'a> {
    let visible_rows = (area.height as usize).saturating_sub(3);

    let mut total_width = ROW_LABEL_WIDTH + 2;
    let mut visible_cols = 0;
    for col in scroll.1..grid.col_count() {
        let col_width = grid.display_width(col);
        if total_width + col_width + 1 > area.width as usize {
            break;
        }
        total_width += col_width + 1;
        visible_cols += 1;
    }
    let col_range = scroll.1..scroll.1 + visible_cols;

    let mut headers = vec![Cell::from("")];
    for col in col_range.clone() {
        let header_style = if col == cursor.1 {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        headers.push(Cell::from(Spreadsheet::column_label(col)).style(header_style));
    }

    let mut rows = vec![Row::new(headers).height(1)];
    for (row, cells_in_row) in grid.rows().iter().enumerate().skip(scroll.0).take(visible_rows) {
        let row_number_style = if row == cursor.0 {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let mut cells = vec![Cell::from(format!("{}", row + 1)).style(row_number_style)];

        for col in col_range.clone() {
            let value = cells_in_row.get(col).map_or("", |c| c.value.as_str());
            let style = if (row, col) == cursor {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            cells.push(Cell::from(if value.is_empty() { " " } else { value }).style(style));
        }

        rows.push(Row::new(cells).height(1));
    }

    let mut widths = vec![Constraint::Length(ROW_LABEL_WIDTH as u16)];
    for col in col_range {
        widths.push(Constraint::Length(grid.display_width(col) as u16));
    }
    Table::new(rows, widths).column_spacing(1)
}

fn render_spreadsheet(f: &mut Frame, app: &App, area: Rect) {
    let table = grid_table(
        &app.spreadsheet().rows,
        area,
        (app.scroll_row, app.scroll_col),
        (app.selected_row, app.selected_col),
    )
    .block(Block::default().borders(Borders::ALL).title(app.spreadsheet().title.as_str()));

    f.render_widget(table, area);
}

fn with_cursor(input: &TextInput) -> String {
    let mut text: String = input.as_str().chars().take(input.cursor()).collect();
    text.push('|');
    text.extend(input.as_str().chars().skip(input.cursor()));
    text
}

fn render_chat(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let mut lines = vec![Line::styled(app.chat_greeting(), Style::default().fg(Color::Cyan)), Line::from("")];
    for message in &app.chat.messages {
        let (who, color) = match message.role {
            ChatRole::User => ("You", Color::Green),
            ChatRole::Assistant => ("Assistant", Color::Magenta),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", who), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw(message.content.as_str()),
        ]));
    }
    if app.chat.in_progress() {
        lines.push(Line::styled("Assistant is thinking...", Style::default().fg(Color::DarkGray)));
    }

    let visible = chunks[0].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    let history = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Assistant"))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(history, chunks[0]);

    let focused = app.mode == AppMode::Chat;
    let input_text = if focused { with_cursor(&app.chat.input) } else { app.chat.input.as_str().to_string() };
    let input_style = if app.chat.in_progress() {
        Style::default().fg(Color::DarkGray)
    } else if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let input = Paragraph::new(input_text)
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title("Message"));
    f.render_widget(input, chunks[1]);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => match app.status_message {
            Some(ref status) => status.clone(),
            None => "Enter: edit | c: assistant | i: chat | p: review proposal | Tab: next sheet | o/O: add row/col | ?: help | q: quit".to_string(),
        },
        AppMode::Editing => format!("Editing: {} (Enter to save, Esc to cancel)", with_cursor(&app.input)),
        AppMode::Chat => "Enter: send | Esc: back to sheet".to_string(),
        AppMode::Preview => "a/y: accept | r/n/Esc: reject | Enter: edit cell | arrows: move".to_string(),
        AppMode::PreviewEditing => format!("Editing proposal: {} (Enter to keep, Esc to cancel)", with_cursor(&app.input)),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing | AppMode::PreviewEditing => Style::default().fg(Color::Green),
            AppMode::Chat => Style::default().fg(Color::Magenta),
            AppMode::Preview => Style::default().fg(Color::Yellow),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(input, area);
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    let height = (u32::from(area.height) * u32::from(percent_y) / 100) as u16;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_preview_popup(f: &mut Frame, app: &App) {
    let Some(proposal) = app.proposal.as_ref() else {
        return;
    };
    let popup_area = centered(f.area(), 80, 70);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{}: {}", proposal.preview.label(), proposal.title))
        .style(Style::default().fg(Color::White));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let grid = proposal.preview.rows();
    if grid.is_empty() {
        f.render_widget(Paragraph::new("The proposed spreadsheet has no cells."), inner);
        return;
    }

    let cursor = (app.preview_row, app.preview_col);
    let (visible_rows, visible_cols) = viewport_for(inner.width, inner.height + 4, false);
    let scroll = (
        cursor.0.saturating_sub(visible_rows.saturating_sub(1)),
        cursor.1.saturating_sub(visible_cols.saturating_sub(1)),
    );
    f.render_widget(grid_table(grid, inner, scroll, cursor), inner);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let popup_area = centered(f.area(), 80, 80);
    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("chatsheet Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"CHATSHEET

=== THE ASSISTANT ===
c               Show or hide the assistant sidebar
i               Type a message to the assistant
Enter           Send the message (while typing)
Esc             Return to the spreadsheet

Ask for tables in plain language, e.g.
"Create a spreadsheet of the planets with their diameters".
The assistant proposes a new spreadsheet; nothing changes
until you accept it. A proposal that arrives while you are
typing waits until you press p.

=== REVIEWING A PROPOSAL ===
p               Open the waiting proposal
Arrow keys      Move inside the proposed grid
Enter           Edit the selected proposed cell
a or y          Accept: the spreadsheet is created and shown
r, n or Esc     Reject: your spreadsheets stay as they are

Ragged proposals are padded: every row gets as many cells
as the longest row, missing values are left empty.

=== EDITING ===
Enter/F2        Edit selected cell
Backspace       Clear selected cell
o               Add a row at the bottom
O               Add a column at the right
Ctrl+C          Copy selected cell
Ctrl+V          Paste (tab-separated blocks grow the sheet)

=== NAVIGATION ===
Arrow keys      Navigate cells (hjkl also work)
Tab/Shift+Tab   Next/previous spreadsheet
F1 or ?         Show this help
q               Quit application

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(120, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_renders_header_and_title() {
        let screen = draw(&App::default());
        assert!(screen.contains("Spreadsheet 1 (1/1)"));
        assert!(screen.contains("Cell: A1"));
    }

    #[test]
    fn test_renders_sidebar_greeting() {
        let mut app = App::default();
        app.toggle_sidebar();
        let screen = draw(&app);
        assert!(screen.contains("Welcome to the spreadsheet app!"));
    }

    #[test]
    fn test_renders_preview_label() {
        let mut app = App::default();
        app.handle_action(&crate::infrastructure::ActionInvocation {
            name: "createSpreadsheet".into(),
            arguments: json!({"title": "Zoo", "rows": [{"cells": [{"value": "Lion"}]}]}),
        });
        let screen = draw(&app);
        assert!(screen.contains("Create spreadsheet: Zoo"));
        assert!(screen.contains("Lion"));
    }

    #[test]
    fn test_header_shows_waiting_proposal() {
        let mut app = App::default();
        app.focus_chat();
        app.handle_action(&crate::infrastructure::ActionInvocation {
            name: "createSpreadsheet".into(),
            arguments: json!({"title": "Zoo", "rows": [{"cells": [{"value": "Lion"}]}]}),
        });
        let screen = draw(&app);
        assert!(screen.contains("Proposal waiting (p)"));
        assert!(!screen.contains("Create spreadsheet: Zoo"));
    }

    #[test]
    fn test_viewport_shrinks_with_sidebar() {
        let (rows, cols) = viewport_for(120, 30, false);
        let (_, narrower) = viewport_for(120, 30, true);
        assert_eq!(rows, 23);
        assert!(narrower < cols);
    }
}
