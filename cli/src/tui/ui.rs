use minitodo_core::{Task, TaskRepository};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, InputMode, StatusLevel, ViewMode};

const ACCENT: Color = Color::Rgb(0xC6, 0x53, 0x4E);
const MINI_WIDTH: u16 = 38;
const MINI_HEIGHT: u16 = 16;

pub fn draw<R: TaskRepository>(f: &mut Frame, app: &App<R>) {
    match app.view_mode {
        ViewMode::Full => draw_full(f, app),
        ViewMode::Mini => draw_mini(f, app),
    }
}

fn draw_full<R: TaskRepository>(f: &mut Frame, app: &App<R>) {
    let size = f.area();
    let input_height = if app.input_mode == InputMode::Normal { 0 } else { 3 };

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Header
            Constraint::Min(3),               // Content
            Constraint::Length(input_height), // Input
            Constraint::Length(1),            // Status
            Constraint::Length(1),            // Footer/Help
        ])
        .split(size);

    let counts = app.counts();
    let mut title = vec![
        Span::styled("MINITODO", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {} tasks · {} active · {} done", counts.total(), counts.active, counts.completed),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if app.store.is_dirty() {
        title.push(Span::styled("  [unsaved]", Style::default().fg(Color::Yellow)));
    }
    let header = Paragraph::new(Line::from(title))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let completed_height = if app.show_completed && counts.completed > 0 {
        Constraint::Percentage(40)
    } else {
        Constraint::Length(2)
    };
    let content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), completed_height])
        .split(main_chunks[1]);

    let (active, completed) = app.rows.split_at(app.active_len);
    let active_selected = app.selected.filter(|&i| i < app.active_len);
    let completed_selected = app.selected.and_then(|i| i.checked_sub(app.active_len));

    draw_task_table(f, content_chunks[0], active, active_selected, " Tasks ");
    let arrow = if app.show_completed { "⌄" } else { "⌃" };
    let completed_title = format!(" Completed {}  {} ", counts.completed, arrow);
    draw_task_table(f, content_chunks[1], completed, completed_selected, &completed_title);

    if input_height > 0 {
        draw_input(f, app, main_chunks[2]);
    }
    draw_status(f, app, main_chunks[3]);

    let help = match app.input_mode {
        InputMode::Normal => "a: add | e: edit | d: delete | space: done | s: star | c: completed | x: clear | m: mini | q: quit",
        _ => "enter: save | esc: cancel",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[4]);
}

fn draw_mini<R: TaskRepository>(f: &mut Frame, app: &App<R>) {
    let size = f.area();
    let width = MINI_WIDTH.min(size.width);
    let height = MINI_HEIGHT.min(size.height);
    let area = Rect::new(size.x + size.width - width, size.y, width, height);
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(" Active Tasks ", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let rows: Vec<Row> = app.rows.iter().map(task_row).collect();
    let table = Table::new(rows, [Constraint::Length(2), Constraint::Length(2), Constraint::Min(5)])
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let mut state = TableState::default().with_selected(app.selected);
    f.render_stateful_widget(table, chunks[0], &mut state);

    let hint = match &app.status {
        Some(status) if status.level != StatusLevel::Info => {
            Paragraph::new(status.text.as_str()).style(status_style(status.level))
        }
        _ => Paragraph::new("space s m q").style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(hint.alignment(Alignment::Center), chunks[1]);
}

fn task_row(task: &Task) -> Row<'_> {
    let status_icon = if task.completed { "✔" } else { "☐" };
    let star = if task.priority {
        Span::styled("★", Style::default().fg(ACCENT))
    } else {
        Span::styled("☆", Style::default().fg(Color::DarkGray))
    };
    let text_style = if task.completed {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    Row::new(vec![
        Span::raw(status_icon),
        star,
        Span::styled(task.text.as_str(), text_style),
    ])
}

fn draw_task_table(f: &mut Frame, area: Rect, tasks: &[Task], selected: Option<usize>, title: &str) {
    let rows: Vec<Row> = tasks.iter().map(task_row).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Status
            Constraint::Length(3),  // Star
            Constraint::Min(10),    // Text
        ]
    )
    .block(Block::default().title(title.to_string()).borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    let mut state = TableState::default().with_selected(selected);
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_input<R: TaskRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let title = match app.input_mode {
        InputMode::Editing(_) => " Edit task ",
        _ => " New task ",
    };
    let input = Paragraph::new(app.input.as_str())
        .block(Block::default().title(title).borders(Borders::ALL).border_type(BorderType::Rounded))
        .style(Style::default().fg(Color::White));
    f.render_widget(input, area);

    let before: String = app.input.chars().take(app.cursor_position).collect();
    let max_x = area.x + area.width.saturating_sub(2);
    let x = (area.x + 1).saturating_add(before.width() as u16).min(max_x);
    f.set_cursor_position((x, area.y + 1));
}

fn draw_status<R: TaskRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    if let Some(status) = &app.status {
        let line = Paragraph::new(status.text.as_str()).style(status_style(status.level));
        f.render_widget(line, area);
    }
}

fn status_style(level: StatusLevel) -> Style {
    match level {
        StatusLevel::Info => Style::default().fg(Color::Green),
        StatusLevel::Warning => Style::default().fg(Color::Yellow),
        StatusLevel::Error => Style::default().fg(Color::Red),
    }
}
