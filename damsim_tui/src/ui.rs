//! UI rendering

mod breakdown_view;
mod compare_view;
mod help_view;
mod input_view;
mod presets_view;
mod sim_view;

use crate::app::{App, Tab};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Keybindings footer / prompt
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);

    match app.current_tab {
        Tab::Inputs => input_view::draw(f, app, chunks[1]),
        Tab::Calc => breakdown_view::draw(f, app, chunks[1]),
        Tab::Compare => compare_view::draw(f, app, chunks[1]),
        Tab::Presets => presets_view::draw(f, app, chunks[1]),
        Tab::Sim => sim_view::draw(f, app, chunks[1]),
        Tab::Help => help_view::draw(f, app, chunks[1]),
    }

    if app.input.is_some() {
        draw_prompt(f, app, chunks[2]);
    } else if app.pending.is_some() {
        draw_confirmation(f, app, chunks[2]);
    } else {
        draw_keybindings(f, app, chunks[2]);
    }
}

fn draw_keybindings(f: &mut Frame, app: &App, area: Rect) {
    let common_keys = vec![("Tab", "Next tab"), ("u", "Share"), ("q", "Quit")];

    let tab_keys: Vec<(&str, &str)> = match app.current_tab {
        Tab::Inputs => vec![
            ("↑/↓", "Select"),
            ("Enter", "Edit"),
            ("←/→", "Cycle"),
            ("Space", "Fold group"),
            ("s", "Save"),
            ("r", "Reset"),
        ],
        Tab::Calc => vec![("↑/↓", "Scroll"), ("e", "Export JSON")],
        Tab::Compare => vec![
            ("x", "Swap roles"),
            ("c", "Clear comparison"),
            ("S", "Save comparison"),
            ("i", "Import link"),
        ],
        Tab::Presets => vec![
            ("Enter", "Load"),
            ("b", "As base"),
            ("m", "As comparison"),
            ("n", "Rename"),
            ("d", "Delete"),
        ],
        Tab::Sim => vec![("Enter/Space", "Roll hits"), ("↑/↓", "Scroll log")],
        Tab::Help => vec![],
    };

    let mut spans: Vec<Span> = Vec::new();

    for (i, (key, desc)) in tab_keys.iter().enumerate() {
        if i > 0 {
            spans.push(separator());
        }
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::White)));
    }

    if !tab_keys.is_empty() {
        spans.push(separator());
    }

    for (i, (key, desc)) in common_keys.iter().enumerate() {
        if i > 0 {
            spans.push(separator());
        }
        spans.push(Span::styled(format!("[{}]", key), Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::Gray)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Keys "))
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

fn separator() -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(Color::DarkGray))
}

fn draw_prompt(f: &mut Frame, app: &App, area: Rect) {
    let Some(input) = &app.input else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(
            format!("{}: ", input.purpose.prompt()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(input.buffer.clone(), Style::default().fg(Color::White)),
        Span::styled("█", Style::default().fg(Color::Gray)),
    ]);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Enter to apply, Esc to cancel "),
    );
    f.render_widget(paragraph, area);
}

fn draw_confirmation(f: &mut Frame, app: &App, area: Rect) {
    let Some(action) = &app.pending else {
        return;
    };
    let line = Line::from(vec![
        Span::styled(
            "Unsaved changes will be lost. ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("Really {}? ", action.describe())),
        Span::styled("[y/n]", Style::default().fg(Color::Yellow)),
    ]);
    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title(" Confirm "))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            let style = if *t == app.current_tab {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(t.name(), style))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Damage Simulator [{}] ", app.title_status())),
        )
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider("|");

    f.render_widget(tabs, area);
}

/// Cyan `═══ title ═══` line
pub fn section_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("═══ {} ═══", title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

pub fn progress_bar(current: f64, max: f64, width: u16, filled_color: Color) -> Paragraph<'static> {
    let percent = if max > 0.0 { (current / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (percent * width as f64) as usize;
    let empty = (width as usize).saturating_sub(filled);

    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(empty));

    Paragraph::new(bar).style(Style::default().fg(filled_color))
}

pub fn stat_line(name: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:20}", name), Style::default().fg(Color::Gray)),
        Span::styled(value.into(), Style::default().fg(Color::White)),
    ])
}

/// Message log panel, newest lines last, scrolled by `log_scroll`
pub fn draw_log(f: &mut Frame, app: &App, area: Rect) {
    let lines = app.messages.lines();
    let items: Vec<ListItem> = lines
        .iter()
        .skip(app.log_scroll)
        .map(|line| {
            let style = if line.starts_with("Error") || line.starts_with("error:") {
                Style::default().fg(Color::Red)
            } else if line.starts_with("warn:") || line.starts_with("Unsaved") {
                Style::default().fg(Color::Yellow)
            } else if line.starts_with("Share link") {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(line.clone(), style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Log ({}) ", lines.len())),
    );
    f.render_widget(list, area);
}
