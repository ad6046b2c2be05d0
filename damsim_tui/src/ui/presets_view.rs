//! Presets tab

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(44)])
        .split(area);

    draw_list(f, app, chunks[0]);
    draw_preview(f, app, chunks[1]);
}

fn draw_list(f: &mut Frame, app: &App, area: Rect) {
    let live = app.ctx.live_name();
    let comparison = app.ctx.comparison_slot().map(|slot| slot.name.as_str());

    let items: Vec<ListItem> = app
        .preset_names
        .iter()
        .map(|name| {
            let mut spans = vec![Span::styled(name.clone(), Style::default().fg(Color::White))];
            if live == Some(name.as_str()) {
                spans.push(Span::styled("  ● editing", Style::default().fg(Color::Cyan)));
            }
            if comparison == Some(name.as_str()) {
                spans.push(Span::styled("  ◆ comparing", Style::default().fg(Color::Magenta)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" Presets ({}) ", app.preset_names.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.preset_names.is_empty() {
        state.select(Some(app.selected_preset));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_preview(f: &mut Frame, app: &App, area: Rect) {
    let lines = match app.selected_preset_name() {
        None => vec![Line::from(Span::styled(
            "No presets yet. Press s on the Inputs tab to save one.",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(name) => match app.store.load(&name) {
            Ok(Some(raw)) => {
                let snapshot = damsim_core::snapshot::normalize_with(&raw, app.ctx.defaults());
                let result = damsim_core::evaluate(&snapshot);
                let mut lines = vec![
                    Line::from(Span::styled(
                        name,
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!("Mode: {}", snapshot.input_mode.label())),
                    Line::from(""),
                ];
                for (figure, value) in result.figures() {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{:14}", figure.label()), Style::default().fg(Color::Gray)),
                        Span::styled(value.to_string(), Style::default().fg(Color::White)),
                    ]));
                }
                lines
            }
            Ok(None) => vec![Line::from("Preset no longer exists.")],
            Err(e) => vec![Line::from(Span::styled(
                format!("Could not read preset: {}", e),
                Style::default().fg(Color::Red),
            ))],
        },
    };

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Preview "));
    f.render_widget(paragraph, area);
}
