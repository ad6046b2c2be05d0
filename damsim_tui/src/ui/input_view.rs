//! Input list: grouped fields of the live snapshot

use crate::app::{App, InputRow};
use crate::ui::{section_header, stat_line};
use damsim_core::Figure;
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
        .constraints([Constraint::Min(50), Constraint::Length(40)])
        .split(area);

    draw_fields(f, app, chunks[0]);
    draw_result(f, app, chunks[1]);
}

fn draw_fields(f: &mut Frame, app: &App, area: Rect) {
    let live = app.ctx.live();
    let issues = app.validation_issues();

    let items: Vec<ListItem> = app
        .input_rows()
        .into_iter()
        .map(|row| match row {
            InputRow::Group(group) => {
                let marker = if app.collapsed.contains(&group) { "▸" } else { "▾" };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} {:18}", marker, group.label()),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(app.group_summary(group), Style::default().fg(Color::DarkGray)),
                ]))
            }
            InputRow::Field(field) => {
                let value_style = if issues.iter().any(|i| i.field == field) {
                    Style::default().fg(Color::Yellow)
                } else if field.is_numeric() {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::Green)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("    {:28}", field.label()), Style::default().fg(Color::Gray)),
                    Span::styled(field.display(live), value_style),
                ]))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} Mode ", live.input_mode.label())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_row));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_result(f: &mut Frame, app: &App, area: Rect) {
    let result = app.ctx.linked_result();
    let live = app.ctx.live();

    let mut lines = vec![section_header("Damage")];
    for (figure, value) in result.figures() {
        let style = if figure == Figure::Expected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:20}", figure.label()), Style::default().fg(Color::Gray)),
            Span::styled(value.to_string(), style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(stat_line("Final ATK", format!("{:.0}", result.final_attack)));
    lines.push(stat_line("Crit rate", format!("{:.1}%", result.crit_rate)));
    lines.push(stat_line("Crit damage", format!("+{:.1}%", result.crit_damage)));
    lines.push(stat_line("DEF multiplier", format!("×{:.4}", result.defense_multiplier)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        live.input_mode.description(),
        Style::default().fg(Color::DarkGray),
    )));

    let issues = app.validation_issues();
    if !issues.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_header("Warnings"));
        for issue in issues {
            lines.push(Line::from(Span::styled(
                format!("• {}", issue.message),
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Result "));
    f.render_widget(paragraph, area);
}
