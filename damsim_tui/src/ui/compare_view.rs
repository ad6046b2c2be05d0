//! Compare tab - base vs comp figures and deltas

use crate::app::App;
use crate::ui::{draw_log, section_header};
use damsim_core::{DeltaSign, Role};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(13), Constraint::Min(0)])
        .split(area);

    draw_table(f, app, chunks[0]);
    draw_log(f, app, chunks[1]);
}

fn role_line(app: &App, role: Role, label: &str) -> Line<'static> {
    let side = app.ctx.roles().side(role);
    let mut spans = vec![
        Span::styled(format!("{:6}", label), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("[{}] {}", side, app.ctx.name_for(role)),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ];
    if app.ctx.is_linked(role) {
        spans.push(Span::styled("  (editing)", Style::default().fg(Color::Cyan)));
    } else if app.ctx.comparison_slot().is_some_and(|slot| slot.transient) {
        spans.push(Span::styled("  (shared, unsaved)", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn draw_table(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        role_line(app, Role::Base, "Base"),
        role_line(app, Role::Comp, "Comp"),
        Line::from(""),
    ];

    match app.ctx.comparison() {
        Some(cmp) => {
            lines.push(section_header("Deltas"));
            lines.push(Line::from(Span::styled(
                format!("  {:12}{:>12}{:>12}   {}", "", "Base", "Comp", "Change"),
                Style::default().fg(Color::DarkGray),
            )));
            for (figure, delta) in cmp.deltas() {
                let color = match delta.sign() {
                    DeltaSign::Gain => Color::Green,
                    DeltaSign::Loss => Color::Red,
                    DeltaSign::Even => Color::Gray,
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:12}{:>12}{:>12}   ", figure.label(), delta.base, delta.comp),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(delta.to_string(), Style::default().fg(color)),
                ]));
            }
        }
        None => {
            lines.push(Line::from(Span::styled(
                "No comparison loaded. Load one from the Presets tab or open a share link.",
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(""));
            let result = app.ctx.linked_result();
            lines.push(Line::from(Span::styled(
                format!("  Current: {}", result.summary()),
                Style::default().fg(Color::White),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Comparison "));
    f.render_widget(paragraph, area);
}
