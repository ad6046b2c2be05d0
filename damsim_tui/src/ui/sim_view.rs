//! Sim tab - roll hits against the live result

use crate::app::{App, SIM_HITS};
use crate::ui::{draw_log, progress_bar, section_header, stat_line};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11), // Stats
            Constraint::Length(3),  // Crit bar
            Constraint::Min(0),     // Log
        ])
        .split(area);

    draw_stats(f, app, chunks[0]);
    draw_crit_bar(f, app, chunks[1]);
    draw_log(f, app, chunks[2]);
}

fn draw_stats(f: &mut Frame, app: &App, area: Rect) {
    let result = app.ctx.linked_result();
    let mut lines = vec![section_header("Formula")];
    lines.push(stat_line("Crit rate", format!("{:.1}%", result.crit_rate)));
    lines.push(stat_line("Expected", result.expected.to_string()));

    match &app.simulation {
        Some(sim) => {
            lines.push(section_header(&format!("Last run ({} hits)", sim.hit_count)));
            lines.push(stat_line("Crits", format!("{} ({:.1}%)", sim.crit_count, sim.crit_rate())));
            lines.push(stat_line("Average", format!("{:.1}", sim.avg_damage())));
            lines.push(stat_line("Range", format!("{} – {}", sim.min_hit, sim.max_hit)));
            let color = if sim.deviation_pct().abs() < 1.0 {
                Color::Green
            } else {
                Color::Yellow
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:20}", "vs expected"), Style::default().fg(Color::Gray)),
                Span::styled(format!("{:+.2}%", sim.deviation_pct()), Style::default().fg(color)),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            format!("Press Enter to roll {} hits.", SIM_HITS),
            Style::default().fg(Color::DarkGray),
        ))),
    }

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Crit Simulation "));
    f.render_widget(paragraph, area);
}

fn draw_crit_bar(f: &mut Frame, app: &App, area: Rect) {
    let observed = app.simulation.as_ref().map_or(0.0, |sim| sim.crit_rate());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Observed crit rate {:.1}% ", observed));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(progress_bar(observed, 100.0, inner.width, Color::Red), inner);
}
