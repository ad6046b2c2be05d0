//! Help tab view

use crate::app::App;
use crate::ui::section_header;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        section_header("Navigation"),
        key_line("1-6", "Jump to tab (Inputs/Calc/Compare/Presets/Sim/Help)"),
        key_line("Tab / Shift+Tab", "Next/previous tab"),
        key_line("↑/k  ↓/j", "Navigate lists / scroll"),
        key_line("q / Ctrl+C", "Quit"),
        key_line("?", "Toggle help"),
        Line::from(""),
        section_header("Inputs"),
        key_line("Enter", "Edit number, cycle choice, fold group"),
        key_line("←/→", "Cycle mode, affinity, break, gear main stat"),
        key_line("Space", "Fold or unfold the selected group"),
        key_line("s", "Save the live snapshot as a preset"),
        key_line("r", "Reset to defaults"),
        Line::from(""),
        section_header("Presets"),
        key_line("Enter", "Load into the live slot"),
        key_line("b", "Load as base (live moves to comparison)"),
        key_line("m", "Load as comparison"),
        key_line("n / d", "Rename / delete"),
        Line::from(""),
        section_header("Compare"),
        key_line("x", "Swap base and comp"),
        key_line("c", "Clear the comparison slot"),
        key_line("S", "Save the comparison as a preset"),
        key_line("u", "Write a share link to the log"),
        key_line("i", "Open a share link"),
        key_line("e", "Export the live result as JSON"),
        Line::from(""),
        section_header("Confirmation"),
        Line::from(Span::styled(
            "Loading, resetting or opening a link over unsaved edits asks first: y / n",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Presets file: {}", app.config.presets_path.display()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Help "));

    f.render_widget(paragraph, area);
}

fn key_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:20}", key), Style::default().fg(Color::Yellow)),
        Span::styled(desc.to_string(), Style::default().fg(Color::White)),
    ])
}
