//! Calc tab - every intermediate value of the live result

use crate::app::App;
use crate::ui::section_header;
use damsim_core::{BreakdownEntry, BreakdownStep};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_breakdown(f, app, chunks[0]);
    draw_formulas(f, chunks[1]);
}

fn section_of(step: BreakdownStep) -> &'static str {
    use BreakdownStep::*;
    match step {
        EquipAtk | EquipAtkPct | EquipCritRate | EquipCritDmg | EquipElemPct => "Gear",
        EquipAdjustedAtk | PreAttack | FinalAttack => "Attack",
        AfterSkillMultiplier | AfterSkillFlat => "Skill",
        AfterDamageUp | AfterCardUp | ElementalPct | AfterElementalUp => "Buffs",
        AffinityMultiplier | AfterAffinity | BreakMultiplier | AfterBreak | DefenseMultiplier
        | AfterDefense => "Enemy",
        CritRate | CritDamage => "Crit",
    }
}

fn entry_line(entry: &BreakdownEntry) -> Line<'static> {
    let color = match entry.step {
        BreakdownStep::AffinityMultiplier
        | BreakdownStep::BreakMultiplier
        | BreakdownStep::DefenseMultiplier => Color::Magenta,
        BreakdownStep::FinalAttack | BreakdownStep::AfterDefense => Color::Yellow,
        _ => Color::White,
    };
    Line::from(vec![
        Span::styled(format!("  {:22}", entry.label()), Style::default().fg(Color::Gray)),
        Span::styled(entry.display(), Style::default().fg(color)),
    ])
}

fn draw_breakdown(f: &mut Frame, app: &App, area: Rect) {
    let result = app.ctx.linked_result();
    let mut lines: Vec<Line> = vec![];

    let mut current = "";
    for entry in &result.breakdown {
        let section = section_of(entry.step);
        if section != current {
            if !current.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(section_header(section));
            current = section;
        }
        lines.push(entry_line(entry));
    }

    lines.push(Line::from(""));
    lines.push(section_header("Result"));
    for (figure, value) in result.figures() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:22}", figure.label()), Style::default().fg(Color::Gray)),
            Span::styled(
                value.to_string(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Breakdown ({}) ", result.mode.label())),
        )
        .scroll((app.breakdown_scroll as u16, 0));

    f.render_widget(paragraph, area);
}

fn draw_formulas(f: &mut Frame, area: Rect) {
    let heading = Style::default().fg(Color::Yellow);
    let lines = vec![
        section_header("Formula"),
        Line::from(""),
        Line::from(Span::styled("Attack:", heading)),
        Line::from("  Gear:     pre = base + bonus + gearATK + base × gearATK%"),
        Line::from("  Standard: pre = pre-battle ATK input"),
        Line::from("  final = pre × (1 + ATK up%)"),
        Line::from("  Simple:   final = final ATK input"),
        Line::from(""),
        Line::from(Span::styled("Skill and buffs (applied in order):", heading)),
        Line::from("  × skill% + flat"),
        Line::from("  × (1 + DMG up%) × (1 + card DMG up%)"),
        Line::from("  × (1 + elemental%)"),
        Line::from(""),
        Line::from(Span::styled("Enemy:", heading)),
        Line::from("  affinity ×1.25 advantage / ×0.85 disadvantage"),
        Line::from("  break ×1.30"),
        Line::from("  defense × exp(−max(0, DEF) / 1092)"),
        Line::from(""),
        Line::from(Span::styled("Crit:", heading)),
        Line::from("  rate clamped to 0–100%"),
        Line::from("  crit     = dmg × (1 + critDMG%)"),
        Line::from("  expected = dmg × (1 + critDMG% × rate%)"),
        Line::from(""),
        Line::from(Span::styled(
            "Only the three final figures are floored.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Reference "));
    f.render_widget(paragraph, area);
}
