//! One-line summaries of input groups, for collapsed sections

use crate::formula::evaluate;
use crate::snapshot::{FieldGroup, ParameterSnapshot};
use crate::types::{Affinity, InputMode};

fn pct(n: f64) -> String {
    format!("{}%", (n * 10.0).round() / 10.0)
}

fn whole(n: f64) -> String {
    format!("{}", n.floor())
}

/// Summary line of one group. Zero-valued battle buffs are left out; with
/// none left the line is `—`.
pub fn group_summary(group: FieldGroup, s: &ParameterSnapshot) -> String {
    let mode = s.input_mode;
    match group {
        FieldGroup::Mode => mode.label().to_string(),
        FieldGroup::Status => {
            let r = evaluate(s);
            match mode {
                InputMode::Simple => format!(
                    "Final {} / Crit {}/{}",
                    whole(r.final_attack),
                    pct(s.simple_crit_rate),
                    pct(s.simple_crit_dmg)
                ),
                InputMode::Standard => format!(
                    "ATK {} / Crit {}/{}",
                    whole(s.pre_atk_input),
                    pct(r.crit_rate),
                    pct(r.crit_damage)
                ),
                InputMode::Gear => format!(
                    "Base {} / Crit {}/{}",
                    whole(s.base_atk),
                    pct(s.crit_rate),
                    pct(s.crit_dmg)
                ),
            }
        }
        FieldGroup::Equipment => {
            let sums = evaluate(s).equipment;
            match mode {
                InputMode::Simple => "not used in simple mode".to_string(),
                InputMode::Standard => format!(
                    "Crit {}/{} · Elem {}",
                    pct(sums.crit_rate),
                    pct(sums.crit_dmg),
                    pct(sums.elem_pct)
                ),
                InputMode::Gear => format!(
                    "ATK {} · ATK {} · Crit {}/{} · Elem {}",
                    whole(sums.atk),
                    pct(sums.atk_pct),
                    pct(sums.crit_rate),
                    pct(sums.crit_dmg),
                    pct(sums.elem_pct)
                ),
            }
        }
        FieldGroup::Skill => format!("{} + {}", pct(s.skill_pct), s.skill_flat),
        FieldGroup::Battle => {
            let atk_up = if mode == InputMode::Simple { 0.0 } else { s.atk_up_pct };
            let parts: Vec<String> = [
                ("ATK", atk_up),
                ("DMG", s.dmg_up_pct),
                ("Card", s.card_dmg_up_pct),
                ("Elem", s.elem_dmg_up_pct),
            ]
            .iter()
            .filter(|(_, v)| v.abs() > 0.0)
            .map(|(label, v)| format!("{} {}", label, pct(*v)))
            .collect();
            if parts.is_empty() {
                "—".to_string()
            } else {
                parts.join(" · ")
            }
        }
        FieldGroup::Enemy => {
            let affinity = match s.affinity {
                Affinity::Neutral => "neutral",
                Affinity::Advantage => "advantage",
                Affinity::Disadvantage => "disadvantage",
            };
            let broken = if s.is_break { "break" } else { "—" };
            format!("DEF {} / {} / {}", s.enemy_def, affinity, broken)
        }
    }
}
