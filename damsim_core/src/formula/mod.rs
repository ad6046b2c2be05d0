//! Damage formula - turning a snapshot into a DamageResult
//!
//! The pipeline is fixed; reordering the stages changes the numbers.
//!
//! ```text
//! gear sums → pre-battle ATK → × (1 + ATK up) → × skill% + flat
//!   → × DMG up → × card DMG up → × elem DMG up
//!   → × affinity → × break → × e^(-DEF/1092)
//!   → crit: normal / × (1 + CD) / × (1 + CD × CR)
//! ```

mod equipment;
mod result;

pub use equipment::{EquipmentTotals, EquipmentUsage};
pub use result::{BreakdownEntry, BreakdownStep, DamageResult, Figure, ValueFormat};

use crate::snapshot::ParameterSnapshot;
use crate::types::{Affinity, InputMode};

/// Damage multiplier with elemental advantage
pub const AFFINITY_ADVANTAGE: f64 = 1.25;
/// Damage multiplier with elemental disadvantage
pub const AFFINITY_DISADVANTAGE: f64 = 0.85;
/// Damage multiplier against a broken enemy
pub const BREAK_MULTIPLIER: f64 = 1.30;
/// Denominator of the exponential defense falloff
pub const DEFENSE_CONSTANT: f64 = 1092.0;

impl Affinity {
    pub fn multiplier(&self) -> f64 {
        match self {
            Affinity::Neutral => 1.0,
            Affinity::Advantage => AFFINITY_ADVANTAGE,
            Affinity::Disadvantage => AFFINITY_DISADVANTAGE,
        }
    }
}

/// `exp(-max(0, def) / 1092)`
pub fn defense_multiplier(defense: f64) -> f64 {
    (-defense.max(0.0) / DEFENSE_CONSTANT).exp()
}

/// Floor a final figure into a non-negative integer, saturating at `u64::MAX`
fn floor_figure(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= u64::MAX as f64 {
        u64::MAX
    } else {
        value.floor() as u64
    }
}

/// Evaluate a snapshot. Pure and infallible.
pub fn evaluate(s: &ParameterSnapshot) -> DamageResult {
    let mode = s.input_mode;
    let usage = EquipmentUsage::for_mode(mode);
    let totals = EquipmentTotals::aggregate(&s.equip);
    let mut breakdown = Vec::with_capacity(24);
    let mut push = |step: BreakdownStep, value: f64| breakdown.push(BreakdownEntry { step, value });

    // Step 1: gear sums that the mode actually uses
    if usage.attack {
        push(BreakdownStep::EquipAtk, totals.atk);
        push(BreakdownStep::EquipAtkPct, totals.atk_pct);
    }
    if usage.crit {
        push(BreakdownStep::EquipCritRate, totals.crit_rate);
        push(BreakdownStep::EquipCritDmg, totals.crit_dmg);
    }
    if usage.elemental {
        push(BreakdownStep::EquipElemPct, totals.elem_pct);
    }

    // Steps 2-3: attack
    let (pre_attack, final_attack) = match mode {
        InputMode::Gear => {
            let adjusted = totals.atk + s.base_atk * (totals.atk_pct / 100.0);
            push(BreakdownStep::EquipAdjustedAtk, adjusted);
            let pre = s.base_atk + s.bonus_atk + adjusted;
            (pre, pre * (1.0 + s.atk_up_pct / 100.0))
        }
        InputMode::Standard => {
            let pre = s.pre_atk_input.max(0.0);
            (pre, pre * (1.0 + s.atk_up_pct / 100.0))
        }
        InputMode::Simple => {
            let fin = s.final_atk_input.max(0.0);
            (fin, fin)
        }
    };
    push(BreakdownStep::PreAttack, pre_attack);
    push(BreakdownStep::FinalAttack, final_attack);

    // Step 4: skill
    let after_skill_mult = final_attack * (s.skill_pct / 100.0);
    let after_skill = after_skill_mult + s.skill_flat;
    push(BreakdownStep::AfterSkillMultiplier, after_skill_mult);
    push(BreakdownStep::AfterSkillFlat, after_skill);

    // Step 5: sequential buffs
    let elem_pct = match mode {
        InputMode::Simple => s.simple_elem_pct,
        InputMode::Standard | InputMode::Gear => {
            let gear = if usage.elemental { totals.elem_pct } else { 0.0 };
            s.elem_pct + gear + s.elem_dmg_up_pct
        }
    };
    let after_dmg_up = after_skill * (1.0 + s.dmg_up_pct / 100.0);
    let after_card_up = after_dmg_up * (1.0 + s.card_dmg_up_pct / 100.0);
    let after_elem_up = after_card_up * (1.0 + elem_pct / 100.0);
    push(BreakdownStep::AfterDamageUp, after_dmg_up);
    push(BreakdownStep::AfterCardUp, after_card_up);
    push(BreakdownStep::ElementalPct, elem_pct);
    push(BreakdownStep::AfterElementalUp, after_elem_up);

    // Steps 6-8: enemy
    let affinity_multiplier = s.affinity.multiplier();
    let break_multiplier = if s.is_break { BREAK_MULTIPLIER } else { 1.0 };
    let def_multiplier = defense_multiplier(s.enemy_def);
    let after_affinity = after_elem_up * affinity_multiplier;
    let after_break = after_affinity * break_multiplier;
    let after_defense = after_break * def_multiplier;
    push(BreakdownStep::AffinityMultiplier, affinity_multiplier);
    push(BreakdownStep::AfterAffinity, after_affinity);
    push(BreakdownStep::BreakMultiplier, break_multiplier);
    push(BreakdownStep::AfterBreak, after_break);
    push(BreakdownStep::DefenseMultiplier, def_multiplier);
    push(BreakdownStep::AfterDefense, after_defense);

    // Step 9: crit
    let (crit_rate, crit_damage) = match mode {
        InputMode::Simple => (s.simple_crit_rate.clamp(0.0, 100.0), s.simple_crit_dmg),
        InputMode::Standard | InputMode::Gear => {
            let (gear_rate, gear_dmg) = if usage.crit {
                (totals.crit_rate, totals.crit_dmg)
            } else {
                (0.0, 0.0)
            };
            (
                (s.crit_rate + gear_rate + s.crit_rate_up_pct).clamp(0.0, 100.0),
                s.crit_dmg + gear_dmg + s.crit_dmg_up_pct,
            )
        }
    };
    push(BreakdownStep::CritRate, crit_rate);
    push(BreakdownStep::CritDamage, crit_damage);

    // Step 10: final figures, the only floored values
    let no_crit = floor_figure(after_defense);
    let on_crit = floor_figure(after_defense * (1.0 + crit_damage / 100.0));
    let expected =
        floor_figure(after_defense * (1.0 + (crit_damage / 100.0) * (crit_rate / 100.0)));

    DamageResult {
        mode,
        equipment: totals,
        pre_attack,
        final_attack,
        elem_pct,
        affinity_multiplier,
        break_multiplier,
        defense_multiplier: def_multiplier,
        after_defense,
        crit_rate,
        crit_damage,
        no_crit,
        on_crit,
        expected,
        breakdown,
    }
}

/// Change a snapshot's input mode, seeding the new mode's direct inputs
/// from the current evaluation so the figures carry over.
///
/// - to standard: `preAtkInput` = rounded pre-battle attack
/// - to simple: final attack (rounded), crit rate, crit damage and
///   elemental % are copied from the aggregated values
/// - to gear: only the mode changes
///
/// Switching to the current mode does nothing.
pub fn switch_mode(s: &mut ParameterSnapshot, next: InputMode) {
    if s.input_mode == next {
        return;
    }
    let current = evaluate(s);
    s.input_mode = next;
    match next {
        InputMode::Standard => {
            s.pre_atk_input = current.pre_attack.max(0.0).round();
        }
        InputMode::Simple => {
            s.final_atk_input = current.final_attack.max(0.0).round();
            s.simple_crit_rate = current.crit_rate.clamp(0.0, 100.0);
            s.simple_crit_dmg = current.crit_damage;
            s.simple_elem_pct = current.elem_pct;
        }
        InputMode::Gear => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MainStat;

    fn scenario_a() -> ParameterSnapshot {
        ParameterSnapshot {
            input_mode: InputMode::Gear,
            base_atk: 5000.0,
            bonus_atk: 0.0,
            skill_pct: 100.0,
            skill_flat: 0.0,
            crit_rate: 20.0,
            crit_dmg: 50.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_scenario_plain() {
        let r = evaluate(&scenario_a());
        assert!((r.after_defense - 5000.0).abs() < 1e-9);
        assert_eq!(r.no_crit, 5000);
        assert_eq!(r.on_crit, 7500);
        assert_eq!(r.expected, 5500);
    }

    #[test]
    fn test_scenario_defense() {
        let mut s = scenario_a();
        s.enemy_def = 1092.0;
        let r = evaluate(&s);
        assert!((r.defense_multiplier - 0.367879).abs() < 1e-6);
        assert_eq!(r.no_crit, 1839);
    }

    #[test]
    fn test_scenario_advantage_break() {
        let mut s = scenario_a();
        s.affinity = Affinity::Advantage;
        s.is_break = true;
        let r = evaluate(&s);
        assert_eq!(r.no_crit, 8125);
    }

    #[test]
    fn test_disadvantage() {
        let mut s = scenario_a();
        s.affinity = Affinity::Disadvantage;
        assert_eq!(evaluate(&s).no_crit, 4250);
    }

    #[test]
    fn test_negative_defense_is_clamped() {
        let mut s = scenario_a();
        s.enemy_def = -500.0;
        let r = evaluate(&s);
        assert!((r.defense_multiplier - 1.0).abs() < f64::EPSILON);
        assert_eq!(r.no_crit, 5000);
    }

    #[test]
    fn test_gear_mode_attack() {
        let mut s = scenario_a();
        s.bonus_atk = 500.0;
        s.atk_up_pct = 20.0;
        s.equip.glove.main_val = 100.0; // atk main
        s.equip.ring.main_type = MainStat::AtkPct;
        s.equip.ring.main_val = 10.0;
        let r = evaluate(&s);
        // 5000 + 500 + (100 + 5000 × 0.10) = 6100, × 1.2 = 7320
        assert!((r.pre_attack - 6100.0).abs() < 1e-9);
        assert!((r.final_attack - 7320.0).abs() < 1e-9);
        assert_eq!(r.step(BreakdownStep::EquipAdjustedAtk), Some(600.0));
    }

    #[test]
    fn test_standard_mode_ignores_gear_attack() {
        let mut s = scenario_a();
        s.input_mode = InputMode::Standard;
        s.pre_atk_input = 4000.0;
        s.atk_up_pct = 50.0;
        s.equip.glove.main_val = 999.0;
        s.equip.glove.sub.crit_rate = 10.0;
        let r = evaluate(&s);
        assert!((r.final_attack - 6000.0).abs() < 1e-9);
        assert!((r.crit_rate - 30.0).abs() < 1e-9);
        assert!(r.step(BreakdownStep::EquipAtk).is_none());
        assert!(r.step(BreakdownStep::EquipCritRate).is_some());
    }

    #[test]
    fn test_simple_mode_uses_direct_values() {
        let mut s = scenario_a();
        s.input_mode = InputMode::Simple;
        s.final_atk_input = 8000.0;
        s.atk_up_pct = 100.0;
        s.simple_crit_rate = 150.0;
        s.simple_crit_dmg = 100.0;
        s.simple_elem_pct = 25.0;
        s.elem_dmg_up_pct = 300.0;
        s.crit_rate_up_pct = 40.0;
        s.equip.ring.sub.crit_dmg = 50.0;
        let r = evaluate(&s);
        assert!((r.final_attack - 8000.0).abs() < f64::EPSILON);
        assert!((r.crit_rate - 100.0).abs() < f64::EPSILON);
        assert!((r.crit_damage - 100.0).abs() < f64::EPSILON);
        assert_eq!(r.no_crit, 10000);
        assert_eq!(r.on_crit, 20000);
        assert_eq!(r.expected, 20000);
    }

    #[test]
    fn test_buff_chain_order() {
        let mut s = scenario_a();
        s.skill_pct = 200.0;
        s.skill_flat = 1000.0;
        s.dmg_up_pct = 10.0;
        s.card_dmg_up_pct = 20.0;
        s.elem_pct = 5.0;
        s.elem_dmg_up_pct = 5.0;
        let r = evaluate(&s);
        // (5000 × 2 + 1000) × 1.1 × 1.2 × 1.1
        let expected = 11000.0 * 1.1 * 1.2 * 1.1;
        assert!((r.after_defense - expected).abs() < 1e-6);
        assert_eq!(r.step(BreakdownStep::AfterSkillFlat), Some(11000.0));
    }

    #[test]
    fn test_crit_buffs_and_clamp() {
        let mut s = scenario_a();
        s.crit_rate = 80.0;
        s.crit_rate_up_pct = 50.0;
        s.crit_dmg_up_pct = 100.0;
        let r = evaluate(&s);
        assert!((r.crit_rate - 100.0).abs() < f64::EPSILON);
        assert!((r.crit_damage - 150.0).abs() < f64::EPSILON);
        assert_eq!(r.on_crit, 12500);
        assert_eq!(r.expected, 12500);

        s.crit_rate = -40.0;
        s.crit_rate_up_pct = 0.0;
        assert!(evaluate(&s).crit_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_damage_floors_to_zero() {
        let mut s = scenario_a();
        s.skill_flat = -100000.0;
        let r = evaluate(&s);
        assert_eq!((r.no_crit, r.expected, r.on_crit), (0, 0, 0));
    }

    #[test]
    fn test_huge_damage_saturates() {
        let mut s = scenario_a();
        s.skill_flat = 1e30;
        let r = evaluate(&s);
        assert_eq!((r.no_crit, r.expected, r.on_crit), (u64::MAX, u64::MAX, u64::MAX));

        assert_eq!(floor_figure(f64::INFINITY), u64::MAX);
        assert_eq!(floor_figure(f64::NAN), 0);
        assert_eq!(floor_figure(1234.9), 1234);
    }

    #[test]
    fn test_breakdown_order_is_pipeline_order() {
        let r = evaluate(&scenario_a());
        let steps: Vec<_> = r.breakdown.iter().map(|e| e.step).collect();
        let pos = |step| steps.iter().position(|s| *s == step).unwrap();
        assert!(pos(BreakdownStep::PreAttack) < pos(BreakdownStep::FinalAttack));
        assert!(pos(BreakdownStep::AfterDamageUp) < pos(BreakdownStep::AfterCardUp));
        assert!(pos(BreakdownStep::AfterCardUp) < pos(BreakdownStep::AfterElementalUp));
        assert!(pos(BreakdownStep::AfterAffinity) < pos(BreakdownStep::AfterBreak));
        assert!(pos(BreakdownStep::AfterBreak) < pos(BreakdownStep::AfterDefense));
        assert_eq!(*steps.last().unwrap(), BreakdownStep::CritDamage);
    }

    #[test]
    fn test_switch_to_simple_carries_figures() {
        let mut s = scenario_a();
        s.atk_up_pct = 10.0;
        s.equip.ring.sub.crit_rate = 5.0;
        s.elem_dmg_up_pct = 12.0;
        let before = evaluate(&s);

        switch_mode(&mut s, InputMode::Simple);
        assert_eq!(s.input_mode, InputMode::Simple);
        assert!((s.final_atk_input - 5500.0).abs() < f64::EPSILON);
        assert!((s.simple_crit_rate - 25.0).abs() < f64::EPSILON);
        assert!((s.simple_elem_pct - 12.0).abs() < f64::EPSILON);

        let after = evaluate(&s);
        assert_eq!(before.no_crit, after.no_crit);
        assert_eq!(before.expected, after.expected);
        assert_eq!(before.on_crit, after.on_crit);
    }

    #[test]
    fn test_switch_to_standard_seeds_pre_attack() {
        let mut s = scenario_a();
        s.bonus_atk = 250.4;
        switch_mode(&mut s, InputMode::Standard);
        assert!((s.pre_atk_input - 5250.0).abs() < f64::EPSILON);

        let snapshot = s.clone();
        switch_mode(&mut s, InputMode::Standard);
        assert_eq!(s, snapshot);
    }
}
