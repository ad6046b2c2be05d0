//! DamageResult - outcome of evaluating a snapshot

use super::equipment::EquipmentTotals;
use crate::types::InputMode;
use serde::{Deserialize, Serialize};

/// Named intermediate quantity of the formula pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownStep {
    EquipAtk,
    EquipAtkPct,
    EquipCritRate,
    EquipCritDmg,
    EquipElemPct,
    EquipAdjustedAtk,
    PreAttack,
    FinalAttack,
    AfterSkillMultiplier,
    AfterSkillFlat,
    AfterDamageUp,
    AfterCardUp,
    ElementalPct,
    AfterElementalUp,
    AffinityMultiplier,
    AfterAffinity,
    BreakMultiplier,
    AfterBreak,
    DefenseMultiplier,
    AfterDefense,
    CritRate,
    CritDamage,
}

/// How a breakdown value is best displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Whole number (attack totals)
    Integer,
    /// Two decimals (intermediate damage)
    Decimal,
    /// Percentage value
    Percent,
    /// Multiplier, four decimals
    Multiplier,
}

impl BreakdownStep {
    pub fn label(&self) -> &'static str {
        match self {
            BreakdownStep::EquipAtk => "Gear ATK",
            BreakdownStep::EquipAtkPct => "Gear ATK%",
            BreakdownStep::EquipCritRate => "Gear Crit Rate%",
            BreakdownStep::EquipCritDmg => "Gear Crit DMG%",
            BreakdownStep::EquipElemPct => "Gear Elem DMG%",
            BreakdownStep::EquipAdjustedAtk => "Gear ATK bonus",
            BreakdownStep::PreAttack => "Pre-battle ATK",
            BreakdownStep::FinalAttack => "Final ATK",
            BreakdownStep::AfterSkillMultiplier => "× Skill multiplier",
            BreakdownStep::AfterSkillFlat => "+ Skill flat",
            BreakdownStep::AfterDamageUp => "× DMG up",
            BreakdownStep::AfterCardUp => "× Card DMG up",
            BreakdownStep::ElementalPct => "Elem DMG% total",
            BreakdownStep::AfterElementalUp => "× Elem DMG up",
            BreakdownStep::AffinityMultiplier => "Affinity multiplier",
            BreakdownStep::AfterAffinity => "× Affinity",
            BreakdownStep::BreakMultiplier => "Break multiplier",
            BreakdownStep::AfterBreak => "× Break",
            BreakdownStep::DefenseMultiplier => "DEF multiplier",
            BreakdownStep::AfterDefense => "× DEF",
            BreakdownStep::CritRate => "Crit Rate%",
            BreakdownStep::CritDamage => "Crit DMG%",
        }
    }

    pub fn format(&self) -> ValueFormat {
        match self {
            BreakdownStep::EquipAtk
            | BreakdownStep::EquipAdjustedAtk
            | BreakdownStep::PreAttack
            | BreakdownStep::FinalAttack => ValueFormat::Integer,
            BreakdownStep::EquipAtkPct
            | BreakdownStep::EquipCritRate
            | BreakdownStep::EquipCritDmg
            | BreakdownStep::EquipElemPct
            | BreakdownStep::ElementalPct
            | BreakdownStep::CritRate
            | BreakdownStep::CritDamage => ValueFormat::Percent,
            BreakdownStep::AffinityMultiplier
            | BreakdownStep::BreakMultiplier
            | BreakdownStep::DefenseMultiplier => ValueFormat::Multiplier,
            _ => ValueFormat::Decimal,
        }
    }
}

/// One (label, value) line of the breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub step: BreakdownStep,
    pub value: f64,
}

impl BreakdownEntry {
    pub fn label(&self) -> &'static str {
        self.step.label()
    }

    /// Value formatted for display
    pub fn display(&self) -> String {
        match self.step.format() {
            ValueFormat::Integer => format!("{}", self.value.floor()),
            ValueFormat::Decimal => format!("{:.2}", self.value),
            ValueFormat::Percent => format!("{:.2}%", self.value),
            ValueFormat::Multiplier => format!("×{:.4}", self.value),
        }
    }
}

/// Result of evaluating a [`ParameterSnapshot`](crate::snapshot::ParameterSnapshot)
///
/// Purely derived: recompute from the snapshot instead of mutating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageResult {
    pub mode: InputMode,

    // === Gear ===
    /// Raw per-bucket gear sums (whether or not the mode uses them)
    pub equipment: EquipmentTotals,

    // === Attack ===
    pub pre_attack: f64,
    pub final_attack: f64,

    // === Multipliers ===
    pub elem_pct: f64,
    pub affinity_multiplier: f64,
    pub break_multiplier: f64,
    pub defense_multiplier: f64,
    /// Damage before crit, before flooring
    pub after_defense: f64,

    // === Crit ===
    /// Effective crit rate, clamped to [0, 100]
    pub crit_rate: f64,
    pub crit_damage: f64,

    // === Final figures ===
    pub no_crit: u64,
    pub on_crit: u64,
    pub expected: u64,

    /// Every intermediate quantity in pipeline order
    pub breakdown: Vec<BreakdownEntry>,
}

impl DamageResult {
    /// Look up one breakdown value
    pub fn step(&self, step: BreakdownStep) -> Option<f64> {
        self.breakdown
            .iter()
            .find(|e| e.step == step)
            .map(|e| e.value)
    }

    /// The three final figures in display order
    pub fn figures(&self) -> [(Figure, u64); 3] {
        [
            (Figure::NoCrit, self.no_crit),
            (Figure::Expected, self.expected),
            (Figure::OnCrit, self.on_crit),
        ]
    }

    pub fn figure(&self, figure: Figure) -> u64 {
        match figure {
            Figure::NoCrit => self.no_crit,
            Figure::Expected => self.expected,
            Figure::OnCrit => self.on_crit,
        }
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} normal / {} expected / {} crit ({:.1}% @ +{:.1}%)",
            self.no_crit, self.expected, self.on_crit, self.crit_rate, self.crit_damage
        )
    }
}

/// The three outcome assumptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Figure {
    NoCrit,
    Expected,
    OnCrit,
}

impl Figure {
    pub fn label(&self) -> &'static str {
        match self {
            Figure::NoCrit => "Normal",
            Figure::Expected => "Expected",
            Figure::OnCrit => "Crit",
        }
    }
}
