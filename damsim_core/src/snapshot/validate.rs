//! Range checks for the input surface
//!
//! Issues are warnings only. The formula clamps or tolerates every
//! finite value, so nothing here blocks a calculation.

use super::{FieldId, ParameterSnapshot};
use crate::types::{GearSlot, SubStat};

/// A field whose value is outside its sensible range
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub field: FieldId,
    pub message: &'static str,
}

impl ValidationIssue {
    fn new(field: FieldId, message: &'static str) -> Self {
        ValidationIssue { field, message }
    }
}

/// Check the fields that apply to the snapshot's mode
pub fn validate(s: &ParameterSnapshot) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mode = s.input_mode;

    let non_negative = [
        (FieldId::FinalAtkInput, "final ATK should not be negative"),
        (FieldId::PreAtkInput, "pre-battle ATK should not be negative"),
        (FieldId::BaseAtk, "base ATK should not be negative"),
        (FieldId::BonusAtk, "bonus ATK should not be negative"),
        (FieldId::SkillPct, "skill multiplier should not be negative"),
        (FieldId::EnemyDef, "negative DEF is treated as 0"),
    ];
    for (field, message) in non_negative {
        if field.applies_in(mode) && field.number(s).is_some_and(|n| n < 0.0) {
            issues.push(ValidationIssue::new(field, message));
        }
    }

    let percent_range = [
        (FieldId::CritRate, "crit rate should be within 0-100%"),
        (FieldId::SimpleCritRate, "crit rate should be within 0-100%"),
    ];
    for (field, message) in percent_range {
        if field.applies_in(mode) && field.number(s).is_some_and(|n| !(0.0..=100.0).contains(&n)) {
            issues.push(ValidationIssue::new(field, message));
        }
    }

    for slot in GearSlot::all() {
        let field = FieldId::Sub(*slot, SubStat::CritRate);
        if field.applies_in(mode) && s.equip.get(*slot).sub.crit_rate < 0.0 {
            issues.push(ValidationIssue::new(field, "sub stat should not be negative"));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InputMode;

    #[test]
    fn test_defaults_are_clean() {
        for mode in InputMode::all() {
            assert!(validate(&ParameterSnapshot::with_mode(*mode)).is_empty());
        }
    }

    #[test]
    fn test_flags_out_of_range() {
        let mut s = ParameterSnapshot::with_mode(InputMode::Gear);
        s.crit_rate = 140.0;
        s.enemy_def = -10.0;
        s.base_atk = -1.0;
        let issues = validate(&s);
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert!(fields.contains(&FieldId::CritRate));
        assert!(fields.contains(&FieldId::EnemyDef));
        assert!(fields.contains(&FieldId::BaseAtk));
    }

    #[test]
    fn test_ignores_fields_of_other_modes() {
        let mut s = ParameterSnapshot::with_mode(InputMode::Simple);
        s.base_atk = -500.0;
        s.crit_rate = 300.0;
        assert!(validate(&s).is_empty());
    }
}
