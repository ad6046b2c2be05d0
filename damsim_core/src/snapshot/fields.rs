//! Explicit field table for the input surface
//!
//! Every editable value of a [`ParameterSnapshot`] has exactly one
//! [`FieldId`]. The input surface walks [`FieldId::all`] instead of
//! addressing snapshot fields by string.

use super::number::parse_number;
use super::ParameterSnapshot;
use crate::types::{Affinity, GearSlot, InputMode, MainStat, SubStat};

/// Input group a field is shown under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    Mode,
    Status,
    Equipment,
    Skill,
    Battle,
    Enemy,
}

impl FieldGroup {
    pub fn all() -> &'static [FieldGroup] {
        &[
            FieldGroup::Mode,
            FieldGroup::Status,
            FieldGroup::Equipment,
            FieldGroup::Skill,
            FieldGroup::Battle,
            FieldGroup::Enemy,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldGroup::Mode => "Mode",
            FieldGroup::Status => "Status",
            FieldGroup::Equipment => "Equipment",
            FieldGroup::Skill => "Skill",
            FieldGroup::Battle => "Battle Buffs",
            FieldGroup::Enemy => "Enemy",
        }
    }
}

/// Identifier of one editable value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    InputMode,
    FinalAtkInput,
    PreAtkInput,
    SimpleCritRate,
    SimpleCritDmg,
    SimpleElemPct,
    BaseAtk,
    BonusAtk,
    CritRate,
    CritDmg,
    ElemPct,
    SkillPct,
    SkillFlat,
    AtkUpPct,
    DmgUpPct,
    CardDmgUpPct,
    ElemDmgUpPct,
    CritRateUpPct,
    CritDmgUpPct,
    EnemyDef,
    Affinity,
    IsBreak,
    MainType(GearSlot),
    MainVal(GearSlot),
    Sub(GearSlot, SubStat),
}

/// Current value of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Mode(InputMode),
    Affinity(Affinity),
    Toggle(bool),
    MainStat(MainStat),
}

const SCALAR_FIELDS: [FieldId; 22] = [
    FieldId::InputMode,
    FieldId::FinalAtkInput,
    FieldId::PreAtkInput,
    FieldId::BaseAtk,
    FieldId::BonusAtk,
    FieldId::SimpleCritRate,
    FieldId::SimpleCritDmg,
    FieldId::SimpleElemPct,
    FieldId::CritRate,
    FieldId::CritDmg,
    FieldId::ElemPct,
    FieldId::SkillPct,
    FieldId::SkillFlat,
    FieldId::AtkUpPct,
    FieldId::DmgUpPct,
    FieldId::CardDmgUpPct,
    FieldId::ElemDmgUpPct,
    FieldId::CritRateUpPct,
    FieldId::CritDmgUpPct,
    FieldId::EnemyDef,
    FieldId::Affinity,
    FieldId::IsBreak,
];

impl FieldId {
    /// Every field, grouped and in display order
    pub fn all() -> Vec<FieldId> {
        let mut fields = Vec::with_capacity(SCALAR_FIELDS.len() + GearSlot::all().len() * 6);
        for group in FieldGroup::all() {
            if *group == FieldGroup::Equipment {
                for slot in GearSlot::all() {
                    fields.push(FieldId::MainType(*slot));
                    fields.push(FieldId::MainVal(*slot));
                    for sub in SubStat::all() {
                        fields.push(FieldId::Sub(*slot, *sub));
                    }
                }
            } else {
                fields.extend(SCALAR_FIELDS.iter().filter(|f| f.group() == *group));
            }
        }
        fields
    }

    pub fn group(&self) -> FieldGroup {
        match self {
            FieldId::InputMode => FieldGroup::Mode,
            FieldId::FinalAtkInput
            | FieldId::PreAtkInput
            | FieldId::SimpleCritRate
            | FieldId::SimpleCritDmg
            | FieldId::SimpleElemPct
            | FieldId::BaseAtk
            | FieldId::BonusAtk
            | FieldId::CritRate
            | FieldId::CritDmg
            | FieldId::ElemPct => FieldGroup::Status,
            FieldId::SkillPct | FieldId::SkillFlat => FieldGroup::Skill,
            FieldId::AtkUpPct
            | FieldId::DmgUpPct
            | FieldId::CardDmgUpPct
            | FieldId::ElemDmgUpPct
            | FieldId::CritRateUpPct
            | FieldId::CritDmgUpPct => FieldGroup::Battle,
            FieldId::EnemyDef | FieldId::Affinity | FieldId::IsBreak => FieldGroup::Enemy,
            FieldId::MainType(_) | FieldId::MainVal(_) | FieldId::Sub(_, _) => {
                FieldGroup::Equipment
            }
        }
    }

    /// Stored key of the field (slot-qualified for gear fields)
    pub fn key(&self) -> String {
        match self {
            FieldId::InputMode => "inputMode".to_string(),
            FieldId::FinalAtkInput => "finalAtkInput".to_string(),
            FieldId::PreAtkInput => "preAtkInput".to_string(),
            FieldId::SimpleCritRate => "simpleCritRate".to_string(),
            FieldId::SimpleCritDmg => "simpleCritDmg".to_string(),
            FieldId::SimpleElemPct => "simpleElemPct".to_string(),
            FieldId::BaseAtk => "baseAtk".to_string(),
            FieldId::BonusAtk => "bonusAtk".to_string(),
            FieldId::CritRate => "critRate".to_string(),
            FieldId::CritDmg => "critDmg".to_string(),
            FieldId::ElemPct => "elemPct".to_string(),
            FieldId::SkillPct => "skillPct".to_string(),
            FieldId::SkillFlat => "skillFlat".to_string(),
            FieldId::AtkUpPct => "atkUpPct".to_string(),
            FieldId::DmgUpPct => "dmgUpPct".to_string(),
            FieldId::CardDmgUpPct => "cardDmgUpPct".to_string(),
            FieldId::ElemDmgUpPct => "elemDmgUpPct".to_string(),
            FieldId::CritRateUpPct => "critRateUpPct".to_string(),
            FieldId::CritDmgUpPct => "critDmgUpPct".to_string(),
            FieldId::EnemyDef => "enemyDef".to_string(),
            FieldId::Affinity => "affinity".to_string(),
            FieldId::IsBreak => "isBreak".to_string(),
            FieldId::MainType(slot) => format!("equip.{}.mainType", slot.key()),
            FieldId::MainVal(slot) => format!("equip.{}.mainVal", slot.key()),
            FieldId::Sub(slot, sub) => format!("equip.{}.sub.{}", slot.key(), sub.key()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            FieldId::InputMode => "Input Mode".to_string(),
            FieldId::FinalAtkInput => "Final ATK".to_string(),
            FieldId::PreAtkInput => "Pre-battle ATK".to_string(),
            FieldId::SimpleCritRate => "Final Crit Rate%".to_string(),
            FieldId::SimpleCritDmg => "Final Crit DMG%".to_string(),
            FieldId::SimpleElemPct => "Final Elem DMG%".to_string(),
            FieldId::BaseAtk => "Base ATK".to_string(),
            FieldId::BonusAtk => "Bonus ATK".to_string(),
            FieldId::CritRate => "Crit Rate%".to_string(),
            FieldId::CritDmg => "Crit DMG%".to_string(),
            FieldId::ElemPct => "Elem DMG%".to_string(),
            FieldId::SkillPct => "Skill Multiplier%".to_string(),
            FieldId::SkillFlat => "Skill Flat".to_string(),
            FieldId::AtkUpPct => "ATK Up%".to_string(),
            FieldId::DmgUpPct => "DMG Up%".to_string(),
            FieldId::CardDmgUpPct => "Card DMG Up%".to_string(),
            FieldId::ElemDmgUpPct => "Elem DMG Up%".to_string(),
            FieldId::CritRateUpPct => "Crit Rate Up%".to_string(),
            FieldId::CritDmgUpPct => "Crit DMG Up%".to_string(),
            FieldId::EnemyDef => "Enemy DEF".to_string(),
            FieldId::Affinity => "Affinity".to_string(),
            FieldId::IsBreak => "Break".to_string(),
            FieldId::MainType(slot) => format!("{} Main", slot.label()),
            FieldId::MainVal(slot) => format!("{} Main Value", slot.label()),
            FieldId::Sub(slot, sub) => format!("{} Sub {}", slot.label(), sub.label()),
        }
    }

    /// Whether the field feeds the formula in the given mode
    pub fn applies_in(&self, mode: InputMode) -> bool {
        use InputMode::*;
        match self {
            FieldId::InputMode => true,
            FieldId::FinalAtkInput
            | FieldId::SimpleCritRate
            | FieldId::SimpleCritDmg
            | FieldId::SimpleElemPct => mode == Simple,
            FieldId::PreAtkInput => mode == Standard,
            FieldId::BaseAtk | FieldId::BonusAtk => mode == Gear,
            FieldId::CritRate
            | FieldId::CritDmg
            | FieldId::ElemPct
            | FieldId::AtkUpPct
            | FieldId::ElemDmgUpPct
            | FieldId::CritRateUpPct
            | FieldId::CritDmgUpPct => mode != Simple,
            FieldId::SkillPct
            | FieldId::SkillFlat
            | FieldId::DmgUpPct
            | FieldId::CardDmgUpPct
            | FieldId::EnemyDef
            | FieldId::Affinity
            | FieldId::IsBreak => true,
            FieldId::MainType(_) | FieldId::MainVal(_) => mode != Simple,
            FieldId::Sub(_, sub) => match mode {
                Simple => false,
                Standard => matches!(sub, SubStat::CritRate | SubStat::CritDmg),
                Gear => true,
            },
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            FieldId::InputMode | FieldId::Affinity | FieldId::IsBreak | FieldId::MainType(_)
        )
    }

    pub fn get(&self, s: &ParameterSnapshot) -> FieldValue {
        match self {
            FieldId::InputMode => FieldValue::Mode(s.input_mode),
            FieldId::Affinity => FieldValue::Affinity(s.affinity),
            FieldId::IsBreak => FieldValue::Toggle(s.is_break),
            FieldId::MainType(slot) => FieldValue::MainStat(s.equip.get(*slot).main_type),
            _ => FieldValue::Number(self.number(s).unwrap_or(0.0)),
        }
    }

    pub fn number(&self, s: &ParameterSnapshot) -> Option<f64> {
        let n = match self {
            FieldId::FinalAtkInput => s.final_atk_input,
            FieldId::PreAtkInput => s.pre_atk_input,
            FieldId::SimpleCritRate => s.simple_crit_rate,
            FieldId::SimpleCritDmg => s.simple_crit_dmg,
            FieldId::SimpleElemPct => s.simple_elem_pct,
            FieldId::BaseAtk => s.base_atk,
            FieldId::BonusAtk => s.bonus_atk,
            FieldId::CritRate => s.crit_rate,
            FieldId::CritDmg => s.crit_dmg,
            FieldId::ElemPct => s.elem_pct,
            FieldId::SkillPct => s.skill_pct,
            FieldId::SkillFlat => s.skill_flat,
            FieldId::AtkUpPct => s.atk_up_pct,
            FieldId::DmgUpPct => s.dmg_up_pct,
            FieldId::CardDmgUpPct => s.card_dmg_up_pct,
            FieldId::ElemDmgUpPct => s.elem_dmg_up_pct,
            FieldId::CritRateUpPct => s.crit_rate_up_pct,
            FieldId::CritDmgUpPct => s.crit_dmg_up_pct,
            FieldId::EnemyDef => s.enemy_def,
            FieldId::MainVal(slot) => s.equip.get(*slot).main_val,
            FieldId::Sub(slot, sub) => s.equip.get(*slot).sub.get(*sub),
            FieldId::InputMode | FieldId::Affinity | FieldId::IsBreak | FieldId::MainType(_) => {
                return None
            }
        };
        Some(n)
    }

    /// Mutable access to a numeric field; `None` for choice fields
    pub fn number_mut<'a>(&self, s: &'a mut ParameterSnapshot) -> Option<&'a mut f64> {
        let n = match self {
            FieldId::FinalAtkInput => &mut s.final_atk_input,
            FieldId::PreAtkInput => &mut s.pre_atk_input,
            FieldId::SimpleCritRate => &mut s.simple_crit_rate,
            FieldId::SimpleCritDmg => &mut s.simple_crit_dmg,
            FieldId::SimpleElemPct => &mut s.simple_elem_pct,
            FieldId::BaseAtk => &mut s.base_atk,
            FieldId::BonusAtk => &mut s.bonus_atk,
            FieldId::CritRate => &mut s.crit_rate,
            FieldId::CritDmg => &mut s.crit_dmg,
            FieldId::ElemPct => &mut s.elem_pct,
            FieldId::SkillPct => &mut s.skill_pct,
            FieldId::SkillFlat => &mut s.skill_flat,
            FieldId::AtkUpPct => &mut s.atk_up_pct,
            FieldId::DmgUpPct => &mut s.dmg_up_pct,
            FieldId::CardDmgUpPct => &mut s.card_dmg_up_pct,
            FieldId::ElemDmgUpPct => &mut s.elem_dmg_up_pct,
            FieldId::CritRateUpPct => &mut s.crit_rate_up_pct,
            FieldId::CritDmgUpPct => &mut s.crit_dmg_up_pct,
            FieldId::EnemyDef => &mut s.enemy_def,
            FieldId::MainVal(slot) => &mut s.equip.get_mut(*slot).main_val,
            FieldId::Sub(slot, sub) => s.equip.get_mut(*slot).sub.get_mut(*sub),
            FieldId::InputMode | FieldId::Affinity | FieldId::IsBreak | FieldId::MainType(_) => {
                return None
            }
        };
        Some(n)
    }

    /// Apply raw text from the input surface.
    ///
    /// Numbers parse leniently with a fallback of 0. Choice fields accept
    /// their stored keys; an unrecognised mode or main stat leaves the
    /// field unchanged.
    pub fn set_text(&self, s: &mut ParameterSnapshot, text: &str) {
        match self {
            FieldId::InputMode => {
                if let Some(mode) = InputMode::parse(text) {
                    s.input_mode = mode;
                }
            }
            FieldId::Affinity => s.affinity = Affinity::parse(text),
            FieldId::IsBreak => s.is_break = matches!(text.trim(), "true" | "1" | "on" | "yes"),
            FieldId::MainType(slot) => {
                if let Some(stat) = MainStat::parse(text) {
                    s.equip.get_mut(*slot).main_type = stat;
                }
            }
            _ => {
                if let Some(n) = self.number_mut(s) {
                    *n = parse_number(text, 0.0);
                }
            }
        }
    }

    /// Step a choice or toggle field. Numeric fields are left alone.
    pub fn cycle(&self, s: &mut ParameterSnapshot, forward: bool) {
        match self {
            FieldId::InputMode => {
                s.input_mode = if forward {
                    s.input_mode.next()
                } else {
                    s.input_mode.prev()
                }
            }
            FieldId::Affinity => {
                s.affinity = if forward {
                    s.affinity.next()
                } else {
                    s.affinity.prev()
                }
            }
            FieldId::IsBreak => s.is_break = !s.is_break,
            FieldId::MainType(slot) => {
                let piece = s.equip.get_mut(*slot);
                piece.main_type = if forward {
                    piece.main_type.next()
                } else {
                    piece.main_type.prev()
                };
            }
            _ => {}
        }
    }

    /// Text shown for the field's current value
    pub fn display(&self, s: &ParameterSnapshot) -> String {
        match self.get(s) {
            FieldValue::Number(n) => format_number(n),
            FieldValue::Mode(mode) => mode.label().to_string(),
            FieldValue::Affinity(aff) => aff.label().to_string(),
            FieldValue::Toggle(on) => if on { "Yes" } else { "No" }.to_string(),
            FieldValue::MainStat(stat) => stat.label().to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        let text = format!("{:.2}", n);
        text.trim_end_matches('0').to_string()
    }
}
