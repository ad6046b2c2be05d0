//! ParameterSnapshot - the complete input to one damage calculation

mod fields;
mod normalize;
mod number;
mod validate;

pub use fields::{FieldGroup, FieldId, FieldValue};
pub use normalize::{normalize, normalize_with};
pub use number::{parse_number, read_number};
pub use validate::{validate, ValidationIssue};

use crate::types::{Affinity, GearSlot, InputMode, MainStat, SubStat};
use serde::{Deserialize, Serialize};

/// Loosely-typed snapshot as it comes from storage or transport
pub type RawSnapshot = serde_json::Value;

/// Complete, normalized set of damage inputs
///
/// Serialized field names match the stored preset format, so a snapshot
/// written by [`ParameterSnapshot::to_raw`] reads back through
/// [`normalize`] unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSnapshot {
    pub input_mode: InputMode,

    // === Mode-specific direct inputs ===
    /// Final attack (simple mode)
    pub final_atk_input: f64,
    /// Pre-buff attack total (standard mode)
    pub pre_atk_input: f64,
    /// Final crit rate % (simple mode)
    pub simple_crit_rate: f64,
    /// Final crit damage % (simple mode)
    pub simple_crit_dmg: f64,
    /// Final elemental damage % (simple mode)
    pub simple_elem_pct: f64,

    // === Character ===
    pub base_atk: f64,
    pub bonus_atk: f64,
    pub crit_rate: f64,
    pub crit_dmg: f64,
    pub elem_pct: f64,

    // === Skill ===
    pub skill_pct: f64,
    pub skill_flat: f64,

    // === Battle buffs (percent) ===
    pub atk_up_pct: f64,
    pub dmg_up_pct: f64,
    pub card_dmg_up_pct: f64,
    pub elem_dmg_up_pct: f64,
    pub crit_rate_up_pct: f64,
    pub crit_dmg_up_pct: f64,

    // === Enemy ===
    pub enemy_def: f64,
    pub affinity: Affinity,
    pub is_break: bool,

    pub equip: Equipment,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        ParameterSnapshot {
            input_mode: InputMode::Simple,
            final_atk_input: 5000.0,
            pre_atk_input: 5000.0,
            simple_crit_rate: 20.0,
            simple_crit_dmg: 50.0,
            simple_elem_pct: 0.0,
            base_atk: 5000.0,
            bonus_atk: 0.0,
            crit_rate: 20.0,
            crit_dmg: 50.0,
            elem_pct: 0.0,
            skill_pct: 100.0,
            skill_flat: 0.0,
            atk_up_pct: 0.0,
            dmg_up_pct: 0.0,
            card_dmg_up_pct: 0.0,
            elem_dmg_up_pct: 0.0,
            crit_rate_up_pct: 0.0,
            crit_dmg_up_pct: 0.0,
            enemy_def: 0.0,
            affinity: Affinity::Neutral,
            is_break: false,
            equip: Equipment::default(),
        }
    }
}

impl ParameterSnapshot {
    /// Defaults with a different input mode
    pub fn with_mode(mode: InputMode) -> Self {
        ParameterSnapshot {
            input_mode: mode,
            ..Default::default()
        }
    }

    /// Serialize into the loosely-typed stored form
    pub fn to_raw(&self) -> RawSnapshot {
        // Every field is a plain number, bool or unit enum, so this cannot fail.
        serde_json::to_value(self).unwrap_or(RawSnapshot::Null)
    }
}

/// The five gear slots of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub glove: GearPiece,
    pub armor: GearPiece,
    pub emblem: GearPiece,
    pub ring: GearPiece,
    pub brooch: GearPiece,
}

impl Default for Equipment {
    fn default() -> Self {
        Equipment {
            glove: GearPiece::empty(GearSlot::Glove),
            armor: GearPiece::empty(GearSlot::Armor),
            emblem: GearPiece::empty(GearSlot::Emblem),
            ring: GearPiece::empty(GearSlot::Ring),
            brooch: GearPiece::empty(GearSlot::Brooch),
        }
    }
}

impl Equipment {
    pub fn get(&self, slot: GearSlot) -> &GearPiece {
        match slot {
            GearSlot::Glove => &self.glove,
            GearSlot::Armor => &self.armor,
            GearSlot::Emblem => &self.emblem,
            GearSlot::Ring => &self.ring,
            GearSlot::Brooch => &self.brooch,
        }
    }

    pub fn get_mut(&mut self, slot: GearSlot) -> &mut GearPiece {
        match slot {
            GearSlot::Glove => &mut self.glove,
            GearSlot::Armor => &mut self.armor,
            GearSlot::Emblem => &mut self.emblem,
            GearSlot::Ring => &mut self.ring,
            GearSlot::Brooch => &mut self.brooch,
        }
    }

    /// Iterate pieces in slot order
    pub fn iter(&self) -> impl Iterator<Item = (GearSlot, &GearPiece)> {
        GearSlot::all().iter().map(move |slot| (*slot, self.get(*slot)))
    }
}

/// One gear piece: a main stat plus four sub stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GearPiece {
    pub main_type: MainStat,
    pub main_val: f64,
    pub sub: SubStats,
}

impl GearPiece {
    /// A zeroed piece with the slot's default main stat
    pub fn empty(slot: GearSlot) -> Self {
        GearPiece {
            main_type: slot.default_main(),
            main_val: 0.0,
            sub: SubStats::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubStats {
    pub atk: f64,
    pub atk_pct: f64,
    pub crit_rate: f64,
    pub crit_dmg: f64,
}

impl SubStats {
    pub fn get(&self, stat: SubStat) -> f64 {
        match stat {
            SubStat::Atk => self.atk,
            SubStat::AtkPct => self.atk_pct,
            SubStat::CritRate => self.crit_rate,
            SubStat::CritDmg => self.crit_dmg,
        }
    }

    pub fn get_mut(&mut self, stat: SubStat) -> &mut f64 {
        match stat {
            SubStat::Atk => &mut self.atk,
            SubStat::AtkPct => &mut self.atk_pct,
            SubStat::CritRate => &mut self.crit_rate,
            SubStat::CritDmg => &mut self.crit_dmg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_equipment_main_types() {
        let equip = Equipment::default();
        assert_eq!(equip.glove.main_type, MainStat::Atk);
        assert_eq!(equip.armor.main_type, MainStat::None);
        assert_eq!(equip.iter().count(), 5);
    }

    #[test]
    fn test_raw_uses_stored_field_names() {
        let raw = ParameterSnapshot::default().to_raw();
        assert_eq!(raw["inputMode"], "simple");
        assert_eq!(raw["baseAtk"], 5000.0);
        assert_eq!(raw["isBreak"], false);
        assert_eq!(raw["affinity"], "none");
        assert_eq!(raw["equip"]["armor"]["mainType"], "other");
        assert_eq!(raw["equip"]["ring"]["sub"]["critDmg"], 0.0);
    }

    #[test]
    fn test_raw_round_trip_through_normalize() {
        let mut snapshot = ParameterSnapshot::with_mode(InputMode::Gear);
        snapshot.enemy_def = 300.0;
        snapshot.affinity = Affinity::Disadvantage;
        snapshot.equip.ring.main_type = MainStat::CritDmg;
        snapshot.equip.ring.main_val = 12.5;
        snapshot.equip.brooch.sub.atk_pct = 4.0;

        assert_eq!(normalize(&snapshot.to_raw()), snapshot);
    }
}
