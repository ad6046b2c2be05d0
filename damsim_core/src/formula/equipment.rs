//! Gear aggregation - summing main and sub stats across the five slots

use crate::snapshot::Equipment;
use crate::types::{InputMode, MainStat};
use serde::{Deserialize, Serialize};

/// Per-bucket sums over all gear slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentTotals {
    pub atk: f64,
    pub atk_pct: f64,
    pub crit_rate: f64,
    pub crit_dmg: f64,
    pub elem_pct: f64,
}

impl EquipmentTotals {
    /// Sum every slot: the main stat goes to its selected bucket, the four
    /// sub stats are always added.
    pub fn aggregate(equip: &Equipment) -> Self {
        let mut totals = EquipmentTotals::default();
        for (_, piece) in equip.iter() {
            match piece.main_type {
                MainStat::Atk => totals.atk += piece.main_val,
                MainStat::AtkPct => totals.atk_pct += piece.main_val,
                MainStat::CritRate => totals.crit_rate += piece.main_val,
                MainStat::CritDmg => totals.crit_dmg += piece.main_val,
                MainStat::ElemDmgPct => totals.elem_pct += piece.main_val,
                MainStat::None => {}
            }
            totals.atk += piece.sub.atk;
            totals.atk_pct += piece.sub.atk_pct;
            totals.crit_rate += piece.sub.crit_rate;
            totals.crit_dmg += piece.sub.crit_dmg;
        }
        totals
    }
}

/// Which gear buckets feed the formula in a given mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentUsage {
    pub attack: bool,
    pub crit: bool,
    pub elemental: bool,
}

impl EquipmentUsage {
    pub fn for_mode(mode: InputMode) -> Self {
        match mode {
            InputMode::Gear => EquipmentUsage {
                attack: true,
                crit: true,
                elemental: true,
            },
            InputMode::Standard => EquipmentUsage {
                attack: false,
                crit: true,
                elemental: true,
            },
            InputMode::Simple => EquipmentUsage {
                attack: false,
                crit: false,
                elemental: false,
            },
        }
    }
}
