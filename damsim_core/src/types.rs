//! Core enums shared by the snapshot model, the formula and the comparison model

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the attack side of a snapshot is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Final (in-battle) attack and crit values are entered directly
    Simple,
    /// Pre-buff attack total is entered; gear still feeds crit and elemental
    Standard,
    /// Full breakdown: base attack, bonus attack and five gear slots
    Gear,
}

impl InputMode {
    pub fn all() -> &'static [InputMode] {
        &[InputMode::Simple, InputMode::Standard, InputMode::Gear]
    }

    /// Parse a stored mode name. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<InputMode> {
        match s.trim() {
            "simple" => Some(InputMode::Simple),
            "standard" => Some(InputMode::Standard),
            "gear" => Some(InputMode::Gear),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            InputMode::Simple => "simple",
            InputMode::Standard => "standard",
            InputMode::Gear => "gear",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputMode::Simple => "Simple",
            InputMode::Standard => "Standard",
            InputMode::Gear => "Gear",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InputMode::Simple => "Enter the in-battle final attack and crit values directly.",
            InputMode::Standard => "Enter the pre-battle attack total including gear bonuses.",
            InputMode::Gear => "Enter base, bonus and per-slot gear values in detail.",
        }
    }

    pub fn next(&self) -> InputMode {
        match self {
            InputMode::Simple => InputMode::Standard,
            InputMode::Standard => InputMode::Gear,
            InputMode::Gear => InputMode::Simple,
        }
    }

    pub fn prev(&self) -> InputMode {
        match self {
            InputMode::Simple => InputMode::Gear,
            InputMode::Standard => InputMode::Simple,
            InputMode::Gear => InputMode::Standard,
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Elemental matchup against the enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Affinity {
    #[default]
    #[serde(rename = "none")]
    Neutral,
    #[serde(rename = "adv", alias = "advantage")]
    Advantage,
    #[serde(rename = "dis", alias = "disadvantage")]
    Disadvantage,
}

impl Affinity {
    pub fn all() -> &'static [Affinity] {
        &[Affinity::Neutral, Affinity::Advantage, Affinity::Disadvantage]
    }

    /// Lenient parse: anything unrecognised is neutral
    pub fn parse(s: &str) -> Affinity {
        match s.trim() {
            "adv" | "advantage" => Affinity::Advantage,
            "dis" | "disadvantage" => Affinity::Disadvantage,
            _ => Affinity::Neutral,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Affinity::Neutral => "none",
            Affinity::Advantage => "adv",
            Affinity::Disadvantage => "dis",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Affinity::Neutral => "None",
            Affinity::Advantage => "Advantage",
            Affinity::Disadvantage => "Disadvantage",
        }
    }

    pub fn next(&self) -> Affinity {
        match self {
            Affinity::Neutral => Affinity::Advantage,
            Affinity::Advantage => Affinity::Disadvantage,
            Affinity::Disadvantage => Affinity::Neutral,
        }
    }

    pub fn prev(&self) -> Affinity {
        match self {
            Affinity::Neutral => Affinity::Disadvantage,
            Affinity::Advantage => Affinity::Neutral,
            Affinity::Disadvantage => Affinity::Advantage,
        }
    }
}

/// The five gear slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GearSlot {
    Glove,
    Armor,
    Emblem,
    Ring,
    Brooch,
}

impl GearSlot {
    /// Get all gear slots in display order
    pub fn all() -> &'static [GearSlot] {
        &[
            GearSlot::Glove,
            GearSlot::Armor,
            GearSlot::Emblem,
            GearSlot::Ring,
            GearSlot::Brooch,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            GearSlot::Glove => "glove",
            GearSlot::Armor => "armor",
            GearSlot::Emblem => "emblem",
            GearSlot::Ring => "ring",
            GearSlot::Brooch => "brooch",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GearSlot::Glove => "Glove",
            GearSlot::Armor => "Armor",
            GearSlot::Emblem => "Emblem",
            GearSlot::Ring => "Ring",
            GearSlot::Brooch => "Brooch",
        }
    }

    /// Main stat a fresh piece in this slot starts with
    pub fn default_main(&self) -> MainStat {
        match self {
            GearSlot::Armor => MainStat::None,
            _ => MainStat::Atk,
        }
    }
}

/// Main stat selection of a gear piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MainStat {
    Atk,
    AtkPct,
    CritRate,
    CritDmg,
    ElemDmgPct,
    #[serde(rename = "other", alias = "none")]
    None,
}

impl MainStat {
    pub fn all() -> &'static [MainStat] {
        &[
            MainStat::Atk,
            MainStat::AtkPct,
            MainStat::CritRate,
            MainStat::CritDmg,
            MainStat::ElemDmgPct,
            MainStat::None,
        ]
    }

    pub fn parse(s: &str) -> Option<MainStat> {
        match s.trim() {
            "atk" => Some(MainStat::Atk),
            "atkPct" => Some(MainStat::AtkPct),
            "critRate" => Some(MainStat::CritRate),
            "critDmg" => Some(MainStat::CritDmg),
            "elemDmgPct" => Some(MainStat::ElemDmgPct),
            "other" | "none" => Some(MainStat::None),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            MainStat::Atk => "atk",
            MainStat::AtkPct => "atkPct",
            MainStat::CritRate => "critRate",
            MainStat::CritDmg => "critDmg",
            MainStat::ElemDmgPct => "elemDmgPct",
            MainStat::None => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MainStat::Atk => "ATK",
            MainStat::AtkPct => "ATK%",
            MainStat::CritRate => "Crit Rate%",
            MainStat::CritDmg => "Crit DMG%",
            MainStat::ElemDmgPct => "Elem DMG%",
            MainStat::None => "—",
        }
    }

    pub fn next(&self) -> MainStat {
        let all = MainStat::all();
        let idx = all.iter().position(|m| m == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> MainStat {
        let all = MainStat::all();
        let idx = all.iter().position(|m| m == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

/// The four always-present sub stats of a gear piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubStat {
    Atk,
    AtkPct,
    CritRate,
    CritDmg,
}

impl SubStat {
    pub fn all() -> &'static [SubStat] {
        &[SubStat::Atk, SubStat::AtkPct, SubStat::CritRate, SubStat::CritDmg]
    }

    pub fn key(&self) -> &'static str {
        match self {
            SubStat::Atk => "atk",
            SubStat::AtkPct => "atkPct",
            SubStat::CritRate => "critRate",
            SubStat::CritDmg => "critDmg",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubStat::Atk => "ATK",
            SubStat::AtkPct => "ATK%",
            SubStat::CritRate => "Crit Rate%",
            SubStat::CritDmg => "Crit DMG%",
        }
    }
}

/// One of the two comparison slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn parse(s: &str) -> Option<Side> {
        match s.trim() {
            "A" => Some(Side::A),
            "B" => Some(Side::B),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// Display role of a slot in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Comparison source
    Base,
    /// Comparison target
    Comp,
}
