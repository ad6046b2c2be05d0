//! Normalization of loosely-typed snapshots into the full shape

use super::number::read_number;
use super::{GearPiece, ParameterSnapshot, RawSnapshot, SubStats};
use crate::types::{Affinity, GearSlot, InputMode, MainStat};
use log::debug;
use serde_json::{Map, Value};

/// Normalize against the built-in defaults
pub fn normalize(raw: &RawSnapshot) -> ParameterSnapshot {
    normalize_with(raw, &ParameterSnapshot::default())
}

/// Normalize a possibly partial or malformed snapshot.
///
/// Never fails. Missing fields take the value from `defaults`; present
/// but unusable values fall back field by field:
/// - a missing or unknown `inputMode` becomes [`InputMode::Gear`]
/// - `preAtkInput` falls back to `baseAtk + bonusAtk`
/// - `simpleCritRate` / `simpleCritDmg` fall back to `critRate` / `critDmg`
/// - `simpleElemPct` falls back to `elemPct + elemDmgUpPct`
/// - an unknown gear `mainType` contributes nothing ([`MainStat::None`])
///
/// A non-object input yields a clone of `defaults`.
pub fn normalize_with(raw: &RawSnapshot, defaults: &ParameterSnapshot) -> ParameterSnapshot {
    let obj = match raw.as_object() {
        Some(obj) => obj,
        None => {
            if !raw.is_null() {
                debug!("snapshot is not an object, using defaults");
            }
            return defaults.clone();
        }
    };

    let input_mode = match obj.get("inputMode") {
        None => {
            debug!("snapshot has no input mode, using gear");
            InputMode::Gear
        }
        Some(Value::String(s)) => InputMode::parse(s).unwrap_or_else(|| {
            debug!("unknown input mode {:?}, falling back to gear", s);
            InputMode::Gear
        }),
        Some(other) => {
            debug!("malformed input mode {}, falling back to gear", other);
            InputMode::Gear
        }
    };

    let base_atk = field(obj, "baseAtk", defaults.base_atk);
    let bonus_atk = field(obj, "bonusAtk", defaults.bonus_atk);
    let crit_rate = field(obj, "critRate", defaults.crit_rate);
    let crit_dmg = field(obj, "critDmg", defaults.crit_dmg);
    let elem_pct = field(obj, "elemPct", defaults.elem_pct);
    let elem_dmg_up_pct = field(obj, "elemDmgUpPct", defaults.elem_dmg_up_pct);

    ParameterSnapshot {
        input_mode,
        final_atk_input: field(obj, "finalAtkInput", defaults.final_atk_input),
        pre_atk_input: field(obj, "preAtkInput", base_atk + bonus_atk),
        simple_crit_rate: field(obj, "simpleCritRate", crit_rate),
        simple_crit_dmg: field(obj, "simpleCritDmg", crit_dmg),
        simple_elem_pct: field(obj, "simpleElemPct", elem_pct + elem_dmg_up_pct),
        base_atk,
        bonus_atk,
        crit_rate,
        crit_dmg,
        elem_pct,
        skill_pct: field(obj, "skillPct", defaults.skill_pct),
        skill_flat: field(obj, "skillFlat", defaults.skill_flat),
        atk_up_pct: field(obj, "atkUpPct", defaults.atk_up_pct),
        dmg_up_pct: field(obj, "dmgUpPct", defaults.dmg_up_pct),
        card_dmg_up_pct: field(obj, "cardDmgUpPct", defaults.card_dmg_up_pct),
        elem_dmg_up_pct,
        crit_rate_up_pct: field(obj, "critRateUpPct", defaults.crit_rate_up_pct),
        crit_dmg_up_pct: field(obj, "critDmgUpPct", defaults.crit_dmg_up_pct),
        enemy_def: field(obj, "enemyDef", defaults.enemy_def),
        affinity: match obj.get("affinity") {
            None => defaults.affinity,
            Some(Value::String(s)) => Affinity::parse(s),
            Some(_) => Affinity::Neutral,
        },
        is_break: obj
            .get("isBreak")
            .map(read_flag)
            .unwrap_or(defaults.is_break),
        equip: normalize_equipment(obj.get("equip"), defaults),
    }
}

/// Read one numeric field, logging when a present value had to be replaced
fn field(obj: &Map<String, Value>, key: &str, fallback: f64) -> f64 {
    let value = obj.get(key);
    let n = read_number(value, f64::NAN);
    if n.is_nan() {
        if let Some(v) = value {
            debug!("field {} has unusable value {}, using {}", key, v, fallback);
        }
        fallback
    } else {
        n
    }
}

fn read_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim(), "true" | "1"),
        _ => false,
    }
}

fn normalize_equipment(raw: Option<&Value>, defaults: &ParameterSnapshot) -> super::Equipment {
    let mut equip = defaults.equip.clone();
    let obj = match raw.and_then(Value::as_object) {
        Some(obj) => obj,
        None => return equip,
    };

    for slot in GearSlot::all() {
        let fallback = defaults.equip.get(*slot);
        *equip.get_mut(*slot) = normalize_piece(*slot, obj.get(slot.key()), fallback);
    }
    equip
}

fn normalize_piece(slot: GearSlot, raw: Option<&Value>, fallback: &GearPiece) -> GearPiece {
    let obj = match raw.and_then(Value::as_object) {
        Some(obj) => obj,
        None => return fallback.clone(),
    };

    let main_type = match obj.get("mainType") {
        Some(Value::String(s)) => MainStat::parse(s).unwrap_or_else(|| {
            debug!("unknown main stat {:?} on {}, treating as none", s, slot.key());
            MainStat::None
        }),
        _ => fallback.main_type,
    };

    let empty = Map::new();
    let sub = obj.get("sub").and_then(Value::as_object).unwrap_or(&empty);

    GearPiece {
        main_type,
        main_val: field(obj, "mainVal", fallback.main_val),
        sub: SubStats {
            atk: field(sub, "atk", fallback.sub.atk),
            atk_pct: field(sub, "atkPct", fallback.sub.atk_pct),
            crit_rate: field(sub, "critRate", fallback.sub.crit_rate),
            crit_dmg: field(sub, "critDmg", fallback.sub.crit_dmg),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_yields_defaults() {
        assert_eq!(normalize(&json!(null)), ParameterSnapshot::default());
        assert_eq!(normalize(&json!("garbage")), ParameterSnapshot::default());
        assert_eq!(normalize(&json!([1, 2, 3])), ParameterSnapshot::default());
    }

    #[test]
    fn test_empty_object_fills_every_field() {
        let s = normalize(&json!({}));
        assert_eq!(s, ParameterSnapshot::with_mode(InputMode::Gear));
    }

    #[test]
    fn test_unknown_mode_falls_back_to_gear() {
        let s = normalize(&json!({ "inputMode": "detailed" }));
        assert_eq!(s.input_mode, InputMode::Gear);
        let s = normalize(&json!({ "inputMode": 3 }));
        assert_eq!(s.input_mode, InputMode::Gear);
    }

    #[test]
    fn test_malformed_numbers_fail_soft() {
        let s = normalize(&json!({
            "baseAtk": "abc",
            "bonusAtk": "1,200",
            "enemyDef": null,
            "skillPct": true,
        }));
        assert!((s.base_atk - 5000.0).abs() < f64::EPSILON);
        assert!((s.bonus_atk - 1200.0).abs() < f64::EPSILON);
        assert!(s.enemy_def.abs() < f64::EPSILON);
        assert!((s.skill_pct - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_derived_fallbacks() {
        let s = normalize(&json!({
            "baseAtk": 3000,
            "bonusAtk": 500,
            "critRate": 35,
            "critDmg": 80,
            "elemPct": 10,
            "elemDmgUpPct": 5,
        }));
        assert!((s.pre_atk_input - 3500.0).abs() < f64::EPSILON);
        assert!((s.simple_crit_rate - 35.0).abs() < f64::EPSILON);
        assert!((s.simple_crit_dmg - 80.0).abs() < f64::EPSILON);
        assert!((s.simple_elem_pct - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_affinity_and_break_variants() {
        let s = normalize(&json!({ "affinity": "advantage", "isBreak": 1 }));
        assert_eq!(s.affinity, Affinity::Advantage);
        assert!(s.is_break);
        let s = normalize(&json!({ "affinity": 5, "isBreak": "false" }));
        assert_eq!(s.affinity, Affinity::Neutral);
        assert!(!s.is_break);
    }

    #[test]
    fn test_partial_equipment() {
        let s = normalize(&json!({
            "equip": {
                "ring": { "mainType": "critRate", "mainVal": "7.5", "sub": { "atk": 40 } },
                "emblem": { "mainType": "speed" },
                "brooch": "broken",
            }
        }));
        assert_eq!(s.equip.ring.main_type, MainStat::CritRate);
        assert!((s.equip.ring.main_val - 7.5).abs() < f64::EPSILON);
        assert!((s.equip.ring.sub.atk - 40.0).abs() < f64::EPSILON);
        assert!(s.equip.ring.sub.crit_dmg.abs() < f64::EPSILON);
        assert_eq!(s.equip.emblem.main_type, MainStat::None);
        assert_eq!(s.equip.brooch, GearPiece::empty(GearSlot::Brooch));
        assert_eq!(s.equip.armor.main_type, MainStat::None);
    }

    #[test]
    fn test_missing_fields_take_custom_defaults() {
        let mut defaults = ParameterSnapshot::with_mode(InputMode::Standard);
        defaults.enemy_def = 600.0;
        let s = normalize_with(&json!({ "inputMode": "standard", "skillPct": 250 }), &defaults);
        assert_eq!(s.input_mode, InputMode::Standard);
        assert!((s.enemy_def - 600.0).abs() < f64::EPSILON);
        assert!((s.skill_pct - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_mode_is_gear_even_with_other_defaults() {
        let defaults = ParameterSnapshot::with_mode(InputMode::Simple);
        let raw = json!({ "baseAtk": 8000, "skillPct": 100, "critRate": 20, "critDmg": 50 });
        let s = normalize_with(&raw, &defaults);
        assert_eq!(s.input_mode, InputMode::Gear);
        let r = crate::formula::evaluate(&s);
        assert_eq!(r.no_crit, 8000);
        assert_eq!(r.expected, 8800);
        assert_eq!(r.on_crit, 12000);
    }
}
