//! Short-key query encoding of a single snapshot
//!
//! `mode=gear&ba=5000&cr=20&...&gt=atk&gv=120&gsa=0...`
//!
//! Gear keys are the slot initial followed by `t` (main type), `v` (main
//! value) or `sa`/`sp`/`sr`/`sd` (sub ATK, ATK%, crit rate, crit DMG).
//! Decoding keeps every value as text; normalization does the parsing.

use super::SnapshotTransport;
use crate::snapshot::{normalize, ParameterSnapshot, RawSnapshot};
use crate::types::{GearSlot, SubStat};
use serde_json::{Map, Value};

/// Short key to stored key for the plain numeric fields
const NUMBER_KEYS: [(&str, &str); 19] = [
    ("ba", "baseAtk"),
    ("bo", "bonusAtk"),
    ("cr", "critRate"),
    ("cd", "critDmg"),
    ("el", "elemPct"),
    ("sp", "skillPct"),
    ("sf", "skillFlat"),
    ("au", "atkUpPct"),
    ("du", "dmgUpPct"),
    ("cu", "cardDmgUpPct"),
    ("eu", "elemDmgUpPct"),
    ("cru", "critRateUpPct"),
    ("cdu", "critDmgUpPct"),
    ("ed", "enemyDef"),
    ("pa", "preAtkInput"),
    ("fa", "finalAtkInput"),
    ("scr", "simpleCritRate"),
    ("scd", "simpleCritDmg"),
    ("se", "simpleElemPct"),
];

fn slot_initial(slot: GearSlot) -> char {
    match slot {
        GearSlot::Glove => 'g',
        GearSlot::Armor => 'a',
        GearSlot::Emblem => 'e',
        GearSlot::Ring => 'r',
        GearSlot::Brooch => 'b',
    }
}

fn sub_suffix(sub: SubStat) -> &'static str {
    match sub {
        SubStat::Atk => "sa",
        SubStat::AtkPct => "sp",
        SubStat::CritRate => "sr",
        SubStat::CritDmg => "sd",
    }
}

/// Decode `%XX` escapes and `+` as space. Malformed escapes are kept as is.
fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Split `a=1&b=2` into decoded pairs. A leading `?` is ignored.
pub(crate) fn query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .trim()
        .trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((k, v)) => (percent_decode(k), percent_decode(v)),
            None => (percent_decode(part), String::new()),
        })
        .collect()
}

fn number_text(n: f64) -> String {
    format!("{}", n)
}

/// Legacy short-key query transport
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryTransport;

impl QueryTransport {
    /// Encode an already normalized snapshot
    pub fn encode(&self, s: &ParameterSnapshot) -> String {
        let mut pairs: Vec<(String, String)> = vec![("mode".into(), s.input_mode.key().into())];
        let numbers = [
            s.base_atk,
            s.bonus_atk,
            s.crit_rate,
            s.crit_dmg,
            s.elem_pct,
            s.skill_pct,
            s.skill_flat,
            s.atk_up_pct,
            s.dmg_up_pct,
            s.card_dmg_up_pct,
            s.elem_dmg_up_pct,
            s.crit_rate_up_pct,
            s.crit_dmg_up_pct,
            s.enemy_def,
            s.pre_atk_input,
            s.final_atk_input,
            s.simple_crit_rate,
            s.simple_crit_dmg,
            s.simple_elem_pct,
        ];
        for ((short, _), value) in NUMBER_KEYS.iter().zip(numbers) {
            pairs.push((short.to_string(), number_text(value)));
        }
        pairs.push(("af".into(), s.affinity.key().into()));
        pairs.push(("br".into(), if s.is_break { "1" } else { "0" }.into()));
        for (slot, piece) in s.equip.iter() {
            let initial = slot_initial(slot);
            pairs.push((format!("{}t", initial), piece.main_type.key().into()));
            pairs.push((format!("{}v", initial), number_text(piece.main_val)));
            for sub in SubStat::all() {
                pairs.push((
                    format!("{}{}", initial, sub_suffix(*sub)),
                    number_text(piece.sub.get(*sub)),
                ));
            }
        }
        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Decode into a raw snapshot, or `None` when no known key is present.
    /// A missing `mode` means gear, as in the oldest links.
    pub fn decode(&self, query: &str) -> Option<RawSnapshot> {
        let pairs = query_pairs(query);
        let mut obj = Map::new();
        let mut equip = Map::new();
        let mut known = false;

        for (key, value) in &pairs {
            let text = Value::String(value.clone());
            if let Some((_, long)) = NUMBER_KEYS.iter().find(|(short, _)| *short == key.as_str()) {
                obj.insert(long.to_string(), text);
            } else if key == "mode" {
                obj.insert("inputMode".into(), text);
            } else if key == "af" {
                obj.insert("affinity".into(), text);
            } else if key == "br" {
                obj.insert("isBreak".into(), text);
            } else if let Some((slot, field)) = gear_key(key) {
                let piece = equip
                    .entry(slot.key().to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(piece) = piece {
                    match field {
                        GearKey::MainType => {
                            piece.insert("mainType".into(), text);
                        }
                        GearKey::MainVal => {
                            piece.insert("mainVal".into(), text);
                        }
                        GearKey::Sub(sub) => {
                            let subs = piece
                                .entry("sub".to_string())
                                .or_insert_with(|| Value::Object(Map::new()));
                            if let Value::Object(subs) = subs {
                                subs.insert(sub.key().into(), text);
                            }
                        }
                    }
                }
            } else {
                continue;
            }
            known = true;
        }

        if !known {
            return None;
        }
        obj.entry("inputMode".to_string())
            .or_insert_with(|| Value::String("gear".into()));
        if !equip.is_empty() {
            obj.insert("equip".into(), Value::Object(equip));
        }
        Some(Value::Object(obj))
    }
}

#[derive(Debug, Clone, Copy)]
enum GearKey {
    MainType,
    MainVal,
    Sub(SubStat),
}

fn gear_key(key: &str) -> Option<(GearSlot, GearKey)> {
    let mut chars = key.chars();
    let initial = chars.next()?;
    let slot = GearSlot::all()
        .iter()
        .copied()
        .find(|s| slot_initial(*s) == initial)?;
    let field = match chars.as_str() {
        "t" => GearKey::MainType,
        "v" => GearKey::MainVal,
        rest => GearKey::Sub(
            SubStat::all()
                .iter()
                .copied()
                .find(|sub| sub_suffix(*sub) == rest)?,
        ),
    };
    Some((slot, field))
}

impl SnapshotTransport for QueryTransport {
    fn serialize(&self, raw: &RawSnapshot) -> String {
        self.encode(&normalize(raw))
    }

    fn deserialize(&self, text: &str) -> Option<RawSnapshot> {
        self.decode(text)
    }
}
