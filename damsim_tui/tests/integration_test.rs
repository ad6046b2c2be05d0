//! Integration test: edit -> save preset -> compare -> share -> restore
//!
//! Walks the full flow from a fresh context through the JSON preset file,
//! a comparison against a second build, and a share link round trip.

use damsim_core::{
    evaluate, parse_share_link, share_link, ComparisonContext, DeltaSign, DiscardPolicy, Figure,
    FieldId, InputMode, JsonFileStore, MainStat, ParameterSnapshot, PresetStore, Role,
    SetOutcome, SharedState, Side, ToolConfig,
};
use std::path::PathBuf;

/// Helper to print a separator
fn separator(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}\n", "=".repeat(60));
}

fn temp_store_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("damsim-it-{}-{}.json", tag, std::process::id()))
}

fn defaults() -> ParameterSnapshot {
    let config = ToolConfig {
        default_mode: "gear".to_string(),
        ..ToolConfig::default()
    };
    config.default_snapshot()
}

#[test]
fn test_full_comparison_flow() {
    let path = temp_store_path("flow");
    let _ = std::fs::remove_file(&path);

    separator("BUILD 1: ring with attack");
    let mut store = JsonFileStore::open(&path).unwrap();
    let mut ctx = ComparisonContext::new(defaults());
    ctx.set_field_text(FieldId::MainType(damsim_core::GearSlot::Ring), "atkPct");
    ctx.set_field_text(FieldId::MainVal(damsim_core::GearSlot::Ring), "20");
    assert!(ctx.is_dirty());
    let ring_build = ctx.linked_result();
    println!("  {}", ring_build.summary());
    ctx.save_preset(&mut store, "ring atk").unwrap();
    assert!(!ctx.is_dirty());

    separator("BUILD 2: ring with crit damage");
    ctx.cycle_field(FieldId::MainType(damsim_core::GearSlot::Ring), true);
    assert_eq!(ctx.live().equip.ring.main_type, MainStat::CritRate);
    ctx.set_field_text(FieldId::MainType(damsim_core::GearSlot::Ring), "critDmg");
    ctx.set_field_text(FieldId::MainVal(damsim_core::GearSlot::Ring), "40");
    let crit_build = ctx.linked_result();
    println!("  {}", crit_build.summary());
    ctx.save_preset(&mut store, "ring crit").unwrap();

    separator("COMPARE");
    ctx.load_comparison(&store, "ring atk").unwrap();
    ctx.swap_roles();
    assert_eq!(ctx.base_name(), "ring atk");
    assert_eq!(ctx.comp_name(), "ring crit");
    let cmp = ctx.comparison().unwrap();
    for (figure, delta) in cmp.deltas() {
        println!("  {:12} {}", figure.label(), delta);
    }
    // +20% attack beats +40% crit damage at 20% crit rate, except on crit
    assert_eq!(cmp.delta(Figure::NoCrit).sign(), DeltaSign::Loss);
    assert_eq!(cmp.delta(Figure::Expected).sign(), DeltaSign::Loss);
    assert_eq!(cmp.delta(Figure::OnCrit).sign(), DeltaSign::Gain);

    separator("PERSISTENCE");
    drop(store);
    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.list().unwrap(), vec!["ring atk", "ring crit"]);
    let raw = reopened.load("ring atk").unwrap().unwrap();
    assert_eq!(evaluate(&damsim_core::normalize(&raw)), ring_build);

    separator("SHARE");
    let link = share_link("https://example.invalid/calc", &ctx.share_payload());
    println!("  {}", link);
    let Some(SharedState::Full(payload)) = parse_share_link(&link) else {
        panic!("share link did not decode");
    };
    let restored = ComparisonContext::from_share(payload, defaults());
    assert_eq!(restored.roles(), ctx.roles());
    assert_eq!(restored.linked_side(), Side::A);
    assert_eq!(restored.base_name(), "ring atk");
    assert!(restored.comparison_slot().unwrap().transient);
    assert_eq!(
        restored.comparison().unwrap().delta(Figure::Expected),
        cmp.delta(Figure::Expected)
    );

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_dirty_gate_and_load_base() {
    let path = temp_store_path("gate");
    let _ = std::fs::remove_file(&path);
    let mut store = JsonFileStore::open(&path).unwrap();

    let mut ctx = ComparisonContext::new(defaults());
    ctx.set_field_text(FieldId::EnemyDef, "1092");
    ctx.save_preset(&mut store, "tank").unwrap();

    ctx.set_field_text(FieldId::EnemyDef, "0");
    assert_eq!(
        ctx.load_base(&store, "tank", DiscardPolicy::KeepEdits).unwrap(),
        SetOutcome::ConfirmationRequired
    );
    assert_eq!(ctx.live().enemy_def, 0.0);

    assert_eq!(
        ctx.load_base(&store, "tank", DiscardPolicy::Discard).unwrap(),
        SetOutcome::Applied
    );
    assert_eq!(ctx.base_name(), "tank");
    assert_eq!(ctx.comp_name(), "tank");
    let cmp = ctx.comparison().unwrap();
    // exp(-1) at 1092 DEF: the undefended copy hits e times harder
    let ratio = cmp.comp.after_defense / cmp.base.after_defense;
    assert!((ratio - std::f64::consts::E).abs() < 1e-9);
    assert!(ctx.is_linked(Role::Base));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_legacy_link_opens_single_snapshot() {
    let state = parse_share_link("https://example.invalid/calc?mode=simple&fa=8000&scr=50&scd=100")
        .unwrap();
    let ctx = ComparisonContext::from_shared(state, defaults());
    assert_eq!(ctx.live().input_mode, InputMode::Simple);
    assert!(!ctx.has_comparison());
    assert!(!ctx.is_dirty());
    let r = ctx.linked_result();
    assert_eq!(r.no_crit, 8000);
    assert_eq!(r.expected, 12000);
    assert_eq!(r.on_crit, 16000);
}
