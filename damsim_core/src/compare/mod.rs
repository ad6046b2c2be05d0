//! Comparison context - two snapshot slots, one of them live-edited
//!
//! Slots `A` and `B` hold snapshots. The *linked* slot is the one the input
//! surface edits and always holds a snapshot; the other slot is either empty
//! or a static comparison partner. Independently, the *base* and *comp*
//! roles say which slot is shown as the comparison source and which as the
//! target. Swapping roles is a pure relabelling.
//!
//! All writes to the slots go through [`ComparisonContext`].

mod delta;
mod presets;
mod share;

pub use delta::{Comparison, DeltaSign, ResultDelta};

use crate::formula::{evaluate, switch_mode, DamageResult};
use crate::snapshot::{normalize_with, FieldId, ParameterSnapshot, RawSnapshot};
use crate::storage::StorageError;
use crate::types::{InputMode, Role, Side};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the linked slot when no preset is selected
pub const CURRENT_NAME: &str = "current";
/// Name of a comparison slot that was never given one
pub const UNNAMED: &str = "(unnamed)";
/// Name shown for an empty comparison slot
pub const NO_COMPARISON: &str = "none";

/// Comparison context error
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("No comparison snapshot is set")]
    NoComparison,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Whether a write to the linked slot may discard unsaved edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardPolicy {
    /// Refuse and ask for confirmation when the live slot is dirty
    KeepEdits,
    /// The caller confirmed; overwrite regardless
    Discard,
}

/// Result of a write that may hit the dirty gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum SetOutcome {
    Applied,
    /// Nothing changed; retry with [`DiscardPolicy::Discard`] once confirmed
    ConfirmationRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    AlreadyEmpty,
}

/// Which slot plays which display role. `base != comp` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMap {
    pub base: Side,
    pub comp: Side,
}

impl Default for RoleMap {
    fn default() -> Self {
        RoleMap {
            base: Side::A,
            comp: Side::B,
        }
    }
}

impl RoleMap {
    /// Build a role map, resetting to A/B when both roles name one slot
    pub fn new(base: Side, comp: Side) -> Self {
        if base == comp {
            RoleMap::default()
        } else {
            RoleMap { base, comp }
        }
    }

    pub fn side(&self, role: Role) -> Side {
        match role {
            Role::Base => self.base,
            Role::Comp => self.comp,
        }
    }

    pub fn swapped(&self) -> Self {
        RoleMap {
            base: self.comp,
            comp: self.base,
        }
    }
}

/// The non-linked slot's contents
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSlot {
    pub name: String,
    pub snapshot: ParameterSnapshot,
    /// Received through transport and not yet saved as a preset
    pub transient: bool,
}

impl ComparisonSlot {
    fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            UNNAMED
        } else {
            &self.name
        }
    }
}

/// Owner of both slots, the role map and the dirty baseline
#[derive(Debug, Clone)]
pub struct ComparisonContext {
    linked: Side,
    live: ParameterSnapshot,
    live_name: Option<String>,
    other: Option<ComparisonSlot>,
    roles: RoleMap,
    baseline: ParameterSnapshot,
    defaults: ParameterSnapshot,
}

impl ComparisonContext {
    /// Linked slot `A` holding `defaults`, slot `B` empty, baseline captured
    pub fn new(defaults: ParameterSnapshot) -> Self {
        ComparisonContext {
            linked: Side::A,
            live: defaults.clone(),
            live_name: None,
            other: None,
            roles: RoleMap::default(),
            baseline: defaults.clone(),
            defaults,
        }
    }

    /// Assemble a context from decoded parts; the baseline is the live snapshot
    pub fn from_parts(
        defaults: ParameterSnapshot,
        linked: Side,
        live: ParameterSnapshot,
        other: Option<ComparisonSlot>,
        roles: RoleMap,
    ) -> Self {
        ComparisonContext {
            linked,
            baseline: live.clone(),
            live,
            live_name: None,
            other,
            roles: RoleMap::new(roles.base, roles.comp),
            defaults,
        }
    }

    // === Accessors ===

    pub fn linked_side(&self) -> Side {
        self.linked
    }

    pub fn roles(&self) -> RoleMap {
        self.roles
    }

    pub fn defaults(&self) -> &ParameterSnapshot {
        &self.defaults
    }

    /// The live-edited snapshot
    pub fn live(&self) -> &ParameterSnapshot {
        &self.live
    }

    /// Preset name of the live snapshot, if it came from or was saved as one
    pub fn live_name(&self) -> Option<&str> {
        self.live_name.as_deref()
    }

    pub fn set_live_name(&mut self, name: Option<String>) {
        self.live_name = name.filter(|n| !n.trim().is_empty());
    }

    pub fn comparison_slot(&self) -> Option<&ComparisonSlot> {
        self.other.as_ref()
    }

    pub fn has_comparison(&self) -> bool {
        self.other.is_some()
    }

    /// Snapshot held by `side`: the live one when linked, otherwise the
    /// comparison snapshot if set.
    pub fn get_snapshot(&self, side: Side) -> Option<&ParameterSnapshot> {
        if side == self.linked {
            Some(&self.live)
        } else {
            self.other.as_ref().map(|slot| &slot.snapshot)
        }
    }

    // === Writes ===

    /// Normalize `raw` and store it in `side`.
    ///
    /// Writing the linked slot replaces the live state. While it is dirty
    /// that requires [`DiscardPolicy::Discard`]; otherwise nothing changes
    /// and [`SetOutcome::ConfirmationRequired`] is returned. Writing the
    /// other slot never needs confirmation and keeps the slot's name.
    pub fn set_snapshot(&mut self, side: Side, raw: &RawSnapshot, policy: DiscardPolicy) -> SetOutcome {
        let snapshot = normalize_with(raw, &self.defaults);
        self.replace_snapshot(side, snapshot, policy)
    }

    /// [`set_snapshot`](Self::set_snapshot) for an already normalized snapshot
    pub fn replace_snapshot(
        &mut self,
        side: Side,
        snapshot: ParameterSnapshot,
        policy: DiscardPolicy,
    ) -> SetOutcome {
        if side == self.linked {
            if policy == DiscardPolicy::KeepEdits && self.is_dirty() {
                return SetOutcome::ConfirmationRequired;
            }
            self.live = snapshot;
        } else {
            match self.other.as_mut() {
                Some(slot) => slot.snapshot = snapshot,
                None => {
                    self.other = Some(ComparisonSlot {
                        name: String::new(),
                        snapshot,
                        transient: false,
                    })
                }
            }
        }
        SetOutcome::Applied
    }

    /// Put a named snapshot into the comparison slot
    pub fn set_comparison(&mut self, name: impl Into<String>, snapshot: ParameterSnapshot, transient: bool) {
        let name = name.into();
        info!("comparison slot {} set to '{}'", self.linked.other(), name);
        self.other = Some(ComparisonSlot {
            name,
            snapshot,
            transient,
        });
    }

    /// Mutate the live snapshot in place
    pub fn edit(&mut self, f: impl FnOnce(&mut ParameterSnapshot)) {
        f(&mut self.live);
    }

    /// Apply raw input text to one live field
    pub fn set_field_text(&mut self, field: FieldId, text: &str) {
        if field == FieldId::InputMode {
            if let Some(mode) = InputMode::parse(text) {
                self.switch_mode(mode);
            }
        } else {
            field.set_text(&mut self.live, text);
        }
    }

    /// Step a choice field of the live snapshot
    pub fn cycle_field(&mut self, field: FieldId, forward: bool) {
        if field == FieldId::InputMode {
            let mode = self.live.input_mode;
            self.switch_mode(if forward { mode.next() } else { mode.prev() });
        } else {
            field.cycle(&mut self.live, forward);
        }
    }

    /// Change the live input mode, carrying the current figures over
    pub fn switch_mode(&mut self, mode: InputMode) {
        switch_mode(&mut self.live, mode);
    }

    /// Exchange base and comp. Slots and linkage are untouched.
    pub fn swap_roles(&mut self) {
        self.roles = self.roles.swapped();
    }

    /// Empty the non-linked slot
    pub fn clear_comparison_slot(&mut self) -> ClearOutcome {
        match self.other.take() {
            Some(slot) => {
                info!("cleared comparison '{}'", slot.display_name());
                ClearOutcome::Cleared
            }
            None => ClearOutcome::AlreadyEmpty,
        }
    }

    /// Replace the live state with the defaults and forget the preset name.
    /// Subject to the dirty gate like any other overwrite.
    pub fn reset(&mut self, policy: DiscardPolicy) -> SetOutcome {
        let defaults = self.defaults.clone();
        let outcome = self.replace_snapshot(self.linked, defaults, policy);
        if outcome == SetOutcome::Applied {
            self.live_name = None;
            self.capture_baseline();
        }
        outcome
    }

    // === Dirty tracking ===

    /// Remember the live snapshot as the clean state
    pub fn capture_baseline(&mut self) {
        self.baseline = self.live.clone();
    }

    /// Whether the live snapshot differs from the last captured baseline
    pub fn is_dirty(&self) -> bool {
        self.live != self.baseline
    }

    // === Roles ===

    pub fn snapshot_for(&self, role: Role) -> Option<&ParameterSnapshot> {
        self.get_snapshot(self.roles.side(role))
    }

    pub fn base(&self) -> Option<&ParameterSnapshot> {
        self.snapshot_for(Role::Base)
    }

    pub fn comp(&self) -> Option<&ParameterSnapshot> {
        self.snapshot_for(Role::Comp)
    }

    /// Whether `role` currently resolves to the live slot
    pub fn is_linked(&self, role: Role) -> bool {
        self.roles.side(role) == self.linked
    }

    /// Display name of the slot playing `role`
    pub fn name_for(&self, role: Role) -> String {
        if self.is_linked(role) {
            self.live_name().unwrap_or(CURRENT_NAME).to_string()
        } else {
            self.other
                .as_ref()
                .map_or(NO_COMPARISON, |slot| slot.display_name())
                .to_string()
        }
    }

    pub fn base_name(&self) -> String {
        self.name_for(Role::Base)
    }

    pub fn comp_name(&self) -> String {
        self.name_for(Role::Comp)
    }

    // === Results ===

    pub fn linked_result(&self) -> DamageResult {
        evaluate(&self.live)
    }

    pub fn result_for(&self, role: Role) -> Option<DamageResult> {
        self.snapshot_for(role).map(evaluate)
    }

    /// Base and comp results with deltas, or `None` when a side is empty
    pub fn comparison(&self) -> Option<Comparison> {
        let base = self.base()?;
        let comp = self.comp()?;
        Some(Comparison::new(evaluate(base), evaluate(comp)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::normalize;
    use crate::types::InputMode;
    use serde_json::json;

    fn scenario_a() -> ParameterSnapshot {
        ParameterSnapshot::with_mode(InputMode::Gear)
    }

    #[test]
    fn test_dirty_tracking_and_empty_comparison() {
        let mut ctx = ComparisonContext::new(scenario_a());
        ctx.capture_baseline();
        assert!(!ctx.is_dirty());
        assert!(ctx.get_snapshot(Side::B).is_none());

        ctx.set_field_text(FieldId::SkillFlat, "120");
        assert!(ctx.is_dirty());
        assert!(ctx.get_snapshot(Side::B).is_none());

        assert_eq!(
            ctx.set_snapshot(Side::B, &json!({ "baseAtk": 6000 }), DiscardPolicy::KeepEdits),
            SetOutcome::Applied
        );
        assert!((ctx.get_snapshot(Side::B).unwrap().base_atk - 6000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_editing_back_clears_dirty() {
        let mut ctx = ComparisonContext::new(scenario_a());
        ctx.edit(|s| s.enemy_def = 300.0);
        assert!(ctx.is_dirty());
        ctx.edit(|s| s.enemy_def = 0.0);
        assert!(!ctx.is_dirty());
    }

    #[test]
    fn test_dirty_gate_on_linked_slot() {
        let mut ctx = ComparisonContext::new(scenario_a());
        ctx.edit(|s| s.base_atk = 9000.0);

        let raw = json!({ "inputMode": "gear", "baseAtk": 1000 });
        assert_eq!(
            ctx.set_snapshot(Side::A, &raw, DiscardPolicy::KeepEdits),
            SetOutcome::ConfirmationRequired
        );
        assert!((ctx.live().base_atk - 9000.0).abs() < f64::EPSILON);

        assert_eq!(
            ctx.set_snapshot(Side::A, &raw, DiscardPolicy::Discard),
            SetOutcome::Applied
        );
        assert!((ctx.live().base_atk - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clean_linked_slot_needs_no_confirmation() {
        let mut ctx = ComparisonContext::new(scenario_a());
        let outcome = ctx.set_snapshot(Side::A, &json!({ "skillPct": 300 }), DiscardPolicy::KeepEdits);
        assert_eq!(outcome, SetOutcome::Applied);
        assert!((ctx.live().skill_pct - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_snapshot_normalizes() {
        let mut ctx = ComparisonContext::new(scenario_a());
        let _ = ctx.set_snapshot(Side::B, &json!("garbage"), DiscardPolicy::KeepEdits);
        assert_eq!(ctx.get_snapshot(Side::B), Some(&scenario_a()));
    }

    #[test]
    fn test_swap_roles_is_relabel() {
        let mut ctx = ComparisonContext::new(scenario_a());
        ctx.set_comparison("rival", normalize(&json!({ "inputMode": "gear", "baseAtk": 6000 })), false);
        let before = ctx.comparison().unwrap();

        ctx.swap_roles();
        assert_eq!(ctx.linked_side(), Side::A);
        assert_eq!(ctx.roles(), RoleMap { base: Side::B, comp: Side::A });
        assert_eq!(ctx.base_name(), "rival");
        assert_eq!(ctx.comp_name(), CURRENT_NAME);

        let after = ctx.comparison().unwrap();
        assert_eq!(before.base, after.comp);
        assert_eq!(before.comp, after.base);
        assert_eq!(after.deltas()[0].1.diff, -before.deltas()[0].1.diff);
    }

    #[test]
    fn test_clear_comparison() {
        let mut ctx = ComparisonContext::new(scenario_a());
        assert_eq!(ctx.clear_comparison_slot(), ClearOutcome::AlreadyEmpty);

        ctx.set_comparison("x", scenario_a(), false);
        assert!(ctx.comparison().is_some());
        assert_eq!(ctx.clear_comparison_slot(), ClearOutcome::Cleared);
        assert!(ctx.comparison().is_none());
        assert!(ctx.comp().is_none());
        assert_eq!(ctx.comp_name(), NO_COMPARISON);
        assert_eq!(ctx.clear_comparison_slot(), ClearOutcome::AlreadyEmpty);
    }

    #[test]
    fn test_names() {
        let mut ctx = ComparisonContext::new(scenario_a());
        assert_eq!(ctx.base_name(), CURRENT_NAME);
        ctx.set_live_name(Some("main".into()));
        assert_eq!(ctx.base_name(), "main");
        let _ = ctx.set_snapshot(Side::B, &json!({}), DiscardPolicy::KeepEdits);
        assert_eq!(ctx.comp_name(), UNNAMED);
        ctx.set_live_name(Some("  ".into()));
        assert_eq!(ctx.live_name(), None);
    }

    #[test]
    fn test_mode_switch_through_field() {
        let mut ctx = ComparisonContext::new(scenario_a());
        ctx.edit(|s| s.atk_up_pct = 20.0);
        let before = ctx.linked_result();
        ctx.set_field_text(FieldId::InputMode, "simple");
        assert_eq!(ctx.live().input_mode, InputMode::Simple);
        assert!((ctx.live().final_atk_input - 6000.0).abs() < f64::EPSILON);
        assert_eq!(ctx.linked_result().no_crit, before.no_crit);

        ctx.cycle_field(FieldId::InputMode, true);
        assert_eq!(ctx.live().input_mode, InputMode::Standard);
    }

    #[test]
    fn test_reset() {
        let mut ctx = ComparisonContext::new(scenario_a());
        ctx.set_live_name(Some("p".into()));
        ctx.edit(|s| s.skill_flat = 50.0);
        assert_eq!(ctx.reset(DiscardPolicy::KeepEdits), SetOutcome::ConfirmationRequired);
        assert_eq!(ctx.reset(DiscardPolicy::Discard), SetOutcome::Applied);
        assert_eq!(ctx.live(), &scenario_a());
        assert_eq!(ctx.live_name(), None);
        assert!(!ctx.is_dirty());
    }

    #[test]
    fn test_role_map_rejects_equal_roles() {
        assert_eq!(RoleMap::new(Side::B, Side::B), RoleMap::default());
        assert_eq!(RoleMap::new(Side::B, Side::A).base, Side::B);
    }
}
