//! Preset flows over the comparison context
//!
//! Each flow reads or writes the store, then updates slots, names and the
//! dirty baseline together. Stored snapshots are always normalized against
//! the context defaults on the way in.

use super::{CompareError, ComparisonContext, DiscardPolicy, SetOutcome, CURRENT_NAME};
use crate::snapshot::{normalize_with, ParameterSnapshot};
use crate::storage::{clean_name, PresetStore, StorageError};
use log::info;

fn fetch<S: PresetStore + ?Sized>(
    ctx: &ComparisonContext,
    store: &S,
    name: &str,
) -> Result<ParameterSnapshot, CompareError> {
    let raw = store
        .load(name)?
        .ok_or_else(|| StorageError::NotFound(name.to_string()))?;
    Ok(normalize_with(&raw, &ctx.defaults))
}

impl ComparisonContext {
    /// Load a preset into the live slot. Dirty edits need
    /// [`DiscardPolicy::Discard`]; on success the preset becomes the
    /// current name and the new clean baseline.
    pub fn load_preset<S: PresetStore + ?Sized>(
        &mut self,
        store: &S,
        name: &str,
        policy: DiscardPolicy,
    ) -> Result<SetOutcome, CompareError> {
        let snapshot = fetch(self, store, name)?;
        let outcome = self.replace_snapshot(self.linked, snapshot, policy);
        if outcome == SetOutcome::Applied {
            self.live_name = Some(name.to_string());
            self.capture_baseline();
            info!("loaded preset '{}' into {}", name, self.linked);
        }
        Ok(outcome)
    }

    /// Load a preset into the comparison slot. Never gated.
    pub fn load_comparison<S: PresetStore + ?Sized>(
        &mut self,
        store: &S,
        name: &str,
    ) -> Result<(), CompareError> {
        let snapshot = fetch(self, store, name)?;
        self.set_comparison(name, snapshot, false);
        Ok(())
    }

    /// Load a preset into whichever slot plays the base role.
    ///
    /// When base is the live slot the load is gated like
    /// [`load_preset`](Self::load_preset), and the displaced live snapshot
    /// moves into the comparison slot under its old name so the two can be
    /// compared right away.
    pub fn load_base<S: PresetStore + ?Sized>(
        &mut self,
        store: &S,
        name: &str,
        policy: DiscardPolicy,
    ) -> Result<SetOutcome, CompareError> {
        if self.roles.base != self.linked {
            self.load_comparison(store, name)?;
            return Ok(SetOutcome::Applied);
        }

        let snapshot = fetch(self, store, name)?;
        if policy == DiscardPolicy::KeepEdits && self.is_dirty() {
            return Ok(SetOutcome::ConfirmationRequired);
        }
        let previous = std::mem::replace(&mut self.live, snapshot);
        let previous_name = self
            .live_name
            .replace(name.to_string())
            .unwrap_or_else(|| CURRENT_NAME.to_string());
        self.capture_baseline();
        self.set_comparison(previous_name, previous, false);
        info!("loaded preset '{}' as base", name);
        Ok(SetOutcome::Applied)
    }

    /// Save the live snapshot under `name`; it becomes the current name and
    /// the clean baseline.
    pub fn save_preset<S: PresetStore + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
    ) -> Result<(), CompareError> {
        let name = clean_name(name)?.to_string();
        store.save(&name, self.live.to_raw())?;
        info!("saved preset '{}'", name);
        self.live_name = Some(name);
        self.capture_baseline();
        Ok(())
    }

    /// Rename a stored preset, following the rename in slot names
    pub fn rename_preset<S: PresetStore + ?Sized>(
        &mut self,
        store: &mut S,
        old: &str,
        new: &str,
    ) -> Result<(), CompareError> {
        let new = clean_name(new)?.to_string();
        store.rename(old, &new)?;
        if self.live_name.as_deref() == Some(old) {
            self.live_name = Some(new.clone());
        }
        if let Some(slot) = self.other.as_mut().filter(|s| !s.transient && s.name == old) {
            slot.name = new;
        }
        Ok(())
    }

    /// Delete a stored preset. The live snapshot keeps its values but no
    /// longer carries the deleted name.
    pub fn delete_preset<S: PresetStore + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
    ) -> Result<(), CompareError> {
        store.delete(name)?;
        info!("deleted preset '{}'", name);
        if self.live_name.as_deref() == Some(name) {
            self.live_name = None;
        }
        Ok(())
    }

    /// Store the comparison snapshot under its own name and clear its
    /// transient flag. Returns the name used.
    pub fn save_comparison<S: PresetStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<String, CompareError> {
        let slot = self.other.as_mut().ok_or(CompareError::NoComparison)?;
        let name = clean_name(&slot.name)?.to_string();
        store.save(&name, slot.snapshot.to_raw())?;
        slot.name = name.clone();
        slot.transient = false;
        info!("saved comparison '{}'", name);
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::{InputMode, Side};
    use serde_json::json;

    fn gear() -> ParameterSnapshot {
        ParameterSnapshot::with_mode(InputMode::Gear)
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .save("boss", json!({ "inputMode": "gear", "enemyDef": 1092 }))
            .unwrap();
        store
            .save("buffed", json!({ "inputMode": "gear", "dmgUpPct": 30 }))
            .unwrap();
        store
    }

    #[test]
    fn test_load_preset_gated_when_dirty() {
        let store = store();
        let mut ctx = ComparisonContext::new(gear());
        ctx.edit(|s| s.skill_flat = 10.0);

        let outcome = ctx.load_preset(&store, "boss", DiscardPolicy::KeepEdits).unwrap();
        assert_eq!(outcome, SetOutcome::ConfirmationRequired);
        assert_eq!(ctx.live_name(), None);

        let outcome = ctx.load_preset(&store, "boss", DiscardPolicy::Discard).unwrap();
        assert_eq!(outcome, SetOutcome::Applied);
        assert_eq!(ctx.live_name(), Some("boss"));
        assert!((ctx.live().enemy_def - 1092.0).abs() < f64::EPSILON);
        assert!(!ctx.is_dirty());
        assert_eq!(ctx.linked_result().no_crit, 1839);
    }

    #[test]
    fn test_load_missing_preset() {
        let mut ctx = ComparisonContext::new(gear());
        let err = ctx
            .load_preset(&store(), "ghost", DiscardPolicy::KeepEdits)
            .unwrap_err();
        assert!(matches!(err, CompareError::Storage(StorageError::NotFound(_))));
    }

    #[test]
    fn test_load_comparison_and_compare() {
        let mut ctx = ComparisonContext::new(gear());
        ctx.load_comparison(&store(), "buffed").unwrap();
        assert!(!ctx.is_dirty());
        let cmp = ctx.comparison().unwrap();
        let (_, delta) = cmp.deltas()[0];
        assert_eq!(delta.diff, 1500);
        assert_eq!(ctx.comp_name(), "buffed");
    }

    #[test]
    fn test_load_base_moves_live_to_comparison() {
        let mut ctx = ComparisonContext::new(gear());
        ctx.edit(|s| s.base_atk = 7000.0);
        ctx.capture_baseline();

        let outcome = ctx.load_base(&store(), "buffed", DiscardPolicy::KeepEdits).unwrap();
        assert_eq!(outcome, SetOutcome::Applied);
        assert_eq!(ctx.base_name(), "buffed");
        assert_eq!(ctx.comp_name(), CURRENT_NAME);
        assert!((ctx.get_snapshot(Side::B).unwrap().base_atk - 7000.0).abs() < f64::EPSILON);
        assert!((ctx.live().dmg_up_pct - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_base_when_base_is_comparison_slot() {
        let mut ctx = ComparisonContext::new(gear());
        ctx.swap_roles();
        ctx.edit(|s| s.skill_pct = 999.0);
        let outcome = ctx.load_base(&store(), "boss", DiscardPolicy::KeepEdits).unwrap();
        assert_eq!(outcome, SetOutcome::Applied);
        assert_eq!(ctx.base_name(), "boss");
        assert!((ctx.live().skill_pct - 999.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_save_rename_delete() {
        let mut store = store();
        let mut ctx = ComparisonContext::new(gear());
        ctx.edit(|s| s.crit_rate = 55.0);
        ctx.save_preset(&mut store, " mine ").unwrap();
        assert_eq!(ctx.live_name(), Some("mine"));
        assert!(!ctx.is_dirty());
        assert!(store.contains("mine").unwrap());

        ctx.load_comparison(&store, "boss").unwrap();
        ctx.rename_preset(&mut store, "boss", "big boss").unwrap();
        assert_eq!(ctx.comp_name(), "big boss");
        ctx.rename_preset(&mut store, "mine", "mine v2").unwrap();
        assert_eq!(ctx.live_name(), Some("mine v2"));

        ctx.delete_preset(&mut store, "mine v2").unwrap();
        assert_eq!(ctx.live_name(), None);
        assert!((ctx.live().crit_rate - 55.0).abs() < f64::EPSILON);
        assert!(ctx.save_preset(&mut store, "  ").is_err());
    }

    #[test]
    fn test_save_transient_comparison() {
        let mut store = MemoryStore::new();
        let mut ctx = ComparisonContext::new(gear());
        assert!(matches!(
            ctx.save_comparison(&mut store),
            Err(CompareError::NoComparison)
        ));

        ctx.set_comparison("shared", gear(), true);
        assert_eq!(ctx.save_comparison(&mut store).unwrap(), "shared");
        assert!(!ctx.comparison_slot().unwrap().transient);
        assert!(store.contains("shared").unwrap());
    }
}
