//! Building and restoring a context from a share payload

use super::{ComparisonContext, ComparisonSlot};
use crate::snapshot::{normalize_with, ParameterSnapshot};
use crate::transport::{ShareComparison, ShareMeta, SharePayload, SharedState};
use log::info;

impl ComparisonContext {
    /// Everything needed to rebuild this context elsewhere
    pub fn share_payload(&self) -> SharePayload {
        let comparison = self.other.as_ref().map(|slot| ShareComparison {
            snapshot: slot.snapshot.to_raw(),
            name: slot.name.clone(),
        });
        let comp_name = self
            .other
            .as_ref()
            .map(|slot| slot.name.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        SharePayload {
            snapshot: self.live.to_raw(),
            comparison,
            roles: self.roles,
            link: self.linked,
            meta: ShareMeta {
                preset_name: self.live_name.clone(),
                comp_name,
            },
        }
    }

    /// Rebuild a context from a decoded payload. A shared comparison is
    /// marked transient until saved as a preset.
    pub fn from_share(payload: SharePayload, defaults: ParameterSnapshot) -> Self {
        let live = normalize_with(&payload.snapshot, &defaults);
        let other = payload.comparison.map(|cmp| ComparisonSlot {
            snapshot: normalize_with(&cmp.snapshot, &defaults),
            name: cmp.name,
            transient: true,
        });
        info!(
            "restored shared state (linked {}, comparison: {})",
            payload.link,
            other.as_ref().map_or("none", |slot| slot.name.as_str())
        );
        let mut ctx = ComparisonContext::from_parts(defaults, payload.link, live, other, payload.roles);
        ctx.set_live_name(payload.meta.preset_name);
        ctx
    }

    /// Rebuild from either kind of share link
    pub fn from_shared(state: SharedState, defaults: ParameterSnapshot) -> Self {
        match state {
            SharedState::Full(payload) => ComparisonContext::from_share(payload, defaults),
            SharedState::Single(raw) => {
                let live = normalize_with(&raw, &defaults);
                let mut ctx = ComparisonContext::new(defaults);
                ctx.live = live;
                ctx.capture_baseline();
                ctx
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{RoleMap, CURRENT_NAME};
    use crate::transport::{parse_share_link, share_link};
    use crate::types::{InputMode, Side};

    fn gear() -> ParameterSnapshot {
        ParameterSnapshot::with_mode(InputMode::Gear)
    }

    #[test]
    fn test_share_round_trip_preserves_results() {
        let mut ctx = ComparisonContext::new(gear());
        ctx.edit(|s| s.enemy_def = 500.0);
        ctx.set_live_name(Some("main".into()));
        let mut rival = gear();
        rival.skill_pct = 180.0;
        ctx.set_comparison("rival", rival, false);
        ctx.swap_roles();

        let link = share_link("https://example.invalid/", &ctx.share_payload());
        let restored = ComparisonContext::from_shared(parse_share_link(&link).unwrap(), gear());

        assert_eq!(restored.live(), ctx.live());
        assert_eq!(restored.roles(), RoleMap::new(Side::B, Side::A));
        assert_eq!(restored.live_name(), Some("main"));
        let slot = restored.comparison_slot().unwrap();
        assert_eq!(slot.name, "rival");
        assert!(slot.transient);
        assert_eq!(restored.comparison(), ctx.comparison());
        assert!(!restored.is_dirty());
    }

    #[test]
    fn test_single_snapshot_link() {
        let state = parse_share_link("?mode=standard&pa=8000").unwrap();
        let ctx = ComparisonContext::from_shared(state, gear());
        assert_eq!(ctx.live().input_mode, InputMode::Standard);
        assert!((ctx.live().pre_atk_input - 8000.0).abs() < f64::EPSILON);
        assert!(!ctx.has_comparison());
        assert_eq!(ctx.base_name(), CURRENT_NAME);
        assert!(!ctx.is_dirty());
    }
}
