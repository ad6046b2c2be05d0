//! damsim_core - damage simulation library for a gacha RPG damage calculator
//!
//! This library provides:
//! - ParameterSnapshot: the complete, normalized set of damage inputs
//! - evaluate: the damage formula (no-crit, expected and crit figures plus a breakdown)
//! - ComparisonContext: two snapshot slots with a live-edited side and base/comp roles
//! - PresetStore: named snapshot storage (in memory or a JSON file)
//! - Transport: share links and the legacy short-key query

pub mod compare;
pub mod config;
pub mod formula;
pub mod prelude;
pub mod snapshot;
pub mod storage;
pub mod summary;
pub mod transport;
pub mod types;

// Re-export core types for convenience
pub use compare::{
    ClearOutcome, CompareError, Comparison, ComparisonContext, ComparisonSlot, DeltaSign,
    DiscardPolicy, ResultDelta, RoleMap, SetOutcome,
};
pub use config::{ConfigError, ToolConfig};
pub use formula::{evaluate, switch_mode, BreakdownEntry, BreakdownStep, DamageResult, Figure};
pub use snapshot::{normalize, FieldGroup, FieldId, ParameterSnapshot, RawSnapshot};
pub use storage::{JsonFileStore, MemoryStore, PresetStore, StorageError};
pub use summary::group_summary;
pub use transport::{parse_share_link, share_link, SharePayload, SharedState, SnapshotTransport};
pub use types::{Affinity, GearSlot, InputMode, MainStat, Role, Side, SubStat};
