//! Prelude module for convenient imports
//!
//! ```rust
//! use damsim_core::prelude::*;
//! ```

// Snapshot
pub use crate::snapshot::{normalize, FieldGroup, FieldId, ParameterSnapshot, RawSnapshot};
pub use crate::types::{Affinity, GearSlot, InputMode, MainStat, Role, Side, SubStat};

// Formula
pub use crate::formula::{evaluate, switch_mode, DamageResult, Figure};

// Comparison
pub use crate::compare::{ComparisonContext, DiscardPolicy, SetOutcome};

// Storage and transport
pub use crate::storage::{PresetStore, StorageError};
pub use crate::transport::{parse_share_link, share_link, SharedState};

// Config
pub use crate::config::ToolConfig;
