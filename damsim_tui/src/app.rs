//! Application state

use crate::logger::MessageLog;
use crate::simulation::CritSimulation;
use damsim_core::{
    compare::CURRENT_NAME,
    group_summary, parse_share_link, share_link,
    snapshot::{validate, ValidationIssue},
    ClearOutcome, CompareError, ComparisonContext, DamageResult, DiscardPolicy, FieldGroup,
    FieldId, ParameterSnapshot, PresetStore, SetOutcome, SharedState, ToolConfig,
};
use log::{error, info, warn};
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashSet;

/// Hits rolled per simulation run
pub const SIM_HITS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Inputs,
    Calc,
    Compare,
    Presets,
    Sim,
    Help,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Inputs, Tab::Calc, Tab::Compare, Tab::Presets, Tab::Sim, Tab::Help]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Inputs => "Inputs",
            Tab::Calc => "Calc",
            Tab::Compare => "Compare",
            Tab::Presets => "Presets",
            Tab::Sim => "Sim",
            Tab::Help => "Help",
        }
    }
}

/// One line of the input list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRow {
    Group(FieldGroup),
    Field(FieldId),
}

/// What the text prompt is collecting
#[derive(Debug, Clone, PartialEq)]
pub enum InputPurpose {
    EditField(FieldId),
    SavePreset,
    RenamePreset(String),
    ImportLink,
}

impl InputPurpose {
    pub fn prompt(&self) -> String {
        match self {
            InputPurpose::EditField(field) => field.label(),
            InputPurpose::SavePreset => "Save preset as".to_string(),
            InputPurpose::RenamePreset(old) => format!("Rename '{}' to", old),
            InputPurpose::ImportLink => "Share link".to_string(),
        }
    }
}

/// Text prompt in progress
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    pub purpose: InputPurpose,
    pub buffer: String,
}

/// Action held back until unsaved edits may be discarded
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    LoadPreset(String),
    LoadBase(String),
    Reset,
    ImportShared(SharedState),
}

impl PendingAction {
    pub fn describe(&self) -> String {
        match self {
            PendingAction::LoadPreset(name) => format!("load preset '{}'", name),
            PendingAction::LoadBase(name) => format!("load '{}' as base", name),
            PendingAction::Reset => "reset to defaults".to_string(),
            PendingAction::ImportShared(_) => "open the shared link".to_string(),
        }
    }
}

/// JSON export of the live state
#[derive(Serialize)]
struct ResultExport<'a> {
    name: String,
    snapshot: &'a ParameterSnapshot,
    result: DamageResult,
}

pub struct App {
    pub current_tab: Tab,
    pub config: ToolConfig,
    pub ctx: ComparisonContext,
    pub store: Box<dyn PresetStore>,
    pub collapsed: HashSet<FieldGroup>,
    pub selected_row: usize,
    pub input: Option<InputState>,
    pub pending: Option<PendingAction>,
    pub preset_names: Vec<String>,
    pub selected_preset: usize,
    pub messages: MessageLog,
    pub log_scroll: usize,
    pub breakdown_scroll: usize,
    pub last_share_link: Option<String>,
    pub simulation: Option<CritSimulation>,
    pub rng: rand::rngs::StdRng,
    pub show_help: bool,
}

impl App {
    pub fn new(config: ToolConfig, store: Box<dyn PresetStore>, messages: MessageLog) -> Self {
        let ctx = ComparisonContext::new(config.default_snapshot());
        let mut app = App {
            current_tab: Tab::Inputs,
            config,
            ctx,
            store,
            collapsed: HashSet::new(),
            selected_row: 0,
            input: None,
            pending: None,
            preset_names: Vec::new(),
            selected_preset: 0,
            messages,
            log_scroll: 0,
            breakdown_scroll: 0,
            last_share_link: None,
            simulation: None,
            rng: rand::rngs::StdRng::from_entropy(),
            show_help: false,
        };
        app.refresh_presets();
        app
    }

    /// Push a line to the message panel
    pub fn notify(&self, line: impl Into<String>) {
        self.messages.push(line);
    }

    // === Tabs ===

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let current_idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        let next_idx = (current_idx + 1) % tabs.len();
        self.current_tab = tabs[next_idx];
    }

    pub fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let current_idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        let prev_idx = if current_idx == 0 {
            tabs.len() - 1
        } else {
            current_idx - 1
        };
        self.current_tab = tabs[prev_idx];
    }

    pub fn set_tab(&mut self, index: usize) {
        let tabs = Tab::all();
        if index < tabs.len() {
            self.current_tab = tabs[index];
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.current_tab = Tab::Help;
        }
    }

    // === Navigation ===

    pub fn on_up(&mut self) {
        match self.current_tab {
            Tab::Inputs => {
                if self.selected_row > 0 {
                    self.selected_row -= 1;
                }
            }
            Tab::Presets => {
                if self.selected_preset > 0 {
                    self.selected_preset -= 1;
                }
            }
            Tab::Calc => {
                if self.breakdown_scroll > 0 {
                    self.breakdown_scroll -= 1;
                }
            }
            Tab::Compare | Tab::Sim => {
                if self.log_scroll > 0 {
                    self.log_scroll -= 1;
                }
            }
            Tab::Help => {}
        }
    }

    pub fn on_down(&mut self) {
        match self.current_tab {
            Tab::Inputs => {
                if self.selected_row < self.input_rows().len().saturating_sub(1) {
                    self.selected_row += 1;
                }
            }
            Tab::Presets => {
                if self.selected_preset < self.preset_names.len().saturating_sub(1) {
                    self.selected_preset += 1;
                }
            }
            Tab::Calc => {
                self.breakdown_scroll += 1;
            }
            Tab::Compare | Tab::Sim => {
                if self.log_scroll < self.messages.len().saturating_sub(1) {
                    self.log_scroll += 1;
                }
            }
            Tab::Help => {}
        }
    }

    pub fn on_left(&mut self) {
        if let Some(InputRow::Field(field)) = self.selected_input_row() {
            self.ctx.cycle_field(field, false);
            self.clamp_selection();
        }
    }

    pub fn on_right(&mut self) {
        if let Some(InputRow::Field(field)) = self.selected_input_row() {
            self.ctx.cycle_field(field, true);
            self.clamp_selection();
        }
    }

    pub fn on_enter(&mut self) {
        match self.current_tab {
            Tab::Inputs => match self.selected_input_row() {
                Some(InputRow::Group(group)) => self.toggle_group(group),
                Some(InputRow::Field(field)) if field.is_numeric() => {
                    let buffer = field.display(self.ctx.live());
                    self.begin_input(InputPurpose::EditField(field), buffer);
                }
                Some(InputRow::Field(field)) => {
                    self.ctx.cycle_field(field, true);
                    self.clamp_selection();
                }
                None => {}
            },
            Tab::Presets => {
                if let Some(name) = self.selected_preset_name() {
                    self.load_preset(&name);
                }
            }
            Tab::Sim => self.run_simulation(),
            _ => {}
        }
    }

    pub fn on_space(&mut self) {
        match self.current_tab {
            Tab::Inputs => {
                if let Some(InputRow::Group(group)) = self.selected_input_row() {
                    self.toggle_group(group);
                } else {
                    self.on_enter();
                }
            }
            Tab::Sim => self.run_simulation(),
            _ => {}
        }
    }

    // === Input list ===

    /// Group headers and the fields of expanded groups that apply to the
    /// live mode
    pub fn input_rows(&self) -> Vec<InputRow> {
        let mode = self.ctx.live().input_mode;
        let fields = FieldId::all();
        let mut rows = Vec::new();
        for group in FieldGroup::all() {
            rows.push(InputRow::Group(*group));
            if self.collapsed.contains(group) {
                continue;
            }
            rows.extend(
                fields
                    .iter()
                    .filter(|f| f.group() == *group && f.applies_in(mode))
                    .map(|f| InputRow::Field(*f)),
            );
        }
        rows
    }

    pub fn selected_input_row(&self) -> Option<InputRow> {
        if self.current_tab != Tab::Inputs {
            return None;
        }
        self.input_rows().get(self.selected_row).copied()
    }

    pub fn toggle_group(&mut self, group: FieldGroup) {
        if !self.collapsed.remove(&group) {
            self.collapsed.insert(group);
        }
        self.clamp_selection();
    }

    pub fn group_summary(&self, group: FieldGroup) -> String {
        group_summary(group, self.ctx.live())
    }

    pub fn validation_issues(&self) -> Vec<ValidationIssue> {
        validate(self.ctx.live())
    }

    /// Keep the selection on a row after the row list shrinks
    fn clamp_selection(&mut self) {
        let len = self.input_rows().len();
        if self.selected_row >= len {
            self.selected_row = len.saturating_sub(1);
        }
    }

    // === Text prompt ===

    pub fn begin_input(&mut self, purpose: InputPurpose, buffer: String) {
        self.input = Some(InputState { purpose, buffer });
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(input) = self.input.as_mut() {
            input.buffer.push(c);
        }
    }

    pub fn input_backspace(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.buffer.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    pub fn commit_input(&mut self) {
        let Some(InputState { purpose, buffer }) = self.input.take() else {
            return;
        };
        match purpose {
            InputPurpose::EditField(field) => {
                self.ctx.set_field_text(field, &buffer);
                self.clamp_selection();
            }
            InputPurpose::SavePreset => self.save_preset(&buffer),
            InputPurpose::RenamePreset(old) => self.rename_preset(&old, &buffer),
            InputPurpose::ImportLink => self.import_link(&buffer),
        }
    }

    pub fn prompt_save(&mut self) {
        let name = self.ctx.live_name().unwrap_or_default().to_string();
        self.begin_input(InputPurpose::SavePreset, name);
    }

    pub fn prompt_rename(&mut self) {
        if let Some(name) = self.selected_preset_name() {
            self.begin_input(InputPurpose::RenamePreset(name.clone()), name);
        }
    }

    pub fn prompt_import(&mut self) {
        self.begin_input(InputPurpose::ImportLink, String::new());
    }

    // === Confirmation ===

    fn hold(&mut self, action: PendingAction) {
        self.notify(format!(
            "Unsaved changes. Press y to {}, n to keep editing.",
            action.describe()
        ));
        self.pending = Some(action);
    }

    /// Run the held action, discarding unsaved edits
    pub fn confirm_pending(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };
        match action {
            PendingAction::LoadPreset(name) => {
                self.run_load(&name, DiscardPolicy::Discard, false);
            }
            PendingAction::LoadBase(name) => {
                self.run_load(&name, DiscardPolicy::Discard, true);
            }
            PendingAction::Reset => {
                let _ = self.ctx.reset(DiscardPolicy::Discard);
                self.notify("Reset to defaults.");
            }
            PendingAction::ImportShared(state) => self.apply_shared(state),
        }
    }

    pub fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            self.notify("Kept current edits.");
        }
    }

    // === Presets ===

    pub fn refresh_presets(&mut self) {
        match self.store.list() {
            Ok(names) => self.preset_names = names,
            Err(e) => error!("could not list presets: {}", e),
        }
        if self.selected_preset >= self.preset_names.len() {
            self.selected_preset = self.preset_names.len().saturating_sub(1);
        }
    }

    pub fn selected_preset_name(&self) -> Option<String> {
        self.preset_names.get(self.selected_preset).cloned()
    }

    fn report(&self, result: Result<(), CompareError>) {
        if let Err(e) = result {
            self.notify(format!("Error: {}", e));
        }
    }

    fn run_load(&mut self, name: &str, policy: DiscardPolicy, as_base: bool) {
        let outcome = if as_base {
            self.ctx.load_base(self.store.as_ref(), name, policy)
        } else {
            self.ctx.load_preset(self.store.as_ref(), name, policy)
        };
        match outcome {
            Ok(SetOutcome::Applied) => self.clamp_selection(),
            Ok(SetOutcome::ConfirmationRequired) => {
                let action = if as_base {
                    PendingAction::LoadBase(name.to_string())
                } else {
                    PendingAction::LoadPreset(name.to_string())
                };
                self.hold(action);
            }
            Err(e) => self.notify(format!("Error: {}", e)),
        }
    }

    pub fn load_preset(&mut self, name: &str) {
        self.run_load(name, DiscardPolicy::KeepEdits, false);
    }

    pub fn load_base(&mut self, name: &str) {
        self.run_load(name, DiscardPolicy::KeepEdits, true);
    }

    pub fn load_comparison(&mut self, name: &str) {
        let result = self.ctx.load_comparison(self.store.as_ref(), name);
        self.report(result);
    }

    pub fn save_preset(&mut self, name: &str) {
        let result = self.ctx.save_preset(self.store.as_mut(), name);
        self.report(result);
        self.refresh_presets();
    }

    pub fn rename_preset(&mut self, old: &str, new: &str) {
        let result = self.ctx.rename_preset(self.store.as_mut(), old, new);
        self.report(result);
        self.refresh_presets();
    }

    pub fn delete_selected_preset(&mut self) {
        if let Some(name) = self.selected_preset_name() {
            let result = self.ctx.delete_preset(self.store.as_mut(), &name);
            self.report(result);
            self.refresh_presets();
        }
    }

    pub fn save_comparison(&mut self) {
        match self.ctx.save_comparison(self.store.as_mut()) {
            Ok(_) => self.refresh_presets(),
            Err(e) => self.notify(format!("Error: {}", e)),
        }
    }

    // === Comparison ===

    pub fn swap_roles(&mut self) {
        self.ctx.swap_roles();
        self.notify(format!(
            "Base is now '{}', comparing '{}'.",
            self.ctx.base_name(),
            self.ctx.comp_name()
        ));
    }

    pub fn clear_comparison(&mut self) {
        if self.ctx.clear_comparison_slot() == ClearOutcome::AlreadyEmpty {
            self.notify("No comparison to clear.");
        }
    }

    pub fn reset(&mut self) {
        match self.ctx.reset(DiscardPolicy::KeepEdits) {
            SetOutcome::Applied => {
                self.clamp_selection();
                self.notify("Reset to defaults.");
            }
            SetOutcome::ConfirmationRequired => self.hold(PendingAction::Reset),
        }
    }

    // === Sharing ===

    pub fn share(&mut self) {
        let link = share_link(&self.config.share_base_url, &self.ctx.share_payload());
        self.notify(format!("Share link: {}", link));
        self.last_share_link = Some(link);
    }

    /// Decode a link and replace the whole context with it. Gated on
    /// unsaved edits.
    pub fn import_link(&mut self, text: &str) {
        let Some(state) = parse_share_link(text) else {
            warn!("not a share link: {}", text.trim());
            self.notify("Could not read that share link.");
            return;
        };
        if self.ctx.is_dirty() {
            self.hold(PendingAction::ImportShared(state));
        } else {
            self.apply_shared(state);
        }
    }

    fn apply_shared(&mut self, state: SharedState) {
        self.ctx = ComparisonContext::from_shared(state, self.config.default_snapshot());
        self.selected_row = 0;
        self.notify(format!(
            "Opened shared state: '{}' vs '{}'.",
            self.ctx.base_name(),
            self.ctx.comp_name()
        ));
    }

    /// Write the live snapshot and its result to the log as JSON
    pub fn export_json(&mut self) {
        let export = ResultExport {
            name: self.ctx.live_name().unwrap_or(CURRENT_NAME).to_string(),
            snapshot: self.ctx.live(),
            result: self.ctx.linked_result(),
        };
        match serde_json::to_string(&export) {
            Ok(json) => self.notify(json),
            Err(e) => error!("could not export result: {}", e),
        }
    }

    // === Simulation ===

    pub fn run_simulation(&mut self) {
        let result = self.ctx.linked_result();
        let sim = CritSimulation::run(&result, SIM_HITS, &mut self.rng);
        info!(
            "{} hits: {} crits ({:.1}%), avg {:.0} vs expected {} ({:+.2}%)",
            sim.hit_count,
            sim.crit_count,
            sim.crit_rate(),
            sim.avg_damage(),
            sim.expected,
            sim.deviation_pct()
        );
        self.simulation = Some(sim);
    }

    /// Title suffix: current preset name, starred when dirty
    pub fn title_status(&self) -> String {
        let name = self.ctx.live_name().unwrap_or(CURRENT_NAME);
        if self.ctx.is_dirty() {
            format!("{} *", name)
        } else {
            name.to_string()
        }
    }
}
