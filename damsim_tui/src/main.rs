//! damsim_tui - Interactive TUI for damage calculation and comparison
//!
//! Usage: `damsim_tui [share-link]`. A `damsim.toml` in the working
//! directory overrides the bundled configuration.

mod app;
mod logger;
mod simulation;
mod ui;

use app::{App, Tab};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use damsim_core::{JsonFileStore, MemoryStore, PresetStore, ToolConfig};
use log::LevelFilter;
use logger::MessageLog;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;

const CONFIG_FILE: &str = "damsim.toml";

fn main() -> io::Result<()> {
    let messages = MessageLog::new();
    if let Err(e) = logger::init(messages.clone(), LevelFilter::Info) {
        messages.push(format!("Logging unavailable: {}", e));
    }

    let config = match ToolConfig::load_or_default(Path::new(CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            messages.push(format!("Error: {}; using bundled config", e));
            ToolConfig::bundled()
        }
    };

    let store: Box<dyn PresetStore> = match JsonFileStore::open(&config.presets_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            messages.push(format!("Error: {}; presets will not be saved", e));
            Box::new(MemoryStore::new())
        }
    };

    let mut app = App::new(config, store, messages);
    if let Some(link) = std::env::args().nth(1) {
        app.import_link(&link);
        app.current_tab = Tab::Compare;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
            return Ok(());
        }

        // Text prompt takes every key
        if app.input.is_some() {
            match key.code {
                KeyCode::Enter => app.commit_input(),
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Backspace => app.input_backspace(),
                KeyCode::Char(c) => app.input_char(c),
                _ => {}
            }
            continue;
        }

        // Pending confirmation
        if app.pending.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_pending(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_pending(),
                _ => {}
            }
            continue;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) => return Ok(()),
            (KeyCode::Tab, _) => app.next_tab(),
            (KeyCode::BackTab, _) => app.prev_tab(),
            (KeyCode::Char('1'), _) => app.set_tab(0),
            (KeyCode::Char('2'), _) => app.set_tab(1),
            (KeyCode::Char('3'), _) => app.set_tab(2),
            (KeyCode::Char('4'), _) => app.set_tab(3),
            (KeyCode::Char('5'), _) => app.set_tab(4),
            (KeyCode::Char('6'), _) => app.set_tab(5),
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.on_up(),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.on_down(),
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.on_left(),
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.on_right(),
            (KeyCode::Enter, _) => app.on_enter(),
            (KeyCode::Char(' '), _) => app.on_space(),
            (KeyCode::Char('s'), _) => app.prompt_save(),
            (KeyCode::Char('S'), _) => app.save_comparison(),
            (KeyCode::Char('r'), _) => app.reset(),
            (KeyCode::Char('x'), _) => app.swap_roles(),
            (KeyCode::Char('c'), _) => app.clear_comparison(),
            (KeyCode::Char('u'), _) => app.share(),
            (KeyCode::Char('i'), _) => app.prompt_import(),
            (KeyCode::Char('e'), _) => app.export_json(),
            (KeyCode::Char('?'), _) => app.toggle_help(),
            (KeyCode::Char(c), _) if app.current_tab == Tab::Presets => {
                if let Some(name) = app.selected_preset_name() {
                    match c {
                        'b' => app.load_base(&name),
                        'm' => app.load_comparison(&name),
                        'n' => app.prompt_rename(),
                        'd' => app.delete_selected_preset(),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
}
