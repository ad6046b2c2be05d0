//! Message log shared by the app and the `log` facade
//!
//! Records are appended to the in-app log panel instead of stderr, which
//! would tear the alternate screen.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::sync::{Arc, Mutex};

const MAX_LINES: usize = 200;

/// Bounded list of log lines, cheap to clone
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        MessageLog::default()
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.into());
            let overflow = lines.len().saturating_sub(MAX_LINES);
            if overflow > 0 {
                lines.drain(..overflow);
            }
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn last(&self) -> Option<String> {
        self.lines.lock().ok().and_then(|l| l.last().cloned())
    }
}

struct PanelLogger {
    log: MessageLog,
    level: LevelFilter,
}

impl Log for PanelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let prefix = match record.level() {
            Level::Error => "error: ",
            Level::Warn => "warn: ",
            Level::Info => "",
            Level::Debug | Level::Trace => "debug: ",
        };
        self.log.push(format!("{}{}", prefix, record.args()));
    }

    fn flush(&self) {}
}

/// Route `log` records into `log` up to `level`
pub fn init(log: MessageLog, level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(PanelLogger { log, level }))?;
    log::set_max_level(level);
    Ok(())
}
