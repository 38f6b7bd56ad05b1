//! Leveled diagnostics.
//!
//! The accessor filters its own messages by [`DebugLevel`] and hands the
//! survivors to a [`LogSink`]. The default sink forwards to the `log` facade,
//! so whatever logger the application installed receives them.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Verbosity threshold. A message is emitted when its level is at or below
/// the configured one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugLevel {
    #[default]
    None,
    Error,
    Info,
    Verbose,
}

/// Destination for formatted diagnostic lines.
pub trait LogSink: Send {
    fn write_line(&mut self, level: DebugLevel, line: &str);
}

/// Forwards lines to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacadeSink;

impl LogSink for LogFacadeSink {
    fn write_line(&mut self, level: DebugLevel, line: &str) {
        match level {
            DebugLevel::None => {}
            DebugLevel::Error => log::error!("{}", line),
            DebugLevel::Info => log::info!("{}", line),
            DebugLevel::Verbose => log::debug!("{}", line),
        }
    }
}

/// Keeps lines in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl LogSink for CaptureSink {
    fn write_line(&mut self, _level: DebugLevel, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}

pub(crate) struct Logger {
    level: DebugLevel,
    sink: Box<dyn LogSink>,
}

impl Logger {
    pub(crate) fn new(level: DebugLevel) -> Self {
        Self {
            level,
            sink: Box::new(LogFacadeSink),
        }
    }

    pub(crate) fn level(&self) -> DebugLevel {
        self.level
    }

    pub(crate) fn set_level(&mut self, level: DebugLevel) {
        self.level = level;
    }

    pub(crate) fn set_sink(&mut self, sink: Box<dyn LogSink>) {
        self.sink = sink;
    }

    pub(crate) fn enabled(&self, level: DebugLevel) -> bool {
        level != DebugLevel::None && level <= self.level
    }

    pub(crate) fn log(&mut self, level: DebugLevel, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            let line = args.to_string();
            self.sink.write_line(level, &line);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("level", &self.level).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(DebugLevel::None < DebugLevel::Error);
        assert!(DebugLevel::Error < DebugLevel::Info);
        assert!(DebugLevel::Info < DebugLevel::Verbose);
    }

    #[test]
    fn threshold_filters_louder_levels_through() {
        let capture = CaptureSink::new();
        let mut logger = Logger::new(DebugLevel::Info);
        logger.set_sink(Box::new(capture.clone()));

        logger.log(DebugLevel::Error, format_args!("e"));
        logger.log(DebugLevel::Info, format_args!("i"));
        logger.log(DebugLevel::Verbose, format_args!("v"));
        logger.log(DebugLevel::None, format_args!("n"));

        assert_eq!(capture.lines(), vec!["e".to_string(), "i".to_string()]);
    }

    #[test]
    fn none_silences_everything() {
        let capture = CaptureSink::new();
        let mut logger = Logger::new(DebugLevel::None);
        logger.set_sink(Box::new(capture.clone()));

        logger.log(DebugLevel::Error, format_args!("e"));
        assert!(capture.lines().is_empty());

        logger.set_level(DebugLevel::Verbose);
        logger.log(DebugLevel::Verbose, format_args!("v {}", 1));
        assert_eq!(capture.lines(), vec!["v 1".to_string()]);

        capture.clear();
        assert!(capture.lines().is_empty());
    }

    #[test]
    fn level_parses_from_config_names() {
        let level: DebugLevel = serde_json::from_str("\"verbose\"").unwrap();
        assert_eq!(level, DebugLevel::Verbose);
    }
}
