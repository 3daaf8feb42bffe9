//! Session log: one JSONL file per run under `<state_dir>/logs/`. Logging
//! must never interfere with editing, so every failure in here is swallowed.

use crate::config;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    fn enabled(self) -> bool {
        self as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
    }
}

pub fn set_level(level: Level) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "debug" => Some(Level::Debug),
        "info" => Some(Level::Info),
        "warn" | "warning" => Some(Level::Warn),
        "error" => Some(Level::Error),
        _ => None,
    }
}

fn log_file() -> &'static PathBuf {
    LOG_PATH.get_or_init(|| {
        let dir = config::state_dir().join("logs");
        let _ = fs::create_dir_all(&dir);
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        dir.join(format!("{ts}.jsonl"))
    })
}

/// Appends one `{ts, level, event, data}` record if `level` passes the
/// filter.
pub fn entry(level: Level, event: &str, data: &impl Serialize) {
    if !level.enabled() {
        return;
    }
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    let record = serde_json::json!({
        "ts": ts,
        "level": format!("{:?}", level).to_lowercase(),
        "event": event,
        "data": data,
    });

    let Ok(line) = serde_json::to_string(&record) else {
        return;
    };

    let Ok(mut f) = OpenOptions::new().create(true).append(true).open(log_file()) else {
        return;
    };

    let _ = writeln!(f, "{line}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_known_names() {
        assert_eq!(parse_level("debug"), Some(Level::Debug));
        assert_eq!(parse_level(" Info "), Some(Level::Info));
        assert_eq!(parse_level("warning"), Some(Level::Warn));
        assert_eq!(parse_level("ERROR"), Some(Level::Error));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn log_file_is_named_by_timestamp() {
        let name = log_file().file_name().unwrap().to_string_lossy();
        let stem = name.strip_suffix(".jsonl").expect("jsonl extension");
        assert!(!stem.is_empty());
        assert!(stem.chars().all(|c| c.is_ascii_digit()));
    }
}
