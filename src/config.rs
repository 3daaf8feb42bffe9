//! Optional settings from `~/.config/ved/config.yaml`. Everything has a
//! working default; command-line flags override whatever is set here.

use serde::Deserialize;
use std::path::PathBuf;

const APP_NAME: &str = "ved";

pub fn config_dir() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".config"))
        .join(APP_NAME)
}

pub fn state_dir() -> PathBuf {
    std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".local").join("state"))
        .join(APP_NAME)
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Start with the debug row visible.
    pub verbose: Option<bool>,
    /// Minimum level written to the session log: debug, info, warn, error.
    pub log_level: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        let path = config_dir().join("config.yaml");
        let Ok(contents) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_yml::from_str(&contents) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("warning: failed to parse {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
