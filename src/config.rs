use scraper::Selector;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "webwatch.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("No watches configured; add at least one [[watch]] section")]
    NoWatches,
    #[error("Duplicate watch label: '{0}'")]
    DuplicateLabel(String),
    #[error("Invalid selector '{selector}' for watch '{label}': {message}")]
    InvalidSelector {
        label: String,
        selector: String,
        message: String,
    },
}

/// What to do when a watch hits an anomaly (fetch error, empty selector
/// match, mail failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log, notify, and keep checking the remaining watches. The process
    /// exits nonzero at the end if any anomaly occurred.
    #[default]
    Continue,
    /// Stop the run at the first anomaly with a distinct exit code.
    Abort,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default)]
    pub on_error: ErrorPolicy,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            state_file: default_state_file(),
            on_error: ErrorPolicy::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default = "default_receiver")]
    pub receiver: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        MailConfig {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            sender: default_sender(),
            receiver: default_receiver(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchConfig {
    pub label: String,
    pub url: String,
    pub selector: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default, rename = "watch")]
    pub watches: Vec<WatchConfig>,
}

/// A watch with its selector compiled, ready for checking.
#[derive(Debug, Clone)]
pub struct Watch {
    pub label: String,
    pub url: String,
    pub selector: Selector,
    /// Source text of the selector, kept for notifications and logs.
    pub selector_source: String,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                ConfigError::PermissionDenied(path.to_path_buf())
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        Self::from_toml(&content)
    }

    /// Validates the watch list and compiles every selector.
    ///
    /// Fails on an empty watch list, duplicate labels, or a selector that
    /// does not parse. Bad configuration should surface at startup, before
    /// any network traffic or state mutation.
    pub fn compile_watches(&self) -> Result<Vec<Watch>, ConfigError> {
        if self.watches.is_empty() {
            return Err(ConfigError::NoWatches);
        }

        let mut seen = std::collections::BTreeSet::new();
        let mut watches = Vec::with_capacity(self.watches.len());

        for watch in &self.watches {
            if !seen.insert(watch.label.as_str()) {
                return Err(ConfigError::DuplicateLabel(watch.label.clone()));
            }

            let selector =
                Selector::parse(&watch.selector).map_err(|e| ConfigError::InvalidSelector {
                    label: watch.label.clone(),
                    selector: watch.selector.clone(),
                    message: e.to_string(),
                })?;

            watches.push(Watch {
                label: watch.label.clone(),
                url: watch.url.clone(),
                selector,
                selector_source: watch.selector.clone(),
            });
        }

        Ok(watches)
    }
}

fn default_state_file() -> PathBuf {
    PathBuf::from("webwatch-state.toml")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    25
}

fn default_sender() -> String {
    "webwatch@localhost".to_string()
}

fn default_receiver() -> String {
    "notify_me@localhost".to_string()
}

fn default_true() -> bool {
    true
}
