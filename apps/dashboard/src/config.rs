use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use client_core::{FileSessionStore, SessionError};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

pub const CONFIG_FILE: &str = "dashboard.toml";

const ENV_API_BASE_URL: &str = "CLINIC_API_BASE_URL";
const ENV_SESSION_FILE: &str = "CLINIC_SESSION_FILE";
const ENV_ALERT_ON_LOAD_FAILURE: &str = "CLINIC_ALERT_ON_LOAD_FAILURE";
const ENV_REQUEST_TIMEOUT_SECS: &str = "CLINIC_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("{path} is not a valid dashboard config: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub session_file: Option<PathBuf>,
    pub alert_on_load_failure: bool,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".into(),
            session_file: None,
            alert_on_load_failure: false,
            request_timeout_secs: 15,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Configured session file, or the per-user data directory default.
    pub fn session_path(&self) -> Result<PathBuf, SessionError> {
        match &self.session_file {
            Some(path) => Ok(path.clone()),
            None => FileSessionStore::default_path(),
        }
    }
}

/// `dashboard.toml` keys; anything missing keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    session_file: Option<PathBuf>,
    alert_on_load_failure: Option<bool>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `dashboard.toml` in the working directory, then `CLINIC_*`
/// environment variables.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| env::var(key).ok())
}

pub fn load_settings_from(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    match read_file_settings(path) {
        Ok(Some(file_cfg)) => apply_file_settings(&mut settings, file_cfg),
        Ok(None) => {}
        Err(err) => warn!(error = %err, "ignoring dashboard config file"),
    }

    apply_env_overrides(&mut settings, lookup);
    settings
}

fn read_file_settings(path: &Path) -> Result<Option<FileSettings>, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str(&raw)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.session_file {
        settings.session_file = Some(v);
    }
    if let Some(v) = file_cfg.alert_on_load_failure {
        settings.alert_on_load_failure = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup(ENV_API_BASE_URL) {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup(ENV_SESSION_FILE) {
        settings.session_file = Some(PathBuf::from(v));
    }
    if let Some(v) = lookup(ENV_ALERT_ON_LOAD_FAILURE) {
        match parse_flag(ENV_ALERT_ON_LOAD_FAILURE, &v) {
            Ok(flag) => settings.alert_on_load_failure = flag,
            Err(err) => warn!(error = %err, "ignoring environment override"),
        }
    }
    if let Some(v) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
        match v.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => settings.request_timeout_secs = secs,
            _ => {
                let err = ConfigError::InvalidValue {
                    key: ENV_REQUEST_TIMEOUT_SECS,
                    value: v,
                };
                warn!(error = %err, "ignoring environment override");
            }
        }
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
