//! The config module provides the configuration schema and parsing logic.
//!
//! Unknown keys are reported with a warning and otherwise ignored.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Result, SongbookExpectedError};

pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_NO_ALBUM_TITLE: &str = "Sem Album";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The SQLite file produced by the catalog loader. Opened read-only.
    pub database_path: PathBuf,
    /// Upper bound on the run time of any single statement.
    pub query_timeout: Duration,
    pub busy_timeout: Duration,
    /// Title of the placeholder album that holds songs without an album.
    pub no_album_title: String,
    pub max_proc: usize,
    /// Run the analytics batch on a worker pool of `max_proc` threads.
    pub parallel_batch: bool,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    database_path: Option<String>,
    query_timeout_ms: Option<i64>,
    busy_timeout_ms: Option<i64>,
    no_album_title: Option<String>,
    max_proc: Option<i64>,
    parallel_batch: Option<bool>,
    #[serde(flatten)]
    unrecognized: toml::Table,
}

impl Config {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            no_album_title: DEFAULT_NO_ALBUM_TITLE.to_string(),
            max_proc: default_max_proc(),
            parallel_batch: false,
        }
    }

    pub fn default_config_path() -> PathBuf {
        match ProjectDirs::from("", "", "songbook") {
            Some(dirs) => dirs.config_dir().join("config.toml"),
            None => PathBuf::from("songbook.toml"),
        }
    }

    pub fn parse(config_path_override: Option<&Path>) -> Result<Self> {
        let cfgpath = config_path_override.map(Path::to_path_buf).unwrap_or_else(Self::default_config_path);
        debug!("Loading configuration from {}", cfgpath.display());

        let text = fs::read_to_string(&cfgpath).map_err(|_| SongbookExpectedError::ConfigNotFound { path: cfgpath.clone() })?;
        Self::from_toml_str(&cfgpath, &text)
    }

    pub fn from_toml_str(cfgpath: &Path, text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text).map_err(|e| SongbookExpectedError::ConfigDecode {
            path: cfgpath.to_path_buf(),
            message: e.to_string(),
        })?;

        for key in raw.unrecognized.keys() {
            warn!("Unrecognized key {} in configuration file ({}), ignoring", key, cfgpath.display());
        }

        let database_path = match raw.database_path {
            Some(p) if !p.trim().is_empty() => PathBuf::from(shellexpand::tilde(p.trim()).into_owned()),
            Some(_) => return Err(invalid("database_path", "must be a non-empty path")),
            None => return Err(invalid("database_path", "missing required key")),
        };

        let mut config = Config::new(database_path);
        if let Some(ms) = raw.query_timeout_ms {
            config.query_timeout = Duration::from_millis(positive("query_timeout_ms", ms)?);
        }
        if let Some(ms) = raw.busy_timeout_ms {
            config.busy_timeout = Duration::from_millis(positive("busy_timeout_ms", ms)?);
        }
        if let Some(title) = raw.no_album_title {
            config.no_album_title = title;
        }
        if let Some(n) = raw.max_proc {
            config.max_proc = positive("max_proc", n)? as usize;
        }
        if let Some(parallel) = raw.parallel_batch {
            config.parallel_batch = parallel;
        }
        Ok(config)
    }
}

fn default_max_proc() -> usize {
    num_cpus::get().max(1)
}

fn positive(key: &str, value: i64) -> Result<u64> {
    if value <= 0 {
        return Err(invalid(key, &format!("must be a positive integer: got {value}")));
    }
    Ok(value as u64)
}

fn invalid(key: &str, message: &str) -> crate::error::SongbookError {
    SongbookExpectedError::InvalidConfigValue {
        key: key.to_string(),
        message: message.to_string(),
    }
    .into()
}
