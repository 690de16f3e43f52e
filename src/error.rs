use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::people::Role;

#[derive(Error, Debug)]
pub enum SongbookError {
    #[error("Songbook error: {0}")]
    Generic(String),
    #[error(transparent)]
    Expected(#[from] SongbookExpectedError),
    #[error("Store unavailable at {path}: {reason}")]
    StoreUnavailable { path: PathBuf, reason: String },
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors caused by user input (mostly configuration) rather than by the engine itself.
#[derive(Error, Debug)]
pub enum SongbookExpectedError {
    #[error("{0}")]
    Generic(String),
    #[error("Configuration file not found ({path})")]
    ConfigNotFound { path: PathBuf },
    #[error("Failed to decode configuration file ({path}): {message}")]
    ConfigDecode { path: PathBuf, message: String },
    #[error("Invalid value for {key} in configuration file: {message}")]
    InvalidConfigValue { key: String, message: String },
}

/// A single catalog entry failed. Recorded in the batch output instead of aborting it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Question {seq} ({question}) failed: {message}")]
pub struct QueryError {
    pub seq: usize,
    pub question: String,
    pub message: String,
}

/// One role channel of a people search failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Error accessing database for {role} search: {message}")]
pub struct RoleSearchError {
    pub role: Role,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, SongbookError>;
