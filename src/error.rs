use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color `{0}`, expected RRGGBB or RGB")]
    Hex(String),
    #[error("invalid rgb() color `{0}`, expected rgb(r,g,b) with channels 0-255")]
    Rgb(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),
    #[error("invalid value `{value}` for {option}")]
    InvalidValue { option: &'static str, value: String },
    #[error("{option} must be {expected}, got {value}")]
    OutOfRange {
        option: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error("unknown option: {0}")]
    UnknownOption(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
