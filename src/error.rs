//! Crate-level error types.

use std::fmt;

/// Errors produced by the xrview crate.
///
/// Nothing in here is raised from inside a frame update: per-frame
/// problems (missing input, pick misses, failed property lookups) are
/// outcomes, not errors. These cover setup and file handling.
#[derive(Debug)]
pub enum XrViewError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Replay trace parsing failure.
    TraceParse(String),
    /// Model geometry failed validation.
    InvalidGeometry(String),
}

impl fmt::Display for XrViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::TraceParse(msg) => write!(f, "trace parse error: {msg}"),
            Self::InvalidGeometry(msg) => {
                write!(f, "invalid model geometry: {msg}")
            }
        }
    }
}

impl std::error::Error for XrViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for XrViewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
