#![forbid(unsafe_code)]

//! Error type shared by every narrative crate.

use std::fmt;

/// Errors surfaced by configuration loading and presentation hand-off.
///
/// Navigation itself never fails: out-of-range activations are ignored and
/// every other transition is total over valid state.
#[derive(Debug)]
pub enum NarrativeError {
    /// A companion presentation was requested but is not part of the build.
    ///
    /// This is an integration-time misconfiguration and is not recoverable.
    MissingComponent {
        /// Registry name that was looked up (e.g. `"hotgraphic"`).
        name: String,
    },
    /// Configuration parsed but failed validation.
    InvalidConfig(String),
    /// JSON decode failure.
    Parse(serde_json::Error),
    /// I/O failure while reading configuration.
    Io(std::io::Error),
}

impl fmt::Display for NarrativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingComponent { name } => {
                write!(f, "component `{name}` not included in build")
            }
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::Parse(err) => write!(f, "configuration parse error: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for NarrativeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::MissingComponent { .. } | Self::InvalidConfig(_) => None,
        }
    }
}

impl From<serde_json::Error> for NarrativeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for NarrativeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl NarrativeError {
    /// Whether this error is a build/integration misconfiguration that the
    /// host must not try to recover from.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingComponent { .. })
    }
}

/// Standard result type for narrative APIs.
pub type Result<T> = std::result::Result<T, NarrativeError>;
