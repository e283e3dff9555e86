//! Error taxonomy shared by every toolkit backend.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which half of a toolkit's format registry a tag was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatDirection {
    Input,
    Output,
}

impl fmt::Display for FormatDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatDirection::Input => write!(f, "input"),
            FormatDirection::Output => write!(f, "output"),
        }
    }
}

/// Every failure the facade can surface. All variants propagate immediately
/// to the caller; the single exception is per-descriptor computation failure,
/// which `Molecule::calcdesc` converts into omission from the result map.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("'{tag}' is not a recognised {direction} format for {toolkit}")]
    UnrecognizedFormat { toolkit: &'static str, direction: FormatDirection, tag: String },

    #[error("no such file: '{0}'")]
    FileNotFound(PathBuf),

    #[error("'{0}' already exists; use overwrite = true to overwrite it")]
    FileAlreadyExists(PathBuf),

    #[error("could not parse {format} input: {detail}")]
    MalformedInput { format: String, detail: String },

    #[error("molecule has no attribute '{0}'")]
    UnknownAttribute(String),

    #[error("'{0}' is not a recognised fingerprint kind")]
    UnrecognizedFingerprintKind(String),

    #[error("'{0}' is not a recognised descriptor")]
    UnrecognizedDescriptor(String),

    #[error("no such property key: '{0}'")]
    KeyNotFound(String),

    #[error("output file is closed")]
    StreamClosed,

    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("engine error: {0}")]
    Engine(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
