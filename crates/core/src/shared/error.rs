use std::path::PathBuf;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + 'static>;

/// Terminal failures of a frames-to-video conversion.
///
/// Every variant ends the run; nothing is retried.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("required capability unavailable: {0}")]
    MissingCapability(String),
    #[error("unsupported runtime: {0}")]
    UnsupportedRuntime(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to list frames in {dir}: {source}")]
    Enumeration {
        dir: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("no .{extension} frames found in {dir}")]
    EmptyInput { dir: PathBuf, extension: String },
    #[error("failed to decode frame {path}: {source}")]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("failed to write video {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl ConvertError {
    /// Status marker reported to a calling process.
    ///
    /// `0` is reserved for success, `1` and `2` signal environment problems
    /// detected before any file I/O, `3` covers everything else.
    pub fn status_code(&self) -> i32 {
        match self {
            ConvertError::MissingCapability(_) => 1,
            ConvertError::UnsupportedRuntime(_) => 2,
            _ => 3,
        }
    }
}
