use std::path::PathBuf;

/// Errors raised by the validation harness.
///
/// Only [`HarnessError::ToolUnavailable`] is fatal to a run. The rest are
/// captured per language or per word so a batch keeps going.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// espeak-ng is not installed or does not answer a version query
    #[error("reference tool not available: {binary}")]
    ToolUnavailable { binary: PathBuf },

    /// Language code with no registry entry
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// A single reference-tool call failed
    #[error("reference invocation failed: {0}")]
    InvocationFailure(String),

    /// Code that cannot be used as part of a snapshot file name
    #[error("invalid language code: {0:?}")]
    InvalidLanguageCode(String),

    #[error("language registered twice: {0}")]
    DuplicateLanguage(String),

    #[error("language {0} has an empty corpus")]
    EmptyCorpus(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
