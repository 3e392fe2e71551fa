use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by catalog lookups and cost calculations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown provider `{0}`")]
    UnknownProvider(String),

    #[error("unknown model `{model}` for provider `{provider}`")]
    UnknownModel { provider: String, model: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl Error {
    /// True for a provider or model missing from the price catalog.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::UnknownProvider(_) | Error::UnknownModel { .. })
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}

/// Startup failures. A catalog that fails to load is never partially served.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read price catalog {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("price catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("price catalog is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("malformed price catalog entry {location}: {reason}")]
    Malformed { location: String, reason: String },

    #[error("price catalog contains no providers")]
    Empty,

    #[error("failed to initialise tokenizer: {0}")]
    Tokenizer(String),
}
