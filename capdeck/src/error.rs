//! Error types
//!
//! Two families live here. [`DispatchError`] is a wiring mistake (a name
//! registered twice, a trigger for a name nobody registered) and is returned
//! as `Err`. [`ProviderError`] is what a capability provider reports at
//! runtime; the dispatcher converts it into a [`Failure`](crate::Failure)
//! at the action boundary and never lets it escape `trigger`.

use std::path::PathBuf;

use thiserror::Error;

/// Registry errors returned by [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// An action with this name is already registered.
    #[error("action `{0}` is already registered")]
    DuplicateName(String),
    /// No action with this name is registered.
    #[error("no action named `{0}`")]
    UnknownAction(String),
}

/// Error reported by a capability provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The capability is not available on this platform or was shut down.
    #[error("capability unavailable: {0}")]
    Unavailable(String),
    /// The provider refused the request (bad source, missing handle, ...).
    #[error("request rejected: {0}")]
    Rejected(String),
    /// A network request made by the provider failed.
    #[error("request failed: {0}")]
    Request(String),
    /// Local I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    pub fn request(reason: impl Into<String>) -> Self {
        Self::Request(reason.into())
    }
}

/// Errors raised while loading a [`ShowcaseConfig`](crate::ShowcaseConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
