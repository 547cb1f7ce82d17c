//! Error types for conveyor-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a local pipeline config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The resolved document is not a valid pipeline config.
    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Vars(#[from] VarsError),
}

/// Errors raised by the variable resolver.
#[derive(Debug, Error)]
pub enum VarsError {
    #[error("could not read vars file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed vars file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("malformed variable '{0}': expected key=value")]
    MalformedAssignment(String),

    #[error("undefined variables: {}", .names.join(", "))]
    Undefined { names: Vec<String> },

    #[error("could not encode variable '{name}': {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while reading or writing the targets rc file.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse targets file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    #[error("unknown target '{name}'; save it first with `conveyor save-target`")]
    UnknownTarget { name: String },
}

pub(crate) fn target_io_err(path: impl Into<PathBuf>, source: std::io::Error) -> TargetError {
    TargetError::Io {
        path: path.into(),
        source,
    }
}
