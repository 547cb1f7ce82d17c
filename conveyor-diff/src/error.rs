//! Error types for conveyor-diff.

use thiserror::Error;

/// Errors that can arise while rendering a diff report.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An entity snapshot could not be serialised for display.
    #[error("could not serialize entity for display: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
