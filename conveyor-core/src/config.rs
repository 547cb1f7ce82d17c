//! Local pipeline config loading.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::ConfigDocument;
use crate::vars::Variables;

/// A config file after variable substitution.
///
/// `raw` is exactly what gets uploaded; `document` is its parsed form used
/// for diffing.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalConfig {
    pub raw: String,
    pub document: ConfigDocument,
}

impl LocalConfig {
    /// Read `path`, resolve placeholders from `vars`, and parse the result.
    pub fn load(path: &Path, vars: &Variables) -> Result<Self, ConfigError> {
        let template = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = vars.apply(&template)?;
        let document = ConfigDocument::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            groups = document.groups.len(),
            resources = document.resources.len(),
            resource_types = document.resource_types.len(),
            jobs = document.jobs.len(),
            "loaded local config"
        );
        Ok(Self { raw, document })
    }
}
