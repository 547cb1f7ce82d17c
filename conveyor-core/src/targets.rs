//! Saved API targets in a YAML rc file.
//!
//! # Storage layout
//!
//! ```text
//! ~/.conveyorrc      (mode 0600)
//! targets:
//!   <name>:
//!     api: https://ci.example.com
//!     token: { type: Bearer, value: ... }
//!     saved_at: 2024-01-01T00:00:00Z
//! ```
//!
//! # API pattern
//!
//! Every function has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{target_io_err, TargetError};
use crate::types::TargetName;

/// Authorization token sent as `Authorization: <type> <value>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetToken {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Connection properties of one saved target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProps {
    pub api: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TargetToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Root of the rc file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RcFile {
    #[serde(default)]
    pub targets: BTreeMap<TargetName, TargetProps>,
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<home>/.conveyorrc` — pure, no I/O.
pub fn rc_path_at(home: &Path) -> PathBuf {
    home.join(".conveyorrc")
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load the rc file. A missing file is an empty target list.
pub fn load_at(home: &Path) -> Result<RcFile, TargetError> {
    let path = rc_path_at(home);
    if !path.exists() {
        return Ok(RcFile::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| target_io_err(&path, e))?;
    if contents.trim().is_empty() {
        return Ok(RcFile::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| TargetError::Parse { path, source })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<RcFile, TargetError> {
    load_at(&home()?)
}

/// Look up a single target by name.
pub fn load_target_at(home: &Path, name: &TargetName) -> Result<TargetProps, TargetError> {
    load_at(home)?
        .targets
        .remove(name)
        .ok_or_else(|| TargetError::UnknownTarget {
            name: name.0.clone(),
        })
}

/// `load_target_at` convenience wrapper.
pub fn load_target(name: &TargetName) -> Result<TargetProps, TargetError> {
    load_target_at(&home()?, name)
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Write the rc file with mode `0600`.
pub fn save_at(home: &Path, rc: &RcFile) -> Result<(), TargetError> {
    let path = rc_path_at(home);
    let yaml = serde_yaml::to_string(rc)?;
    std::fs::write(&path, yaml).map_err(|e| target_io_err(&path, e))?;
    set_file_permissions(&path)?;
    Ok(())
}

/// Insert or replace a target, stamping `saved_at`.
pub fn save_target_at(
    home: &Path,
    name: TargetName,
    api: &str,
    token: Option<TargetToken>,
) -> Result<TargetProps, TargetError> {
    let mut rc = load_at(home)?;
    let props = TargetProps {
        api: api.trim_end_matches('/').to_string(),
        token,
        saved_at: Some(Utc::now()),
    };
    rc.targets.insert(name, props.clone());
    save_at(home, &rc)?;
    Ok(props)
}

/// `save_target_at` convenience wrapper.
pub fn save_target(
    name: TargetName,
    api: &str,
    token: Option<TargetToken>,
) -> Result<TargetProps, TargetError> {
    save_target_at(&home()?, name, api, token)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, TargetError> {
    dirs::home_dir().ok_or(TargetError::HomeNotFound)
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), TargetError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| target_io_err(path, e))
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), TargetError> {
    Ok(())
}
