//! Variable resolver: substitutes `{{name}}` placeholders in a raw config
//! document before it is parsed.
//!
//! Sources are layered; later sources win:
//!
//! 1. each vars file, in the order given (`--load-vars-from`)
//! 2. each `key=value` assignment (`--var`)
//!
//! A placeholder is replaced by the JSON encoding of its value. JSON is a
//! YAML subset, so strings arrive quoted and mappings / sequences arrive in
//! flow style.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::VarsError;
use crate::value::Value;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{([-\w]+)\}\}").expect("placeholder regex is valid"))
}

/// Layered set of template variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    values: BTreeMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a YAML mapping from `path`; its keys override earlier ones.
    pub fn load_file(&mut self, path: &Path) -> Result<(), VarsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| VarsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(());
        }
        let loaded: BTreeMap<String, Value> =
            serde_yaml::from_str(&contents).map_err(|source| VarsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), count = loaded.len(), "loaded vars file");
        self.values.extend(loaded);
        Ok(())
    }

    /// Merge a `key=value` assignment. The value is always a string.
    pub fn assign(&mut self, assignment: &str) -> Result<(), VarsError> {
        let (key, value) = assignment
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| VarsError::MalformedAssignment(assignment.to_string()))?;
        self.set(key, value);
        Ok(())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace every placeholder in `template`.
    ///
    /// Fails with [`VarsError::Undefined`] naming every placeholder that has
    /// no value, in first-seen order.
    pub fn apply(&self, template: &str) -> Result<String, VarsError> {
        let mut missing: Vec<String> = Vec::new();
        for caps in placeholder().captures_iter(template) {
            let name = &caps[1];
            if !self.values.contains_key(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(VarsError::Undefined { names: missing });
        }

        let mut encoded: BTreeMap<&str, String> = BTreeMap::new();
        for (name, value) in &self.values {
            let json = serde_json::to_string(value).map_err(|source| VarsError::Encode {
                name: name.clone(),
                source,
            })?;
            encoded.insert(name.as_str(), json);
        }

        let resolved = placeholder().replace_all(template, |caps: &Captures<'_>| {
            encoded
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        });
        Ok(resolved.into_owned())
    }
}
