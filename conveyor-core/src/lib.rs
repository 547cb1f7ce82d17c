//! Conveyor core library — pipeline configuration types, variable
//! resolution, target persistence, errors.
//!
//! - [`types`] — Configuration Document and the entity configs it holds
//! - [`value`] — tagged [`Value`] union used for opaque payloads
//! - [`vars`] — `{{placeholder}}` substitution from vars files and `--var`
//! - [`config`] — load a local config file through the variable resolver
//! - [`targets`] — `~/.conveyorrc` load / save
//! - [`error`] — error enums for all of the above

pub mod config;
pub mod error;
pub mod targets;
pub mod types;
pub mod value;
pub mod vars;

pub use config::LocalConfig;
pub use error::{ConfigError, TargetError, VarsError};
pub use types::{
    ConfigDocument, ConfigVersion, GroupConfig, JobConfig, PipelineName, ResourceConfig,
    ResourceTypeConfig, Source, TargetName, Warning,
};
pub use value::Value;
pub use vars::Variables;
