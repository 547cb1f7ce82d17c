//! # conveyor-client
//!
//! Blocking `ureq` client for the orchestration API: pipeline config
//! fetch / update with optimistic versioning, build lookup and abort, and
//! job pause / unpause.
//!
//! [`PipelineApi`] is the seam `set-pipeline` is written against, so the
//! fetch → diff → confirm → update flow can be exercised without a server.

pub mod client;
pub mod error;
pub mod multipart;

pub use client::{
    Build, Client, FetchedConfig, PipelineApi, SaveOutcome, SaveStatus, CONFIG_VERSION_HEADER,
};
pub use error::ClientError;
