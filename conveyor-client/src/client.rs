//! Blocking HTTP client for the orchestration API.
//!
//! One request per call; no retries, no client-side timeouts beyond the
//! transport defaults.

use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, NON_ALPHANUMERIC};
use serde::Deserialize;

use conveyor_core::targets::{TargetProps, TargetToken};
use conveyor_core::{ConfigDocument, ConfigVersion, PipelineName, Warning};

use crate::error::ClientError;
use crate::multipart;

/// Bytes escaped in a path segment: everything but unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Header carrying the optimistic-concurrency token on fetch and update.
pub const CONFIG_VERSION_HEADER: &str = "X-Conveyor-Config-Version";

/// A fetched remote config and the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedConfig {
    pub document: ConfigDocument,
    pub version: ConfigVersion,
    /// `false` when the server has no pipeline by that name yet.
    pub exists: bool,
}

/// How the server took a config update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Created,
    Updated,
}

/// Successful outcome of a config update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub status: SaveStatus,
    pub warnings: Vec<Warning>,
    /// Whether the pipeline is paused after the update.
    pub paused: bool,
}

/// Build as returned by the job build lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Build {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
struct SaveResponse {
    #[serde(default)]
    warnings: Vec<Warning>,
    #[serde(default)]
    paused: Option<bool>,
}

/// Config fetch / update seam used by `set-pipeline`.
pub trait PipelineApi {
    fn get_config(&self, pipeline: &PipelineName) -> Result<FetchedConfig, ClientError>;

    /// Upload `raw` as the pipeline config, conditional on `version`.
    fn save_config(
        &self,
        pipeline: &PipelineName,
        raw: &str,
        version: &ConfigVersion,
    ) -> Result<SaveOutcome, ClientError>;

    /// Browser URL of a pipeline.
    fn pipeline_url(&self, pipeline: &PipelineName) -> String;
}

/// API client bound to one target.
#[derive(Debug, Clone)]
pub struct Client {
    api: String,
    token: Option<TargetToken>,
    agent: ureq::Agent,
}

impl Client {
    pub fn new(api: impl Into<String>, token: Option<TargetToken>) -> Self {
        let api = api.into().trim_end_matches('/').to_string();
        Self {
            api,
            token,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn from_target(props: &TargetProps) -> Self {
        Self::new(props.api.clone(), props.token.clone())
    }

    /// Base URL of the target, without trailing slash.
    pub fn api(&self) -> &str {
        &self.api
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = format!("{}{}", self.api, path);
        tracing::debug!(%method, %url, "issuing request");
        let request = self.agent.request(method, &url);
        match &self.token {
            Some(token) => request.set("Authorization", &format!("{} {}", token.kind, token.value)),
            None => request,
        }
    }

    /// Look up a build by pipeline, job and build name. `None` if absent.
    pub fn job_build(
        &self,
        pipeline: &str,
        job: &str,
        build: &str,
    ) -> Result<Option<Build>, ClientError> {
        let path = format!(
            "/api/v1/pipelines/{}/jobs/{}/builds/{}",
            segment(pipeline),
            segment(job),
            segment(build)
        );
        let response = match self.request("GET", &path).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(err) => return Err(ClientError::from_ureq(err)),
        };
        let body = read_body(response)?;
        let build = serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            what: "build",
            source,
        })?;
        Ok(Some(build))
    }

    pub fn abort_build(&self, build_id: u64) -> Result<(), ClientError> {
        self.request("PUT", &format!("/api/v1/builds/{build_id}/abort"))
            .call()
            .map_err(ClientError::from_ureq)?;
        tracing::info!(build_id, "build aborted");
        Ok(())
    }

    pub fn pause_job(&self, pipeline: &str, job: &str) -> Result<(), ClientError> {
        let path = format!("/api/v1/pipelines/{}/jobs/{}/pause", segment(pipeline), segment(job));
        self.request("PUT", &path)
            .call()
            .map_err(ClientError::from_ureq)?;
        Ok(())
    }

    pub fn unpause_job(&self, pipeline: &str, job: &str) -> Result<(), ClientError> {
        let path = format!("/api/v1/pipelines/{}/jobs/{}/unpause", segment(pipeline), segment(job));
        self.request("PUT", &path)
            .call()
            .map_err(ClientError::from_ureq)?;
        Ok(())
    }

    pub fn pause_pipeline(&self, pipeline: &PipelineName) -> Result<(), ClientError> {
        self.request("PUT", &format!("/api/v1/pipelines/{}/pause", segment(&pipeline.0)))
            .call()
            .map_err(ClientError::from_ureq)?;
        Ok(())
    }

    pub fn unpause_pipeline(&self, pipeline: &PipelineName) -> Result<(), ClientError> {
        self.request("PUT", &format!("/api/v1/pipelines/{}/unpause", segment(&pipeline.0)))
            .call()
            .map_err(ClientError::from_ureq)?;
        Ok(())
    }
}

impl PipelineApi for Client {
    fn get_config(&self, pipeline: &PipelineName) -> Result<FetchedConfig, ClientError> {
        let path = config_path(pipeline);
        let response = match self.request("GET", &path).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, response)) => {
                tracing::info!(%pipeline, "pipeline does not exist yet");
                return Ok(FetchedConfig {
                    document: ConfigDocument::default(),
                    version: version_of(&response),
                    exists: false,
                });
            }
            Err(err) => return Err(ClientError::from_ureq(err)),
        };

        let version = version_of(&response);
        if version.as_str().is_empty() {
            tracing::warn!(%pipeline, "config response carried no version header");
        }
        let body = read_body(response)?;
        let document = if body.trim().is_empty() {
            ConfigDocument::default()
        } else {
            serde_json::from_str(&body).map_err(|source| ClientError::Decode {
                what: "pipeline config",
                source,
            })?
        };
        Ok(FetchedConfig {
            document,
            version,
            exists: true,
        })
    }

    fn save_config(
        &self,
        pipeline: &PipelineName,
        raw: &str,
        version: &ConfigVersion,
    ) -> Result<SaveOutcome, ClientError> {
        let path = config_path(pipeline);
        let encoded = multipart::single_part("config", "application/x-yaml", raw);
        let response = self
            .request("PUT", &path)
            .set(CONFIG_VERSION_HEADER, version.as_str())
            .set("Content-Type", &encoded.content_type)
            .send_bytes(&encoded.body)
            .map_err(ClientError::from_ureq)?;

        let status = match response.status() {
            201 => SaveStatus::Created,
            _ => SaveStatus::Updated,
        };
        let body = read_body(response)?;
        let parsed = if body.trim().is_empty() {
            SaveResponse::default()
        } else {
            // The config is saved at this point; an unreadable body is
            // reported to the operator, not turned into a failure.
            serde_json::from_str(&body).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "could not decode save response");
                SaveResponse {
                    warnings: vec![Warning {
                        kind: "response".to_string(),
                        message: format!("could not decode server response ({err}): {body}"),
                    }],
                    paused: None,
                }
            })
        };
        tracing::info!(%pipeline, ?status, warnings = parsed.warnings.len(), "config saved");

        Ok(SaveOutcome {
            status,
            warnings: parsed.warnings,
            paused: parsed.paused.unwrap_or(status == SaveStatus::Created),
        })
    }

    fn pipeline_url(&self, pipeline: &PipelineName) -> String {
        format!("{}/pipelines/{}", self.api, segment(&pipeline.0))
    }
}

fn segment(name: &str) -> PercentEncode<'_> {
    utf8_percent_encode(name, SEGMENT)
}

fn config_path(pipeline: &PipelineName) -> String {
    format!("/api/v1/pipelines/{}/config", segment(&pipeline.0))
}

fn version_of(response: &ureq::Response) -> ConfigVersion {
    ConfigVersion::from(response.header(CONFIG_VERSION_HEADER).unwrap_or_default())
}

fn read_body(response: ureq::Response) -> Result<String, ClientError> {
    response
        .into_string()
        .map_err(|err| ClientError::Transport(err.to_string()))
}
