//! Error types for conveyor-client.

use thiserror::Error;

/// All errors that can arise from talking to the API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (refused, reset, EOF...).
    #[error("{0}")]
    Transport(String),

    /// The server answered with a status the operation does not accept.
    #[error("unexpected response code: {status} {status_text}\n{body}")]
    UnexpectedResponse {
        status: u16,
        status_text: String,
        body: String,
    },

    /// The config version sent with an update is no longer current.
    #[error(
        "{body}\nthe pipeline configuration changed since it was fetched; \
         re-run set-pipeline to review the new diff"
    )]
    VersionConflict { body: String },

    /// A response body could not be decoded.
    #[error("could not decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    pub(crate) fn from_ureq(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let status_text = response.status_text().to_string();
                let body = response.into_string().unwrap_or_default();
                if status == 409 {
                    ClientError::VersionConflict { body }
                } else {
                    ClientError::UnexpectedResponse {
                        status,
                        status_text,
                        body,
                    }
                }
            }
            ureq::Error::Transport(transport) => ClientError::Transport(transport.to_string()),
        }
    }
}
