//! Errors raised while preparing or sending scenario requests.
//!
//! Assertion mismatches are not errors; they land in the run report.

#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid config value for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing path parameter `{0}`")]
    MissingPathParam(String),

    #[error("no pet id captured; create_pet must pass first")]
    MissingPetId,

    #[error("failed to write report `{path}`: {source}")]
    Report {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SuiteError>;
