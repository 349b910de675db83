//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::twitter::TweetRecord;

/// Form body of `POST /process` and `POST /tweets`.
#[derive(Debug, Clone, Deserialize)]
pub struct NameForm {
    /// Full name of the person to look up
    #[serde(default)]
    pub name: String,
}

/// Response of `POST /process`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessResponse {
    /// Generated summary, including the "Interesting Facts" section if any
    pub summary_and_facts: String,

    /// Profile picture URL from the raw profile data
    pub picture_url: Option<String>,
}

/// Response of `POST /tweets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetsResponse {
    pub profile_url: String,
    pub username: String,
    pub tweets: Vec<TweetRecord>,
}

/// Error body returned for any failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Failing stage: `input`, `lookup`, `data_source` or `generation`
    pub stage: String,

    /// Correlates with the server logs
    pub request_id: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
