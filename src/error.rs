//! Error taxonomy for the lookup → fetch → summarize pipeline.
//!
//! No stage retries. The first failure aborts the request and is surfaced as a
//! [`RequestError`], which the HTTP layer maps onto a 4xx/5xx response.

use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use thiserror::Error;

/// Transport-level failure talking to the chat completion endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode LLM response: {0}")]
    Decode(String),
}

/// Failure fetching or decoding profile/post data.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("Data source request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Data source returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed data source payload: {0}")]
    MalformedPayload(String),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

/// Failure in the lookup agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Agent produced no final answer after {iterations} iterations")]
    NoFinalAnswer { iterations: usize },

    #[error("Agent answer is not a valid profile URL: {answer}")]
    InvalidUrl { answer: String },
}

/// Failure producing the summary text.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("LLM returned an empty summary")]
    EmptyResponse,
}

/// Any failure at the request boundary.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed request: {0}")]
    Rejected(#[from] FormRejection),

    #[error("Profile lookup failed: {0}")]
    Lookup(#[from] AgentError),

    #[error("Profile data unavailable: {0}")]
    DataSource(#[from] DataSourceError),

    #[error("Summary generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl RequestError {
    /// Pipeline stage that failed, as reported in error bodies.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) | Self::Rejected(_) => "input",
            Self::Lookup(_) => "lookup",
            Self::DataSource(_) => "data_source",
            Self::Generation(_) => "generation",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(rejection) => rejection.status(),
            Self::Lookup(_) | Self::DataSource(_) | Self::Generation(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
