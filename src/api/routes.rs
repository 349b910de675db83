//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{ErrorResponse, HealthResponse, NameForm, ProcessResponse, TweetsResponse};
use crate::error::RequestError;
use crate::pipeline::IceBreaker;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub ice_breaker: Arc<IceBreaker>,
}

/// A [`RequestError`] tagged with the id of the request that produced it.
#[derive(Debug)]
pub struct ApiError {
    request_id: Uuid,
    error: RequestError,
}

impl ApiError {
    pub fn from_parts(request_id: Uuid, error: RequestError) -> Self {
        Self { request_id, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if status.is_server_error() {
            tracing::error!(
                request_id = %self.request_id,
                stage = self.error.stage(),
                "Request failed: {}",
                self.error
            );
        } else {
            tracing::warn!(request_id = %self.request_id, "Rejected request: {}", self.error);
        }

        let body = ErrorResponse {
            error: self.error.to_string(),
            stage: self.error.stage().to_string(),
            request_id: self.request_id.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// GET / - Static front end.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/health - Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /process - Summarize a person's LinkedIn profile.
pub async fn process(
    State(state): State<AppState>,
    form: Result<Form<NameForm>, FormRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let Form(form) =
        form.map_err(|rejection| ApiError::from_parts(request_id, rejection.into()))?;
    let span = tracing::info_span!("process", %request_id, name = %form.name);

    let result = state
        .ice_breaker
        .ice_break_with(&form.name)
        .instrument(span)
        .await
        .map_err(|error| ApiError { request_id, error })?;

    tracing::info!(%request_id, has_picture = result.picture_url.is_some(), "Processed request");
    Ok(Json(ProcessResponse {
        summary_and_facts: result.summary,
        picture_url: result.picture_url,
    }))
}

/// POST /tweets - Resolve a person's Twitter/X account and list recent posts.
pub async fn tweets(
    State(state): State<AppState>,
    form: Result<Form<NameForm>, FormRejection>,
) -> Result<Json<TweetsResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let Form(form) =
        form.map_err(|rejection| ApiError::from_parts(request_id, rejection.into()))?;
    let span = tracing::info_span!("tweets", %request_id, name = %form.name);

    let activity = state
        .ice_breaker
        .twitter_activity(&form.name)
        .instrument(span)
        .await
        .map_err(|error| ApiError { request_id, error })?;

    tracing::info!(%request_id, tweets = activity.tweets.len(), "Fetched posts");
    Ok(Json(TweetsResponse {
        profile_url: activity.profile_url,
        username: activity.username,
        tweets: activity.tweets,
    }))
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "not found")
}
