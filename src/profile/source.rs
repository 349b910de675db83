//! Profile data backends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::ProfileRecord;
use crate::config::{Config, ProfileSourceKind};
use crate::error::DataSourceError;

const PROFILE_TIMEOUT: Duration = Duration::from_secs(10);

const PROXYCURL_ENDPOINT: &str = "https://nubela.co/proxycurl/api/v2/linkedin";

/// Retrieves the raw profile record behind a profile URL.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self, profile_url: &str) -> Result<ProfileRecord, DataSourceError>;
}

/// Build the backend selected in `config`.
pub fn profile_source(config: &Config) -> Result<Arc<dyn ProfileSource>, DataSourceError> {
    let source: Arc<dyn ProfileSource> = match &config.profile_source {
        ProfileSourceKind::Fixture { url } => Arc::new(FixtureProfileSource::new(url.clone())?),
        ProfileSourceKind::Proxycurl { api_key } => {
            Arc::new(ProxycurlProfileSource::new(api_key.clone())?)
        }
    };
    Ok(source)
}

/// Serves the same fixture record for every profile URL.
pub struct FixtureProfileSource {
    client: reqwest::Client,
    fixture_url: String,
}

impl FixtureProfileSource {
    pub fn new(fixture_url: String) -> Result<Self, DataSourceError> {
        let client = reqwest::Client::builder().timeout(PROFILE_TIMEOUT).build()?;
        Ok(Self {
            client,
            fixture_url,
        })
    }
}

#[async_trait]
impl ProfileSource for FixtureProfileSource {
    async fn fetch(&self, profile_url: &str) -> Result<ProfileRecord, DataSourceError> {
        tracing::debug!(profile_url, fixture = %self.fixture_url, "Serving profile fixture");
        let response = self.client.get(&self.fixture_url).send().await?;
        into_record(read_json(response).await?)
    }
}

/// Live profile data from the Proxycurl LinkedIn API.
pub struct ProxycurlProfileSource {
    client: reqwest::Client,
    api_key: String,
}

impl ProxycurlProfileSource {
    pub fn new(api_key: String) -> Result<Self, DataSourceError> {
        if api_key.trim().is_empty() {
            return Err(DataSourceError::MissingCredential("PROXYCURL_API_KEY"));
        }
        let client = reqwest::Client::builder().timeout(PROFILE_TIMEOUT).build()?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl ProfileSource for ProxycurlProfileSource {
    async fn fetch(&self, profile_url: &str) -> Result<ProfileRecord, DataSourceError> {
        tracing::debug!(profile_url, "Fetching profile from Proxycurl");
        let response = self
            .client
            .get(PROXYCURL_ENDPOINT)
            .bearer_auth(&self.api_key)
            .query(&[("url", profile_url)])
            .send()
            .await?;
        into_record(read_json(response).await?)
    }
}

/// Decode a successful JSON body, turning non-2xx statuses into errors.
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value, DataSourceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DataSourceError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| DataSourceError::MalformedPayload(e.to_string()))
}

fn into_record(value: Value) -> Result<ProfileRecord, DataSourceError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DataSourceError::MalformedPayload(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_objects_are_profile_records() {
        let record = into_record(json!({"full_name": "Eden Marco"})).expect("object");
        assert_eq!(record["full_name"], json!("Eden Marco"));

        let err = into_record(json!([1, 2])).unwrap_err();
        assert!(matches!(err, DataSourceError::MalformedPayload(ref m) if m.contains("an array")));
    }

    #[test]
    fn proxycurl_requires_credential() {
        assert!(matches!(
            ProxycurlProfileSource::new(" ".to_string()),
            Err(DataSourceError::MissingCredential("PROXYCURL_API_KEY"))
        ));
    }
}
