//! Twitter/X posts: normalization and the fixture source.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DataSourceError;
use crate::profile::source::{json_kind, read_json};

const TWEETS_TIMEOUT: Duration = Duration::from_secs(5);

/// A post reduced to its text and permalink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TweetRecord {
    pub text: String,
    pub url: String,
}

/// Permalink for post `id` by `username`.
pub fn tweet_url(username: &str, id: &str) -> String {
    format!("https://twitter.com/{}/status/{}", username, id)
}

/// Map raw post records to [`TweetRecord`]s, preserving order.
///
/// # Errors
///
/// Returns `DataSourceError::MalformedPayload` unless `raw` is an array of
/// objects that each carry a string `text` and a numeric or string `id`.
pub fn normalize_tweets(
    username: &str,
    raw: &Value,
) -> Result<Vec<TweetRecord>, DataSourceError> {
    let items = raw.as_array().ok_or_else(|| {
        DataSourceError::MalformedPayload(format!(
            "expected an array of posts, got {}",
            json_kind(raw)
        ))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| -> Result<TweetRecord, DataSourceError> {
            let text = item
                .get("text")
                .and_then(Value::as_str)
                .ok_or_else(|| malformed(index, "text"))?;
            let id = match item.get("id") {
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                _ => return Err(malformed(index, "id")),
            };
            Ok(TweetRecord {
                text: text.to_string(),
                url: tweet_url(username, &id),
            })
        })
        .collect()
}

fn malformed(index: usize, field: &str) -> DataSourceError {
    DataSourceError::MalformedPayload(format!("post {} has no usable '{}' field", index, field))
}

/// Returns raw post records for a username.
#[async_trait]
pub trait TweetSource: Send + Sync {
    async fn fetch_raw(&self, username: &str) -> Result<Value, DataSourceError>;
}

/// Serves a fixed set of posts regardless of username.
pub struct FixtureTweetSource {
    client: reqwest::Client,
    fixture_url: String,
}

impl FixtureTweetSource {
    pub fn new(fixture_url: String) -> Result<Self, DataSourceError> {
        let client = reqwest::Client::builder().timeout(TWEETS_TIMEOUT).build()?;
        Ok(Self {
            client,
            fixture_url,
        })
    }
}

#[async_trait]
impl TweetSource for FixtureTweetSource {
    async fn fetch_raw(&self, username: &str) -> Result<Value, DataSourceError> {
        tracing::debug!(username, fixture = %self.fixture_url, "Serving posts fixture");
        let response = self.client.get(&self.fixture_url).send().await?;
        read_json(response).await
    }
}

/// Fetch and normalize posts for `username`.
pub async fn scrape_user_tweets(
    source: &dyn TweetSource,
    username: &str,
) -> Result<Vec<TweetRecord>, DataSourceError> {
    let raw = source.fetch_raw(username).await?;
    normalize_tweets(username, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticTweets(Value);

    #[async_trait]
    impl TweetSource for StaticTweets {
        async fn fetch_raw(&self, _username: &str) -> Result<Value, DataSourceError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn scenario_builds_permalink() {
        let tweets =
            normalize_tweets("abc", &json!([{"id": 42, "text": "hello"}])).expect("tweets");
        assert_eq!(
            tweets,
            vec![TweetRecord {
                text: "hello".to_string(),
                url: "https://twitter.com/abc/status/42".to_string(),
            }]
        );
    }

    #[test]
    fn drops_extra_fields_and_keeps_order() {
        let raw = json!([
            {"id": "1692245436213088257", "text": "first", "created_at": "2023-08-17", "likes": 3},
            {"id": 7, "text": "second", "lang": "en"},
            {"id": 7, "text": "second", "lang": "en"}
        ]);
        let tweets = normalize_tweets("EdenEmarco177", &raw).expect("tweets");
        let urls: Vec<&str> = tweets.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://twitter.com/EdenEmarco177/status/1692245436213088257",
                "https://twitter.com/EdenEmarco177/status/7",
                "https://twitter.com/EdenEmarco177/status/7",
            ]
        );
        assert_eq!(tweets[0].text, "first");
    }

    #[test]
    fn malformed_payloads_fail() {
        for raw in [
            json!({"id": 1, "text": "not a list"}),
            json!([{"text": "missing id"}]),
            json!([{"id": 1}]),
            json!([{"id": null, "text": "null id"}]),
            json!(["just a string"]),
        ] {
            assert!(
                matches!(normalize_tweets("abc", &raw), Err(DataSourceError::MalformedPayload(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn scrape_normalizes_fetched_posts() {
        let source = StaticTweets(json!([{"id": 1, "text": "gm"}]));
        let tweets = scrape_user_tweets(&source, "abc").await.expect("tweets");
        assert_eq!(tweets[0].url, "https://twitter.com/abc/status/1");
    }
}
