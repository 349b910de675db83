//! The ice breaker pipeline: lookup → fetch → normalize → summarize.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::agent::{twitter_username, LookupAgent, Platform};
use crate::config::Config;
use crate::error::RequestError;
use crate::llm::{AzureOpenAiClient, LlmClient};
use crate::profile::{self, ProfileSource};
use crate::summary::SummaryGenerator;
use crate::tools;
use crate::twitter::{self, FixtureTweetSource, TweetRecord, TweetSource};

/// Summary of a person plus their profile picture.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IceBreakerResult {
    pub summary: String,
    pub picture_url: Option<String>,
}

/// Recent posts of a person's Twitter/X account.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TwitterActivity {
    pub profile_url: String,
    pub username: String,
    pub tweets: Vec<TweetRecord>,
}

/// Stateless request handler; every call is independent.
pub struct IceBreaker {
    lookup: LookupAgent,
    profiles: Arc<dyn ProfileSource>,
    tweets: Arc<dyn TweetSource>,
    summarizer: SummaryGenerator,
}

impl IceBreaker {
    pub fn new(
        lookup: LookupAgent,
        profiles: Arc<dyn ProfileSource>,
        tweets: Arc<dyn TweetSource>,
        summarizer: SummaryGenerator,
    ) -> Self {
        Self {
            lookup,
            profiles,
            tweets,
            summarizer,
        }
    }

    /// Wire up the production clients described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let llm: Arc<dyn LlmClient> = Arc::new(AzureOpenAiClient::new(&config.llm)?);
        let search = tools::search_tool(config)?;

        Ok(Self::new(
            LookupAgent::new(llm.clone(), search, config.max_iterations),
            profile::profile_source(config)?,
            Arc::new(FixtureTweetSource::new(config.twitter_fixture_url.clone())?),
            SummaryGenerator::new(llm),
        ))
    }

    /// Find `name` on LinkedIn and summarize their profile.
    #[tracing::instrument(skip(self))]
    pub async fn ice_break_with(&self, name: &str) -> Result<IceBreakerResult, RequestError> {
        let name = validate_name(name)?;

        let profile_url = self.lookup.find_profile_url(name, Platform::LinkedIn).await?;
        tracing::info!(%profile_url, "Fetching profile data");

        let raw = self.profiles.fetch(&profile_url).await?;
        let normalized = profile::normalize(&raw);
        tracing::debug!(
            raw_fields = raw.len(),
            kept_fields = normalized.len(),
            "Normalized profile"
        );

        let summary = self.summarizer.summarize(&Value::Object(normalized)).await?;

        Ok(IceBreakerResult {
            summary,
            picture_url: profile::picture_url(&raw),
        })
    }

    /// Find `name` on Twitter/X and fetch their recent posts.
    #[tracing::instrument(skip(self))]
    pub async fn twitter_activity(&self, name: &str) -> Result<TwitterActivity, RequestError> {
        let name = validate_name(name)?;

        let profile_url = self.lookup.find_profile_url(name, Platform::Twitter).await?;
        let username = twitter_username(&profile_url)?;
        tracing::info!(%profile_url, %username, "Fetching posts");

        let tweets = twitter::scrape_user_tweets(self.tweets.as_ref(), &username).await?;

        Ok(TwitterActivity {
            profile_url,
            username,
            tweets,
        })
    }
}

fn validate_name(name: &str) -> Result<&str, RequestError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RequestError::InvalidInput("name is required".to_string()));
    }
    Ok(name)
}
