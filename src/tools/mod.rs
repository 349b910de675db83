//! Tools the lookup agent may call.
//!
//! The lookup agent carries exactly one tool: a web search that returns
//! result lines including each hit's URL.

mod web;

pub use web::{TavilySearch, WebSearch};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;

/// A capability exposed to the LLM through function calling.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn parameters_schema(&self) -> Value;

    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Pick the search backend for `config`: Tavily when keyed, DuckDuckGo otherwise.
pub fn search_tool(config: &Config) -> anyhow::Result<Arc<dyn Tool>> {
    let tool: Arc<dyn Tool> = match &config.tavily_api_key {
        Some(key) => {
            tracing::info!("Using Tavily web search");
            Arc::new(TavilySearch::new(key.clone())?)
        }
        None => {
            tracing::info!("TAVILY_API_KEY not set, using DuckDuckGo web search");
            Arc::new(WebSearch::new()?)
        }
    };
    Ok(tool)
}
