//! Web search tools.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::Tool;

const DEFAULT_NUM_RESULTS: u64 = 5;

fn search_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "The search query"
            },
            "num_results": {
                "type": "integer",
                "description": "Maximum number of results to return (default: 5)"
            }
        },
        "required": ["query"]
    })
}

fn query_args(args: &Value) -> anyhow::Result<(&str, usize)> {
    let query = args["query"]
        .as_str()
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("Missing 'query' argument"))?;
    let num_results = args["num_results"].as_u64().unwrap_or(DEFAULT_NUM_RESULTS).clamp(1, 10);
    Ok((query, num_results as usize))
}

/// Search the web through DuckDuckGo's HTML endpoint (no API key needed).
pub struct WebSearch {
    client: reqwest::Client,
}

impl WebSearch {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; IceBreaker/1.0)")
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Tool for WebSearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web. Returns result titles, snippets and URLs."
    }

    fn parameters_schema(&self) -> Value {
        search_schema()
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let (query, num_results) = query_args(&args)?;
        let url = format!(
            "https://html.duckduckgo.com/html/?q={}",
            urlencoding::encode(query)
        );

        tracing::debug!(query, "DuckDuckGo search");
        let html = self.client.get(&url).send().await?.text().await?;
        let results = extract_ddg_results(&html, num_results);

        if results.is_empty() {
            Ok(format!("No results found for: {}", query))
        } else {
            Ok(results.join("\n\n"))
        }
    }
}

/// Extract up to `limit` results from DuckDuckGo HTML.
fn extract_ddg_results(html: &str, limit: usize) -> Vec<String> {
    let mut results = Vec::new();

    for chunk in html.split("class=\"result__body\"").skip(1) {
        if results.len() >= limit {
            break;
        }

        let title = field_text(chunk, "result__a").unwrap_or("");
        let snippet = field_text(chunk, "result__snippet").unwrap_or("");
        let url = field_text(chunk, "result__url").map(str::trim).unwrap_or("");

        if !title.is_empty() {
            results.push(format!(
                "**{}**\n{}\nURL: {}",
                html_decode(title),
                html_decode(snippet),
                normalize_result_url(url)
            ));
        }
    }

    results
}

/// Text of the first element carrying `class`.
fn field_text<'a>(chunk: &'a str, class: &str) -> Option<&'a str> {
    chunk
        .split(&format!("class=\"{}\"", class))
        .nth(1)
        .and_then(|s| s.split('>').nth(1))
        .and_then(|s| s.split('<').next())
}

/// DuckDuckGo shows result URLs without a scheme.
fn normalize_result_url(url: &str) -> String {
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
}

/// Search the web through the Tavily search API.
pub struct TavilySearch {
    client: reqwest::Client,
    api_key: String,
}

impl TavilySearch {
    const ENDPOINT: &'static str = "https://api.tavily.com/search";

    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, api_key })
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

fn format_tavily(results: &[TavilyResult]) -> String {
    results
        .iter()
        .map(|r| format!("**{}**\n{}\nURL: {}", r.title, r.content, r.url))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl Tool for TavilySearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web with Tavily. Returns result titles, content snippets and URLs."
    }

    fn parameters_schema(&self) -> Value {
        search_schema()
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let (query, num_results) = query_args(&args)?;

        tracing::debug!(query, "Tavily search");
        let response = self
            .client
            .post(Self::ENDPOINT)
            .json(&json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": num_results,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Tavily search failed ({}): {}", status, body));
        }

        let body: TavilyResponse = response.json().await?;
        if body.results.is_empty() {
            Ok(format!("No results found for: {}", query))
        } else {
            Ok(format_tavily(&body.results))
        }
    }
}
