//! Azure OpenAI chat completions client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{ChatMessage, ChatResponse, LlmClient, ToolSchema, ToolCall};
use crate::config::LlmConfig;
use crate::error::LlmError;

/// Azure API Management gateways authenticate with this header.
const APIM_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

pub struct AzureOpenAiClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    deployment: String,
}

impl AzureOpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            url: completions_url(config),
            api_key: config.api_key.clone(),
            deployment: config.deployment.clone(),
        })
    }
}

/// Resolve the completion URL. A full `/chat/completions` URL is used verbatim.
fn completions_url(config: &LlmConfig) -> String {
    if config.endpoint.contains("/chat/completions") {
        return config.endpoint.clone();
    }
    format!(
        "{}/openai/deployments/{}/chat/completions?api-version={}",
        config.endpoint.trim_end_matches('/'),
        urlencoding::encode(&config.deployment),
        urlencoding::encode(&config.api_version)
    )
}

#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[async_trait]
impl LlmClient for AzureOpenAiClient {
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
        temperature: f32,
    ) -> Result<ChatResponse, LlmError> {
        let mut payload = json!({
            "model": self.deployment,
            "messages": messages,
            "temperature": temperature,
        });
        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            payload["tools"] = json!(tools);
            payload["tool_choice"] = json!("auto");
        }

        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .header(APIM_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: CompletionBody = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        let message = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Decode("response has no choices".to_string()))?
            .message;

        Ok(ChatResponse {
            content: message.content,
            tool_calls: message.tool_calls,
        })
    }
}
